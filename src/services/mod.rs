//! Service-layer operations over the score store.

pub mod averages;
pub mod histogram;
pub mod leaderboard;
pub mod submission;
