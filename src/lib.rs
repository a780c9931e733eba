//! Library crate for the crossword scoreboard bot, exposing modules for the
//! binary and integration tests.

pub mod commands;
pub mod config;
pub mod dao;
pub mod error;
pub mod puzzle;
pub mod services;
pub mod state;
