//! Conversation state for the interactive score-deletion flow.
//!
//! A `deltime` invocation opens at most one session per (user, channel). The
//! session sits in its awaiting-choice state until the user's reply resolves
//! it, the user exits, the reply is unusable, or the timeout fires; every
//! path removes the session, so the flow can never suspend indefinitely.

use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use crate::dao::ScoreRecord;

/// Key identifying one conversation: (user id, channel id).
pub type SessionKey = (u64, u64);

/// Terminal outcome of a deletion conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The user picked a score to delete.
    Resolved(ScoreRecord),
    /// The user chose `0` to exit without deleting.
    Cancelled,
    /// The reply was not a number in range; the flow aborts.
    Invalid,
    /// No reply arrived before the timeout.
    TimedOut,
}

/// Error opening a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// This (user, channel) already has a deletion menu open.
    #[error("a deletion menu is already open for this user and channel")]
    AlreadyActive,
}

struct AwaitingChoice {
    choices: Vec<ScoreRecord>,
}

/// All live deletion conversations, keyed by (user, channel).
pub struct DeletionSessions {
    sessions: DashMap<SessionKey, AwaitingChoice>,
    timeout: Duration,
}

impl DeletionSessions {
    /// Create an empty session table; `timeout` bounds how long each
    /// conversation waits for a reply.
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            timeout,
        }
    }

    /// How long a conversation waits for a reply.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Open a session holding the numbered `choices`, or fail if one is
    /// already awaiting a reply for this key.
    pub fn begin(&self, key: SessionKey, choices: Vec<ScoreRecord>) -> Result<(), SessionError> {
        match self.sessions.entry(key) {
            Entry::Occupied(_) => Err(SessionError::AlreadyActive),
            Entry::Vacant(slot) => {
                slot.insert(AwaitingChoice { choices });
                Ok(())
            }
        }
    }

    /// Feed the user's reply into the session. Valid replies are `0` (exit)
    /// and 1-based indexes into the choices; anything else aborts the flow.
    /// The session is removed whatever the outcome.
    pub fn resolve(&self, key: SessionKey, reply: &str) -> DeletionOutcome {
        let Some((_, session)) = self.sessions.remove(&key) else {
            // Session already expired from under us.
            return DeletionOutcome::TimedOut;
        };

        match reply.trim().parse::<usize>() {
            Ok(0) => DeletionOutcome::Cancelled,
            Ok(choice) if choice <= session.choices.len() => {
                DeletionOutcome::Resolved(session.choices[choice - 1].clone())
            }
            _ => DeletionOutcome::Invalid,
        }
    }

    /// Expire the session after no reply arrived in time.
    pub fn expire(&self, key: SessionKey) -> DeletionOutcome {
        self.sessions.remove(&key);
        DeletionOutcome::TimedOut
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const KEY: SessionKey = (7, 42);

    fn choices() -> Vec<ScoreRecord> {
        ["2021-03-01", "2021-03-02"]
            .iter()
            .map(|raw| ScoreRecord {
                user_id: 7,
                name: "solver".into(),
                date: raw.parse::<NaiveDate>().unwrap(),
                seconds: 60,
            })
            .collect()
    }

    fn sessions() -> DeletionSessions {
        DeletionSessions::new(Duration::from_secs(30))
    }

    #[test]
    fn numbered_reply_resolves_to_that_score() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();

        let outcome = sessions.resolve(KEY, "2");
        let DeletionOutcome::Resolved(score) = outcome else {
            panic!("expected resolution, got {outcome:?}");
        };
        assert_eq!(score.date, "2021-03-02".parse::<NaiveDate>().unwrap());
    }

    #[test]
    fn zero_exits_without_deleting() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();
        assert_eq!(sessions.resolve(KEY, "0"), DeletionOutcome::Cancelled);
    }

    #[test]
    fn out_of_range_or_garbage_aborts() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();
        assert_eq!(sessions.resolve(KEY, "3"), DeletionOutcome::Invalid);

        sessions.begin(KEY, choices()).unwrap();
        assert_eq!(sessions.resolve(KEY, "nope"), DeletionOutcome::Invalid);
    }

    #[test]
    fn one_session_per_user_and_channel() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();
        assert_eq!(
            sessions.begin(KEY, choices()),
            Err(SessionError::AlreadyActive)
        );

        // A different channel is a different conversation.
        sessions.begin((7, 43), choices()).unwrap();
    }

    #[test]
    fn expiry_frees_the_key_and_reports_timeout() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();
        assert_eq!(sessions.expire(KEY), DeletionOutcome::TimedOut);

        sessions.begin(KEY, choices()).unwrap();
    }

    #[test]
    fn resolving_an_expired_session_reports_timeout() {
        let sessions = sessions();
        sessions.begin(KEY, choices()).unwrap();
        sessions.expire(KEY);
        assert_eq!(sessions.resolve(KEY, "1"), DeletionOutcome::TimedOut);
    }
}
