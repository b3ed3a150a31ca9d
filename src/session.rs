//! Connection state shared by every expression evaluated on it.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Tunables for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound, in bytes, on the compiled size of a LIKE/RLIKE regex.
    pub regex_size_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: 10 * (1 << 20),
        }
    }
}

/// Represents a client connection evaluating expressions.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID for tracking.
    pub session_id: u64,
    pub config: SessionConfig,
}

impl Session {
    /// Creates a new session.
    pub fn new(config: SessionConfig) -> Self {
        let session_id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("opened session {}", session_id);
        Session { session_id, config }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_distinct() {
        let a = Session::default();
        let b = Session::default();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(a.config, SessionConfig::default());
    }
}
