// src/app/session.rs
use tracing::debug;

use crate::app::types::{Completion, Phase, Recommendation};

pub const VALIDATION_MSG: &str = "Please enter a movie title";

/// Lifecycle of the one outstanding (or most recent) recommendation request.
///
/// All transitions run on the UI thread; worker threads only post
/// [`Completion`] messages back. Every `start` bumps `active_token`, and a
/// completion is applied only when its token still matches — a stale callback
/// from a superseded request can never overwrite newer state
/// (newest-request-wins).
pub struct Session {
    phase: Phase,
    results: Vec<Recommendation>,
    error_message: Option<String>,
    active_token: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            results: Vec::new(),
            error_message: None,
            active_token: 0,
        }
    }
}

impl Session {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn results(&self) -> &[Recommendation] {
        &self.results
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn active_token(&self) -> u64 {
        self.active_token
    }

    /// Validate and begin a request. Returns the token and trimmed title when
    /// a lookup should actually be issued; an empty/whitespace-only query goes
    /// straight to the error phase without touching the network.
    pub fn submit(&mut self, raw_query: &str) -> Option<(u64, String)> {
        let trimmed = raw_query.trim();
        if trimmed.is_empty() {
            self.phase = Phase::Error;
            self.results.clear();
            self.error_message = Some(VALIDATION_MSG.to_string());
            // The blank submit is still the newest user action: bump the
            // token so an in-flight request from before it cannot apply.
            self.active_token = self.active_token.wrapping_add(1);
            return None;
        }
        Some((self.begin(), trimmed.to_string()))
    }

    /// Enter `loading`: previous results/error are cleared *now*, before the
    /// request is dispatched, so an observer never sees stale content next to
    /// an in-flight request.
    fn begin(&mut self) -> u64 {
        self.phase = Phase::Loading;
        self.results.clear();
        self.error_message = None;
        self.active_token = self.active_token.wrapping_add(1);
        self.active_token
    }

    /// Apply a completion. Returns true when it was accepted; a token
    /// mismatch means a newer `submit` superseded this request and the
    /// result is discarded.
    pub fn apply(&mut self, done: Completion) -> bool {
        if done.token != self.active_token {
            debug!(
                "discarding stale completion (token {} != active {})",
                done.token, self.active_token
            );
            return false;
        }
        match done.result {
            Ok(recs) => {
                self.phase = Phase::Success;
                self.results = recs;
                self.error_message = None;
            }
            Err(err) => {
                self.phase = Phase::Error;
                self.results.clear();
                self.error_message = Some(err.user_message());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::api::{FetchError, GENERIC_FETCH_ERROR};

    fn rec(title: &str) -> Recommendation {
        Recommendation {
            title: title.to_string(),
            poster: None,
            overview: None,
            match_label: None,
        }
    }

    #[test]
    fn starts_idle() {
        let s = Session::default();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.results().is_empty());
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn blank_query_errors_without_a_request() {
        let mut s = Session::default();
        assert!(s.submit("   ").is_none());
        assert_eq!(s.phase(), Phase::Error);
        assert_eq!(s.error_message(), Some(VALIDATION_MSG));
    }

    #[test]
    fn blank_submit_invalidates_an_inflight_request() {
        let mut s = Session::default();
        let (t1, _) = s.submit("Alien").unwrap();

        // The blank submit is the newer user action; its validation error
        // must survive the older request finishing late.
        assert!(s.submit("   ").is_none());
        assert_eq!(s.phase(), Phase::Error);

        assert!(!s.apply(Completion {
            token: t1,
            result: Ok(vec![rec("Aliens")]),
        }));
        assert_eq!(s.phase(), Phase::Error);
        assert_eq!(s.error_message(), Some(VALIDATION_MSG));
        assert!(s.results().is_empty());
    }

    #[test]
    fn submit_trims_and_enters_loading() {
        let mut s = Session::default();
        let (token, title) = s.submit("  Toy Story  ").unwrap();
        assert_eq!(title, "Toy Story");
        assert_eq!(token, 1);
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.results().is_empty());
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn resubmit_clears_previous_outcome_immediately() {
        let mut s = Session::default();
        let (t1, _) = s.submit("Alien").unwrap();
        assert!(s.apply(Completion {
            token: t1,
            result: Ok(vec![rec("Aliens")]),
        }));
        assert_eq!(s.phase(), Phase::Success);

        let (t2, _) = s.submit("Arrival").unwrap();
        assert!(t2 > t1);
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.results().is_empty());
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn empty_success_is_success_not_error() {
        let mut s = Session::default();
        let (t, _) = s.submit("Obscure Title").unwrap();
        assert!(s.apply(Completion {
            token: t,
            result: Ok(Vec::new()),
        }));
        assert_eq!(s.phase(), Phase::Success);
        assert!(s.results().is_empty());
        assert_eq!(s.error_message(), None);
    }

    #[test]
    fn failure_surfaces_server_text_or_fallback() {
        let mut s = Session::default();
        let (t, _) = s.submit("Up").unwrap();
        s.apply(Completion {
            token: t,
            result: Err(FetchError::Server {
                status: 429,
                message: Some("rate limited".into()),
            }),
        });
        assert_eq!(s.phase(), Phase::Error);
        assert_eq!(s.error_message(), Some("rate limited"));

        let (t, _) = s.submit("Up").unwrap();
        s.apply(Completion {
            token: t,
            result: Err(FetchError::Transport("connection refused".into())),
        });
        assert_eq!(s.error_message(), Some(GENERIC_FETCH_ERROR));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut s = Session::default();
        let (t1, _) = s.submit("Alien").unwrap();
        let (t2, _) = s.submit("Aliens").unwrap();

        // The superseded request finishes late; it must not apply.
        assert!(!s.apply(Completion {
            token: t1,
            result: Ok(vec![rec("Alien 3")]),
        }));
        assert_eq!(s.phase(), Phase::Loading);
        assert!(s.results().is_empty());

        // The newest one wins.
        assert!(s.apply(Completion {
            token: t2,
            result: Ok(vec![rec("Prometheus")]),
        }));
        assert_eq!(s.phase(), Phase::Success);
        assert_eq!(s.results()[0].title, "Prometheus");
    }

    #[test]
    fn stale_completion_after_terminal_state_is_discarded() {
        let mut s = Session::default();
        let (t1, _) = s.submit("Alien").unwrap();
        let (t2, _) = s.submit("Aliens").unwrap();
        assert!(s.apply(Completion {
            token: t2,
            result: Err(FetchError::Transport("timeout".into())),
        }));
        assert_eq!(s.phase(), Phase::Error);

        assert!(!s.apply(Completion {
            token: t1,
            result: Ok(vec![rec("Alien 3")]),
        }));
        assert_eq!(s.phase(), Phase::Error);
        assert_eq!(s.error_message(), Some(GENERIC_FETCH_ERROR));
    }
}
