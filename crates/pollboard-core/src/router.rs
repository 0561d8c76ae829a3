// List/detail view routing.
//
// The detail view fetches its poll independently of the collection store and
// so carries its own load state.

use crate::model::{Poll, PollId};

/// Message shown when a detail fetch fails.
pub const DETAIL_FAILED_MESSAGE: &str =
    "Failed to fetch poll details. Poll might not exist or network issue.";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Poll),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// All polls.
    Collection,
    /// A single poll.
    Detail { poll_id: PollId, state: DetailState },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRouter {
    view: View,
}

impl Default for ViewRouter {
    fn default() -> Self {
        ViewRouter {
            view: View::Collection,
        }
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn selected(&self) -> Option<&PollId> {
        match &self.view {
            View::Collection => None,
            View::Detail { poll_id, .. } => Some(poll_id),
        }
    }

    pub fn is_selected(&self, id: &PollId) -> bool {
        self.selected() == Some(id)
    }

    /// Enter the detail view for `poll_id` in the loading state.
    pub fn select(&mut self, poll_id: PollId) {
        self.view = View::Detail {
            poll_id,
            state: DetailState::Loading,
        };
    }

    /// Return to the collection view. Returns `true` if a detail view was
    /// open.
    pub fn back(&mut self) -> bool {
        let was_detail = matches!(self.view, View::Detail { .. });
        self.view = View::Collection;
        was_detail
    }

    /// Put the detail view back into the loading state for a refetch.
    pub fn reload_detail(&mut self) -> Option<PollId> {
        match &mut self.view {
            View::Detail { poll_id, state } => {
                *state = DetailState::Loading;
                Some(poll_id.clone())
            }
            View::Collection => None,
        }
    }

    /// Apply a detail fetch result. Results for a poll that is no longer
    /// selected are dropped; returns whether the result was applied.
    pub fn resolve_detail(&mut self, id: &PollId, result: Result<Poll, String>) -> bool {
        match &mut self.view {
            View::Detail { poll_id, state } if poll_id == id => {
                *state = match result {
                    Ok(poll) => DetailState::Loaded(poll),
                    Err(message) => DetailState::Failed(message),
                };
                true
            }
            _ => false,
        }
    }

    /// Replace the loaded detail record if it is the same poll.
    pub fn patch_detail(&mut self, poll: &Poll) -> bool {
        match &mut self.view {
            View::Detail {
                poll_id,
                state: DetailState::Loaded(current),
            } if *poll_id == poll.id => {
                *current = poll.clone();
                true
            }
            _ => false,
        }
    }

    /// The loaded detail record, if the detail view has one.
    pub fn detail_poll(&self) -> Option<&Poll> {
        match &self.view {
            View::Detail {
                state: DetailState::Loaded(poll),
                ..
            } => Some(poll),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(id: &str, question: &str) -> Poll {
        Poll {
            id: PollId::new(id),
            question: question.into(),
            options: vec![],
            created_by: None,
            created_at: None,
        }
    }

    #[test]
    fn starts_on_collection() {
        let router = ViewRouter::new();
        assert_eq!(router.view(), &View::Collection);
        assert!(router.selected().is_none());
    }

    #[test]
    fn select_enters_loading_detail() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p1"));
        assert_eq!(
            router.view(),
            &View::Detail {
                poll_id: PollId::new("p1"),
                state: DetailState::Loading
            }
        );
        assert!(router.is_selected(&PollId::new("p1")));
    }

    #[test]
    fn resolve_applies_only_to_selected_poll() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p2"));
        assert!(!router.resolve_detail(&PollId::new("p1"), Ok(poll("p1", "stale"))));
        assert!(router.detail_poll().is_none());

        assert!(router.resolve_detail(&PollId::new("p2"), Ok(poll("p2", "fresh"))));
        assert_eq!(router.detail_poll().unwrap().question, "fresh");
    }

    #[test]
    fn resolve_failure_records_message() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p1"));
        router.resolve_detail(&PollId::new("p1"), Err(DETAIL_FAILED_MESSAGE.into()));
        assert!(matches!(
            router.view(),
            View::Detail { state: DetailState::Failed(msg), .. } if msg == DETAIL_FAILED_MESSAGE
        ));
    }

    #[test]
    fn back_clears_selection() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p1"));
        assert!(router.back());
        assert!(router.selected().is_none());
        assert!(!router.back());
    }

    #[test]
    fn result_after_back_is_discarded() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p1"));
        router.back();
        assert!(!router.resolve_detail(&PollId::new("p1"), Ok(poll("p1", "late"))));
        assert_eq!(router.view(), &View::Collection);
    }

    #[test]
    fn patch_detail_only_touches_loaded_same_poll() {
        let mut router = ViewRouter::new();
        router.select(PollId::new("p1"));
        assert!(!router.patch_detail(&poll("p1", "while loading")));

        router.resolve_detail(&PollId::new("p1"), Ok(poll("p1", "v1")));
        assert!(!router.patch_detail(&poll("p2", "other")));
        assert!(router.patch_detail(&poll("p1", "v2")));
        assert_eq!(router.detail_poll().unwrap().question, "v2");
    }

    #[test]
    fn reload_detail_resets_to_loading() {
        let mut router = ViewRouter::new();
        assert!(router.reload_detail().is_none());
        router.select(PollId::new("p1"));
        router.resolve_detail(&PollId::new("p1"), Ok(poll("p1", "v1")));
        assert_eq!(router.reload_detail(), Some(PollId::new("p1")));
        assert!(router.detail_poll().is_none());
    }
}
