// In-memory poll collection.
//
// Records are keyed by `PollId`; every merge path replaces by identifier so
// the collection never holds two records with the same id.

use std::collections::HashSet;

use tracing::debug;

use crate::model::{Poll, PollId};

/// Message shown when a collection fetch fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to fetch polls.";

/// Result of an [`PollStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Replaced,
    Appended,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStore {
    polls: Vec<Poll>,
    loading: bool,
    error: Option<String>,
}

impl PollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a collection fetch as in flight.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Replace the whole collection with a fetch result. Later duplicates of
    /// an identifier are dropped.
    pub fn load(&mut self, polls: Vec<Poll>) {
        let mut seen = HashSet::with_capacity(polls.len());
        let before = polls.len();
        self.polls = polls
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        if self.polls.len() != before {
            debug!(
                "Dropped {} duplicate poll record(s) from fetch result",
                before - self.polls.len()
            );
        }
        self.loading = false;
        self.error = None;
    }

    /// Record a failed fetch. The previous records stay in place.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Replace the record with the same id in place, or append it.
    pub fn upsert(&mut self, poll: Poll) -> Upsert {
        match self.position(&poll.id) {
            Some(idx) => {
                self.polls[idx] = poll;
                Upsert::Replaced
            }
            None => {
                self.polls.push(poll);
                Upsert::Appended
            }
        }
    }

    /// Insert at the front (newest first). An existing record with the same
    /// id is removed first.
    pub fn prepend(&mut self, poll: Poll) {
        if let Some(idx) = self.position(&poll.id) {
            self.polls.remove(idx);
        }
        self.polls.insert(0, poll);
    }

    /// Replace an existing record with a pushed update. Returns `false` and
    /// leaves the store untouched when the id is unknown.
    pub fn apply_live_update(&mut self, poll: Poll) -> bool {
        match self.position(&poll.id) {
            Some(idx) => {
                self.polls[idx] = poll;
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`, if present.
    pub fn remove(&mut self, id: &PollId) -> Option<Poll> {
        self.position(id).map(|idx| self.polls.remove(idx))
    }

    pub fn get(&self, id: &PollId) -> Option<&Poll> {
        self.polls.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &PollId) -> bool {
        self.position(id).is_some()
    }

    pub fn polls(&self) -> &[Poll] {
        &self.polls
    }

    pub fn len(&self) -> usize {
        self.polls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polls.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn position(&self, id: &PollId) -> Option<usize> {
        self.polls.iter().position(|p| &p.id == id)
    }
}
