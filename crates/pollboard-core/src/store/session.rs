// Signed-in user and the votes they have cast.

use std::collections::HashSet;

use crate::model::{OptionId, Poll, PollId, User, VoteRecord};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStore {
    user: Option<User>,
    /// Polls with a vote request awaiting the backend.
    pending_votes: HashSet<PollId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the session with `user` (login or re-auth).
    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
        self.pending_votes.clear();
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the user has a recorded vote on `poll`. Always false when
    /// anonymous.
    pub fn has_voted(&self, poll: &PollId) -> bool {
        self.voted_option(poll).is_some()
    }

    /// The option the user picked on `poll`, if any.
    pub fn voted_option(&self, poll: &PollId) -> Option<&OptionId> {
        self.user
            .as_ref()?
            .voted_polls
            .iter()
            .find(|v| &v.poll == poll)
            .map(|v| &v.option_id)
    }

    /// Append a vote to the session's vote set. No-op when anonymous or
    /// when the poll already has an entry.
    pub fn record_vote(&mut self, poll: PollId, option_id: OptionId) {
        self.pending_votes.remove(&poll);
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if user.voted_polls.iter().any(|v| v.poll == poll) {
            return;
        }
        user.voted_polls.push(VoteRecord { poll, option_id });
    }

    /// Mark a vote on `poll` as sent. Returns false if one is already
    /// outstanding.
    pub fn begin_vote(&mut self, poll: PollId) -> bool {
        self.pending_votes.insert(poll)
    }

    /// Forget an outstanding vote that the backend rejected.
    pub fn abandon_vote(&mut self, poll: &PollId) {
        self.pending_votes.remove(poll);
    }

    pub fn is_vote_pending(&self, poll: &PollId) -> bool {
        self.pending_votes.contains(poll)
    }

    /// Whether the signed-in user created `poll`.
    pub fn owns(&self, poll: &Poll) -> bool {
        self.user.as_ref().is_some_and(|u| poll.is_created_by(&u.id))
    }

    /// Whether voting controls for `poll` should be enabled.
    pub fn can_vote(&self, poll: &PollId) -> bool {
        self.is_authenticated() && !self.has_voted(poll) && !self.is_vote_pending(poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Creator, UserId};

    fn user(votes: &[(&str, &str)]) -> User {
        User {
            id: UserId::new("u1"),
            display_name: "Ada".into(),
            profile_picture: None,
            email: None,
            voted_polls: votes
                .iter()
                .map(|(p, o)| VoteRecord {
                    poll: PollId::new(*p),
                    option_id: OptionId::new(*o),
                })
                .collect(),
        }
    }

    #[test]
    fn anonymous_session_has_never_voted() {
        let session = SessionStore::new();
        assert!(!session.has_voted(&PollId::new("p1")));
        assert!(!session.can_vote(&PollId::new("p1")));
        assert!(session.voted_option(&PollId::new("p1")).is_none());
    }

    #[test]
    fn has_voted_scans_vote_set() {
        let mut session = SessionStore::new();
        session.sign_in(user(&[("p1", "o2")]));
        assert!(session.has_voted(&PollId::new("p1")));
        assert!(!session.has_voted(&PollId::new("p2")));
        assert_eq!(
            session.voted_option(&PollId::new("p1")),
            Some(&OptionId::new("o2"))
        );
        assert!(!session.can_vote(&PollId::new("p1")));
        assert!(session.can_vote(&PollId::new("p2")));
    }

    #[test]
    fn record_vote_appends() {
        let mut session = SessionStore::new();
        session.sign_in(user(&[]));
        session.record_vote(PollId::new("p9"), OptionId::new("o1"));
        assert!(session.has_voted(&PollId::new("p9")));
        assert_eq!(session.user().unwrap().voted_polls.len(), 1);
    }

    #[test]
    fn record_vote_when_anonymous_is_noop() {
        let mut session = SessionStore::new();
        session.record_vote(PollId::new("p9"), OptionId::new("o1"));
        assert!(!session.has_voted(&PollId::new("p9")));
    }

    #[test]
    fn record_vote_keeps_one_entry_per_poll() {
        let mut session = SessionStore::new();
        session.sign_in(user(&[]));
        session.record_vote(PollId::new("p9"), OptionId::new("o1"));
        session.record_vote(PollId::new("p9"), OptionId::new("o2"));
        let votes = &session.user().unwrap().voted_polls;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].option_id, OptionId::new("o1"));
    }

    #[test]
    fn pending_vote_disables_voting_until_settled() {
        let mut session = SessionStore::new();
        session.sign_in(user(&[]));
        let p = PollId::new("p1");

        assert!(session.begin_vote(p.clone()));
        assert!(!session.begin_vote(p.clone()));
        assert!(!session.can_vote(&p));
        assert!(!session.has_voted(&p));

        session.abandon_vote(&p);
        assert!(session.can_vote(&p));

        session.begin_vote(p.clone());
        session.record_vote(p.clone(), OptionId::new("o1"));
        assert!(!session.is_vote_pending(&p));
        assert!(session.has_voted(&p));
    }

    #[test]
    fn sign_out_forgets_votes() {
        let mut session = SessionStore::new();
        session.sign_in(user(&[("p1", "o1")]));
        session.sign_out();
        assert!(!session.is_authenticated());
        assert!(!session.has_voted(&PollId::new("p1")));
    }

    #[test]
    fn owns_compares_creator_id() {
        let mut session = SessionStore::new();
        let poll = Poll {
            id: PollId::new("p1"),
            question: "Q".into(),
            options: vec![],
            created_by: Some(Creator {
                id: UserId::new("u1"),
                display_name: Some("Ada".into()),
            }),
            created_at: None,
        };
        assert!(!session.owns(&poll));
        session.sign_in(user(&[]));
        assert!(session.owns(&poll));
    }
}
