//! Source side of the follow graph
//!
//! A [`Follower`] creates and withdraws edges on behalf of the entity doing
//! the following. Whether a new edge starts pending or active is the
//! caller's choice: `follow` for open targets, `follow_request` for targets
//! that approve their followers.

use crate::Result;
use crate::capability::Participant;
use crate::edge::{EdgeScope, EdgeState, FollowEdge};
use crate::morph::MorphRef;
use crate::storage::SqliteStore;

/// Edges where the wrapped entity is the source.
pub struct Follower<'a> {
    store: &'a SqliteStore,
    source: MorphRef,
}

impl<'a> Follower<'a> {
    pub fn new(store: &'a SqliteStore, source: &dyn Participant) -> Self {
        Self {
            store,
            source: source.morph_ref(),
        }
    }

    pub fn source(&self) -> &MorphRef {
        &self.source
    }

    /// Follow `target` directly (active edge)
    ///
    /// `false` if the target is not a participant or any edge to it already
    /// exists. A pending request is never upgraded here; that is the
    /// target's `accept_follow_request`.
    pub fn follow(&self, target: &dyn Participant) -> Result<bool> {
        if !target.is_participant() {
            return Ok(false);
        }
        self.store
            .insert_edge(&self.source, &target.morph_ref(), EdgeState::Active)
    }

    /// Ask to follow `target` (pending edge)
    pub fn follow_request(&self, target: &dyn Participant) -> Result<bool> {
        if !target.is_participant() {
            return Ok(false);
        }
        self.store
            .insert_edge(&self.source, &target.morph_ref(), EdgeState::Requested)
    }

    /// Stop following `target`; pending requests are left alone
    pub fn unfollow(&self, target: &dyn Participant) -> Result<bool> {
        if !self.is_following(target)? {
            return Ok(false);
        }
        let removed = self
            .store
            .remove_edge(&self.source, &target.morph_ref(), EdgeScope::Active)?;
        Ok(removed > 0)
    }

    /// Withdraw a pending request to `target`
    pub fn cancel_follow_request(&self, target: &dyn Participant) -> Result<bool> {
        if !self.has_follow_requested(target)? {
            return Ok(false);
        }
        let removed = self
            .store
            .remove_edge(&self.source, &target.morph_ref(), EdgeScope::Pending)?;
        Ok(removed > 0)
    }

    pub fn is_following(&self, target: &dyn Participant) -> Result<bool> {
        if !target.is_participant() {
            return Ok(false);
        }
        self.store
            .has_edge(&self.source, &target.morph_ref(), EdgeState::Active)
    }

    pub fn has_follow_requested(&self, target: &dyn Participant) -> Result<bool> {
        if !target.is_participant() {
            return Ok(false);
        }
        self.store
            .has_edge(&self.source, &target.morph_ref(), EdgeState::Requested)
    }

    /// Targets of the given type this entity follows (defaults to its own type)
    pub fn following(&self, followable_type: Option<&str>) -> Result<Vec<FollowEdge>> {
        let kind = followable_type.unwrap_or(self.source.kind.as_str());
        self.store.edges_from(&self.source, kind, EdgeState::Active)
    }

    /// Targets of the given type with a pending request from this entity
    pub fn following_requests(&self, followable_type: Option<&str>) -> Result<Vec<FollowEdge>> {
        let kind = followable_type.unwrap_or(self.source.kind.as_str());
        self.store.edges_from(&self.source, kind, EdgeState::Requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Capabilities, Capability, Model};
    use crate::followable::Followable;

    fn user(key: &str) -> Model {
        Model::participant("user", key)
    }

    #[test]
    fn test_follow_and_unfollow() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let b_view = Follower::new(&store, &b);

        assert!(b_view.follow(&a).unwrap());
        assert!(!b_view.follow(&a).unwrap());
        assert!(b_view.is_following(&a).unwrap());
        assert_eq!(Followable::new(&store, &a).followers(None).unwrap().len(), 1);

        assert!(b_view.unfollow(&a).unwrap());
        assert!(!b_view.is_following(&a).unwrap());
        assert!(!b_view.unfollow(&a).unwrap());
    }

    #[test]
    fn test_follow_does_not_upgrade_request() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let b_view = Follower::new(&store, &b);

        assert!(b_view.follow_request(&a).unwrap());
        assert!(!b_view.follow(&a).unwrap());
        assert!(!b_view.follow_request(&a).unwrap());
        assert!(b_view.has_follow_requested(&a).unwrap());
        assert!(!b_view.is_following(&a).unwrap());
    }

    #[test]
    fn test_unfollow_leaves_pending_request() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let b_view = Follower::new(&store, &b);

        b_view.follow_request(&a).unwrap();
        assert!(!b_view.unfollow(&a).unwrap());
        assert!(b_view.has_follow_requested(&a).unwrap());

        assert!(b_view.cancel_follow_request(&a).unwrap());
        assert!(!b_view.has_follow_requested(&a).unwrap());
        assert!(store.find_edge(&b.reference, &a.reference).unwrap().is_none());
    }

    #[test]
    fn test_cancel_does_not_touch_active_edge() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let b_view = Follower::new(&store, &b);

        b_view.follow(&a).unwrap();
        assert!(!b_view.cancel_follow_request(&a).unwrap());
        assert!(b_view.is_following(&a).unwrap());
    }

    #[test]
    fn test_request_accept_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let b_view = Follower::new(&store, &b);
        let a_view = Followable::new(&store, &a);

        b_view.follow_request(&a).unwrap();
        assert_eq!(b_view.following_requests(None).unwrap().len(), 1);
        assert!(b_view.following(None).unwrap().is_empty());

        assert!(a_view.accept_follow_request(&b).unwrap());
        assert!(b_view.following_requests(None).unwrap().is_empty());
        let following = b_view.following(None).unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].followable, a.reference);
    }

    #[test]
    fn test_targets_without_capabilities_are_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let b = user("b");
        let b_view = Follower::new(&store, &b);
        let invoice = Model::outsider("invoice", "1");

        assert!(!b_view.follow(&invoice).unwrap());
        assert!(!b_view.follow_request(&invoice).unwrap());
        assert!(!b_view.is_following(&invoice).unwrap());
        assert_eq!(store.count_edges(EdgeScope::Any).unwrap(), 0);

        // One capability is enough to pass the check
        let channel = Model::new(
            MorphRef::new("channel", "news"),
            Capabilities::none().with(Capability::Followable),
        );
        assert!(b_view.follow(&channel).unwrap());
        assert_eq!(b_view.following(Some("channel")).unwrap().len(), 1);
        assert!(b_view.following(None).unwrap().is_empty());
    }

    #[test]
    fn test_self_follow_is_allowed() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = user("a");

        assert!(Follower::new(&store, &a).follow(&a).unwrap());
        assert_eq!(Followable::new(&store, &a).followers(None).unwrap().len(), 1);
    }
}
