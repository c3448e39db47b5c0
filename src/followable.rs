//! Target side of the follow graph
//!
//! A [`Followable`] is a view over the store from the point of view of the
//! entity being followed: who follows it, who asked to, and what it does
//! about those requests.

use crate::Result;
use crate::capability::Participant;
use crate::edge::{EdgeScope, EdgeState, FollowEdge};
use crate::morph::MorphRef;
use crate::policy::RevokePolicy;
use crate::storage::SqliteStore;

/// Edges where the wrapped entity is the target.
pub struct Followable<'a> {
    store: &'a SqliteStore,
    target: MorphRef,
    revoke_policy: RevokePolicy,
}

impl<'a> Followable<'a> {
    pub fn new(store: &'a SqliteStore, target: &dyn Participant) -> Self {
        Self {
            store,
            target: target.morph_ref(),
            revoke_policy: RevokePolicy::default(),
        }
    }

    /// Choose what `revoke_follower` may delete
    pub fn with_revoke_policy(mut self, policy: RevokePolicy) -> Self {
        self.revoke_policy = policy;
        self
    }

    pub fn target(&self) -> &MorphRef {
        &self.target
    }

    /// Active followers of the given type (defaults to the target's own type)
    pub fn followers(&self, follower_type: Option<&str>) -> Result<Vec<FollowEdge>> {
        let kind = follower_type.unwrap_or(self.target.kind.as_str());
        self.store.edges_to(&self.target, kind, EdgeState::Active)
    }

    /// Pending follow requests from the given type (defaults to the target's own type)
    pub fn follower_requests(&self, follower_type: Option<&str>) -> Result<Vec<FollowEdge>> {
        let kind = follower_type.unwrap_or(self.target.kind.as_str());
        self.store.edges_to(&self.target, kind, EdgeState::Requested)
    }

    /// Remove `entity` as a follower
    ///
    /// Pending requests are only removed under [`RevokePolicy::Any`].
    pub fn revoke_follower(&self, entity: &dyn Participant) -> Result<bool> {
        if !entity.is_participant() {
            return Ok(false);
        }

        let removed = self
            .store
            .remove_edge(&entity.morph_ref(), &self.target, self.revoke_policy.scope())?;
        Ok(removed > 0)
    }

    pub fn has_follow_request_from(&self, entity: &dyn Participant) -> Result<bool> {
        if !entity.is_participant() {
            return Ok(false);
        }

        self.store
            .has_edge(&entity.morph_ref(), &self.target, EdgeState::Requested)
    }

    /// Turn a pending request from `entity` into an active follower edge
    pub fn accept_follow_request(&self, entity: &dyn Participant) -> Result<bool> {
        if !self.has_follow_request_from(entity)? {
            return Ok(false);
        }

        self.store.accept_edge(&entity.morph_ref(), &self.target)
    }

    /// Drop a pending request from `entity`
    pub fn decline_follow_request(&self, entity: &dyn Participant) -> Result<bool> {
        if !self.has_follow_request_from(entity)? {
            return Ok(false);
        }

        let removed = self
            .store
            .remove_edge(&entity.morph_ref(), &self.target, EdgeScope::Pending)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Model;

    fn user(key: &str) -> Model {
        Model::participant("user", key)
    }

    fn request(store: &SqliteStore, from: &Model, to: &Model) {
        store
            .insert_edge(&from.reference, &to.reference, EdgeState::Requested)
            .unwrap();
    }

    #[test]
    fn test_accept_scenario() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        request(&store, &b, &a);

        let view = Followable::new(&store, &a);
        assert!(view.has_follow_request_from(&b).unwrap());
        let before = store.find_edge(&b.reference, &a.reference).unwrap().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(view.accept_follow_request(&b).unwrap());

        assert!(!view.has_follow_request_from(&b).unwrap());
        let followers = view.followers(None).unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].follower, b.reference);
        assert!(followers[0].is_active());
        assert_eq!(followers[0].created_at, before.created_at);
        assert!(followers[0].updated_at > before.updated_at);
        assert!(view.follower_requests(None).unwrap().is_empty());
    }

    #[test]
    fn test_accept_requires_pending_request() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b) = (user("a"), user("b"));
        let view = Followable::new(&store, &a);

        assert!(!view.accept_follow_request(&b).unwrap());

        store
            .insert_edge(&b.reference, &a.reference, EdgeState::Active)
            .unwrap();
        assert!(!view.accept_follow_request(&b).unwrap());
        assert!(store.has_edge(&b.reference, &a.reference, EdgeState::Active).unwrap());
    }

    #[test]
    fn test_decline_scenario() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, c) = (user("a"), user("c"));
        request(&store, &c, &a);

        let view = Followable::new(&store, &a);
        assert!(view.decline_follow_request(&c).unwrap());
        assert!(!view.has_follow_request_from(&c).unwrap());
        assert!(store.find_edge(&c.reference, &a.reference).unwrap().is_none());
    }

    #[test]
    fn test_decline_without_request_changes_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b, c) = (user("a"), user("b"), user("c"));
        store
            .insert_edge(&b.reference, &a.reference, EdgeState::Active)
            .unwrap();

        let view = Followable::new(&store, &a);
        assert!(!view.decline_follow_request(&c).unwrap());
        assert!(!view.decline_follow_request(&b).unwrap());
        assert_eq!(store.count_edges(EdgeScope::Any).unwrap(), 1);
        assert_eq!(view.followers(None).unwrap().len(), 1);
    }

    #[test]
    fn test_outsider_fails_closed() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = user("a");
        // Same reference as a stored requester, but without capabilities
        let stranger = Model::outsider("user", "b");
        request(&store, &user("b"), &a);
        store
            .insert_edge(&user("c").reference, &a.reference, EdgeState::Active)
            .unwrap();

        let view = Followable::new(&store, &a).with_revoke_policy(RevokePolicy::Any);
        assert!(!view.has_follow_request_from(&stranger).unwrap());
        assert!(!view.accept_follow_request(&stranger).unwrap());
        assert!(!view.decline_follow_request(&stranger).unwrap());
        assert!(!view.revoke_follower(&stranger).unwrap());
        assert!(!view.revoke_follower(&Model::outsider("user", "c")).unwrap());
        assert_eq!(store.count_edges(EdgeScope::Any).unwrap(), 2);
        assert_eq!(store.count_edges(EdgeScope::Pending).unwrap(), 1);
    }

    #[test]
    fn test_revoke_active_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, b, c) = (user("a"), user("b"), user("c"));
        store
            .insert_edge(&b.reference, &a.reference, EdgeState::Active)
            .unwrap();
        request(&store, &c, &a);

        let view = Followable::new(&store, &a);
        assert!(view.revoke_follower(&b).unwrap());
        assert!(!view.revoke_follower(&b).unwrap());
        assert!(view.followers(None).unwrap().is_empty());

        assert!(!view.revoke_follower(&c).unwrap());
        assert!(view.has_follow_request_from(&c).unwrap());
    }

    #[test]
    fn test_revoke_any_removes_pending() {
        let store = SqliteStore::open_in_memory().unwrap();
        let (a, c) = (user("a"), user("c"));
        request(&store, &c, &a);

        let view = Followable::new(&store, &a).with_revoke_policy(RevokePolicy::Any);
        assert!(view.revoke_follower(&c).unwrap());
        assert!(view.follower_requests(None).unwrap().is_empty());
    }

    #[test]
    fn test_type_hint_filters_followers() {
        let store = SqliteStore::open_in_memory().unwrap();
        let page = Model::participant("page", "acme");
        let (u1, u2) = (user("1"), user("2"));
        let other_page = Model::participant("page", "rival");
        for follower in [&u1, &other_page, &u2] {
            store
                .insert_edge(&follower.reference, &page.reference, EdgeState::Active)
                .unwrap();
        }

        let view = Followable::new(&store, &page);
        let users = view.followers(Some("user")).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|e| e.follower.is_kind("user")));

        // No hint means followers of the target's own type
        let pages = view.followers(None).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].follower, other_page.reference);
    }

    #[test]
    fn test_requests_and_followers_partition() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = user("a");
        let keys = ["b", "c", "d", "e"];
        for (i, key) in keys.iter().enumerate() {
            let state = if i % 2 == 0 { EdgeState::Active } else { EdgeState::Requested };
            store.insert_edge(&user(key).reference, &a.reference, state).unwrap();
        }
        // Edge in the other direction must not show up
        store
            .insert_edge(&a.reference, &user("b").reference, EdgeState::Requested)
            .unwrap();

        let view = Followable::new(&store, &a);
        let followers = view.followers(None).unwrap();
        let requests = view.follower_requests(None).unwrap();
        assert_eq!(followers.len(), 2);
        assert_eq!(requests.len(), 2);
        assert!(followers.iter().all(|e| e.is_active() && e.followable == a.reference));
        assert!(requests.iter().all(|e| e.is_pending() && e.followable == a.reference));
    }
}
