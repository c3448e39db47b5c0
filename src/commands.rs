use crate::{OutputMode, emit_success};
use followkit::config::{self, FollowkitConfig};
use followkit::ui::{self, Icons};
use followkit::{
    Capability, FollowEdge, Followable, Follower, Model, ModelRegistry, MorphRef, Participant,
    RevokePolicy, SqliteStore,
};
use std::path::{Path, PathBuf};

/// Everything a command needs: the open store plus the config-derived rules
pub struct Session {
    pub store: SqliteStore,
    pub registry: ModelRegistry,
    pub revoke: RevokePolicy,
    pub database: PathBuf,
}

impl Session {
    /// Load the config (defaults when missing) and open its database
    ///
    /// `database` and `revoke` override the config when given.
    pub fn load(
        config_path: &Path,
        database: Option<&Path>,
        revoke: Option<RevokePolicy>,
    ) -> anyhow::Result<Self> {
        let mut config = config::load_config(Some(config_path))?.unwrap_or_else(|| {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            FollowkitConfig::default()
        });
        if let Some(policy) = revoke {
            config.revoke = policy;
        }
        let database = database.map(Path::to_path_buf).unwrap_or_else(|| config.database_path());
        Self::open(&database, &config)
    }

    pub fn open(database: &Path, config: &FollowkitConfig) -> anyhow::Result<Self> {
        config::ensure_db_dir(database)?;
        let store = SqliteStore::open(database)?;
        let registry = ModelRegistry::from_config(&config.models);
        if registry.kinds().is_empty() {
            ui::warn("no model types configured; every entity will fail the capability check");
        }

        Ok(Self {
            store,
            registry,
            revoke: config.revoke,
            database: database.to_path_buf(),
        })
    }

    fn resolve(&self, reference: MorphRef) -> Model {
        self.registry.resolve(reference)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TargetAction {
    Accept,
    Decline,
    Revoke,
}

impl TargetAction {
    fn as_str(&self) -> &'static str {
        match self {
            TargetAction::Accept => "accept",
            TargetAction::Decline => "decline",
            TargetAction::Revoke => "revoke",
        }
    }
}

pub fn run_init(path: &Path, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let starter = FollowkitConfig::starter();
    config::write_config(path, &starter, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
        ui::info("Database", &starter.database_path().display().to_string());
    } else {
        emit_success(output_mode, "init", serde_json::json!({ "config": path.display().to_string() }))?;
    }
    Ok(())
}

pub fn run_follow(
    session: &Session,
    from: MorphRef,
    to: MorphRef,
    request: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let source = session.resolve(from);
    let target = session.resolve(to);
    let command = if request { "request" } else { "follow" };

    let applied = if !require(&source, Capability::Following) {
        false
    } else {
        let follower = Follower::new(&session.store, &source);
        if request {
            follower.follow_request(&target)?
        } else {
            follower.follow(&target)?
        }
    };

    report(
        output_mode,
        command,
        &format!("{} {} {}", source.reference, command, target.reference),
        applied,
    )
}

pub fn run_unfollow(session: &Session, from: MorphRef, to: MorphRef, output_mode: OutputMode) -> anyhow::Result<()> {
    let source = session.resolve(from);
    let target = session.resolve(to);

    let applied = require(&source, Capability::Following)
        && Follower::new(&session.store, &source).unfollow(&target)?;

    report(
        output_mode,
        "unfollow",
        &format!("{} unfollowed {}", source.reference, target.reference),
        applied,
    )
}

pub fn run_cancel(session: &Session, from: MorphRef, to: MorphRef, output_mode: OutputMode) -> anyhow::Result<()> {
    let source = session.resolve(from);
    let target = session.resolve(to);

    let applied = require(&source, Capability::Following)
        && Follower::new(&session.store, &source).cancel_follow_request(&target)?;

    report(
        output_mode,
        "cancel",
        &format!("{} withdrew request to {}", source.reference, target.reference),
        applied,
    )
}

pub fn run_target_action(
    session: &Session,
    action: TargetAction,
    target: MorphRef,
    from: MorphRef,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let target = session.resolve(target);
    let entity = session.resolve(from);

    let applied = if !require(&target, Capability::Followable) {
        false
    } else {
        let view = Followable::new(&session.store, &target).with_revoke_policy(session.revoke);
        match action {
            TargetAction::Accept => view.accept_follow_request(&entity)?,
            TargetAction::Decline => view.decline_follow_request(&entity)?,
            TargetAction::Revoke => view.revoke_follower(&entity)?,
        }
    };

    report(
        output_mode,
        action.as_str(),
        &format!("{} {} {}", target.reference, action.as_str(), entity.reference),
        applied,
    )
}

pub fn run_followers(
    session: &Session,
    of: MorphRef,
    kind: Option<&str>,
    pending: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let target = session.resolve(of);
    let view = Followable::new(&session.store, &target);
    let edges = if pending {
        view.follower_requests(kind)?
    } else {
        view.followers(kind)?
    };

    let title = if pending { "Follow requests to" } else { "Followers of" };
    list(output_mode, "followers", &format!("{} {}", title, target.reference), &edges)
}

pub fn run_following(
    session: &Session,
    of: MorphRef,
    kind: Option<&str>,
    pending: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let source = session.resolve(of);
    let view = Follower::new(&session.store, &source);
    let edges = if pending {
        view.following_requests(kind)?
    } else {
        view.following(kind)?
    };

    let title = if pending { "Requests sent by" } else { "Followed by" };
    list(output_mode, "following", &format!("{} {}", title, source.reference), &edges)
}

pub fn run_stats(session: &Session, output_mode: OutputMode) -> anyhow::Result<()> {
    let stats = session.store.stats()?;

    if output_mode.is_human() {
        ui::header(Icons::STATS, &format!("followkit statistics ({})", session.database.display()));
        let rows = [
            ("Edges", stats.edges.to_string()),
            ("Active", stats.active.to_string()),
            ("Pending", stats.pending.to_string()),
            ("Followed entities", stats.followables.to_string()),
            ("Following entities", stats.followers.to_string()),
            ("Revoke policy", session.revoke.to_string()),
            ("Model types", session.registry.kinds().join(", ")),
        ];
        let borrowed: Vec<(&str, &str)> = rows.iter().map(|(k, v)| (*k, v.as_str())).collect();
        println!("{}", ui::stats_table(&borrowed));
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

/// Acting entity must carry the capability for the side it acts on
fn require(model: &Model, capability: Capability) -> bool {
    let ok = model.capabilities().has(capability);
    if !ok {
        ui::warn(&format!("{} lacks the {} capability (check [[models]] in the config)", model.reference, capability));
    }
    ok
}

fn report(output_mode: OutputMode, command: &str, action: &str, applied: bool) -> anyhow::Result<()> {
    if output_mode.is_human() {
        ui::outcome(action, applied);
        Ok(())
    } else {
        emit_success(output_mode, command, serde_json::json!({ "applied": applied }))
    }
}

fn list(output_mode: OutputMode, command: &str, title: &str, edges: &[FollowEdge]) -> anyhow::Result<()> {
    if !output_mode.is_human() {
        return emit_success(output_mode, command, serde_json::to_value(edges)?);
    }

    ui::header(Icons::PERSON, title);
    if edges.is_empty() {
        println!("{} {}", Icons::EMPTY, ui::dim("none"));
    } else {
        println!("{}", ui::edge_table(edges));
        ui::summary_row("Total:", &edges.len().to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use followkit::config::ModelConfig;
    use followkit::EdgeState;

    fn model(kind: &str, follows: bool, followable: bool) -> ModelConfig {
        ModelConfig {
            kind: kind.to_string(),
            follows,
            followable,
        }
    }

    fn session_in(dir: &tempfile::TempDir, revoke: RevokePolicy) -> Session {
        let config = FollowkitConfig {
            database: None,
            revoke,
            models: vec![model("user", true, true), model("bot", true, false)],
        };
        Session::open(&dir.path().join("follows.db"), &config).unwrap()
    }

    fn r(s: &str) -> MorphRef {
        MorphRef::parse(s).unwrap()
    }

    #[test]
    fn test_revoke_policy_from_config_reaches_target_action() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir, RevokePolicy::Any);
        session.store.insert_edge(&r("user:2"), &r("user:1"), EdgeState::Requested).unwrap();

        run_target_action(&session, TargetAction::Revoke, r("user:1"), r("user:2"), OutputMode::Json).unwrap();

        assert!(session.store.find_edge(&r("user:2"), &r("user:1")).unwrap().is_none());
    }

    #[test]
    fn test_default_revoke_policy_keeps_pending_request() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir, RevokePolicy::default());
        session.store.insert_edge(&r("user:2"), &r("user:1"), EdgeState::Requested).unwrap();

        run_target_action(&session, TargetAction::Revoke, r("user:1"), r("user:2"), OutputMode::Json).unwrap();

        assert!(session.store.has_edge(&r("user:2"), &r("user:1"), EdgeState::Requested).unwrap());
    }

    #[test]
    fn test_revoke_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("followkit.toml");
        let database = dir.path().join("follows.db");
        let config = FollowkitConfig {
            database: None,
            revoke: RevokePolicy::ActiveOnly,
            models: vec![model("user", true, true)],
        };
        config::write_config(&config_path, &config, false).unwrap();

        let from_file = Session::load(&config_path, Some(&database), None).unwrap();
        assert_eq!(from_file.revoke, RevokePolicy::ActiveOnly);
        assert_eq!(from_file.database, database);
        drop(from_file);

        let overridden = Session::load(&config_path, Some(&database), Some(RevokePolicy::Any)).unwrap();
        assert_eq!(overridden.revoke, RevokePolicy::Any);
    }

    #[test]
    fn test_accept_requires_followable_target() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(&dir, RevokePolicy::default());
        session.store.insert_edge(&r("user:2"), &r("bot:1"), EdgeState::Requested).unwrap();

        run_target_action(&session, TargetAction::Accept, r("bot:1"), r("user:2"), OutputMode::Json).unwrap();

        assert!(session.store.has_edge(&r("user:2"), &r("bot:1"), EdgeState::Requested).unwrap());
    }

    #[test]
    fn test_follow_requires_following_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = FollowkitConfig {
            models: vec![model("user", true, true), model("page", false, true)],
            ..FollowkitConfig::default()
        };
        let session = Session::open(&dir.path().join("follows.db"), &config).unwrap();

        run_follow(&session, r("page:acme"), r("user:1"), false, OutputMode::Json).unwrap();
        assert!(session.store.find_edge(&r("page:acme"), &r("user:1")).unwrap().is_none());

        run_follow(&session, r("user:2"), r("page:acme"), false, OutputMode::Json).unwrap();
        assert!(session.store.has_edge(&r("user:2"), &r("page:acme"), EdgeState::Active).unwrap());
    }
}
