use crate::capability::{Capabilities, Capability};
use crate::policy::RevokePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FollowkitConfig {
    pub database: Option<String>,
    #[serde(default)]
    pub revoke: RevokePolicy,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

/// One `[[models]]` entry: a morph type and what it may do
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub follows: bool,
    #[serde(default)]
    pub followable: bool,
}

impl ModelConfig {
    pub fn capabilities(&self) -> Capabilities {
        [
            (self.follows, Capability::Following),
            (self.followable, Capability::Followable),
        ]
        .into_iter()
        .filter_map(|(enabled, capability)| enabled.then_some(capability))
        .collect()
    }
}

impl FollowkitConfig {
    /// Config written by `followkit init`
    pub fn starter() -> Self {
        Self {
            database: Some(default_database_path_in(Path::new(".")).display().to_string()),
            revoke: RevokePolicy::default(),
            models: vec![ModelConfig {
                kind: "user".to_string(),
                follows: true,
                followable: true,
            }],
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_database_path_in(Path::new(".")))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("followkit.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".followkit").join("followkit.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<FollowkitConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: FollowkitConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {} ({} model types)", path.display(), config.models.len());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &FollowkitConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
