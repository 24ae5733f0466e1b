//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, a config file (explicit
//! or discovered next to the anchor directory), then `IDFTF_` environment
//! variables. CLI flags are applied on top by [`merge_cli_with_config`].

use crate::domain::Config;
use crate::error::RankError;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

/// File names searched in the anchor directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] =
    &["idftf-rank.toml", ".idftf-rank.toml", "idftf-rank.yml", "idftf-rank.yaml", ".idftf-rank.yml"];

/// Prefix of environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "IDFTF_";

pub fn load_config(anchor: &Path, explicit: Option<&Path>) -> Result<Config, RankError> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(RankError::Config(format!("config file not found: {}", path.display())));
        }
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(anchor),
    };

    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = &path {
        debug!(path = %path.display(), "loading config file");
        figment = if is_yaml(path) {
            figment.merge(Yaml::file(path))
        } else {
            figment.merge(Toml::file(path))
        };
    }
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    Ok(figment.extract()?)
}

fn discover_config(anchor: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES.iter().map(|name| anchor.join(name)).find(|candidate| candidate.is_file())
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yml" | "yaml"))
}
