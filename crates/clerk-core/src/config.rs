//! File-based run configuration
//!
//! A config file names the target directory, the source directories in
//! aggregation order, and the drift policy. Format is detected from the
//! extension: `.toml` or `.json`.

use crate::aggregate::Aggregate;
use crate::confirm::DriftPolicy;
use crate::source::DirSource;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClerkConfig {
    /// Directory to reconcile
    pub target: PathBuf,
    /// Source directories, in aggregation order
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// What to do with drifted files
    #[serde(default)]
    pub on_drift: DriftPolicy,
}

impl ClerkConfig {
    /// Load a config file.
    ///
    /// Relative `target` and `sources` paths are resolved against the
    /// directory containing the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = clerk_fs::io::read_text(path)?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mut config: Self = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            "json" => serde_json::from_str(&content).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            other => {
                return Err(Error::Config {
                    path: path.to_path_buf(),
                    message: format!("unsupported config format '{}'", other),
                });
            }
        };

        if let Some(base) = path.parent() {
            config.resolve_against(base);
        }
        tracing::debug!(?path, sources = config.sources.len(), "Loaded config");
        Ok(config)
    }

    fn resolve_against(&mut self, base: &Path) {
        if self.target.is_relative() {
            self.target = base.join(&self.target);
        }
        for source in &mut self.sources {
            if source.is_relative() {
                *source = base.join(&*source);
            }
        }
    }

    /// Build an aggregate from the configured source directories.
    pub fn aggregate(&self) -> Result<Aggregate> {
        let mut aggregate = Aggregate::new();
        for source in &self.sources {
            aggregate.add(DirSource::new(source)?)?;
        }
        Ok(aggregate)
    }
}
