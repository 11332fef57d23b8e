//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use swatch_cache::{Cache, FileBackend};
use swatch_commerce::cart::CartStore;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;
use crate::sources::{FileProductSource, LocalOrderSink};

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&Path>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(path.to_path_buf())),
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        tracing::debug!(config = ?config_path, cwd = %cwd.display(), "context loaded");
        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.data_dir)
    }

    pub fn catalog_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.paths.catalog_dir)
    }

    fn open_cache(&self) -> Result<Cache<FileBackend>> {
        let dir = self.data_dir();
        Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))
    }

    /// Open the durable cart.
    pub fn open_cart(&self) -> Result<CartStore<FileBackend>> {
        let currency = self.config.currency()?;
        CartStore::open(self.open_cache()?, currency).context("Failed to load cart")
    }

    pub fn product_source(&self) -> FileProductSource {
        FileProductSource::new(self.catalog_dir())
    }

    pub fn order_sink(&self) -> Result<LocalOrderSink> {
        Ok(LocalOrderSink::new(self.open_cache()?))
    }
}
