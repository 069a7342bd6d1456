//! Shared configuration loader for the radi toolchain.
//!
//! `defaults/radi.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`RadiConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use radi_babel::{ExportSpec, FormatError, FormatRegistry, FsPageStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/radi.default.toml");

/// Top-level configuration consumed by radi applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RadiConfig {
    pub store: StoreConfig,
    pub export: ExportConfig,
    pub render: RenderConfig,
}

/// Where pages live and how missing ones are treated.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub extension: String,
    pub missing_page: String,
}

impl StoreConfig {
    /// Page store for the configured database.
    pub fn page_store(&self) -> FsPageStore {
        let missing = if self.missing_page.is_empty() {
            None
        } else {
            Some(self.missing_page.clone())
        };
        FsPageStore::new(self.root.clone())
            .with_extension(&self.extension)
            .with_missing_page(missing)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub copy_assets: bool,
    #[serde(default)]
    pub css: Option<String>,
    #[serde(default)]
    pub templates: TemplatesConfig,
}

/// Explicit slide templates per format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub beamer: Option<PathBuf>,
    #[serde(default)]
    pub prosper: Option<PathBuf>,
    #[serde(default)]
    pub s5: Option<PathBuf>,
}

impl TemplatesConfig {
    pub fn for_format(&self, format: &str) -> Option<&Path> {
        match format {
            "beamer" => self.beamer.as_deref(),
            "prosper" => self.prosper.as_deref(),
            "s5" => self.s5.as_deref(),
            _ => None,
        }
    }
}

impl ExportConfig {
    /// Export spec carrying the configured css, template and asset policy.
    pub fn spec(
        &self,
        format: &str,
        start: &str,
        target_dir: impl AsRef<Path>,
    ) -> ExportSpec {
        let mut spec = ExportSpec::new(format, start, target_dir).with_copy_assets(self.copy_assets);
        if let Some(css) = &self.css {
            spec = spec.with_css(css.clone());
        }
        if let Some(template) = self.templates.for_format(format) {
            spec = spec.with_template(template);
        }
        spec
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub tags_dir: Option<PathBuf>,
}

impl RenderConfig {
    /// Format registry, with tag map overrides when a tags directory is set.
    pub fn registry(&self) -> Result<FormatRegistry, FormatError> {
        match &self.tags_dir {
            Some(dir) => FormatRegistry::with_tags_dir(dir),
            None => Ok(FormatRegistry::with_defaults()),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RadiConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RadiConfig, ConfigError> {
    Loader::new().build()
}
