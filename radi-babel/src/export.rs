//! Export pipeline: render a page and everything it links to.
//!
//! Starting from one page, the export walks the internal link graph through
//! a FIFO worklist. A page is queued at most once: the `seen` set holds every
//! page that has been queued or rendered, so pages reached by several paths
//! are rendered once and link cycles terminate.
//!
//! Per-page formats write each artifact as soon as its page is rendered.
//! Combined formats collect the rendered pages in visiting order and write a
//! single artifact at the end. Artifacts already written stay on disk if a
//! later page fails.
//!
//! Local image files referenced by any page are copied from the page store
//! root to the target directory. Copies are best effort: failures are logged
//! and never abort the export.

use crate::error::FormatError;
use crate::common::links::is_remote;
use crate::format::{Format, Layout, RenderedPage};
use crate::registry::FormatRegistry;
use crate::store::PageStore;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Specifies an export.
///
/// ```ignore
/// let spec = ExportSpec::new("html", "Start", "out/")
///     .with_css("style.css");
/// let report = export(&spec, &FsPageStore::new("wiki/"))?;
/// ```
#[derive(Debug, Clone)]
pub struct ExportSpec {
    /// Registry name of the output format.
    pub format: String,
    /// Page the traversal starts from.
    pub start: String,
    /// Directory receiving the artifacts.
    pub target_dir: PathBuf,
    /// Stylesheet linked from HTML pages.
    pub css: Option<String>,
    /// Template for slide formats; defaults to `<format>.template` in the store root.
    pub template: Option<PathBuf>,
    /// Copy local images into the target directory.
    pub copy_assets: bool,
}

impl ExportSpec {
    pub fn new(
        format: impl Into<String>,
        start: impl Into<String>,
        target_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            format: format.into(),
            start: start.into(),
            target_dir: target_dir.as_ref().to_path_buf(),
            css: None,
            template: None,
            copy_assets: true,
        }
    }

    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = Some(css.into());
        self
    }

    pub fn with_template(mut self, path: impl AsRef<Path>) -> Self {
        self.template = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_copy_assets(mut self, copy: bool) -> Self {
        self.copy_assets = copy;
        self
    }
}

/// Read-only view handed to formats while they build artifacts.
pub struct ExportContext<'a> {
    pub spec: &'a ExportSpec,
    pub store: &'a dyn PageStore,
    /// Canonical name of the start page.
    pub start: &'a str,
}

impl ExportContext<'_> {
    /// Template file for a slide format: explicit path or `<name>.template` in the store root.
    pub fn template_path(&self, name: &str) -> PathBuf {
        self.spec
            .template
            .clone()
            .unwrap_or_else(|| self.store.root().join(format!("{name}.template")))
    }
}

/// What an export produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Pages rendered, in visiting order.
    pub pages: Vec<String>,
    /// Artifacts written.
    pub artifacts: Vec<PathBuf>,
    /// Assets copied into the target directory.
    pub assets: Vec<PathBuf>,
}

/// Export with the format named in the spec, looked up in the default registry.
pub fn export(spec: &ExportSpec, store: &dyn PageStore) -> Result<ExportReport, FormatError> {
    let registry = FormatRegistry::with_defaults();
    let format = registry.get(&spec.format)?;
    export_with(format, spec, store)
}

/// Export with an explicit format.
pub fn export_with(
    format: &dyn Format,
    spec: &ExportSpec,
    store: &dyn PageStore,
) -> Result<ExportReport, FormatError> {
    let start = store.page_name(&spec.start);
    if start.is_empty() {
        return Err(FormatError::NotSupported(
            "export needs a start page".to_string(),
        ));
    }
    let ctx = ExportContext {
        spec,
        store,
        start: &start,
    };
    fs::create_dir_all(&spec.target_dir)
        .map_err(|err| FormatError::io(&spec.target_dir, err))?;
    let mut report = ExportReport::default();
    let mut copied: HashSet<String> = HashSet::new();
    let mut collected = Vec::new();

    let mut worklist = VecDeque::from([start.clone()]);
    let mut seen: HashSet<String> = HashSet::from([start.clone()]);

    while let Some(name) = worklist.pop_front() {
        let source = store.processed_source(&name)?;
        let rendered = format.render(&source, Some(&name))?;
        tracing::debug!(page = %name, links = rendered.links.len(), "rendered page");

        for link in &rendered.links {
            let target = store.page_name(link);
            if !is_relative_inside(&target) {
                tracing::warn!(page = %name, link = %target, "link leaves the page store, not followed");
                continue;
            }
            if seen.insert(target.clone()) {
                worklist.push_back(target);
            }
        }
        if spec.copy_assets {
            for asset in &rendered.assets {
                if copied.insert(asset.clone()) {
                    if let Some(path) = copy_asset(store.root(), &spec.target_dir, asset) {
                        report.assets.push(path);
                    }
                }
            }
        }

        report.pages.push(name.clone());
        let page = RenderedPage { name, rendered };
        match format.layout() {
            Layout::PerPage => {
                let text = format.page_artifact(&page, &ctx)?;
                let file = format.artifact_name(&page.name, &ctx);
                report.artifacts.push(write_artifact(&spec.target_dir, &file, &text)?);
            }
            Layout::Combined => collected.push(page),
        }
    }

    if format.layout() == Layout::Combined {
        let text = format.combine(&collected, &ctx)?;
        let file = format.artifact_name(&start, &ctx);
        report.artifacts.push(write_artifact(&spec.target_dir, &file, &text)?);
    }

    Ok(report)
}

fn write_artifact(dir: &Path, file: &str, text: &str) -> Result<PathBuf, FormatError> {
    let path = dir.join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| FormatError::io(parent, err))?;
    }
    fs::write(&path, text).map_err(|err| FormatError::io(&path, err))?;
    tracing::info!(path = %path.display(), "wrote artifact");
    Ok(path)
}

/// True for a non-empty relative path that cannot climb out of the
/// directory it is joined to.
fn is_relative_inside(path: &str) -> bool {
    let path = Path::new(path);
    path.components().next().is_some()
        && path
            .components()
            .all(|part| matches!(part, Component::Normal(_) | Component::CurDir))
}

/// Copy a local asset from `root` to `target`. Remote URLs are skipped.
fn copy_asset(root: &Path, target: &Path, asset: &str) -> Option<PathBuf> {
    if is_remote(asset) || asset.is_empty() {
        tracing::debug!(asset, "remote or empty asset, not copied");
        return None;
    }
    if !is_relative_inside(asset) {
        tracing::debug!(asset, "asset path leaves the store root, not copied");
        return None;
    }
    let from = root.join(asset);
    let to = target.join(asset);
    if to.exists() && from.canonicalize().ok() == to.canonicalize().ok() {
        return None;
    }
    if let Some(parent) = to.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            tracing::debug!(asset, error = %err, "cannot create asset directory");
            return None;
        }
    }
    match fs::copy(&from, &to) {
        Ok(_) => Some(to),
        Err(err) => {
            tracing::debug!(asset, error = %err, "asset copy failed");
            None
        }
    }
}
