//! Link and image reference parsing shared by every renderer.
//!
//! A wiki link token carries its brackets, `[target]` or `[target|label]`.
//! Targets are either external URLs, same-page anchors (`#name`) or internal
//! page names, optionally followed by `#anchor`.

const EXTERNAL_PREFIXES: &[&str] = &["http:", "https:", "ftp:", "file:", "mailto:"];

/// A parsed `[target|label]` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    pub label: String,
}

impl WikiLink {
    /// Parse the raw link token text.
    ///
    /// The outermost character on each side is dropped and the rest is split
    /// at the first `|`. Without a label the target doubles as the label.
    pub fn parse(raw: &str) -> Self {
        let inner = strip_outer(raw.trim(), 1);
        match inner.split_once('|') {
            Some((target, label)) => WikiLink {
                target: target.trim().to_string(),
                label: label.trim().to_string(),
            },
            None => WikiLink {
                target: inner.trim().to_string(),
                label: inner.trim().to_string(),
            },
        }
    }

    pub fn is_external(&self) -> bool {
        EXTERNAL_PREFIXES
            .iter()
            .any(|prefix| self.target.starts_with(prefix))
    }

    /// A link to an anchor on the current page.
    pub fn is_anchor(&self) -> bool {
        self.target.starts_with('#')
    }

    /// Page part of an internal target.
    pub fn page(&self) -> &str {
        match self.target.split_once('#') {
            Some((page, _)) => page,
            None => &self.target,
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        self.target.split_once('#').map(|(_, anchor)| anchor)
    }
}

/// Inner file name of an image token (`{{file}}`).
pub fn image_source(raw: &str) -> &str {
    strip_outer(raw.trim(), 2).trim()
}

/// Images and attachments behind `http` or `ftp` URLs are never copied.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http") || path.starts_with("ftp")
}

/// Append `#anchor` to a rewritten page reference when present.
pub fn with_anchor(base: String, link: &WikiLink) -> String {
    match link.anchor() {
        Some(anchor) => format!("{base}#{anchor}"),
        None => base,
    }
}

fn strip_outer(text: &str, count: usize) -> &str {
    let len = text.chars().count();
    if len < count * 2 {
        return "";
    }
    let start = text
        .char_indices()
        .nth(count)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let end = text
        .char_indices()
        .nth(len - count)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..end]
}
