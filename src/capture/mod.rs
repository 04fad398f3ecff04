pub mod web;

use crate::config::ScanConfig;
use crate::dom::{ComputedStyle, Page, Size, StyleRule};
use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Script executed in the browser to capture a [`PageSnapshot`]
pub const SNAPSHOT_SCRIPT: &str = include_str!("snapshot.js");

/// Where the page to analyze comes from
#[derive(Debug, Clone)]
pub enum SourceType {
    /// Live page rendered by a WebDriver-controlled browser
    Web(String),
    /// Local HTML file, resolved against `base_url` (or its own `file://` URL)
    File {
        path: PathBuf,
        base_url: Option<String>,
    },
    /// HTML markup held in memory
    Html { html: String, base_url: String },
}

impl SourceType {
    /// URL reported for the page before it is loaded
    pub fn describe(&self) -> String {
        match self {
            SourceType::Web(url) => url.clone(),
            SourceType::File { path, base_url } => base_url
                .clone()
                .unwrap_or_else(|| path.display().to_string()),
            SourceType::Html { base_url, .. } => base_url.clone(),
        }
    }
}

/// Page state captured by [`SNAPSHOT_SCRIPT`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Final URL of the page after redirects
    pub url: String,

    /// Serialized document with every element stamped with its node index
    pub html: String,

    /// Per-element records, indexed by the stamp
    #[serde(default)]
    pub nodes: Vec<NodeSnapshot>,

    /// Rules of the stylesheets the page was allowed to read
    #[serde(default)]
    pub rules: Vec<StyleRule>,
}

/// Computed style and geometry of a single element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default)]
    pub style: ComputedStyle,

    #[serde(default)]
    pub rect: Option<Size>,

    #[serde(default)]
    pub natural: Option<Size>,
}

/// Loads the page described by `source` into an analyzable [`Page`]
pub async fn load(source: &SourceType, config: &ScanConfig) -> Result<Page> {
    match source {
        SourceType::Web(url) => {
            let snapshot = web::capture(url, config).await?;
            Page::from_snapshot(snapshot)
        }
        SourceType::File { path, base_url } => {
            let base_url = match base_url {
                Some(url) => url.clone(),
                None => file_url(path)?,
            };
            ::log::info!("Loading {} as {}", path.display(), base_url);
            Page::from_file(path, &base_url)
        }
        SourceType::Html { html, base_url } => Page::from_html(html, base_url),
    }
}

/// `file://` URL for a local path
fn file_url(path: &Path) -> Result<String> {
    let absolute = std::fs::canonicalize(path)?;
    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|_| {
            ScanError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot express {} as a file URL", absolute.display()),
            ))
        })
}
