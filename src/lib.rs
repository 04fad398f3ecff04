// Re-export modules
pub mod analysis;
pub mod analyzers;
pub mod blob;
pub mod capture;
pub mod color;
pub mod config;
pub mod dom;
pub mod error;
pub mod report;
pub mod results;
pub mod text;
pub mod utils;

// Re-export commonly used types for convenience
pub use analysis::run_analysis;
pub use blob::{ObjectUrl, ObjectUrlRegistry};
pub use capture::SourceType;
pub use config::{AnalyzerConfig, ScanConfig};
pub use dom::{Document, Page};
pub use error::{Result, ScanError};
pub use results::{AnalysisOutcome, AnalysisReport};

/// Main builder for a design scan of a single page
pub struct Scan {
    source: SourceType,
    config: ScanConfig,
    registry: ObjectUrlRegistry,
    webdriver_url: Option<String>,
}

impl Scan {
    /// Create a new Scan builder for the given source with default settings
    pub fn new(source: SourceType) -> Self {
        Self {
            source,
            config: ScanConfig::default(),
            registry: ObjectUrlRegistry::new(),
            webdriver_url: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = ScanConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self> {
        let config = ScanConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Use this WebDriver server, taking precedence over config and environment
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Set how long to wait for the page to become ready
    pub fn with_ready_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.ready_timeout_secs = timeout_seconds;
        self
    }

    /// Register logo previews in an existing registry instead of a private one
    pub fn with_registry(mut self, registry: ObjectUrlRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registry holding the object URLs created by [`Scan::run`]
    pub fn registry(&self) -> &ObjectUrlRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Load the page and analyze it.
    ///
    /// Loading failures, including a page that never becomes ready, come back
    /// as a failure envelope like analyzer errors do.
    pub async fn run(&self) -> AnalysisOutcome {
        let mut config = self.config.clone();
        config.apply_env();
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }

        ::log::info!("Starting design scan of {}", self.source.describe());

        let page = match capture::load(&self.source, &config).await {
            Ok(page) => page,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", self.source.describe(), e);
                return AnalysisOutcome::failure(e.to_string());
            }
        };

        run_analysis(&page, &config.analyzer, &self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_inline_html() {
        let scan = Scan::new(SourceType::Html {
            html: r#"<html><body><button style="background:#3366FF">Buy</button></body></html>"#
                .to_string(),
            base_url: "https://shop.example/".to_string(),
        });

        let outcome = scan.run().await;
        let report = outcome.report().expect("scan failed");
        assert_eq!(report.url, "https://shop.example/");
        assert!(report.colors.iter().any(|c| c.hex == "#3366FF"));
    }

    #[tokio::test]
    async fn test_scan_missing_file_is_a_failure() {
        let scan = Scan::new(SourceType::File {
            path: "/definitely/not/here.html".into(),
            base_url: None,
        });

        assert!(matches!(scan.run().await, AnalysisOutcome::Failure { .. }));
    }

    #[test]
    fn test_with_config_str() {
        let scan = Scan::new(SourceType::Web("https://example.com".to_string()))
            .with_config_str(r#"{"ready_timeout_secs": 5, "analyzer": {"color": {"max_colors": 8}}}"#)
            .unwrap()
            .with_ready_timeout(7);

        assert_eq!(scan.config().ready_timeout_secs, 7);
        assert_eq!(scan.config().analyzer.color.max_colors, 8);
        assert_eq!(scan.config().analyzer.color.max_sources, 3);
    }
}
