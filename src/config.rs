use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// How long to wait for the page to report itself ready
    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    /// Delay between readiness probes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Ask the browser to run without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Heuristic thresholds used by the analyzers
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Thresholds and caps for all three analyzers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub color: ColorConfig,

    #[serde(default)]
    pub typography: TypographyConfig,

    #[serde(default)]
    pub images: ImageConfig,
}

/// Palette caps and the confidence weight of every color source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Maximum number of colors in the palette
    pub max_colors: usize,
    /// Maximum number of source labels kept per color
    pub max_sources: usize,
    /// HSV saturation below which a color counts as neutral
    pub neutral_saturation: f64,
    pub weights: ColorWeights,
}

/// Weights added to a color each time a source reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorWeights {
    pub stylesheet_rule: u32,
    /// Body background that is neither black nor white
    pub body_background: u32,
    /// Body background that is plain black or white
    pub body_background_plain: u32,
    pub body_text: u32,
    pub html_background: u32,
    pub button_background: u32,
    pub button_text: u32,
    pub link_text: u32,
    pub heading_text: u32,
    pub container_background: u32,
    pub container_border: u32,
    pub input_border: u32,
}

/// Font ranking caps and heading sample length
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    pub max_fonts: usize,
    /// Families used by fewer than this percentage of text elements are dropped
    pub min_usage_percent: u32,
    pub sample_length: usize,
}

/// Size floors used to discard tracking pixels, icons and placeholders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Images rendered narrower or shorter than this (px) are ignored
    pub min_image_size: f64,
    /// Inline SVGs smaller than this (px) in either dimension are ignored
    pub min_svg_size: f64,
    /// Data URIs shorter than this are treated as placeholders
    pub min_data_uri_length: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            ready_timeout_secs: default_ready_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            headless: default_headless(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            max_colors: 20,
            max_sources: 3,
            neutral_saturation: 0.10,
            weights: ColorWeights::default(),
        }
    }
}

impl Default for ColorWeights {
    fn default() -> Self {
        Self {
            stylesheet_rule: 1,
            body_background: 1000,
            body_background_plain: 500,
            body_text: 1000,
            html_background: 800,
            button_background: 100,
            button_text: 50,
            link_text: 80,
            heading_text: 60,
            container_background: 40,
            container_border: 30,
            input_border: 20,
        }
    }
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            max_fonts: 10,
            min_usage_percent: 1,
            sample_length: 50,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            min_image_size: 10.0,
            min_svg_size: 5.0,
            min_data_uri_length: 100,
        }
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_ready_timeout_secs() -> u64 {
    30
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_headless() -> bool {
    true
}

impl ScanConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "ready_timeout_secs": 5,
            "analyzer": { "color": { "max_colors": 8, "weights": { "link_text": 90 } } }
        }"#;
        let config = ScanConfig::from_json(json).unwrap();

        assert_eq!(config.ready_timeout_secs, 5);
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.analyzer.color.max_colors, 8);
        assert_eq!(config.analyzer.color.max_sources, 3);
        assert_eq!(config.analyzer.color.weights.link_text, 90);
        assert_eq!(config.analyzer.color.weights.body_text, 1000);
        assert_eq!(config.analyzer.typography.max_fonts, 10);
        assert_eq!(config.analyzer.images.min_data_uri_length, 100);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = ScanConfig::from_json("{}").unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert!(config.headless);
        assert!((config.analyzer.color.neutral_saturation - 0.10).abs() < f64::EPSILON);
        assert!((config.analyzer.images.min_image_size - 10.0).abs() < f64::EPSILON);
    }
}
