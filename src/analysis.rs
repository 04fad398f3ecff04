use crate::analyzers::{ColorAnalyzer, ImageAnalyzer, TypographyAnalyzer};
use crate::blob::ObjectUrlRegistry;
use crate::config::AnalyzerConfig;
use crate::dom::Document;
use crate::error::Result;
use crate::results::{AnalysisOutcome, AnalysisReport};
use chrono::{SecondsFormat, Utc};

/// Runs all three analyzers and wraps the result for presentation.
///
/// Any analyzer error turns the whole run into a failure envelope; there are
/// no partial results.
pub fn run_analysis<D: Document + ?Sized>(
    doc: &D,
    config: &AnalyzerConfig,
    registry: &ObjectUrlRegistry,
) -> AnalysisOutcome {
    match analyze(doc, config, registry) {
        Ok(report) => {
            ::log::info!(
                "Analyzed {}: {} colors, {} font families, {} images",
                report.url,
                report.colors.len(),
                report.typography.font_families.len(),
                report.images.all.len()
            );
            AnalysisOutcome::Success(Box::new(report))
        }
        Err(e) => {
            ::log::error!("Analysis of {} failed: {}", doc.location(), e);
            AnalysisOutcome::failure(e.to_string())
        }
    }
}

/// Runs all three analyzers against one document
pub fn analyze<D: Document + ?Sized>(
    doc: &D,
    config: &AnalyzerConfig,
    registry: &ObjectUrlRegistry,
) -> Result<AnalysisReport> {
    let colors = ColorAnalyzer::new(doc, &config.color).analyze()?;
    let typography = TypographyAnalyzer::new(doc, &config.typography).analyze()?;
    let images = ImageAnalyzer::new(doc, &config.images, registry).analyze()?;

    Ok(AnalysisReport {
        url: doc.location().to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        colors,
        typography,
        images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;
    use crate::results::ColorCategory;

    const STOREFRONT: &str = r#"<html><head><style>
        body { background-color: #FFF8F0; color: #2D2A32; font-family: "Work Sans", sans-serif; }
        .btn-primary { background-color: #E4572E; color: #ffffff; }
    </style></head><body>
        <header><svg class="logo" width="96" height="32"><path d="M0 0h96v32H0z"/></svg></header>
        <h1>Fresh bread daily</h1>
        <p>Baked every morning.</p>
        <a class="btn-primary" href="/order">Order</a>
    </body></html>"#;

    #[test]
    fn test_run_analysis_success() {
        let page = Page::from_html(STOREFRONT, "https://bakery.example/").unwrap();
        let registry = ObjectUrlRegistry::new();

        let outcome = run_analysis(&page, &AnalyzerConfig::default(), &registry);
        let report = outcome.report().expect("analysis failed");

        assert_eq!(report.url, "https://bakery.example/");
        assert!(report.timestamp.ends_with('Z'));
        assert_eq!(report.timestamp.len(), "2024-01-01T00:00:00.000Z".len());
        assert_eq!(report.colors[0].hex, "#E4572E");
        assert_eq!(report.colors[0].category, ColorCategory::Primary);
        assert_eq!(report.typography.font_families[0].name, "Work Sans");
        assert!(report.images.logo.is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_outcome_serializes_with_fixed_keys() {
        let page = Page::from_html(STOREFRONT, "https://bakery.example/").unwrap();
        let registry = ObjectUrlRegistry::new();
        let outcome = run_analysis(&page, &AnalyzerConfig::default(), &registry);

        let json = serde_json::to_value(&outcome).unwrap();
        for key in ["url", "timestamp", "colors", "typography", "images"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["images"]["logo"]["type"], "svg");
        assert!(json["images"]["logo"]["url"].as_str().unwrap().starts_with("blob:"));
        assert!(json["typography"]["fontFamilies"].is_array());
        assert_eq!(json["colors"][0]["category"], "primary");
    }

    #[test]
    fn test_failure_envelope() {
        let outcome = AnalysisOutcome::failure("page was not ready");
        assert!(!outcome.is_success());
        assert_eq!(
            serde_json::to_string(&outcome).unwrap(),
            r#"{"error":"page was not ready"}"#
        );
    }
}
