use super::page;
use crate::analyzers::typography::{TypographyAnalyzer, normalize_line_height, primary_font};
use crate::config::TypographyConfig;
use crate::results::TypographyAnalysis;

#[cfg(test)]
mod tests {
    use super::*;

    fn typography(html: &str) -> TypographyAnalysis {
        let page = page(html);
        let config = TypographyConfig::default();
        TypographyAnalyzer::new(&page, &config).analyze().unwrap()
    }

    #[test]
    fn test_primary_font() {
        assert_eq!(primary_font(r#""Helvetica Neue", Arial, sans-serif"#), "Helvetica Neue");
        assert_eq!(primary_font("system-ui, Roboto, sans-serif"), "Roboto");
        assert_eq!(primary_font("'Segoe UI', Tahoma"), "Tahoma");
        assert_eq!(primary_font("serif"), "serif");
        assert_eq!(primary_font(""), "");
    }

    #[test]
    fn test_normalize_line_height() {
        assert_eq!(normalize_line_height("24px", "16px"), "1.50");
        assert_eq!(normalize_line_height("normal", "16px"), "1.2");
        assert_eq!(normalize_line_height("18pt", "16px"), "1.50");
        assert_eq!(normalize_line_height("1.5", "16px"), "1.5");
        assert_eq!(normalize_line_height("24px", "large"), "24px");
    }

    #[test]
    fn test_single_heading_only_appears_in_map() {
        let result = typography(
            r#"<html><body><h1 style="font-family: Georgia, serif">Welcome aboard</h1><p>Text</p></body></html>"#,
        );

        let headings = result.headings.expect("headings missing");
        assert_eq!(headings.keys().collect::<Vec<_>>(), vec!["h1"]);

        let h1 = &headings["h1"];
        assert_eq!(h1.style.font_family, "Georgia");
        assert_eq!(h1.style.font_size, "32px");
        assert_eq!(h1.style.font_weight, "700");
        assert_eq!(h1.style.line_height, "1.2");
        assert_eq!(h1.style.color.as_deref(), Some("#000000"));
        assert_eq!(h1.sample, "Welcome aboard");
    }

    #[test]
    fn test_headings_absent() {
        let result = typography("<html><body><p>Just text</p></body></html>");
        assert!(result.headings.is_none());
    }

    #[test]
    fn test_heading_map_is_in_tag_order_and_samples_first() {
        let long = "A heading that goes on and on well past the fifty character sample";
        let result = typography(&format!(
            "<html><body><h3>Third</h3><h2>{long}</h2><h1>First</h1><h1>Second h1</h1></body></html>"
        ));

        let headings = result.headings.unwrap();
        assert_eq!(headings.keys().collect::<Vec<_>>(), vec!["h1", "h2", "h3"]);
        assert_eq!(headings["h1"].sample, "First");
        assert_eq!(
            headings["h2"].sample,
            format!("{}...", &long[..50])
        );
    }

    #[test]
    fn test_font_ranking() {
        let result = typography(
            r#"<html><head></head><body style="font-family: Arial, sans-serif"><p>One</p><p>Two</p><p>Three <span style="font-family: 'Courier New', monospace">code</span></p></body></html>"#,
        );

        let fonts = result.font_families;
        assert_eq!(fonts.len(), 3);
        assert_eq!(fonts[0].name, "Arial");
        assert_eq!(fonts[0].usage, 67);
        assert_eq!(fonts[1].name, "Times New Roman");
        assert_eq!(fonts[1].usage, 17);
        assert_eq!(fonts[2].name, "Courier New");
        assert!(fonts.iter().all(|f| f.usage >= 1));
    }

    #[test]
    fn test_font_ranking_is_capped() {
        let spans: String = (0..15)
            .map(|i| format!(r#"<span style="font-family: Font{i}">x</span>"#))
            .collect();
        let page = page(&format!("<html><body>{spans}</body></html>"));
        let config = TypographyConfig::default();
        let fonts = TypographyAnalyzer::new(&page, &config).rank_font_families();

        assert_eq!(fonts.len(), 10);
        assert!(fonts.windows(2).all(|w| w[0].usage >= w[1].usage));
    }

    #[test]
    fn test_rare_fonts_are_dropped() {
        let paragraphs: String = (0..200).map(|_| "<p>text</p>").collect();
        let html = format!(
            r#"<html><body style="font-family: Inter">{paragraphs}<span style="font-family: Rare">r</span></body></html>"#
        );
        let fonts = typography(&html).font_families;

        assert!(fonts.iter().any(|f| f.name == "Inter"));
        assert!(fonts.iter().all(|f| f.name != "Rare"));
    }

    #[test]
    fn test_body_prefers_paragraph_with_own_text() {
        let result = typography(
            r#"<html><body style="font-size: 18px"><p style="font-size: 14px; line-height: 21px; color: #333">Body copy</p></body></html>"#,
        );

        assert_eq!(result.body.font_size, "14px");
        assert_eq!(result.body.line_height, "1.50");
        assert_eq!(result.body.color.as_deref(), Some("#333333"));
    }

    #[test]
    fn test_body_skips_candidates_without_direct_text() {
        let result = typography(
            r#"<html><body style="font-size: 18px"><p style="font-size: 12px"><span>nested</span></p> Loose text</body></html>"#,
        );

        assert_eq!(result.body.font_size, "18px");
    }

    #[test]
    fn test_body_falls_back_to_body_element() {
        let result = typography(
            r#"<html><body style="font-family: Verdana"><div><span>deep</span></div></body></html>"#,
        );

        assert_eq!(result.body.font_family, "Verdana");
    }
}
