use crate::capture::{NodeSnapshot, PageSnapshot};
use crate::dom::{ComputedStyle, Document, Page, Size, StyleRule};
use crate::error::ScanError;

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> PageSnapshot {
        let node = |color: &str, rect: Option<Size>| NodeSnapshot {
            style: ComputedStyle {
                color: color.to_string(),
                ..ComputedStyle::default()
            },
            rect,
            natural: None,
        };

        let mut rule = StyleRule::new(".cta");
        rule.declarations
            .insert("background-color".to_string(), "rgb(255, 87, 34)".to_string());

        PageSnapshot {
            url: "https://shop.example.com/".to_string(),
            html: concat!(
                r#"<html data-ds-node="0"><head data-ds-node="1"></head>"#,
                r#"<body data-ds-node="2"><img data-ds-node="3" src="a.png" alt="A">"#,
                r#"<div data-ds-node="4" class="wrap"><b data-ds-node="5">Bold</b></div></body></html>"#,
            )
            .to_string(),
            nodes: vec![
                node("rgb(0, 0, 0)", None),
                node("rgb(0, 0, 0)", None),
                node("rgb(10, 10, 10)", Some(Size::new(1280.0, 900.0))),
                NodeSnapshot {
                    natural: Some(Size::new(640.0, 480.0)),
                    ..node("rgb(10, 10, 10)", Some(Size::new(320.0, 240.0)))
                },
                node("rgb(10, 10, 10)", None),
                node("rgb(200, 0, 0)", None),
            ],
            rules: vec![rule],
        }
    }

    #[test]
    fn test_from_snapshot_pairs_styles_with_elements() {
        let page = Page::from_snapshot(snapshot()).unwrap();

        assert_eq!(page.len(), 6);
        assert_eq!(page.location().as_str(), "https://shop.example.com/");

        let bold = page.query_selector("b").unwrap().unwrap();
        assert_eq!(page.computed_style(bold).color, "rgb(200, 0, 0)");

        let img = page.query_selector("img").unwrap().unwrap();
        assert_eq!(page.rendered_size(img), Some(Size::new(320.0, 240.0)));
        assert_eq!(page.natural_size(img), Some(Size::new(640.0, 480.0)));

        assert_eq!(page.style_rules().len(), 1);
        assert_eq!(page.style_rules()[0].get("background-color"), Some("rgb(255, 87, 34)"));
    }

    #[test]
    fn test_capture_marker_is_hidden() {
        let page = Page::from_snapshot(snapshot()).unwrap();
        let div = page.query_selector("div.wrap").unwrap().unwrap();

        assert_eq!(page.attribute(div, "data-ds-node"), None);
        assert_eq!(
            page.attributes(div),
            vec![("class".to_string(), "wrap".to_string())]
        );
        assert_eq!(page.inner_html(div), "<b>Bold</b>");
    }

    #[test]
    fn test_snapshot_without_markers_is_rejected() {
        let mut snapshot = snapshot();
        snapshot.html = "<html><body><p>unstamped</p></body></html>".to_string();

        assert!(matches!(
            Page::from_snapshot(snapshot),
            Err(ScanError::Snapshot(_))
        ));
    }

    #[test]
    fn test_invalid_selector() {
        let page = Page::from_html("<html><body></body></html>", "https://example.com/").unwrap();
        let error = page.query_selector_all("div[").unwrap_err();

        assert!(matches!(error, ScanError::InvalidSelector { .. }));
        assert!(error.is_skippable());
    }

    #[test]
    fn test_invalid_page_url() {
        assert!(matches!(
            Page::from_html("<html></html>", "not a url"),
            Err(ScanError::Url(_))
        ));
    }

    #[test]
    fn test_element_accessors() {
        let page = Page::from_html(
            r#"<html><body>Top <section id="s" class="hero dark"><p>Inner <i>text</i></p></section></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        let root = page.root().unwrap();
        let body = page.body().unwrap();
        let section = page.query_selector("#s").unwrap().unwrap();

        assert_eq!(page.tag_name(root), "html");
        assert_eq!(page.tag_name(body), "body");
        assert_eq!(page.elements().first(), Some(&root));
        assert_eq!(page.classes(section), vec!["hero".to_string(), "dark".to_string()]);
        assert_eq!(page.text_content(section), "Inner text");
        assert!(page.has_direct_text(body));
        assert!(!page.has_direct_text(section));
        assert!(page.query_selector("article").unwrap().is_none());
    }
}
