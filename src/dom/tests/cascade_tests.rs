use crate::dom::cascade::{parse_declarations, parse_stylesheet};
use crate::dom::{Document, Page, parse_absolute_length, parse_px};

#[cfg(test)]
mod tests {
    use super::*;

    fn style_of<'a>(page: &'a Page, selector: &str) -> &'a crate::dom::ComputedStyle {
        let node = page.query_selector(selector).unwrap().unwrap();
        page.computed_style(node)
    }

    #[test]
    fn test_parse_stylesheet_descends_into_grouping_rules() {
        let rules = parse_stylesheet(
            r#"
            @charset "utf-8";
            @import url("theme.css");
            /* .hidden { color: red } */
            body { color: #111; }
            @media (min-width: 600px) {
                .card { background-color: #fff; }
            }
            @font-face { font-family: Brand; src: url(brand.woff2); }
            @keyframes spin { from { color: red; } to { color: blue; } }
            .empty { }
            "#,
        );

        let selectors: Vec<_> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec!["body", ".card"]);
        assert_eq!(rules[1].get("background-color"), Some("#fff"));
    }

    #[test]
    fn test_parse_stylesheet_braces_inside_strings() {
        let rules = parse_stylesheet(
            r#".icon::before { content: "{"; } .btn-primary { background-color: #E4572E; }"#,
        );

        let selectors: Vec<_> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".icon::before", ".btn-primary"]);
        assert_eq!(rules[0].get("content"), Some(r#""{""#));
        assert_eq!(rules[1].get("background-color"), Some("#E4572E"));
    }

    #[test]
    fn test_parse_stylesheet_comment_markers_inside_strings() {
        let rules = parse_stylesheet(
            r#".a::after { content: "/*"; } .btn { background-color: #3366FF; } .b::after { content: "*/"; }"#,
        );

        let selectors: Vec<_> = rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".a::after", ".btn", ".b::after"]);
        assert_eq!(rules[1].get("background-color"), Some("#3366FF"));
    }

    #[test]
    fn test_quoted_braces_do_not_hide_primary_button() {
        let page = Page::from_html(
            r#"<html><head><style>
                .icon::before { content: "{ /*"; }
                .btn-primary { background-color: #3366FF; color: #fff; }
            </style></head><body><button class="btn-primary">Buy</button></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        assert_eq!(page.style_rules().len(), 2);
        assert_eq!(style_of(&page, ".btn-primary").background_color, "#3366FF");
    }

    #[test]
    fn test_parse_declarations_expands_shorthands() {
        let declarations = parse_declarations(
            "background: #FAFAFA url('bg.png') no-repeat; border: 2px solid rgb(1, 2, 3); color: red !important",
        );

        assert_eq!(declarations["background-color"], "#FAFAFA");
        assert_eq!(declarations["background-image"], "url('bg.png')");
        assert_eq!(declarations["border-top-color"], "rgb(1, 2, 3)");
        assert_eq!(declarations["border-top-width"], "2px");
        assert_eq!(declarations["color"], "red");
    }

    #[test]
    fn test_parse_declarations_keeps_data_uris_whole() {
        let declarations =
            parse_declarations("background-image: url(data:image/png;base64,AAAA); color: blue");

        assert_eq!(declarations["background-image"], "url(data:image/png;base64,AAAA)");
        assert_eq!(declarations["color"], "blue");
    }

    #[test]
    fn test_border_without_style_has_no_width() {
        let declarations = parse_declarations("border: 4px red");
        assert_eq!(declarations["border-top-width"], "0px");

        let declarations = parse_declarations("border-top: dashed blue");
        assert_eq!(declarations["border-top-width"], "3px");
    }

    #[test]
    fn test_lengths() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px("7"), Some(7.0));
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_absolute_length("6pc"), Some(96.0));
        assert_eq!(parse_absolute_length("1in"), Some(96.0));
        assert_eq!(parse_absolute_length("2em"), None);
        assert_eq!(parse_absolute_length("1.5"), None);
    }

    #[test]
    fn test_inheritance_and_source_order() {
        let page = Page::from_html(
            r#"<html><head><style>
                body { color: #222; font-family: Lato, sans-serif; }
                .note { color: #0055AA; }
                p { color: #999; }
            </style></head>
            <body><p class="note">Hi <em>there</em></p><div><span>inherited</span></div></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        // p comes later in the sheet and wins without specificity
        assert_eq!(style_of(&page, "p").color, "#999");
        assert_eq!(style_of(&page, "em").color, "#999");
        assert_eq!(style_of(&page, "span").color, "#222");
        assert_eq!(style_of(&page, "span").font_family, "Lato, sans-serif");
        assert_eq!(style_of(&page, "div").background_color, "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_inline_style_applies_last() {
        let page = Page::from_html(
            r#"<html><head><style>#x { color: green; }</style></head>
            <body><div id="x" style="color: purple">x</div></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        assert_eq!(style_of(&page, "#x").color, "purple");
    }

    #[test]
    fn test_font_sizes_resolve_to_px() {
        let page = Page::from_html(
            r#"<html><body style="font-size: 20px">
                <h2>Heading</h2>
                <p style="font-size: 1.5em">Big</p>
                <small style="font-size: 50%">Half</small>
                <span style="font-size: 2rem">Root</span>
                <b style="font-size: large">Keyword</b>
                <i style="font-size: 12pt">Points</i>
            </body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        assert_eq!(style_of(&page, "h2").font_size, "30px");
        assert_eq!(style_of(&page, "h2").font_weight, "700");
        assert_eq!(style_of(&page, "p").font_size, "30px");
        assert_eq!(style_of(&page, "small").font_size, "10px");
        assert_eq!(style_of(&page, "span").font_size, "32px");
        assert_eq!(style_of(&page, "b").font_size, "18px");
        assert_eq!(style_of(&page, "i").font_size, "16px");
    }

    #[test]
    fn test_relative_line_height_becomes_px() {
        let page = Page::from_html(
            r#"<html><body><p style="font-size: 20px; line-height: 150%">a</p><div style="line-height: 1.4">b</div></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        assert_eq!(style_of(&page, "p").line_height, "30px");
        assert_eq!(style_of(&page, "div").line_height, "1.4");
    }

    #[test]
    fn test_border_current_color() {
        let page = Page::from_html(
            r#"<html><body><div style="color: #AA0000; border-top: 1px solid">x</div></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        let style = style_of(&page, "div");
        assert_eq!(style.border_top_color, "#AA0000");
        assert_eq!(style.border_top_width_px(), 1.0);
    }

    #[test]
    fn test_unparseable_selectors_stay_visible() {
        let page = Page::from_html(
            r#"<html><head><style>
                :::nonsense { color: #ABCDEF; }
                p { color: #123456; }
            </style></head><body><p>x</p></body></html>"#,
            "https://example.com/",
        )
        .unwrap();

        assert_eq!(page.style_rules().len(), 2);
        assert_eq!(style_of(&page, "p").color, "#123456");
    }
}
