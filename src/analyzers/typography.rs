use crate::color::to_hex;
use crate::config::TypographyConfig;
use crate::dom::{Document, NodeId, parse_absolute_length};
use crate::error::Result;
use crate::results::{FontUsage, HeadingStyle, TextStyle, TypographyAnalysis};
use crate::text::sample_text;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Family names that only say "use the platform default"; the next entry in
/// the stack is more telling
const GENERIC_FONTS: &[&str] = &[
    "system-ui",
    "-apple-system",
    "BlinkMacSystemFont",
    "Segoe UI",
    "sans-serif",
    "serif",
    "monospace",
];

/// Where body copy usually lives, most specific first
const BODY_CANDIDATES: &[&str] = &["p", "body", ".content", "main", "article"];

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Line height browsers use for `normal`
const NORMAL_LINE_HEIGHT: &str = "1.2";

/// Reduces a `font-family` stack to the family that is actually distinctive.
///
/// Takes the first entry with quotes removed, unless it is a generic or
/// system family and another entry follows.
pub fn primary_font(font_family: &str) -> String {
    let families: Vec<String> = font_family
        .split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    match families.as_slice() {
        [] => String::new(),
        [first, second, ..] if GENERIC_FONTS.contains(&first.as_str()) => second.clone(),
        [first, ..] => first.clone(),
    }
}

/// Expresses a line height as a unitless ratio of the font size.
///
/// `normal` becomes `1.2`; absolute lengths are divided by the font size and
/// printed with two decimals. Unitless and relative values, and anything
/// measured against a font size that does not parse, pass through unchanged.
pub fn normalize_line_height(line_height: &str, font_size: &str) -> String {
    let line_height = line_height.trim();
    if line_height.eq_ignore_ascii_case("normal") {
        return NORMAL_LINE_HEIGHT.to_string();
    }

    match (parse_absolute_length(line_height), parse_absolute_length(font_size)) {
        (Some(lh), Some(fs)) if fs > 0.0 => format!("{:.2}", lh / fs),
        _ => line_height.to_string(),
    }
}

/// Ranks font families and samples heading and body text styles
pub struct TypographyAnalyzer<'a, D: Document + ?Sized> {
    doc: &'a D,
    config: &'a TypographyConfig,
}

impl<'a, D: Document + ?Sized> TypographyAnalyzer<'a, D> {
    pub fn new(doc: &'a D, config: &'a TypographyConfig) -> Self {
        Self { doc, config }
    }

    pub fn analyze(&self) -> Result<TypographyAnalysis> {
        Ok(TypographyAnalysis {
            font_families: self.rank_font_families(),
            headings: self.heading_styles()?,
            body: self.body_style()?,
        })
    }

    /// Share of text-bearing elements per primary font family
    pub fn rank_font_families(&self) -> Vec<FontUsage> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        let mut total = 0usize;

        for node in self.doc.elements() {
            if self.doc.text_content(node).trim().is_empty() {
                continue;
            }
            total += 1;
            let font = primary_font(&self.doc.computed_style(node).font_family);
            if !font.is_empty() {
                *counts.entry(font).or_insert(0) += 1;
            }
        }

        if total == 0 {
            return Vec::new();
        }

        let mut fonts: Vec<FontUsage> = counts
            .into_iter()
            .map(|(name, count)| FontUsage {
                name,
                usage: (count as f64 / total as f64 * 100.0).round() as u32,
            })
            .filter(|f| f.usage >= self.config.min_usage_percent)
            .collect();

        fonts.sort_by(|a, b| b.usage.cmp(&a.usage));
        fonts.truncate(self.config.max_fonts);

        ::log::debug!("Ranked {} font families over {} text elements", fonts.len(), total);
        fonts
    }

    /// Style of the first element of each heading level, `None` without headings
    pub fn heading_styles(&self) -> Result<Option<BTreeMap<String, HeadingStyle>>> {
        let mut headings = BTreeMap::new();

        for tag in HEADING_TAGS {
            if let Some(node) = self.doc.query_selector(tag)? {
                headings.insert(
                    tag.to_string(),
                    HeadingStyle {
                        style: self.text_style(node),
                        sample: sample_text(&self.doc.text_content(node), self.config.sample_length),
                    },
                );
            }
        }

        Ok((!headings.is_empty()).then_some(headings))
    }

    /// Style of the first body-copy candidate holding text of its own
    pub fn body_style(&self) -> Result<TextStyle> {
        for selector in BODY_CANDIDATES {
            if let Some(node) = self.doc.query_selector(selector)? {
                if self.doc.has_direct_text(node) {
                    ::log::trace!("Body text sampled from {}", selector);
                    return Ok(self.text_style(node));
                }
            }
        }

        Ok(self
            .doc
            .body()
            .or_else(|| self.doc.root())
            .map(|node| self.text_style(node))
            .unwrap_or_default())
    }

    fn text_style(&self, node: NodeId) -> TextStyle {
        let style = self.doc.computed_style(node);
        TextStyle {
            font_family: primary_font(&style.font_family),
            font_size: style.font_size.clone(),
            font_weight: style.font_weight.clone(),
            line_height: normalize_line_height(&style.line_height, &style.font_size),
            color: to_hex(&style.color),
        }
    }
}
