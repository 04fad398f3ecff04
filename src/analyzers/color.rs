use crate::color::{find_color_token, is_neutral_with, is_valid_color, to_hex};
use crate::config::ColorConfig;
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::results::{ColorCategory, ColorRecord};
use crate::text::truncate;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// Selector fragments that mark a rule as styling an interactive or brand element
const SELECTOR_HINTS: &[&str] = &["btn", "button", "primary", "link", "accent"];

/// Longest selector text kept as a source label
const SOURCE_LABEL_LEN: usize = 50;

const BUTTON_SELECTOR: &str =
    "button, input[type=submit], input[type=button], .btn, .button, [role=button]";
const LINK_SELECTOR: &str = "a[href]";
const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const CONTAINER_SELECTOR: &str = "main, article, section, header, footer, nav, \
     [class*=card], [class*=modal], [class*=container], [class*=wrapper], [class*=content]";
const INPUT_SELECTOR: &str = "input, textarea, select";

const BLACK: &str = "#000000";
const WHITE: &str = "#FFFFFF";

#[derive(Debug, Clone, Default)]
struct PaletteEntry {
    weight: u32,
    sources: Vec<String>,
}

/// Weighted color multisets, one per category.
///
/// Both analyzer passes add to the same palette; [`Palette::into_records`]
/// merges the categories into the final ranked list.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    buckets: [IndexMap<String, PaletteEntry>; 5],
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to `hex` in `category`, remembering `source` if new
    pub fn add(&mut self, category: ColorCategory, hex: &str, weight: u32, source: &str) {
        let entry = self.buckets[category.index()]
            .entry(hex.to_string())
            .or_default();
        entry.weight = entry.weight.saturating_add(weight);
        if !entry.sources.iter().any(|s| s == source) {
            entry.sources.push(source.to_string());
        }
    }

    /// Accumulated weight of a color within a category
    pub fn weight(&self, category: ColorCategory, hex: &str) -> Option<u32> {
        self.buckets[category.index()].get(hex).map(|e| e.weight)
    }

    /// Number of (category, color) entries
    pub fn len(&self) -> usize {
        self.buckets.iter().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(IndexMap::is_empty)
    }

    /// Ranks every category by weight and merges them in priority order.
    ///
    /// A color already emitted under a higher-priority category is skipped.
    /// Ties keep first-seen order.
    pub fn into_records(self, max_colors: usize, max_sources: usize) -> Vec<ColorRecord> {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for (category, bucket) in ColorCategory::PRIORITY.into_iter().zip(self.buckets) {
            let mut entries: Vec<_> = bucket.into_iter().collect();
            entries.sort_by(|a, b| b.1.weight.cmp(&a.1.weight));

            for (hex, mut entry) in entries {
                if !seen.insert(hex.clone()) {
                    continue;
                }
                entry.sources.truncate(max_sources);
                records.push(ColorRecord {
                    hex,
                    category,
                    weight: entry.weight,
                    sources: entry.sources,
                });
            }
        }

        records.truncate(max_colors);
        records
    }
}

/// Normalizes a CSS color value (or a shorthand containing one) to `#RRGGBB`
pub fn normalize(value: &str) -> Option<String> {
    if !is_valid_color(value) {
        return None;
    }
    to_hex(value).or_else(|| {
        find_color_token(value)
            .filter(|token| is_valid_color(token))
            .and_then(|token| to_hex(&token))
    })
}

/// Builds a ranked, deduplicated palette from stylesheet rules and the
/// computed style of structural elements
pub struct ColorAnalyzer<'a, D: Document + ?Sized> {
    doc: &'a D,
    config: &'a ColorConfig,
}

impl<'a, D: Document + ?Sized> ColorAnalyzer<'a, D> {
    pub fn new(doc: &'a D, config: &'a ColorConfig) -> Self {
        Self { doc, config }
    }

    pub fn analyze(&self) -> Result<Vec<ColorRecord>> {
        let mut palette = Palette::new();
        self.scan_stylesheets(&mut palette);
        self.scan_key_elements(&mut palette)?;

        ::log::debug!("Palette holds {} candidate colors", palette.len());
        Ok(palette.into_records(self.config.max_colors, self.config.max_sources))
    }

    /// Every accessible rule contributes its declared colors once
    pub fn scan_stylesheets(&self, palette: &mut Palette) {
        let weight = self.config.weights.stylesheet_rule;

        for rule in self.doc.style_rules() {
            let selector = rule.selector.to_ascii_lowercase();
            let hinted = SELECTOR_HINTS.iter().any(|hint| selector.contains(hint));
            let source = truncate(rule.selector.trim(), SOURCE_LABEL_LEN);

            if let Some(hex) = rule.get("background-color").and_then(normalize) {
                let category = if hinted {
                    ColorCategory::Primary
                } else {
                    ColorCategory::Background
                };
                palette.add(category, &hex, weight, &source);
            }

            if let Some(hex) = rule.get("color").and_then(normalize) {
                let category = if hinted {
                    ColorCategory::Accent
                } else {
                    ColorCategory::Foreground
                };
                palette.add(category, &hex, weight, &source);
            }

            let border = rule
                .get("border-color")
                .or_else(|| rule.get("border-top-color"));
            if let Some(hex) = border.and_then(normalize) {
                palette.add(ColorCategory::Border, &hex, weight, &source);
            }
        }
    }

    /// Computed colors of body, buttons, links, headings, containers and inputs
    pub fn scan_key_elements(&self, palette: &mut Palette) -> Result<()> {
        let weights = &self.config.weights;

        if let Some(body) = self.doc.body() {
            let style = self.doc.computed_style(body);
            if let Some(hex) = normalize(&style.background_color) {
                let weight = if hex == BLACK || hex == WHITE {
                    weights.body_background_plain
                } else {
                    weights.body_background
                };
                palette.add(ColorCategory::Background, &hex, weight, "body");
            }
            if let Some(hex) = normalize(&style.color) {
                palette.add(ColorCategory::Foreground, &hex, weights.body_text, "body");
            }
        }

        if let Some(root) = self.doc.root() {
            let style = self.doc.computed_style(root);
            if let Some(hex) = normalize(&style.background_color) {
                palette.add(ColorCategory::Background, &hex, weights.html_background, "html");
            }
        }

        for node in self.doc.query_selector_all(BUTTON_SELECTOR)? {
            let style = self.doc.computed_style(node);
            let label = self.label(node);
            if let Some(hex) = normalize(&style.background_color).filter(|h| !self.is_neutral(h)) {
                palette.add(ColorCategory::Primary, &hex, weights.button_background, &label);
            }
            if let Some(hex) = normalize(&style.color).filter(|h| !self.is_neutral(h)) {
                palette.add(ColorCategory::Accent, &hex, weights.button_text, &label);
            }
        }

        let mut link_colors = IndexSet::new();
        for node in self.doc.query_selector_all(LINK_SELECTOR)? {
            if let Some(hex) = normalize(&self.doc.computed_style(node).color) {
                link_colors.insert(hex);
            }
        }
        for hex in &link_colors {
            palette.add(ColorCategory::Accent, hex, weights.link_text, "a");
        }

        for node in self.doc.query_selector_all(HEADING_SELECTOR)? {
            if let Some(hex) = normalize(&self.doc.computed_style(node).color) {
                let tag = self.doc.tag_name(node);
                palette.add(ColorCategory::Foreground, &hex, weights.heading_text, &tag);
            }
        }

        for node in self.doc.query_selector_all(CONTAINER_SELECTOR)? {
            let style = self.doc.computed_style(node);
            let label = self.label(node);
            if let Some(hex) = normalize(&style.background_color) {
                palette.add(
                    ColorCategory::Background,
                    &hex,
                    weights.container_background,
                    &label,
                );
            }
            if style.border_top_width_px() > 0.0 {
                if let Some(hex) = normalize(&style.border_top_color) {
                    palette.add(ColorCategory::Border, &hex, weights.container_border, &label);
                }
            }
        }

        for node in self.doc.query_selector_all(INPUT_SELECTOR)? {
            if let Some(hex) = normalize(&self.doc.computed_style(node).border_top_color) {
                let tag = self.doc.tag_name(node);
                palette.add(ColorCategory::Border, &hex, weights.input_border, &tag);
            }
        }

        Ok(())
    }

    fn is_neutral(&self, hex: &str) -> bool {
        is_neutral_with(hex, self.config.neutral_saturation)
    }

    /// `tag.firstclass`, or the bare tag
    fn label(&self, node: NodeId) -> String {
        let tag = self.doc.tag_name(node);
        match self.doc.classes(node).first() {
            Some(class) => format!("{}.{}", tag, class),
            None => tag,
        }
    }
}
