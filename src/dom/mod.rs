//! Read-only view of a rendered page
//!
//! The analyzers never talk to a browser directly. They read a [`Document`]:
//! elements in document order, selector queries, computed style, element boxes
//! and the accessible stylesheet rules. [`Page`] is the one implementation,
//! built either from a live browser snapshot or from static HTML.

pub mod cascade;
mod page;

#[cfg(test)]
mod tests;

pub use page::Page;

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Handle to an element of a [`Document`], valid only for that document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Width and height of a rendered box, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether either side is under the given threshold
    pub fn is_smaller_than(&self, min: f64) -> bool {
        self.width < min || self.height < min
    }
}

/// The subset of an element's computed style the analyzers read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub background_color: String,
    pub background_image: String,
    pub color: String,
    pub border_top_color: String,
    pub border_top_width: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
}

impl ComputedStyle {
    /// Top border width in px, 0 when unset or not a px length
    pub fn border_top_width_px(&self) -> f64 {
        parse_px(&self.border_top_width).unwrap_or(0.0)
    }
}

/// A style rule from an accessible stylesheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Selector text as written in the stylesheet
    pub selector: String,

    /// Declared longhand properties, keyed by lowercase property name
    #[serde(default)]
    pub declarations: IndexMap<String, String>,
}

impl StyleRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: IndexMap::new(),
        }
    }

    /// Declared value of a property, if present and non-empty
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .get(property)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read-only access to a page's DOM and CSSOM
pub trait Document {
    /// Location the page was loaded from, used to resolve relative URLs
    fn location(&self) -> &Url;

    /// Every element, in document order
    fn elements(&self) -> Vec<NodeId>;

    /// All elements matching a CSS selector, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>>;

    /// First element matching a CSS selector
    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// The document element (`<html>`)
    fn root(&self) -> Option<NodeId>;

    /// The `<body>` element
    fn body(&self) -> Option<NodeId>;

    /// Lowercase tag name
    fn tag_name(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// All attributes in source order, keyed by qualified name such as
    /// `xmlns:xlink`
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    fn classes(&self, node: NodeId) -> Vec<String>;

    /// Concatenated text of all descendant text nodes
    fn text_content(&self, node: NodeId) -> String;

    /// Whether the element has a non-blank text node as a direct child
    fn has_direct_text(&self, node: NodeId) -> bool;

    /// Serialized markup of the element's children
    fn inner_html(&self, node: NodeId) -> String;

    fn computed_style(&self, node: NodeId) -> &ComputedStyle;

    /// Rendered box size, when known
    fn rendered_size(&self, node: NodeId) -> Option<Size>;

    /// Intrinsic size of replaced content such as images, when known
    fn natural_size(&self, node: NodeId) -> Option<Size>;

    /// Rules of every stylesheet the page could read
    fn style_rules(&self) -> &[StyleRule];
}

/// CSS absolute length units and their size in px
const ABSOLUTE_UNITS: &[(&str, f64)] = &[
    ("px", 1.0),
    ("pt", 4.0 / 3.0),
    ("pc", 16.0),
    ("in", 96.0),
    ("cm", 96.0 / 2.54),
    ("mm", 96.0 / 25.4),
    ("q", 96.0 / 101.6),
];

/// Converts a length in an absolute unit (`px`, `pt`, `pc`, `in`, `cm`, `mm`,
/// `q`) to px. Bare numbers and relative units yield `None`.
pub fn parse_absolute_length(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    ABSOLUTE_UNITS.iter().find_map(|(unit, factor)| {
        value
            .strip_suffix(unit)
            .and_then(|n| n.trim().parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map(|n| n * factor)
    })
}

/// Parses a `px` length (or a bare number) into CSS pixels
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}
