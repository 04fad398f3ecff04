use crate::capture::PageSnapshot;
use crate::dom::{ComputedStyle, Document, NodeId, Size, StyleRule, cascade};
use crate::error::{Result, ScanError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

/// Attribute the capture script stamps on every element to pair markup with styles
pub(crate) const NODE_MARKER: &str = "data-ds-node";

static NODE_MARKER_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+data-ds-node="\d+""#).expect("valid node marker regex")
});

static EMPTY_STYLE: LazyLock<ComputedStyle> = LazyLock::new(ComputedStyle::default);

/// A parsed page with per-element computed style
///
/// Elements are addressed by their position in document order.
pub struct Page {
    url: Url,
    html: Html,
    order: Vec<ego_tree::NodeId>,
    index: HashMap<ego_tree::NodeId, usize>,
    styles: Vec<ComputedStyle>,
    boxes: Vec<Option<Size>>,
    natural: Vec<Option<Size>>,
    rules: Vec<StyleRule>,
}

impl Page {
    /// Builds a page from static HTML, approximating computed style from
    /// inline `<style>` blocks and `style` attributes
    pub fn from_html(source: &str, url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let html = Html::parse_document(source);
        let (order, index) = index_elements(&html);

        let rules = cascade::collect_stylesheets(&html);
        let (styles, boxes) = cascade::resolve(&html, &order, &rules);
        ::log::debug!(
            "Parsed static page {} with {} elements and {} style rules",
            url,
            order.len(),
            rules.len()
        );

        let natural = vec![None; order.len()];
        Ok(Self {
            url,
            html,
            order,
            index,
            styles,
            boxes,
            natural,
            rules,
        })
    }

    /// Reads an HTML file and builds a static page from it
    pub fn from_file(path: impl AsRef<Path>, url: &str) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_html(&source, url)
    }

    /// Builds a page from a browser snapshot, pairing each element with the
    /// style record stamped on it during capture
    pub fn from_snapshot(snapshot: PageSnapshot) -> Result<Self> {
        let url = Url::parse(&snapshot.url)?;
        let html = Html::parse_document(&snapshot.html);
        let (order, index) = index_elements(&html);

        let mut styles = Vec::with_capacity(order.len());
        let mut boxes = Vec::with_capacity(order.len());
        let mut natural = Vec::with_capacity(order.len());
        let mut unmatched = 0usize;

        for id in &order {
            let record = html
                .tree
                .get(*id)
                .and_then(ElementRef::wrap)
                .and_then(|e| e.value().attr(NODE_MARKER))
                .and_then(|marker| marker.parse::<usize>().ok())
                .and_then(|i| snapshot.nodes.get(i));

            match record {
                Some(node) => {
                    styles.push(node.style.clone());
                    boxes.push(node.rect);
                    natural.push(node.natural);
                }
                None => {
                    // Elements the parser synthesized (e.g. implied tbody) carry no stamp
                    unmatched += 1;
                    styles.push(ComputedStyle::default());
                    boxes.push(None);
                    natural.push(None);
                }
            }
        }

        if unmatched == order.len() && !order.is_empty() {
            return Err(ScanError::Snapshot(
                "no element in the captured markup carries a style record".to_string(),
            ));
        }
        ::log::debug!(
            "Built page {} from snapshot: {} elements, {} without style, {} rules",
            url,
            order.len(),
            unmatched,
            snapshot.rules.len()
        );

        Ok(Self {
            url,
            html,
            order,
            index,
            styles,
            boxes,
            natural,
            rules: snapshot.rules,
        })
    }

    /// Number of elements on the page
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.order
            .get(node.0)
            .and_then(|id| self.html.tree.get(*id))
            .and_then(ElementRef::wrap)
    }

    fn first_with_tag(&self, tag: &str) -> Option<NodeId> {
        (0..self.order.len())
            .map(NodeId)
            .find(|node| self.element(*node).is_some_and(|e| e.value().name() == tag))
    }
}

/// Lists every element in document order and maps tree ids back to positions
fn index_elements(html: &Html) -> (Vec<ego_tree::NodeId>, HashMap<ego_tree::NodeId, usize>) {
    let order: Vec<ego_tree::NodeId> = html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|e| e.id())
        .collect();
    let index = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    (order, index)
}

impl Document for Page {
    fn location(&self) -> &Url {
        &self.url
    }

    fn elements(&self) -> Vec<NodeId> {
        (0..self.order.len()).map(NodeId).collect()
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let parsed =
            Selector::parse(selector).map_err(|_| ScanError::invalid_selector(selector))?;
        Ok(self
            .html
            .select(&parsed)
            .filter_map(|e| self.index.get(&e.id()).copied())
            .map(NodeId)
            .collect())
    }

    fn root(&self) -> Option<NodeId> {
        self.first_with_tag("html")
    }

    fn body(&self) -> Option<NodeId> {
        self.first_with_tag("body")
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.value().name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        if name == NODE_MARKER {
            return None;
        }
        self.element(node)?.value().attr(name).map(str::to_string)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|e| {
                e.value()
                    .attrs
                    .iter()
                    .filter(|(name, _)| name.prefix.is_some() || &*name.local != NODE_MARKER)
                    .map(|(name, value)| {
                        let qualified = match &name.prefix {
                            Some(prefix) => format!("{}:{}", prefix, name.local),
                            None => name.local.to_string(),
                        };
                        (qualified, value.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.element(node)
            .and_then(|e| e.value().attr("class"))
            .map(|class| class.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.text().collect())
            .unwrap_or_default()
    }

    fn has_direct_text(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| {
            e.children()
                .any(|child| child.value().as_text().is_some_and(|t| !t.trim().is_empty()))
        })
    }

    fn inner_html(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| NODE_MARKER_ATTR.replace_all(&e.inner_html(), "").into_owned())
            .unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> &ComputedStyle {
        self.styles.get(node.0).unwrap_or(&*EMPTY_STYLE)
    }

    fn rendered_size(&self, node: NodeId) -> Option<Size> {
        self.boxes.get(node.0).copied().flatten()
    }

    fn natural_size(&self, node: NodeId) -> Option<Size> {
        self.natural.get(node.0).copied().flatten()
    }

    fn style_rules(&self) -> &[StyleRule] {
        &self.rules
    }
}
