use crate::blob::{Blob, ObjectUrlRegistry};
use crate::config::ImageConfig;
use crate::dom::{Document, NodeId, Size, parse_px};
use crate::error::Result;
use crate::results::{BackgroundRecord, ImageAnalysis, ImageRecord, Logo, SvgLogo, SvgRecord};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";
const SVG_MIME: &str = "image/svg+xml";

/// Extensions reported as an image's `type`
const RECOGNIZED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "ico", "bmp", "avif",
];

const UNKNOWN_TYPE: &str = "unknown";

static BACKGROUND_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*["']?([^"')]+?)["']?\s*\)"#).expect("valid background url regex")
});

/// Which kind of element a logo rule yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoTier {
    /// An `<img>` that looks like a logo
    Raster,
    /// An inline `<svg>` that looks like a logo
    Vector,
    /// Any image in the page chrome
    Fallback,
}

#[derive(Debug, Clone, Copy)]
pub struct LogoRule {
    pub tier: LogoTier,
    pub selector: &'static str,
}

impl LogoRule {
    pub const fn new(tier: LogoTier, selector: &'static str) -> Self {
        Self { tier, selector }
    }
}

/// Logo heuristics, tried in order until one yields an element
pub const LOGO_RULES: &[LogoRule] = &[
    LogoRule::new(
        LogoTier::Raster,
        r#"img[alt*="logo" i], img[class*="logo" i], img[id*="logo" i]"#,
    ),
    LogoRule::new(LogoTier::Raster, r#"img[alt*="brand" i], img[class*="brand" i]"#),
    LogoRule::new(LogoTier::Raster, r#".logo img, #logo img, [class*="logo"] img"#),
    LogoRule::new(LogoTier::Raster, "header img, nav img"),
    LogoRule::new(LogoTier::Raster, r#"a[href="/"] img, a[href="./"] img"#),
    LogoRule::new(LogoTier::Vector, r#"svg[class*="logo" i], svg[id*="logo" i]"#),
    LogoRule::new(LogoTier::Vector, r#".logo svg, #logo svg, [class*="logo"] svg"#),
    LogoRule::new(LogoTier::Vector, "header svg, nav svg"),
    LogoRule::new(LogoTier::Vector, r#"a[href="/"] svg, a[href="./"] svg"#),
    LogoRule::new(LogoTier::Fallback, "header img, nav img"),
];

/// File type token of an image URL: its extension, or the MIME subtype of a
/// data URI
pub fn file_type(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("data:") {
        let mime = rest.split([';', ',']).next().unwrap_or_default();
        return match mime.split_once('/') {
            Some((_, "svg+xml")) => "svg".to_string(),
            Some((_, subtype)) if !subtype.is_empty() => subtype.to_ascii_lowercase(),
            _ => UNKNOWN_TYPE.to_string(),
        };
    }

    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| RECOGNIZED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| UNKNOWN_TYPE.to_string())
}

/// Finds the logo, raster images, inline SVGs and CSS background images
pub struct ImageAnalyzer<'a, D: Document + ?Sized> {
    doc: &'a D,
    config: &'a ImageConfig,
    registry: &'a ObjectUrlRegistry,
}

impl<'a, D: Document + ?Sized> ImageAnalyzer<'a, D> {
    pub fn new(doc: &'a D, config: &'a ImageConfig, registry: &'a ObjectUrlRegistry) -> Self {
        Self {
            doc,
            config,
            registry,
        }
    }

    pub fn analyze(&self) -> Result<ImageAnalysis> {
        let all = self.collect_images()?;
        let svgs = self.collect_svgs()?;
        let backgrounds = self.collect_backgrounds();
        // Last, so an error above cannot leave a registered blob behind.
        let logo = self.find_logo();

        Ok(ImageAnalysis {
            logo,
            all,
            svgs,
            backgrounds,
        })
    }

    /// First element matched by [`LOGO_RULES`].
    ///
    /// An SVG logo is registered with the object URL registry; the caller owns
    /// revoking it.
    pub fn find_logo(&self) -> Option<Logo> {
        self.find_logo_with(LOGO_RULES)
    }

    /// First element matched by `rules`, tried in order. A rule whose selector
    /// does not parse is skipped.
    pub fn find_logo_with(&self, rules: &[LogoRule]) -> Option<Logo> {
        for rule in rules {
            let nodes = match self.doc.query_selector_all(rule.selector) {
                Ok(nodes) => nodes,
                Err(e) => {
                    ::log::debug!("Skipping logo rule {:?}: {}", rule.selector, e);
                    continue;
                }
            };

            let logo = match rule.tier {
                LogoTier::Raster | LogoTier::Fallback => nodes
                    .into_iter()
                    .find_map(|node| self.image_record(node))
                    .map(Logo::Image),
                LogoTier::Vector => nodes.first().map(|&node| Logo::Svg(self.svg_logo(node))),
            };

            if logo.is_some() {
                ::log::debug!("Logo found by {:?} rule {:?}", rule.tier, rule.selector);
                return logo;
            }
        }

        ::log::debug!("No logo found");
        None
    }

    /// Visible `img[src]` elements, largest first
    pub fn collect_images(&self) -> Result<Vec<ImageRecord>> {
        let mut images = Vec::new();

        for node in self.doc.query_selector_all("img[src]")? {
            if let Some(size) = self.doc.rendered_size(node) {
                if size.is_smaller_than(self.config.min_image_size) {
                    continue;
                }
            }
            if let Some(image) = self.image_record(node) {
                images.push(image);
            }
        }

        images.sort_by(|a, b| b.area().cmp(&a.area()));
        Ok(images)
    }

    /// Inline SVGs as standalone markup
    pub fn collect_svgs(&self) -> Result<Vec<SvgRecord>> {
        let mut svgs = Vec::new();

        for node in self.doc.query_selector_all("svg")? {
            if let Some(size) = self.doc.rendered_size(node) {
                if size.is_smaller_than(self.config.min_svg_size) {
                    continue;
                }
            }
            svgs.push(self.svg_record(node));
        }

        Ok(svgs)
    }

    /// Distinct `url(...)` background images, in document order
    pub fn collect_backgrounds(&self) -> Vec<BackgroundRecord> {
        let mut backgrounds: IndexMap<String, String> = IndexMap::new();

        for node in self.doc.elements() {
            let image = &self.doc.computed_style(node).background_image;
            if image.to_ascii_lowercase().contains("gradient") {
                continue;
            }
            let Some(raw) = BACKGROUND_URL.captures(image).and_then(|c| c.get(1)) else {
                continue;
            };
            let raw = raw.as_str().trim();
            if raw.starts_with("data:") {
                continue;
            }

            match self.doc.location().join(raw) {
                Ok(url) => {
                    backgrounds
                        .entry(url.to_string())
                        .or_insert_with(|| self.element_label(node));
                }
                Err(e) => ::log::debug!("Skipping background {:?}: {}", raw, e),
            }
        }

        backgrounds
            .into_iter()
            .map(|(url, element)| BackgroundRecord { url, element })
            .collect()
    }

    fn image_record(&self, node: NodeId) -> Option<ImageRecord> {
        let src = self.doc.attribute(node, "src")?;
        let src = src.trim();
        if src.is_empty() {
            return None;
        }
        if src.starts_with("data:") && src.len() < self.config.min_data_uri_length {
            ::log::trace!("Skipping placeholder data URI");
            return None;
        }

        let url = match self.doc.location().join(src) {
            Ok(url) => url.to_string(),
            Err(e) => {
                ::log::debug!("Skipping image {:?}: {}", src, e);
                return None;
            }
        };

        let size = self
            .doc
            .natural_size(node)
            .filter(|s| s.width > 0.0 && s.height > 0.0)
            .or_else(|| self.doc.rendered_size(node));

        Some(ImageRecord {
            file_type: file_type(&url),
            url,
            alt: self.doc.attribute(node, "alt").unwrap_or_default(),
            width: size.map(|s| to_pixels(s.width)),
            height: size.map(|s| to_pixels(s.height)),
        })
    }

    fn svg_logo(&self, node: NodeId) -> SvgLogo {
        let svg = self.svg_record(node);
        let url = self.registry.create(
            self.doc.location(),
            Blob::new(SVG_MIME, svg.content.as_bytes()),
        );
        SvgLogo {
            svg,
            url,
            file_type: "svg".to_string(),
        }
    }

    /// Serializes an `<svg>` with a namespace and explicit dimensions
    fn svg_record(&self, node: NodeId) -> SvgRecord {
        let size: Option<Size> = self.doc.rendered_size(node);
        let mut attributes: IndexMap<String, String> =
            self.doc.attributes(node).into_iter().collect();

        let inner = self.doc.inner_html(node);

        if !attributes.contains_key("xmlns") {
            attributes.insert("xmlns".to_string(), SVG_NAMESPACE.to_string());
        }
        // Children may use xlink:href with the prefix declared on an ancestor
        if inner.contains("xlink:") && !attributes.contains_key("xmlns:xlink") {
            attributes.insert("xmlns:xlink".to_string(), XLINK_NAMESPACE.to_string());
        }
        if let Some(size) = size {
            attributes.insert("width".to_string(), to_pixels(size.width).to_string());
            attributes.insert("height".to_string(), to_pixels(size.height).to_string());
        }

        let dimension = |name: &str| {
            attributes
                .get(name)
                .and_then(|v| parse_px(v))
                .map(to_pixels)
        };
        let width = dimension("width");
        let height = dimension("height");

        let mut content = String::from("<svg");
        for (name, value) in &attributes {
            content.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
        }
        content.push('>');
        content.push_str(&inner);
        content.push_str("</svg>");

        SvgRecord {
            width,
            height,
            content,
        }
    }

    /// `#id`, `tag.firstclass` or `tag`
    fn element_label(&self, node: NodeId) -> String {
        if let Some(id) = self.doc.attribute(node, "id").filter(|id| !id.trim().is_empty()) {
            return format!("#{}", id.trim());
        }
        let tag = self.doc.tag_name(node);
        match self.doc.classes(node).first() {
            Some(class) => format!("{}.{}", tag, class),
            None => tag,
        }
    }
}

fn to_pixels(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
