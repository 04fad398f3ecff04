use crate::blob::ObjectUrl;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Palette role a color was classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorCategory {
    Primary,
    Accent,
    Background,
    Foreground,
    Border,
}

impl ColorCategory {
    /// Categories from highest to lowest priority
    pub const PRIORITY: [ColorCategory; 5] = [
        ColorCategory::Primary,
        ColorCategory::Accent,
        ColorCategory::Background,
        ColorCategory::Foreground,
        ColorCategory::Border,
    ];

    /// Position in [`ColorCategory::PRIORITY`]
    pub fn index(self) -> usize {
        match self {
            ColorCategory::Primary => 0,
            ColorCategory::Accent => 1,
            ColorCategory::Background => 2,
            ColorCategory::Foreground => 3,
            ColorCategory::Border => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorCategory::Primary => "primary",
            ColorCategory::Accent => "accent",
            ColorCategory::Background => "background",
            ColorCategory::Foreground => "foreground",
            ColorCategory::Border => "border",
        }
    }
}

/// A palette entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    /// `#RRGGBB`, uppercase
    pub hex: String,
    pub category: ColorCategory,
    /// Accumulated confidence
    pub weight: u32,
    /// Where the color was seen, most significant first
    pub sources: Vec<String>,
}

/// Share of text elements rendered in a font family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontUsage {
    pub name: String,
    /// Percentage of text-bearing elements, 0-100
    pub usage: u32,
}

/// Text style of a single sampled element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    /// Unitless ratio such as `1.50`
    pub line_height: String,
    pub color: Option<String>,
}

/// Text style of the first heading of a level, with an excerpt of its text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingStyle {
    #[serde(flatten)]
    pub style: TextStyle,
    pub sample: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyAnalysis {
    pub font_families: Vec<FontUsage>,
    /// Keyed by tag name (`h1`..`h6`); `None` when the page has no headings
    pub headings: Option<BTreeMap<String, HeadingStyle>>,
    pub body: TextStyle,
}

/// A raster image referenced by an `<img>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Absolute URL
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// File extension token, or `unknown`
    #[serde(rename = "type")]
    pub file_type: String,
}

impl ImageRecord {
    /// Pixel area, unknown dimensions counting as 0
    pub fn area(&self) -> u64 {
        u64::from(self.width.unwrap_or(0)) * u64::from(self.height.unwrap_or(0))
    }
}

/// An inline `<svg>` element serialized to standalone markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgRecord {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub content: String,
}

/// An inline SVG logo, also exposed through an object URL for previewing.
///
/// The URL stays registered until the consumer revokes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgLogo {
    #[serde(flatten)]
    pub svg: SvgRecord,
    pub url: ObjectUrl,
    #[serde(rename = "type")]
    pub file_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Logo {
    Image(ImageRecord),
    Svg(SvgLogo),
}

impl Logo {
    /// URL a viewer can load the logo from
    pub fn url(&self) -> &str {
        match self {
            Logo::Image(image) => &image.url,
            Logo::Svg(svg) => svg.url.as_str(),
        }
    }
}

/// A CSS background image and the element it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundRecord {
    /// Absolute URL
    pub url: String,
    /// Short selector-like label of the owning element, not necessarily unique
    pub element: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub logo: Option<Logo>,
    pub all: Vec<ImageRecord>,
    pub svgs: Vec<SvgRecord>,
    pub backgrounds: Vec<BackgroundRecord>,
}

/// Everything one analysis run found on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    /// ISO-8601 UTC time the analysis finished
    pub timestamp: String,
    pub colors: Vec<ColorRecord>,
    pub typography: TypographyAnalysis,
    pub images: ImageAnalysis,
}

/// Result envelope handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(Box<AnalysisReport>),
    Failure { error: String },
}

impl AnalysisOutcome {
    pub fn failure(error: impl Into<String>) -> Self {
        AnalysisOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Success(report) => Some(report),
            AnalysisOutcome::Failure { .. } => None,
        }
    }
}
