//! Human-readable and JSON rendering of an [`AnalysisOutcome`]

use crate::error::Result;
use crate::results::{
    AnalysisOutcome, AnalysisReport, ImageAnalysis, Logo, TextStyle, TypographyAnalysis,
};
use std::fmt::{self, Display, Formatter};

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders an outcome in the requested format
pub fn render(outcome: &AnalysisOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TextReport(outcome).to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
    }
}

/// Plain-text report: palette, then typography, then images
pub struct TextReport<'a>(pub &'a AnalysisOutcome);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            AnalysisOutcome::Success(report) => write_report(f, report),
            AnalysisOutcome::Failure { error } => writeln!(f, "Analysis failed: {}", error),
        }
    }
}

fn write_report(f: &mut Formatter<'_>, report: &AnalysisReport) -> fmt::Result {
    writeln!(f, "Design scan of {}", report.url)?;
    writeln!(f, "Analyzed at {}", report.timestamp)?;

    writeln!(f)?;
    writeln!(f, "== Color palette ==")?;
    if report.colors.is_empty() {
        writeln!(f, "No colors found.")?;
    }
    for color in &report.colors {
        writeln!(
            f,
            "  {}  {:<10}  weight {:>5}  ({})",
            color.hex,
            color.category.label(),
            color.weight,
            color.sources.join(", ")
        )?;
    }

    writeln!(f)?;
    writeln!(f, "== Typography ==")?;
    write_typography(f, &report.typography)?;

    writeln!(f)?;
    writeln!(f, "== Images ==")?;
    write_images(f, &report.images)
}

fn write_typography(f: &mut Formatter<'_>, typography: &TypographyAnalysis) -> fmt::Result {
    if typography.font_families.is_empty() {
        writeln!(f, "No font families found.")?;
    } else {
        writeln!(f, "Font families:")?;
        for font in &typography.font_families {
            writeln!(f, "  {:>3}%  {}", font.usage, font.name)?;
        }
    }

    match &typography.headings {
        Some(headings) => {
            writeln!(f, "Headings:")?;
            for (tag, heading) in headings {
                writeln!(
                    f,
                    "  {}  {}  \"{}\"",
                    tag,
                    TextStyleLine(&heading.style),
                    heading.sample
                )?;
            }
        }
        None => writeln!(f, "No headings found.")?,
    }

    writeln!(f, "Body: {}", TextStyleLine(&typography.body))
}

struct TextStyleLine<'a>(&'a TextStyle);

impl Display for TextStyleLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let style = self.0;
        write!(
            f,
            "{} {}/{} line-height {}",
            style.font_family, style.font_size, style.font_weight, style.line_height
        )?;
        if let Some(color) = &style.color {
            write!(f, " {}", color)?;
        }
        Ok(())
    }
}

fn write_images(f: &mut Formatter<'_>, images: &ImageAnalysis) -> fmt::Result {
    match &images.logo {
        Some(Logo::Image(image)) => writeln!(f, "Logo: {} ({})", image.url, image.file_type)?,
        Some(Logo::Svg(svg)) => writeln!(
            f,
            "Logo: inline SVG {} ({} bytes)",
            svg.url,
            svg.svg.content.len()
        )?,
        None => writeln!(f, "No logo found.")?,
    }

    if images.all.is_empty() {
        writeln!(f, "No images found.")?;
    } else {
        writeln!(f, "Images ({}):", images.all.len())?;
        for image in &images.all {
            writeln!(
                f,
                "  {}  {}  {}{}",
                image.url,
                dimensions(image.width, image.height),
                image.file_type,
                if image.alt.is_empty() {
                    String::new()
                } else {
                    format!("  \"{}\"", image.alt)
                }
            )?;
        }
    }

    if images.svgs.is_empty() {
        writeln!(f, "No inline SVGs found.")?;
    } else {
        writeln!(f, "Inline SVGs ({}):", images.svgs.len())?;
        for svg in &images.svgs {
            writeln!(
                f,
                "  {}  {} bytes",
                dimensions(svg.width, svg.height),
                svg.content.len()
            )?;
        }
    }

    if images.backgrounds.is_empty() {
        writeln!(f, "No background images found.")
    } else {
        writeln!(f, "Background images ({}):", images.backgrounds.len())?;
        for background in &images.backgrounds {
            writeln!(f, "  {}  on {}", background.url, background.element)?;
        }
        Ok(())
    }
}

fn dimensions(width: Option<u32>, height: Option<u32>) -> String {
    match (width, height) {
        (Some(w), Some(h)) => format!("{}x{}", w, h),
        _ => "?x?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ColorCategory, ColorRecord, FontUsage, ImageRecord};

    fn empty_report() -> AnalysisReport {
        AnalysisReport {
            url: "https://example.com/".to_string(),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
            colors: Vec::new(),
            typography: TypographyAnalysis::default(),
            images: ImageAnalysis::default(),
        }
    }

    #[test]
    fn test_empty_sections_say_so() {
        let outcome = AnalysisOutcome::Success(Box::new(empty_report()));
        let text = render(&outcome, OutputFormat::Text).unwrap();

        for line in [
            "No colors found.",
            "No font families found.",
            "No headings found.",
            "No logo found.",
            "No images found.",
            "No inline SVGs found.",
            "No background images found.",
        ] {
            assert!(text.contains(line), "missing {:?} in\n{}", line, text);
        }
    }

    #[test]
    fn test_sections_in_order() {
        let mut report = empty_report();
        report.colors.push(ColorRecord {
            hex: "#3366FF".to_string(),
            category: ColorCategory::Primary,
            weight: 100,
            sources: vec!["button".to_string()],
        });
        report.typography.font_families.push(FontUsage {
            name: "Inter".to_string(),
            usage: 80,
        });
        report.images.all.push(ImageRecord {
            url: "https://example.com/a.png".to_string(),
            alt: "A".to_string(),
            width: Some(20),
            height: Some(10),
            file_type: "png".to_string(),
        });

        let text = TextReport(&AnalysisOutcome::Success(Box::new(report))).to_string();
        let palette = text.find("== Color palette ==").unwrap();
        let typography = text.find("== Typography ==").unwrap();
        let images = text.find("== Images ==").unwrap();

        assert!(palette < typography && typography < images);
        assert!(text.contains("#3366FF  primary"));
        assert!(text.contains(" 80%  Inter"));
        assert!(text.contains("https://example.com/a.png  20x10  png  \"A\""));
    }

    #[test]
    fn test_failure() {
        let outcome = AnalysisOutcome::failure("page was not ready for analysis within 30s");
        assert_eq!(
            render(&outcome, OutputFormat::Text).unwrap(),
            "Analysis failed: page was not ready for analysis within 30s\n"
        );

        let json = render(&outcome, OutputFormat::Json).unwrap();
        assert!(json.contains("\"error\""));
    }
}
