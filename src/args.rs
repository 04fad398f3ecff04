use clap::{Parser, ValueEnum};
use design_scan::SourceType;
use design_scan::report::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "design-scan")]
#[command(about = "Extracts the color palette, typography and image assets of a web page")]
#[command(version)]
pub struct Args {
    /// Page to analyze (web URL or path to an HTML file)
    pub uri: String,

    /// Source type (web, file)
    #[arg(short, long = "type", value_enum, default_value_t = SourceTypeArg::Web)]
    pub type_: SourceTypeArg,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Seconds to wait for the page to become ready
    #[arg(long)]
    pub timeout: Option<u64>,

    /// URL relative links in a local file resolve against
    #[arg(long)]
    pub base_url: Option<String>,

    /// Directory to save an inline SVG logo into
    #[arg(long)]
    pub save_logo: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceTypeArg {
    Web,
    File,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Convert from CLI argument source type to internal source type
pub fn convert_source_type(arg_type: SourceTypeArg, uri: &str, base_url: Option<&str>) -> SourceType {
    match arg_type {
        SourceTypeArg::Web => SourceType::Web(uri.to_string()),
        SourceTypeArg::File => SourceType::File {
            path: PathBuf::from(uri),
            base_url: base_url.map(str::to_string),
        },
    }
}
