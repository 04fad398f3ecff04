use clap::Parser;
use design_scan::report::{OutputFormat, render};
use design_scan::{Scan, ScanConfig, SourceType};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page URL to scan
    url: String,

    /// Path to scan configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the readiness timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Override the maximum number of palette colors
    #[arg(short, long)]
    max_colors: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from file, or start from the defaults
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_file(path)?,
        None => ScanConfig::default(),
    };

    // Apply command line overrides
    if let Some(timeout) = args.timeout {
        config.ready_timeout_secs = timeout;
    }
    if let Some(max_colors) = args.max_colors {
        config.analyzer.color.max_colors = max_colors;
    }

    println!("Scan configuration:");
    println!("  WebDriver URL: {}", config.webdriver_url);
    println!("  Ready timeout: {} seconds", config.ready_timeout_secs);
    println!("  Max colors: {}", config.analyzer.color.max_colors);
    println!("  Max fonts: {}", config.analyzer.typography.max_fonts);

    let scan = Scan::new(SourceType::Web(args.url.clone())).with_config(config);
    let outcome = scan.run().await;

    println!("{}", render(&outcome, OutputFormat::Json)?);

    // Release any logo preview before exiting
    if let Some(design_scan::results::Logo::Svg(logo)) =
        outcome.report().and_then(|r| r.images.logo.as_ref())
    {
        logo.url.clone().revoke(scan.registry());
    }

    if !outcome.is_success() {
        return Err(format!("scan of {} failed", args.url).into());
    }
    Ok(())
}
