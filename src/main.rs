use clap::Parser;
use design_scan::report::render;
use design_scan::results::{AnalysisOutcome, Logo, SvgLogo};
use design_scan::utils::sanitize_filename;
use design_scan::{Scan, SourceType};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod args;
use args::{Args, convert_source_type};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting design scan for URI: {}", args.uri);

    let source = convert_source_type(args.type_, &args.uri, args.base_url.as_deref());

    // Web pages are rendered by a real browser
    if let SourceType::Web(_) = &source {
        eprintln!("Note: Web pages are captured through a WebDriver server (e.g., ChromeDriver).");
        eprintln!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let mut scan = Scan::new(source);
    if let Some(path) = &args.config {
        scan = match scan.with_config_file(path) {
            Ok(scan) => scan,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                eprintln!("Error: could not load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
    }
    if let Some(url) = &args.webdriver_url {
        scan = scan.with_webdriver_url(url);
    }
    if let Some(timeout) = args.timeout {
        scan = scan.with_ready_timeout(timeout);
    }

    let start_time = std::time::Instant::now();
    let outcome = scan.run().await;
    ::log::info!(
        "Scan finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    let status = match emit_report(&outcome, &args) {
        Ok(()) if outcome.is_success() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            ::log::error!("Failed to write report: {}", e);
            eprintln!("Error: could not write report: {}", e);
            ExitCode::FAILURE
        }
    };

    // The preview URL is only needed while the report is produced
    if let Some(Logo::Svg(logo)) = outcome.report().and_then(|r| r.images.logo.as_ref()) {
        if let Some(dir) = &args.save_logo {
            match save_logo(logo, &outcome, dir, &scan) {
                Ok(path) => eprintln!("Saved logo to {}", path.display()),
                Err(e) => {
                    ::log::error!("Failed to save logo: {}", e);
                    eprintln!("Error: could not save logo: {}", e);
                }
            }
        }
        logo.url.clone().revoke(scan.registry());
    } else if args.save_logo.is_some() {
        eprintln!("No inline SVG logo to save.");
    }

    status
}

fn emit_report(outcome: &AnalysisOutcome, args: &Args) -> design_scan::Result<()> {
    let rendered = render(outcome, args.format.into())?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            ::log::info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Writes the SVG behind the logo's object URL into `dir`
fn save_logo(
    logo: &SvgLogo,
    outcome: &AnalysisOutcome,
    dir: &Path,
    scan: &Scan,
) -> design_scan::Result<PathBuf> {
    let blob = scan.registry().resolve(logo.url.as_str()).ok_or_else(|| {
        design_scan::ScanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is no longer registered", logo.url),
        ))
    })?;

    let page_url = outcome.report().map(|r| r.url.as_str()).unwrap_or_default();
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}-logo.svg", sanitize_filename(page_url)));
    std::fs::write(&path, blob.data)?;
    Ok(path)
}
