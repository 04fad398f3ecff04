use design_scan::report::{OutputFormat, render};
use design_scan::results::Logo;
use design_scan::{Scan, SourceType};

const LANDING_PAGE: &str = r##"<!doctype html>
<html>
<head>
  <style>
    body { background-color: #FFFDF7; color: #1F2933; font-family: "Source Sans Pro", Helvetica, sans-serif; line-height: 1.5; }
    h1, h2 { font-family: Merriweather, Georgia, serif; color: #102A43; }
    .btn-primary { background-color: #D64545; color: #FFFFFF; }
    .card { background-color: #F0F4F8; border: 1px solid #BCCCDC; }
    .hero { background-image: url("/images/hero.jpg"); }
  </style>
</head>
<body>
  <header>
    <a href="/"><svg class="logo" width="120" height="32" viewBox="0 0 120 32"><rect width="120" height="32" fill="#D64545"/></svg></a>
    <nav><a href="/menu">Menu</a> <a href="/visit">Visit</a></nav>
  </header>
  <section class="hero">
    <h1>Sourdough, every morning</h1>
    <button class="btn-primary">Order now</button>
  </section>
  <main>
    <div class="card">
      <h2>Our bakery</h2>
      <p>Stone-milled flour, long fermentation and a wood-fired oven.</p>
      <img src="/images/oven.jpg" alt="Oven" width="640" height="427">
    </div>
  </main>
</body>
</html>"##;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // Create a Scan builder for an in-memory page
    let scan = Scan::new(SourceType::Html {
        html: LANDING_PAGE.to_string(),
        base_url: "https://bakery.example/".to_string(),
    });

    let outcome = scan.run().await;
    println!("{}", render(&outcome, OutputFormat::Text)?);

    // The SVG logo preview stays registered until it is revoked
    if let Some(Logo::Svg(logo)) = outcome.report().and_then(|r| r.images.logo.as_ref()) {
        println!("Logo preview at {}", logo.url);
        logo.url.clone().revoke(scan.registry());
    }

    Ok(())
}
