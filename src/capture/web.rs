use crate::capture::{PageSnapshot, SNAPSHOT_SCRIPT};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tokio::time::{Duration, timeout};

/// Script polled until the page has finished loading
const READY_PROBE: &str = "return document.readyState === 'complete';";

/// Common WebDriver endpoints tried when the configured one refuses a session
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Loads `url` in a WebDriver-controlled browser and captures a snapshot of
/// the rendered document once it reports itself ready.
///
/// The session is closed whether or not the capture succeeds.
pub async fn capture(url: &str, config: &ScanConfig) -> Result<PageSnapshot> {
    ::log::info!("Capturing {} through WebDriver", url);
    let started = std::time::Instant::now();

    let client = connect_to_webdriver(&config.webdriver_url, config.headless).await?;
    let result = capture_with(&client, url, config).await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close WebDriver session: {}", e);
    }

    if let Ok(snapshot) = &result {
        ::log::info!(
            "Captured {} elements and {} style rules from {} in {:.2} seconds",
            snapshot.nodes.len(),
            snapshot.rules.len(),
            snapshot.url,
            started.elapsed().as_secs_f64()
        );
    }
    result
}

async fn capture_with(client: &Client, url: &str, config: &ScanConfig) -> Result<PageSnapshot> {
    client
        .goto(url)
        .await
        .map_err(|e| handle_command_error(e, "navigating", url))?;

    wait_until_ready(client, config).await?;

    let value = client
        .execute(SNAPSHOT_SCRIPT, Vec::new())
        .await
        .map_err(|e| handle_command_error(e, "capturing", url))?;

    serde_json::from_value(value).map_err(|e| ScanError::Snapshot(e.to_string()))
}

/// Polls the document's ready state until it completes or the configured
/// ceiling expires
async fn wait_until_ready(client: &Client, config: &ScanConfig) -> Result<()> {
    let limit = Duration::from_secs(config.ready_timeout_secs);
    let interval = Duration::from_millis(config.poll_interval_ms.max(10));

    let probe = async {
        loop {
            let ready = client
                .execute(READY_PROBE, Vec::new())
                .await
                .map_err(|e| ScanError::command("probing document readiness", e))?;
            if ready.as_bool().unwrap_or(false) {
                return Ok::<(), ScanError>(());
            }
            ::log::trace!("Document not ready, polling again in {:?}", interval);
            tokio::time::sleep(interval).await;
        }
    };

    match timeout(limit, probe).await {
        Ok(result) => result,
        Err(_) => {
            ::log::error!("Page did not become ready within {:?}", limit);
            Err(ScanError::Timeout(limit))
        }
    }
}

/// Connects to the WebDriver instance, trying common endpoints if the
/// configured one is unavailable
async fn connect_to_webdriver(webdriver_url: &str, headless: bool) -> Result<Client> {
    match new_session(webdriver_url, headless).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    for url in FALLBACK_WEBDRIVER_URLS {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = new_session(url, headless).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScanError::WebDriverConnect {
        url: webdriver_url.to_string(),
    })
}

async fn new_session(
    webdriver_url: &str,
    headless: bool,
) -> std::result::Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    if headless {
        let capabilities = json!({
            "goog:chromeOptions": { "args": ["--headless=new", "--disable-gpu"] },
            "moz:firefoxOptions": { "args": ["-headless"] },
        });
        if let serde_json::Value::Object(map) = capabilities {
            builder.capabilities(map);
        }
    }
    builder.connect(webdriver_url).await
}

/// Logs a failed WebDriver command and wraps it with what was being attempted
fn handle_command_error(
    error: fantoccini::error::CmdError,
    context: &str,
    url: &str,
) -> ScanError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, url);
    } else {
        ::log::error!("Failed while {} {}: {}", context, url, error);
    }
    ScanError::command(format!("{context} {url}"), error)
}
