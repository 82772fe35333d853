//! # Headless Browser
//!
//! Everything that touches Chrome/Chromium lives here: making sure an
//! executable is available, launching it with the flags the rules page
//! needs, and running the inline extraction script once the prize table has
//! rendered.
//!
//! ## Executable resolution
//!
//! 1. An explicit path (`--chrome-path` / `CHROME_PATH`). It must exist.
//! 2. A Chrome or Chromium installed on the system.
//! 3. A Chromium build fetched into the browser directory (`browser/` by
//!    default). The download happens on first launch and is reused by
//!    later runs.
//!
//! All calls in this module block; async callers go through
//! `tokio::task::spawn_blocking`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use headless_chrome::browser::{FetcherOptions, default_executable};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::ScrapeError;
use crate::models::RawPrizeItem;
use crate::traits::{ScraperConfig, SiteSelectors};

/// Flags passed to every launch on top of the library defaults.
const LAUNCH_FLAGS: [&str; 3] = [
    "--disable-gpu",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
];

const VISIBILITY_POLL: Duration = Duration::from_millis(250);

/// Where and how to run the browser
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Download location for a fetched Chromium
    pub browser_dir: PathBuf,
    /// Explicit executable, bypasses discovery
    pub chrome_path: Option<PathBuf>,
    /// Run without a window
    pub headless: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            browser_dir: PathBuf::from("browser"),
            chrome_path: None,
            headless: true,
        }
    }
}

/// The executable a session will launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserBinary {
    Explicit(PathBuf),
    System(PathBuf),
    /// Resolved at launch time; downloaded into `install_dir` if not there yet
    Fetched { install_dir: PathBuf },
}

impl BrowserBinary {
    pub fn executable(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::System(path) => Some(path),
            Self::Fetched { .. } => None,
        }
    }
}

/// Make sure there is a browser to launch.
///
/// Creates the browser directory when missing, then resolves the executable
/// as described in the module docs.
pub fn setup_browser(settings: &BrowserSettings) -> Result<BrowserBinary> {
    info!("Checking browser");

    std::fs::create_dir_all(&settings.browser_dir).with_context(|| {
        format!(
            "Failed to create browser directory {}",
            settings.browser_dir.display()
        )
    })?;

    if let Some(path) = &settings.chrome_path {
        if !path.is_file() {
            return Err(ScrapeError::ExecutableMissing(path.clone()).into());
        }
        info!("Using browser: {}", path.display());
        return Ok(BrowserBinary::Explicit(path.clone()));
    }

    match default_executable() {
        Ok(path) => {
            info!("Using browser: {}", path.display());
            Ok(BrowserBinary::System(path))
        }
        Err(reason) => {
            info!(
                "No system browser ({reason}), Chromium will be fetched into {}",
                settings.browser_dir.display()
            );
            Ok(BrowserBinary::Fetched {
                install_dir: settings.browser_dir.clone(),
            })
        }
    }
}

/// A running browser process; dropped sessions kill the process
pub struct BrowserSession {
    browser: Browser,
}

impl BrowserSession {
    pub fn launch(
        binary: &BrowserBinary,
        config: &ScraperConfig,
        settings: &BrowserSettings,
        idle_timeout: Duration,
    ) -> Result<Self> {
        let user_agent = OsString::from(format!("--user-agent={}", config.user_agent));
        let mut args: Vec<&OsStr> = LAUNCH_FLAGS.iter().map(OsStr::new).collect();
        args.push(user_agent.as_os_str());

        let install_dir = match binary {
            BrowserBinary::Fetched { install_dir } => install_dir.clone(),
            _ => settings.browser_dir.clone(),
        };

        let options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .sandbox(false)
            .path(binary.executable().map(Path::to_path_buf))
            .args(args)
            .idle_browser_timeout(idle_timeout)
            .fetcher_options(FetcherOptions::default().with_install_dir(Some(install_dir)))
            .build()
            .map_err(|e| anyhow!("Invalid browser launch options: {e}"))?;

        debug!("Launching browser (headless: {})", settings.headless);
        let browser = Browser::new(options).context("Failed to launch browser")?;

        Ok(Self { browser })
    }

    /// Navigate to `url`, wait for the table and pull its rows out.
    pub fn scrape(
        &self,
        url: &str,
        selectors: &SiteSelectors,
        timeout: Duration,
    ) -> Result<Vec<RawPrizeItem>> {
        let tab = self.browser.new_tab().context("Failed to open a browser tab")?;
        tab.set_default_timeout(timeout);

        info!("Navigating to {url}");
        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?
            .wait_until_navigated()
            .with_context(|| format!("Page {url} did not finish loading"))?;

        debug!("Waiting for `{}`", selectors.ready);
        let started = Instant::now();
        tab.wait_for_element_with_custom_timeout(&selectors.ready, timeout)
            .with_context(|| format!("Prize table `{}` never appeared", selectors.ready))?;
        wait_until_visible(&tab, &selectors.ready, timeout.saturating_sub(started.elapsed()))?;

        let result = tab
            .evaluate(&extraction_script(selectors), false)
            .context("Extraction script failed")?;

        let value = result.value.ok_or(ScrapeError::EmptyEvaluation)?;
        decode_items(value)
    }
}

fn wait_until_visible(tab: &Tab, selector: &str, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let script = visibility_script(selector);

    loop {
        let visible = tab
            .evaluate(&script, false)
            .context("Visibility check failed")?
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        if visible {
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("Prize table `{selector}` is in the page but never became visible");
        }
        std::thread::sleep(VISIBILITY_POLL);
    }
}

fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Inline check that the first match of `selector` has a rendered box and
/// is not hidden by style.
pub fn visibility_script(selector: &str) -> String {
    let selector = js_string(selector);

    format!(
        r#"(() => {{
    const el = document.querySelector({selector});
    if (!el) return false;
    const style = window.getComputedStyle(el);
    if (style.visibility === "hidden" || style.display === "none") return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
}})()"#
    )
}

/// Inline script mapping every row node to `{prize, move}`.
///
/// The result is returned as JSON text because the protocol hands back
/// arrays by reference rather than by value.
pub fn extraction_script(selectors: &SiteSelectors) -> String {
    let row = js_string(&selectors.row);
    let prize = js_string(&selectors.prize);
    let move_number = js_string(&selectors.move_number);

    format!(
        r#"JSON.stringify(Array.from(document.querySelectorAll({row})).map(el => {{
    const prize = el.querySelector({prize})?.innerText || "";
    const move = el.querySelector({move_number})?.innerText || "";
    return {{ prize, move }};
}}))"#
    )
}

/// Decode what the extraction script returned, either JSON text or an
/// already structured array.
pub fn decode_items(value: Value) -> Result<Vec<RawPrizeItem>> {
    let items: Vec<RawPrizeItem> = match value {
        Value::Null => return Err(ScrapeError::EmptyEvaluation.into()),
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|e| ScrapeError::UnexpectedResult(e.to_string()))?,
        value @ Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| ScrapeError::UnexpectedResult(e.to_string()))?,
        other => {
            return Err(ScrapeError::UnexpectedResult(format!("expected an array, got {other}")).into());
        }
    };

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_embeds_escaped_selectors() {
        let selectors = SiteSelectors {
            row: r#"div[data-kind="row"]"#.to_string(),
            ..SiteSelectors::default()
        };

        let script = extraction_script(&selectors);

        assert!(script.starts_with("JSON.stringify("));
        assert!(script.contains(r#"document.querySelectorAll("div[data-kind=\"row\"]")"#));
        assert!(script.contains(r#"el.querySelector(".bzquVz")?.innerText || """#));
        assert!(script.contains(r#"el.querySelector(".jMNgrd")?.innerText || """#));
        assert!(script.contains("return { prize, move };"));
    }

    #[test]
    fn visibility_check_targets_ready_selector() {
        let script = visibility_script(".LQnNN");

        assert!(script.contains(r#"document.querySelector(".LQnNN")"#));
        assert!(script.contains("getBoundingClientRect()"));
        assert!(script.contains(r#"style.display === "none""#));
        assert!(script.trim_end().ends_with("})()"));
    }

    #[test]
    fn decodes_json_text() {
        let value = Value::String(r#"[{"prize":"100 ₽","move":"7"},{"prize":"","move":""}]"#.to_string());

        let items = decode_items(value).unwrap();

        assert_eq!(items, vec![RawPrizeItem::new("7", "100 ₽"), RawPrizeItem::default()]);
    }

    #[test]
    fn decodes_structured_array() {
        let items = decode_items(json!([{ "prize": "5 ₽", "move": "40" }])).unwrap();
        assert_eq!(items, vec![RawPrizeItem::new("40", "5 ₽")]);
    }

    #[test]
    fn rejects_null_and_scalars() {
        let err = decode_items(Value::Null).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::EmptyEvaluation)));

        let err = decode_items(json!(42)).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::UnexpectedResult(_))));

        let err = decode_items(Value::String("not json".into())).unwrap_err();
        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::UnexpectedResult(_))));
    }

    #[test]
    fn explicit_executable_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BrowserSettings {
            browser_dir: dir.path().join("browser"),
            chrome_path: Some(dir.path().join("no-such-chrome")),
            headless: true,
        };

        let err = setup_browser(&settings).unwrap_err();

        assert!(matches!(err.downcast_ref::<ScrapeError>(), Some(ScrapeError::ExecutableMissing(_))));
        assert!(settings.browser_dir.is_dir());
    }

    #[test]
    fn explicit_executable_wins() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = dir.path().join("chrome");
        std::fs::write(&chrome, b"").unwrap();

        let settings = BrowserSettings {
            browser_dir: dir.path().join("browser"),
            chrome_path: Some(chrome.clone()),
            headless: true,
        };

        let binary = setup_browser(&settings).unwrap();

        assert_eq!(binary, BrowserBinary::Explicit(chrome.clone()));
        assert_eq!(binary.executable(), Some(chrome.as_path()));
    }

    #[test]
    fn fetched_binary_has_no_executable_yet() {
        let binary = BrowserBinary::Fetched {
            install_dir: PathBuf::from("browser"),
        };
        assert_eq!(binary.executable(), None);
    }
}
