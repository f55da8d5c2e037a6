//! Locators and bounded waits.
//!
//! Every element lookup in a scenario goes through an explicit bounded wait:
//! the locator is polled at a fixed interval until it yields an element or
//! the timeout ceiling elapses. There are no fixed sleeps anywhere; the
//! ceiling is hard, and expiry raises [`VitrinaError::ElementNotFound`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thirtyfour::{By, WebDriver, WebElement};
use tokio::time::{sleep, Instant};

use crate::result::{VitrinaError, VitrinaResult};

/// Default timeout ceiling for bounded waits (20 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// Default polling interval for bounded waits (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Selector strategy for locating a UI element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Element id attribute
    Id(String),
    /// CSS selector
    Css(String),
    /// XPath selector
    XPath(String),
    /// Class name
    ClassName(String),
    /// Element of `tag` whose text content equals `text` exactly
    ExactText {
        /// Tag name to match (e.g. "span")
        tag: String,
        /// Exact text content
        text: String,
    },
}

impl Selector {
    /// Convert to a WebDriver `By` selector.
    #[must_use]
    pub fn to_by(&self) -> By {
        match self {
            Self::Id(id) => By::Id(id),
            Self::Css(css) => By::Css(css),
            Self::XPath(xpath) => By::XPath(xpath),
            Self::ClassName(class) => By::ClassName(class),
            Self::ExactText { tag, text } => By::XPath(&exact_text_xpath(tag, text)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id={id}"),
            Self::Css(css) => write!(f, "css={css}"),
            Self::XPath(xpath) => write!(f, "xpath={xpath}"),
            Self::ClassName(class) => write!(f, "class={class}"),
            Self::ExactText { tag, text } => write!(f, "{tag}[text='{text}']"),
        }
    }
}

/// XPath for an element with exact text content.
fn exact_text_xpath(tag: &str, text: &str) -> String {
    format!("//{tag}[text()='{text}']")
}

/// Timeout and polling interval for one bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Hard timeout ceiling
    pub timeout: Duration,
    /// Polling interval
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Set the timeout ceiling
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// A locator: a selector plus the wait bounds for looking it up.
///
/// Immutable once built; each lookup call takes its own locator.
#[derive(Debug, Clone)]
pub struct Locator {
    selector: Selector,
    wait: WaitOptions,
}

impl Locator {
    /// Locate by element id
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::Id(id.into()))
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(css: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(css.into()))
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::from_selector(Selector::XPath(xpath.into()))
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::from_selector(Selector::ClassName(class.into()))
    }

    /// Locate by exact text content of a `tag` element
    #[must_use]
    pub fn exact_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::from_selector(Selector::ExactText {
            tag: tag.into(),
            text: text.into(),
        })
    }

    /// Create a locator from a selector with default wait bounds
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            wait: WaitOptions::default(),
        }
    }

    /// Replace the wait bounds
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set a custom timeout ceiling
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.wait.timeout = timeout;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the wait bounds
    #[must_use]
    pub const fn wait(&self) -> &WaitOptions {
        &self.wait
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}

/// Poll a probe until it yields a value or the timeout ceiling elapses.
///
/// The probe is checked immediately, then once per interval. `Ok(None)` from
/// the probe means "not there yet, keep polling"; an error aborts the wait
/// at once. Returns `Ok(None)` when the ceiling elapses without a value;
/// the wait never blocks past `opts.timeout` plus one probe.
///
/// # Errors
///
/// Propagates the first error the probe returns.
pub async fn poll_until<T, F, Fut>(opts: &WaitOptions, mut probe: F) -> VitrinaResult<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = VitrinaResult<Option<T>>>,
{
    let deadline = Instant::now() + opts.timeout;
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        if Instant::now() + opts.interval > deadline {
            return Ok(None);
        }
        sleep(opts.interval).await;
    }
}

/// Wait for a locator to yield an element on the page.
///
/// "Element absent" keeps the poll going; any other protocol failure is a
/// transport error and aborts the wait immediately.
///
/// # Errors
///
/// Returns [`VitrinaError::ElementNotFound`] when the ceiling elapses, or
/// [`VitrinaError::Session`] on a transport failure.
pub async fn wait_for(driver: &WebDriver, locator: &Locator) -> VitrinaResult<WebElement> {
    let found = poll_until(locator.wait(), || {
        let driver = driver.clone();
        let by = locator.selector().to_by();
        async move {
            match driver.find(by).await {
                Ok(element) => Ok(Some(element)),
                Err(err) if is_absent(&err) => Ok(None),
                Err(err) => Err(err.into()),
            }
        }
    })
    .await?;

    found.ok_or_else(|| not_found(locator))
}

/// Wait for a locator to yield an element scoped inside a parent element.
///
/// # Errors
///
/// Same contract as [`wait_for`].
pub async fn wait_for_within(
    parent: &WebElement,
    locator: &Locator,
) -> VitrinaResult<WebElement> {
    let found = poll_until(locator.wait(), || {
        let parent = parent.clone();
        let by = locator.selector().to_by();
        async move {
            match parent.find(by).await {
                Ok(element) => Ok(Some(element)),
                Err(err) if is_absent(&err) => Ok(None),
                Err(err) => Err(err.into()),
            }
        }
    })
    .await?;

    found.ok_or_else(|| not_found(locator))
}

/// Whether a lookup error means "element absent right now" rather than a
/// broken session.
fn is_absent(err: &WebDriverError) -> bool {
    matches!(
        err,
        WebDriverError::NoSuchElement(_) | WebDriverError::StaleElementReference(_)
    )
}

fn not_found(locator: &Locator) -> VitrinaError {
    VitrinaError::ElementNotFound {
        locator: locator.to_string(),
        waited_ms: locator.wait().timeout.as_millis() as u64,
    }
}
