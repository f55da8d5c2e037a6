//! Vitrina: storefront end-to-end checks over a remote WebDriver grid.
//!
//! Vitrina drives a demo e-commerce site through a remote browser grid
//! (a BrowserStack-style Selenium hub): it logs in, selects a category,
//! favorites a product, and verifies the product appears in the favorites
//! list. One configured capability set (a browser/device/OS combination)
//! becomes one independent scenario run on its own session.
//!
//! Remote UI state is asynchronous and flaky, so the crate leans on two
//! policies everywhere:
//!
//! - **Bounded polling** ([`locator`]): every element lookup polls until
//!   the element is present or a hard timeout ceiling elapses. No fixed
//!   sleeps.
//! - **Resilient activation** ([`activate`]): clicks fall through an
//!   ordered strategy list (native, script-injected, pointer-simulated)
//!   and only exhaustion of all three is a failure.
//!
//! # Example
//!
//! ```ignore
//! use vitrina::{Config, Runner};
//!
//! let config = Config::load("config.yml")?;
//! let runner = Runner::from_config(config);
//! let summary = runner.run_all().await;
//! assert!(summary.all_passed());
//! ```

pub mod activate;
pub mod capabilities;
pub mod config;
pub mod locator;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod session;

pub use activate::{activate, Activation, ClickStrategy, GridTarget};
pub use capabilities::CapabilitySet;
pub use config::{Config, GridCredentials, ShopTargets, TestData};
pub use locator::{
    poll_until, wait_for, wait_for_within, Locator, Selector, WaitOptions,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use result::{VitrinaError, VitrinaResult};
pub use runner::{RunSummary, Runner, ScenarioOutcome};
pub use scenario::{Scenario, Stage};
pub use session::{GridClient, GridSession};
