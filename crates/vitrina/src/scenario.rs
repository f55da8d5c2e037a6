//! The storefront scenario: log in, pick a category, favorite a product,
//! verify it shows up in the favorites list.
//!
//! One scenario is a linear state machine. [`Stage`] is the tagged
//! enumeration of its states; [`Scenario::run`] walks the transition chain
//! and stops at the first stage that fails. A failure wraps into
//! [`VitrinaError::StageFailed`] with the last known page URL, and the run
//! never retries a stage. The session and test data are passed in
//! explicitly; there is no state beyond the machine itself.

use std::fmt;
use std::time::Duration;

use thirtyfour::{Key, WebDriver, WebElement};
use tracing::info;

use crate::activate::{activate, GridTarget};
use crate::config::{ShopTargets, TestData};
use crate::locator::{wait_for, wait_for_within, Locator, WaitOptions};
use crate::result::{VitrinaError, VitrinaResult};

/// Ceiling for the submit-control lookup, shorter than the stage waits
const SUBMIT_WAIT: Duration = Duration::from_secs(5);

/// States of one scenario run, in transition order.
///
/// Failure is terminal from any state and is carried by the `Result` of
/// [`Scenario::run`], tagged with the stage that was being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Session acquired, nothing driven yet
    NotStarted,
    /// Login flow completed, post-login marker observed
    LoggedIn,
    /// Category label activated
    CategorySelected,
    /// Product favorite toggle activated
    Favorited,
    /// Product observed inside the favorites list
    Verified,
}

impl Stage {
    /// Short name for log lines and failure messages
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::LoggedIn => "logged-in",
            Self::CategorySelected => "category-selected",
            Self::Favorited => "favorited",
            Self::Verified => "verified",
        }
    }

    /// The stage after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::LoggedIn),
            Self::LoggedIn => Some(Self::CategorySelected),
            Self::CategorySelected => Some(Self::Favorited),
            Self::Favorited => Some(Self::Verified),
            Self::Verified => None,
        }
    }

    /// Whether this is the terminal success state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drives one storefront scenario over a live session.
pub struct Scenario {
    driver: WebDriver,
    data: TestData,
    shop: ShopTargets,
    waits: WaitOptions,
    stage: Stage,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("url", &self.data.url)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario over an acquired session.
    #[must_use]
    pub fn new(driver: WebDriver, data: TestData, shop: ShopTargets) -> Self {
        Self {
            driver,
            data,
            shop,
            waits: WaitOptions::default(),
            stage: Stage::NotStarted,
        }
    }

    /// Replace the wait bounds used by every lookup.
    #[must_use]
    pub const fn with_waits(mut self, waits: WaitOptions) -> Self {
        self.waits = waits;
        self
    }

    /// The stage the scenario has reached so far.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the scenario to completion.
    ///
    /// Walks the stage chain in order; the first failing stage terminates
    /// the run. The session is left open either way; releasing it is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::StageFailed`] tagging the stage that was
    /// being attempted, with the last known page URL.
    pub async fn run(&mut self) -> VitrinaResult<()> {
        while let Some(target) = self.stage.next() {
            info!(stage = target.name(), "stage starting");
            match self.perform(target).await {
                Ok(()) => {
                    self.stage = target;
                    info!(stage = target.name(), "stage complete");
                }
                Err(err) => {
                    let url = self.page_url().await;
                    return Err(err.at_stage(target, url));
                }
            }
        }
        Ok(())
    }

    async fn perform(&self, target: Stage) -> VitrinaResult<()> {
        match target {
            Stage::NotStarted => Ok(()),
            Stage::LoggedIn => self.login().await,
            Stage::CategorySelected => self.select_category().await,
            Stage::Favorited => self.favorite().await,
            Stage::Verified => self.verify().await,
        }
    }

    /// Open the storefront and complete the login flow.
    async fn login(&self) -> VitrinaResult<()> {
        self.driver.goto(&self.data.url).await?;
        info!(url = %self.data.url, "storefront opened");

        let username = wait_for(&self.driver, &self.sel(locators::username_input())).await?;
        self.pick_option(&username, &self.data.username).await?;

        let password = wait_for(&self.driver, &self.sel(locators::password_input())).await?;
        self.pick_option(&password, &self.data.password).await?;

        // the form first, then the submit control inside a shorter window
        wait_for(&self.driver, &self.sel(locators::login_form())).await?;
        let submit_locator = self
            .sel(locators::login_button())
            .with_timeout(SUBMIT_WAIT);
        let submit = wait_for(&self.driver, &submit_locator).await?;
        activate(&GridTarget::new(
            &self.driver,
            &submit,
            submit_locator.to_string(),
        ))
        .await?;

        wait_for(&self.driver, &self.sel(locators::login_marker())).await?;
        info!(user = %self.data.username, "login complete");
        Ok(())
    }

    /// Activate the configured category label.
    async fn select_category(&self) -> VitrinaResult<()> {
        let locator = self.sel(locators::category_label(&self.shop));
        let label = wait_for(&self.driver, &locator).await?;
        activate(&GridTarget::new(&self.driver, &label, locator.to_string())).await?;
        info!(category = %self.shop.category, "category selected");
        Ok(())
    }

    /// Find the product container and activate its favorite toggle.
    async fn favorite(&self) -> VitrinaResult<()> {
        let container =
            wait_for(&self.driver, &self.sel(locators::product_container(&self.shop))).await?;

        let toggle_locator = self.sel(locators::favorite_toggle());
        let toggle = wait_for_within(&container, &toggle_locator).await?;
        activate(&GridTarget::new(
            &self.driver,
            &toggle,
            toggle_locator.to_string(),
        ))
        .await?;

        info!(product = %self.shop.product_name, "product favorited");
        Ok(())
    }

    /// Open the favorites view and confirm the product is listed.
    async fn verify(&self) -> VitrinaResult<()> {
        let nav_locator = self.sel(locators::favorites_nav());
        let nav = wait_for(&self.driver, &nav_locator).await?;
        activate(&GridTarget::new(&self.driver, &nav, nav_locator.to_string())).await?;

        wait_for(&self.driver, &self.sel(locators::favorited_entry(&self.shop))).await?;
        info!(product = %self.shop.product_name, "product present in favorites");
        Ok(())
    }

    /// Move onto a type-ahead control, type, and confirm with Enter.
    async fn pick_option(&self, input: &WebElement, text: &str) -> VitrinaResult<()> {
        self.driver
            .action_chain()
            .move_to_element_center(input)
            .click()
            .perform()
            .await?;
        input.send_keys(text).await?;
        input.send_keys(Key::Enter).await?;
        Ok(())
    }

    fn sel(&self, locator: Locator) -> Locator {
        locator.with_wait(self.waits)
    }

    /// Best-effort current page URL for failure messages.
    async fn page_url(&self) -> String {
        self.driver
            .current_url()
            .await
            .map_or_else(|_| "<unknown>".to_string(), |url| url.to_string())
    }
}

/// The storefront's element locators.
///
/// The login controls are react-select type-aheads, hence the generated
/// input ids; the favorite toggle is the first button of the product tile.
pub(crate) mod locators {
    use crate::config::ShopTargets;
    use crate::locator::Locator;

    pub(crate) fn username_input() -> Locator {
        Locator::id("react-select-2-input")
    }

    pub(crate) fn password_input() -> Locator {
        Locator::id("react-select-3-input")
    }

    pub(crate) fn login_form() -> Locator {
        Locator::css("form")
    }

    pub(crate) fn login_button() -> Locator {
        Locator::id("login-btn")
    }

    pub(crate) fn login_marker() -> Locator {
        Locator::class_name("username")
    }

    pub(crate) fn category_label(shop: &ShopTargets) -> Locator {
        Locator::exact_text("span", &shop.category)
    }

    pub(crate) fn product_container(shop: &ShopTargets) -> Locator {
        Locator::id(&shop.product_id)
    }

    /// Relative to the product container.
    pub(crate) fn favorite_toggle() -> Locator {
        Locator::xpath("./div[1]/button")
    }

    pub(crate) fn favorites_nav() -> Locator {
        Locator::id("favourites")
    }

    /// The product present as a member of the favorited list-item class.
    pub(crate) fn favorited_entry(shop: &ShopTargets) -> Locator {
        Locator::xpath(format!(
            "//*[@id=\"{}\" and @class=\"shelf-item\"]",
            shop.product_id
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod stage_tests {
        use super::*;

        #[test]
        fn test_transition_chain_is_linear() {
            let mut walked = Vec::new();
            let mut stage = Stage::NotStarted;
            while let Some(next) = stage.next() {
                walked.push(next);
                stage = next;
            }

            assert_eq!(
                walked,
                vec![
                    Stage::LoggedIn,
                    Stage::CategorySelected,
                    Stage::Favorited,
                    Stage::Verified
                ]
            );
        }

        #[test]
        fn test_verified_is_terminal() {
            assert!(Stage::Verified.is_terminal());
            assert_eq!(Stage::Verified.next(), None);
            assert!(!Stage::Favorited.is_terminal());
        }

        #[test]
        fn test_names() {
            assert_eq!(Stage::NotStarted.name(), "not-started");
            assert_eq!(Stage::LoggedIn.to_string(), "logged-in");
            assert_eq!(Stage::Verified.name(), "verified");
        }
    }

    mod failure_tagging {
        use super::*;

        #[test]
        fn test_login_failure_is_tagged_with_the_attempted_stage() {
            let err = VitrinaError::ElementNotFound {
                locator: "id=react-select-3-input".to_string(),
                waited_ms: 20_000,
            }
            .at_stage(Stage::LoggedIn, "https://demo.site/signin");

            assert_eq!(err.failed_stage(), Some(Stage::LoggedIn));
            let msg = err.to_string();
            assert!(msg.contains("logged-in"));
            assert!(msg.contains("react-select-3-input"));
        }

        #[test]
        fn test_later_stages_are_never_tagged_on_early_failure() {
            // a missing password control fails while reaching LoggedIn;
            // the wrapper cannot name any later stage
            let err = VitrinaError::ElementNotFound {
                locator: "id=react-select-3-input".to_string(),
                waited_ms: 20_000,
            }
            .at_stage(Stage::LoggedIn, "https://demo.site/signin");

            assert_ne!(err.failed_stage(), Some(Stage::CategorySelected));
            assert_ne!(err.failed_stage(), Some(Stage::Verified));
        }
    }

    mod locator_tests {
        use super::*;

        fn shop() -> ShopTargets {
            ShopTargets::default()
        }

        #[test]
        fn test_login_controls() {
            assert_eq!(
                locators::username_input().to_string(),
                "id=react-select-2-input"
            );
            assert_eq!(
                locators::password_input().to_string(),
                "id=react-select-3-input"
            );
            assert_eq!(locators::login_button().to_string(), "id=login-btn");
            assert_eq!(locators::login_marker().to_string(), "class=username");
        }

        #[test]
        fn test_category_label_matches_exact_text() {
            assert_eq!(
                locators::category_label(&shop()).to_string(),
                "span[text='Samsung']"
            );
        }

        #[test]
        fn test_favorited_entry_requires_list_membership() {
            assert_eq!(
                locators::favorited_entry(&shop()).to_string(),
                "xpath=//*[@id=\"11\" and @class=\"shelf-item\"]"
            );
        }

        #[test]
        fn test_favorite_toggle_is_container_relative() {
            assert_eq!(
                locators::favorite_toggle().to_string(),
                "xpath=./div[1]/button"
            );
        }
    }
}
