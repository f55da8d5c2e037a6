//! Multi-strategy element activation.
//!
//! Remote sessions are flaky about clicks: an element can be reported
//! present yet refuse a native click (overlays, unscrolled viewports,
//! hover-gated controls; all common on remote/mobile grids). The helper
//! tries an ordered sequence of strategies and stops at the first one that
//! lands. Exhausting every strategy is terminal: the caller gets exactly
//! one [`VitrinaError::ActivationExhausted`] and must propagate it.

use async_trait::async_trait;
use thirtyfour::{WebDriver, WebElement};
use tracing::debug;

use crate::result::{VitrinaError, VitrinaResult};

/// One way of clicking an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStrategy {
    /// Native WebDriver click
    Native,
    /// Click synthesized through the page's scripting bridge
    Scripted,
    /// Pointer moved onto the element, then clicked
    Pointer,
}

impl ClickStrategy {
    /// Strategies in the order they are attempted
    pub const ORDER: [Self; 3] = [Self::Native, Self::Scripted, Self::Pointer];

    /// Short name for log lines
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Scripted => "scripted",
            Self::Pointer => "pointer",
        }
    }
}

/// A clickable target. The single capability the strategies share.
#[async_trait]
pub trait Activation {
    /// Attempt one strategy against the target.
    ///
    /// # Errors
    ///
    /// Returns an error when the strategy fails to land.
    async fn attempt(&self, strategy: ClickStrategy) -> VitrinaResult<()>;

    /// Description of the target for log lines and failure messages.
    fn describe(&self) -> String;
}

/// Activate a target, falling through the click strategies in order.
///
/// Each strategy is attempted at most once, with no backoff; the first
/// success returns immediately and later strategies are never touched.
/// Failure causes are not distinguished; only exhaustion matters.
///
/// # Errors
///
/// Returns [`VitrinaError::ActivationExhausted`] when every strategy failed.
pub async fn activate<A: Activation + ?Sized>(target: &A) -> VitrinaResult<()> {
    for strategy in ClickStrategy::ORDER {
        match target.attempt(strategy).await {
            Ok(()) => {
                debug!(strategy = strategy.name(), target = %target.describe(), "click landed");
                return Ok(());
            }
            Err(err) => {
                debug!(strategy = strategy.name(), target = %target.describe(), %err, "click strategy failed");
            }
        }
    }
    Err(VitrinaError::ActivationExhausted {
        target: target.describe(),
    })
}

/// A live element on a grid session, clickable via all three strategies.
pub struct GridTarget<'a> {
    driver: &'a WebDriver,
    element: &'a WebElement,
    label: String,
}

impl std::fmt::Debug for GridTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridTarget")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<'a> GridTarget<'a> {
    /// Wrap a located element for activation.
    #[must_use]
    pub fn new(driver: &'a WebDriver, element: &'a WebElement, label: impl Into<String>) -> Self {
        Self {
            driver,
            element,
            label: label.into(),
        }
    }
}

#[async_trait]
impl Activation for GridTarget<'_> {
    async fn attempt(&self, strategy: ClickStrategy) -> VitrinaResult<()> {
        match strategy {
            ClickStrategy::Native => self.element.click().await?,
            ClickStrategy::Scripted => {
                self.driver
                    .execute("arguments[0].click();", vec![self.element.to_json()?])
                    .await?;
            }
            ClickStrategy::Pointer => {
                self.driver
                    .action_chain()
                    .move_to_element_center(self.element)
                    .click()
                    .perform()
                    .await?;
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted target: fails the listed strategies, records every attempt.
    struct Scripted {
        failing: Vec<ClickStrategy>,
        attempts: Mutex<Vec<ClickStrategy>>,
    }

    impl Scripted {
        fn failing(strategies: &[ClickStrategy]) -> Self {
            Self {
                failing: strategies.to_vec(),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<ClickStrategy> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Activation for Scripted {
        async fn attempt(&self, strategy: ClickStrategy) -> VitrinaResult<()> {
            self.attempts.lock().unwrap().push(strategy);
            if self.failing.contains(&strategy) {
                Err(VitrinaError::Config {
                    message: format!("{} refused", strategy.name()),
                })
            } else {
                Ok(())
            }
        }

        fn describe(&self) -> String {
            "scripted target".to_string()
        }
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            ClickStrategy::ORDER,
            [
                ClickStrategy::Native,
                ClickStrategy::Scripted,
                ClickStrategy::Pointer
            ]
        );
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let target = Scripted::failing(&[]);
        activate(&target).await.unwrap();
        assert_eq!(target.attempts(), vec![ClickStrategy::Native]);
    }

    #[tokio::test]
    async fn test_falls_through_to_scripted() {
        let target = Scripted::failing(&[ClickStrategy::Native]);
        activate(&target).await.unwrap();
        assert_eq!(
            target.attempts(),
            vec![ClickStrategy::Native, ClickStrategy::Scripted]
        );
    }

    #[tokio::test]
    async fn test_pointer_is_the_last_resort() {
        let target = Scripted::failing(&[ClickStrategy::Native, ClickStrategy::Scripted]);
        activate(&target).await.unwrap();
        assert_eq!(target.attempts(), ClickStrategy::ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_exhaustion_is_terminal() {
        let target = Scripted::failing(&ClickStrategy::ORDER);
        let err = activate(&target).await.unwrap_err();

        assert!(matches!(err, VitrinaError::ActivationExhausted { .. }));
        assert!(err.to_string().contains("scripted target"));
        // each strategy attempted exactly once, in order, no retries
        assert_eq!(target.attempts(), ClickStrategy::ORDER.to_vec());
    }
}
