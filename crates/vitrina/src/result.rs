//! Result and error types for Vitrina.

use thiserror::Error;

use crate::scenario::Stage;

/// Result type for Vitrina operations
pub type VitrinaResult<T> = Result<T, VitrinaError>;

/// Errors that can occur in Vitrina
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// A bounded wait expired without the element appearing
    #[error("element not found: {locator} (waited {waited_ms}ms)")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// How long the wait polled before giving up
        waited_ms: u64,
    },

    /// Every click strategy failed for one element
    #[error("all click strategies exhausted for {target}")]
    ActivationExhausted {
        /// Description of the element that refused to activate
        target: String,
    },

    /// The capability set names a browser the grid client cannot build
    #[error("unsupported browser: {browser}")]
    UnsupportedCapability {
        /// Browser name from the capability set
        browser: String,
    },

    /// The remote protocol itself failed (network/transport)
    #[error("webdriver session error: {0}")]
    Session(#[from] thirtyfour::error::WebDriverError),

    /// A scenario stage failed; carries the last known page location
    #[error("scenario failed reaching {stage} (at {url}): {source}")]
    StageFailed {
        /// Stage that was being attempted
        stage: Stage,
        /// Last known page URL
        url: String,
        /// Underlying failure
        source: Box<VitrinaError>,
    },

    /// Configuration file is invalid
    #[error("config error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl VitrinaError {
    /// Wrap a stage-local failure into a scenario-level one.
    #[must_use]
    pub fn at_stage(self, stage: Stage, url: impl Into<String>) -> Self {
        Self::StageFailed {
            stage,
            url: url.into(),
            source: Box::new(self),
        }
    }

    /// The stage a scenario failure was attempting, if this is one.
    #[must_use]
    pub const fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
