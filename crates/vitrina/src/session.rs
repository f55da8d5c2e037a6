//! Remote grid sessions.
//!
//! A [`GridClient`] turns capability sets into live WebDriver sessions on
//! the hub. A [`GridSession`] owns its remote browser exclusively for one
//! scenario run; `release` consumes the session, so a closed session can
//! never be reused. Callers are responsible for releasing on every exit
//! path; the runner does this for both the success and failure arms.

use thirtyfour::WebDriver;
use tracing::info;

use crate::capabilities::CapabilitySet;
use crate::config::{Config, GridCredentials};
use crate::result::VitrinaResult;

/// Client for acquiring sessions from a remote grid hub
#[derive(Debug, Clone)]
pub struct GridClient {
    hub_url: String,
    credentials: GridCredentials,
}

impl GridClient {
    /// Create a client for a hub endpoint.
    #[must_use]
    pub fn new(hub_url: impl Into<String>, credentials: GridCredentials) -> Self {
        Self {
            hub_url: hub_url.into(),
            credentials,
        }
    }

    /// Create a client from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.browserstack_url, config.browserstack.clone())
    }

    /// The hub endpoint this client talks to.
    #[must_use]
    pub fn hub_url(&self) -> &str {
        &self.hub_url
    }

    /// Acquire a live session for one capability set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::VitrinaError::UnsupportedCapability`] for a browser
    /// the grid client cannot build, or a session error when the hub
    /// refuses the capability negotiation.
    pub async fn acquire(&self, capability: &CapabilitySet) -> VitrinaResult<GridSession> {
        let caps = capability.to_grid_capabilities(&self.credentials)?;
        info!(capability = %capability.name(), hub = %self.hub_url, "acquiring grid session");
        let driver = WebDriver::new(&self.hub_url, caps).await?;
        Ok(GridSession {
            driver,
            capability: capability.name(),
        })
    }
}

/// A live remote browser session, exclusively owned by one scenario run
pub struct GridSession {
    driver: WebDriver,
    capability: String,
}

impl std::fmt::Debug for GridSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSession")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

impl GridSession {
    /// The WebDriver handle for this session.
    #[must_use]
    pub const fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// The capability set label this session was acquired for.
    #[must_use]
    pub fn capability(&self) -> &str {
        &self.capability
    }

    /// Close the remote session. Consumes the handle: a released session
    /// cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns a session error when the quit command fails; the remote end
    /// reaps the session on its own timeout in that case.
    pub async fn release(self) -> VitrinaResult<()> {
        info!(capability = %self.capability, "releasing grid session");
        self.driver.quit().await?;
        Ok(())
    }
}
