//! Configuration loading.
//!
//! One YAML file (`config.yml` by convention) holds everything a run needs:
//! the grid hub URL and credentials, the site under test with its login
//! data, the storefront targets, and the capability sets to run against.
//! Grid credentials can be overridden with `BROWSERSTACK_USERNAME` /
//! `BROWSERSTACK_ACCESS_KEY` so they stay out of checked-in files.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::capabilities::CapabilitySet;
use crate::result::{VitrinaError, VitrinaResult};

/// Environment variable overriding the grid username
pub const ENV_USERNAME: &str = "BROWSERSTACK_USERNAME";

/// Environment variable overriding the grid access key
pub const ENV_ACCESS_KEY: &str = "BROWSERSTACK_ACCESS_KEY";

/// Full run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Grid hub endpoint (e.g. `https://hub-cloud.browserstack.com/wd/hub`)
    pub browserstack_url: String,
    /// Grid credentials
    pub browserstack: GridCredentials,
    /// Site under test and its login data
    pub test_site: TestData,
    /// Storefront targets (category, product, favorites controls)
    #[serde(default)]
    pub shop: ShopTargets,
    /// Capability sets to run, one independent scenario each
    pub capabilities: Vec<CapabilitySet>,
}

impl Config {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, does not parse, or
    /// names no capability sets.
    pub fn load(path: impl AsRef<Path>) -> VitrinaResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml_ng::from_str(&raw)?;
        config.browserstack.apply_env_overrides();

        if config.capabilities.is_empty() {
            return Err(VitrinaError::Config {
                message: "no capability sets configured".to_string(),
            });
        }
        Ok(config)
    }
}

/// Credentials for the remote grid
#[derive(Clone, Deserialize)]
pub struct GridCredentials {
    /// Grid account username
    pub username: String,
    /// Grid access key
    pub access_key: String,
}

impl GridCredentials {
    /// Replace credentials with environment values when present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(username) = std::env::var(ENV_USERNAME) {
            self.username = username;
        }
        if let Ok(access_key) = std::env::var(ENV_ACCESS_KEY) {
            self.access_key = access_key;
        }
    }
}

// access keys must not end up in log output
impl fmt::Debug for GridCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCredentials")
            .field("username", &self.username)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

/// The site under test: URL and login data. Read-only for a whole run.
#[derive(Debug, Clone, Deserialize)]
pub struct TestData {
    /// Storefront URL
    pub url: String,
    /// Login username
    pub username: String,
    /// Login password
    pub password: String,
}

/// Storefront targets the scenario drives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopTargets {
    /// Category label to select, matched by exact text
    pub category: String,
    /// DOM id of the product container to favorite
    pub product_id: String,
    /// Product name, for log lines
    pub product_name: String,
}

impl Default for ShopTargets {
    fn default() -> Self {
        Self {
            category: "Samsung".to_string(),
            product_id: "11".to_string(),
            product_name: "Galaxy S20+".to_string(),
        }
    }
}
