//! Capability sets: which browser/device/OS combinations to run against.
//!
//! Each set becomes one independent remote session. Desktop sets name a
//! browser (chrome or firefox); device sets name a mobile device and drive
//! chrome, which is what the grid runs on those devices. Any other browser
//! is rejected up front as [`VitrinaError::UnsupportedCapability`] rather
//! than half-negotiated with the grid.

use serde::Deserialize;
use serde_json::Value;
use thirtyfour::{Capabilities, DesiredCapabilities};

use crate::config::GridCredentials;
use crate::result::{VitrinaError, VitrinaResult};

/// One browser/device/OS combination for a remote session
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapabilitySet {
    /// Desktop browser name (chrome, firefox)
    #[serde(default)]
    pub browser: Option<String>,
    /// Browser version (grid syntax, e.g. "latest")
    #[serde(default)]
    pub browser_version: Option<String>,
    /// Mobile device name; presence makes this a mobile set
    #[serde(default)]
    pub device: Option<String>,
    /// Operating system
    #[serde(default)]
    pub os: Option<String>,
    /// Operating system version
    #[serde(default)]
    pub os_version: Option<String>,
    /// Any further grid-specific keys, passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CapabilitySet {
    /// Human-readable label for run summaries and filtering.
    #[must_use]
    pub fn name(&self) -> String {
        if let Some(device) = &self.device {
            return device.clone();
        }
        let browser = self.browser.as_deref().unwrap_or("(no browser)");
        match (&self.os, &self.os_version) {
            (Some(os), Some(version)) => format!("{browser} / {os} {version}"),
            (Some(os), None) => format!("{browser} / {os}"),
            _ => browser.to_string(),
        }
    }

    /// Whether this set targets a mobile platform.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        if self.device.is_some() {
            return true;
        }
        let browser = self.browser.as_deref().unwrap_or("");
        let os = self.os.as_deref().unwrap_or("");
        browser.eq_ignore_ascii_case("samsung")
            || browser.to_ascii_lowercase().contains("mobile")
            || os.eq_ignore_ascii_case("android")
    }

    /// Build the WebDriver capabilities for this set, credentials included.
    ///
    /// # Errors
    ///
    /// Returns [`VitrinaError::UnsupportedCapability`] for a desktop browser
    /// other than chrome or firefox.
    pub fn to_grid_capabilities(
        &self,
        credentials: &GridCredentials,
    ) -> VitrinaResult<Capabilities> {
        let mut caps: Capabilities = if self.device.is_some() {
            // device sets drive chrome on the grid
            DesiredCapabilities::chrome().into()
        } else {
            match self
                .browser
                .as_deref()
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("chrome") => DesiredCapabilities::chrome().into(),
                Some("firefox") => DesiredCapabilities::firefox().into(),
                _ => {
                    return Err(VitrinaError::UnsupportedCapability {
                        browser: self
                            .browser
                            .clone()
                            .unwrap_or_else(|| "(none)".to_string()),
                    })
                }
            }
        };

        insert_opt(&mut caps, "browser", &self.browser);
        insert_opt(&mut caps, "browser_version", &self.browser_version);
        insert_opt(&mut caps, "device", &self.device);
        insert_opt(&mut caps, "os", &self.os);
        insert_opt(&mut caps, "os_version", &self.os_version);
        for (key, value) in &self.extra {
            caps.insert(key.clone(), value.clone());
        }

        caps.insert(
            "browserstack.user".to_string(),
            Value::String(credentials.username.clone()),
        );
        caps.insert(
            "browserstack.key".to_string(),
            Value::String(credentials.access_key.clone()),
        );
        Ok(caps)
    }
}

fn insert_opt(caps: &mut Capabilities, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        caps.insert(key.to_string(), Value::String(value.clone()));
    }
}
