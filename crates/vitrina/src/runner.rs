//! Runs the scenario across capability sets.
//!
//! Each capability set gets its own session and its own scenario run;
//! sets are evaluated independently, so one failing set never blocks the
//! rest. A run is all-or-nothing: there is no partial-success reporting
//! beyond the stage the scenario reached.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::capabilities::CapabilitySet;
use crate::config::{Config, ShopTargets, TestData};
use crate::locator::WaitOptions;
use crate::result::VitrinaError;
use crate::scenario::{Scenario, Stage};
use crate::session::GridClient;

/// Outcome of one scenario run against one capability set
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Capability set label
    pub capability: String,
    /// Last stage the scenario completed
    pub stage_reached: Stage,
    /// The failure, when the run did not verify
    pub error: Option<VitrinaError>,
    /// Wall-clock duration of the run, session setup included
    pub duration: Duration,
}

impl ScenarioOutcome {
    /// Whether the run ended in the terminal success state.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Results from running every capability set
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Individual outcomes, in configuration order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunSummary {
    /// Check if every run passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    /// Count passed runs.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Count failed runs.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    /// Total number of runs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Get the failed outcomes.
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }
}

/// Runs one scenario per configured capability set
#[derive(Debug)]
pub struct Runner {
    client: GridClient,
    data: TestData,
    shop: ShopTargets,
    capabilities: Vec<CapabilitySet>,
    waits: WaitOptions,
}

impl Runner {
    /// Build a runner from loaded configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let client = GridClient::from_config(&config);
        Self {
            client,
            data: config.test_site,
            shop: config.shop,
            capabilities: config.capabilities,
            waits: WaitOptions::default(),
        }
    }

    /// Replace the wait bounds used by every scenario.
    #[must_use]
    pub const fn with_waits(mut self, waits: WaitOptions) -> Self {
        self.waits = waits;
        self
    }

    /// Run every capability set in order, collecting one outcome per set.
    pub async fn run_all(&self) -> RunSummary {
        let mut outcomes = Vec::with_capacity(self.capabilities.len());
        for capability in &self.capabilities {
            outcomes.push(self.run_one(capability).await);
        }
        RunSummary { outcomes }
    }

    /// Run the scenario against one capability set.
    ///
    /// The session is released on every exit path. A release failure after
    /// a passing scenario still fails the run, since a session left behind on
    /// the grid is not a clean pass.
    pub async fn run_one(&self, capability: &CapabilitySet) -> ScenarioOutcome {
        let started = Instant::now();
        info!(capability = %capability.name(), "run starting");

        let session = match self.client.acquire(capability).await {
            Ok(session) => session,
            Err(err) => {
                warn!(capability = %capability.name(), %err, "session acquisition failed");
                return ScenarioOutcome {
                    capability: capability.name(),
                    stage_reached: Stage::NotStarted,
                    error: Some(err),
                    duration: started.elapsed(),
                };
            }
        };

        let mut scenario = Scenario::new(
            session.driver().clone(),
            self.data.clone(),
            self.shop.clone(),
        )
        .with_waits(self.waits);

        let run = scenario.run().await;
        let released = session.release().await;

        let error = match (run, released) {
            (Ok(()), Ok(())) => None,
            (Ok(()), Err(release_err)) => Some(release_err),
            (Err(err), Ok(())) => Some(err),
            (Err(err), Err(release_err)) => {
                warn!(%release_err, "session release failed after a failed run");
                Some(err)
            }
        };

        let outcome = ScenarioOutcome {
            capability: capability.name(),
            stage_reached: scenario.stage(),
            error,
            duration: started.elapsed(),
        };
        info!(
            capability = %outcome.capability,
            stage = outcome.stage_reached.name(),
            passed = outcome.passed(),
            "run finished"
        );
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn passed(capability: &str) -> ScenarioOutcome {
        ScenarioOutcome {
            capability: capability.to_string(),
            stage_reached: Stage::Verified,
            error: None,
            duration: Duration::from_secs(30),
        }
    }

    fn failed(capability: &str, stage: Stage) -> ScenarioOutcome {
        ScenarioOutcome {
            capability: capability.to_string(),
            stage_reached: stage,
            error: Some(VitrinaError::ActivationExhausted {
                target: "id=favourites".to_string(),
            }),
            duration: Duration::from_secs(12),
        }
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary {
            outcomes: vec![
                passed("chrome / Windows 11"),
                failed("firefox / OS X Sonoma", Stage::Favorited),
                passed("Samsung Galaxy S22"),
            ],
        };

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.passed_count(), 2);
        assert_eq!(summary.failed_count(), 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_failures_keep_the_reached_stage() {
        let summary = RunSummary {
            outcomes: vec![failed("chrome / Windows 11", Stage::CategorySelected)],
        };

        let failures = summary.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage_reached, Stage::CategorySelected);
        assert!(!failures[0].passed());
    }

    #[test]
    fn test_empty_summary_passes_vacuously() {
        let summary = RunSummary::default();
        assert!(summary.all_passed());
        assert_eq!(summary.total(), 0);
    }
}
