//! Run the configured scenario suite once and print one line per set.
//!
//! Run with:
//!   cargo run --example single_set

use vitrina::{Config, Runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("vitrina=info")
        .init();

    let config = Config::load("config.yml")?;
    let runner = Runner::from_config(config);
    let summary = runner.run_all().await;

    for outcome in &summary.outcomes {
        let verdict = if outcome.passed() { "pass" } else { "fail" };
        println!(
            "{}: {verdict} (reached {})",
            outcome.capability, outcome.stage_reached
        );
    }

    assert!(summary.all_passed(), "some capability sets failed");
    Ok(())
}
