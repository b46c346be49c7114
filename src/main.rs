use anyhow::Context;
use inventory_contract::configuration::get_configuration;
use inventory_contract::contract::ContractTestSuite;
use inventory_contract::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "inventory-contract".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let suite = ContractTestSuite::from_settings(&configuration)
        .context("Failed to build the HTTP client.")?;
    let credentials = configuration.credentials.credentials();

    let report = suite
        .run_all(&configuration.target.base_url, &credentials)
        .await;
    for (name, error) in report.failures() {
        tracing::error!(case = name, error.cause_chain = ?error, "Contract case failed");
    }
    tracing::info!(
        passed = report.passed(),
        total = report.outcomes.len(),
        "Contract suite finished"
    );

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} contract cases failed",
            report.outcomes.len() - report.passed(),
            report.outcomes.len()
        );
    }
    Ok(())
}
