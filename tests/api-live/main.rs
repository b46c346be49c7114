#![cfg(feature = "live-tests")]

//! Contract checks against the configured pet store (the hosted demo by default).
//! Run with `cargo test --features live-tests --test api-live`.

use inventory_contract::configuration::{Settings, get_configuration};
use inventory_contract::contract::ContractTestSuite;
use inventory_contract::telemetry::{get_subscriber, init_subscriber};
use std::sync::LazyLock;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("live-test".into(), "info".into(), std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    } else {
        let subscriber = get_subscriber("live-test".into(), "info".into(), std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialise tracing.");
    }
});

fn settings() -> Settings {
    LazyLock::force(&TRACING);
    get_configuration().expect("Failed to read configuration.")
}

#[tokio::test]
async fn inventory_returns_an_object_for_a_valid_key() {
    let settings = settings();
    let suite = ContractTestSuite::from_settings(&settings).expect("Failed to build the contract suite.");

    let report = suite
        .run_success_case(
            &settings.target.base_url,
            &settings.credentials.credentials(),
        )
        .await
        .expect("Success case failed.");

    assert_eq!(report.status, 200);
}

#[tokio::test]
async fn inventory_simulates_an_error_on_request() {
    let settings = settings();
    let suite = ContractTestSuite::from_settings(&settings).expect("Failed to build the contract suite.");

    let report = suite
        .run_error_case(
            &settings.target.base_url,
            &settings.credentials.credentials(),
        )
        .await
        .expect("Forced-error case failed.");

    assert!([500, 501, 502, 503].contains(&report.status));
}

#[tokio::test]
async fn inventory_rejects_anonymous_calls() {
    let settings = settings();
    if !settings.suite.enforce_credentials {
        tracing::info!("Target does not enforce credentials, skipping");
        return;
    }
    let suite = ContractTestSuite::from_settings(&settings).expect("Failed to build the contract suite.");

    let report = suite
        .run_unauthorized_case(&settings.target.base_url)
        .await
        .expect("Unauthorized case failed.");

    assert!([401, 403].contains(&report.status));
}
