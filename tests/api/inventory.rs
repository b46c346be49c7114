use crate::helpers::{header_value, mount_inventory_response, spawn_bare_petstore, spawn_petstore};
use crate::test_data::{BEARER_TOKEN, REJECTED_API_KEY, VALID_API_KEY};
use claims::{assert_err, assert_ok, assert_some};
use inventory_contract::configuration::SuiteSettings;
use inventory_contract::contract::{AssertionFailure, ContractError, ContractTestSuite, TransportError};
use inventory_contract::domain::Credential;
use std::time::Duration;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn success_case_passes_against_a_conforming_service() {
    // Arrange
    let petstore = spawn_petstore().await;
    // Act
    let report = petstore
        .suite()
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;
    // Assert
    let report = assert_ok!(report);
    assert_eq!(report.status, 200);
    let body = assert_some!(report.body);
    assert_eq!(body["available"], 7);
}

#[tokio::test]
async fn success_case_negotiates_json_and_sends_the_api_key() {
    let petstore = spawn_petstore().await;

    let _ = petstore
        .suite()
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;

    let requests = petstore.inventory_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(header_value(&requests[0], "accept"), Some("application/json"));
    assert_eq!(header_value(&requests[0], "api_key"), Some(VALID_API_KEY));
    assert_eq!(header_value(&requests[0], "x-force-error"), None);
}

#[tokio::test]
async fn success_case_accepts_an_empty_inventory() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({})),
    )
    .await;

    let report = petstore
        .suite()
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert_ok!(report);
}

#[tokio::test]
async fn success_case_fails_when_the_body_is_an_array() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Assertion(AssertionFailure::NotAnObject("an array")))
    ));
}

#[tokio::test]
async fn success_case_fails_on_any_status_but_200() {
    for status in [201, 204, 404, 500] {
        let petstore = spawn_bare_petstore().await;
        mount_inventory_response(
            &petstore,
            ResponseTemplate::new(status).set_body_json(serde_json::json!({})),
        )
        .await;

        let outcome = petstore
            .suite()
            .run_success_case(&petstore.base_url, &petstore.credentials())
            .await;

        match outcome {
            Err(ContractError::Assertion(AssertionFailure::UnexpectedStatus { actual, .. })) => {
                assert_eq!(actual, status)
            }
            other => panic!("status {} should fail the success case, got {:?}", status, other),
        }
    }
}

#[tokio::test]
async fn success_case_is_stable_across_repeated_calls() {
    let petstore = spawn_petstore().await;
    let suite = petstore.suite();

    for _ in 0..3 {
        let report = suite
            .run_success_case(&petstore.base_url, &petstore.credentials())
            .await;
        assert_eq!(assert_ok!(report).status, 200);
    }
    assert_eq!(petstore.inventory_requests().await.len(), 3);
}

#[tokio::test]
async fn error_case_passes_when_the_service_simulates_a_failure() {
    let petstore = spawn_petstore().await;

    let report = petstore
        .suite()
        .run_error_case(&petstore.base_url, &petstore.credentials())
        .await;

    let report = assert_ok!(report);
    assert_eq!(report.status, 500);
    let body = assert_some!(report.body);
    assert_eq!(body["message"], "Unexpected error");

    let requests = petstore.inventory_requests().await;
    assert_eq!(header_value(&requests[0], "x-force-error"), Some("true"));
    assert_eq!(header_value(&requests[0], "api_key"), Some(VALID_API_KEY));
}

#[tokio::test]
async fn error_case_accepts_every_whitelisted_status() {
    for status in [500, 501, 502, 503] {
        let petstore = spawn_bare_petstore().await;
        mount_inventory_response(
            &petstore,
            ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "code": status.to_string(),
                "message": "simulated"
            })),
        )
        .await;

        let report = petstore
            .suite()
            .run_error_case(&petstore.base_url, &petstore.credentials())
            .await;

        assert_eq!(assert_ok!(report).status, status);
    }
}

#[tokio::test]
async fn error_case_fails_when_the_signal_is_ignored() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "available": 1 })),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_error_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Assertion(AssertionFailure::UnexpectedStatus { actual: 200, .. }))
    ));
}

#[tokio::test]
async fn error_case_fails_when_504_is_returned() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(504).set_body_json(serde_json::json!({
            "code": 504,
            "message": "gateway timeout"
        })),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_error_case(&petstore.base_url, &petstore.credentials())
        .await;

    let error = assert_err!(outcome);
    assert!(error.is_assertion());
}

#[tokio::test]
async fn error_case_fails_when_the_error_body_has_no_message() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(500).set_body_json(serde_json::json!({ "code": 500 })),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_error_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Assertion(AssertionFailure::MissingField(field))) if field == "message"
    ));
}

#[tokio::test]
async fn error_case_fails_when_the_error_body_is_not_json() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_error_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Assertion(AssertionFailure::UndecodableBody(_)))
    ));
}

#[tokio::test]
async fn unauthorized_case_passes_when_the_key_is_missing() {
    let petstore = spawn_petstore().await;

    let report = petstore
        .suite()
        .run_unauthorized_case(&petstore.base_url)
        .await;

    assert_eq!(assert_ok!(report).status, 401);
    let requests = petstore.inventory_requests().await;
    assert_eq!(header_value(&requests[0], "api_key"), None);
}

#[tokio::test]
async fn rejected_credential_case_passes_when_the_key_is_refused() {
    let petstore = spawn_petstore().await;
    let suite = petstore.suite();
    let case = suite.rejected_credential_case(Credential::api_key(REJECTED_API_KEY));

    let report = suite
        .run_case(&petstore.base_url, &petstore.credentials(), &case)
        .await;

    assert_eq!(assert_ok!(report).status, 403);
    let requests = petstore.inventory_requests().await;
    assert_eq!(header_value(&requests[0], "api_key"), Some(REJECTED_API_KEY));
}

#[tokio::test]
async fn unauthorized_case_fails_when_anonymous_calls_succeed() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({})),
    )
    .await;

    let outcome = petstore
        .suite()
        .run_unauthorized_case(&petstore.base_url)
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Assertion(AssertionFailure::UnexpectedStatus { actual: 200, .. }))
    ));
}

#[tokio::test]
async fn bearer_token_is_forwarded_alongside_the_api_key() {
    let petstore = spawn_petstore().await;
    let credentials = vec![
        Credential::api_key(VALID_API_KEY),
        Credential::authorization(BEARER_TOKEN),
    ];

    let report = petstore
        .suite()
        .run_success_case(&petstore.base_url, &credentials)
        .await;

    assert_ok!(report);
    let requests = petstore.inventory_requests().await;
    assert_eq!(header_value(&requests[0], "authorization"), Some(BEARER_TOKEN));
}

#[tokio::test]
async fn slow_service_fails_with_a_timeout() {
    let petstore = spawn_bare_petstore().await;
    mount_inventory_response(
        &petstore,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({}))
            .set_delay(Duration::from_secs(30)),
    )
    .await;
    let suite = ContractTestSuite::new(SuiteSettings::default(), Duration::from_millis(200))
        .expect("Failed to build the contract suite.");

    let outcome = suite
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;

    let error = assert_err!(outcome);
    assert!(error.is_timeout());
    assert!(!error.is_assertion());
}

#[tokio::test]
async fn unreachable_service_fails_with_a_connect_error() {
    // Bind then release a port so nothing is listening on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let suite = ContractTestSuite::new(SuiteSettings::default(), Duration::from_secs(2))
        .expect("Failed to build the contract suite.");

    let outcome = suite
        .run_success_case(
            &format!("http://127.0.0.1:{}/api/v3", port),
            &[Credential::api_key(VALID_API_KEY)],
        )
        .await;

    assert!(matches!(
        outcome,
        Err(ContractError::Transport(TransportError::Connect { .. }))
    ));
}

fn gateway_headers() -> std::collections::HashMap<String, String> {
    [("api_key".to_string(), "gateway-key".to_string())].into()
}

#[tokio::test]
async fn unauthorized_case_drops_a_configured_api_key_header() {
    let petstore = spawn_petstore().await;
    let suite = petstore.suite().with_extra_headers(gateway_headers());

    let report = suite.run_unauthorized_case(&petstore.base_url).await;

    let report = assert_ok!(report);
    assert_eq!(report.status, 401);
    let requests = petstore.inventory_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].headers.get_all("api_key").iter().count(), 0);
}

#[tokio::test]
async fn supplied_api_key_replaces_a_configured_api_key_header() {
    let petstore = spawn_petstore().await;
    let suite = petstore.suite().with_extra_headers(gateway_headers());

    let report = suite
        .run_success_case(&petstore.base_url, &petstore.credentials())
        .await;

    assert_ok!(report);
    let requests = petstore.inventory_requests().await;
    let values: Vec<&str> = requests[0]
        .headers
        .get_all("api_key")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert_eq!(values, vec![VALID_API_KEY]);
}
