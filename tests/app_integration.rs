use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn rates_body(base: &str, rates: &[(&str, f64)]) -> String {
        let entries: Vec<String> = rates
            .iter()
            .map(|(code, rate)| format!(r#""{code}": {rate}"#))
            .collect();
        format!(
            r#"{{"base": "{base}", "date": "2024-10-17", "rates": {{{}}}}}"#,
            entries.join(", ")
        )
    }

    pub async fn mount_rates(server: &MockServer, base: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/{base}")))
            .respond_with(template)
            .mount(server)
            .await;
    }

    pub async fn create_mock_server(base: &str, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        mount_rates(
            &mock_server,
            base,
            ResponseTemplate::new(200).set_body_string(body),
        )
        .await;
        mock_server
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        let config_content = format!(
            r#"
        providers:
          exchangerate:
            base_url: {base_url}
            timeout_secs: 5
        board:
          base: "IDR"
          currencies: ["USD", "EUR", "JPY"]
        converter:
          from: "IDR"
          to: "USD"
          amount: "100"
    "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let body = test_utils::rates_body("IDR", &[("IDR", 1.0), ("USD", 0.000065), ("EUR", 0.00006)]);
    let mock_server = test_utils::create_mock_server("IDR", &body).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = xconv::run_command(
        xconv::AppCommand::Rates { base: None },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_reports_fetch_failure() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_rates(
        &mock_server,
        "IDR",
        wiremock::ResponseTemplate::new(500),
    )
    .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = xconv::run_command(
        xconv::AppCommand::Rates { base: None },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("fetch failure should surface");
    assert!(err.to_string().contains("Error loading data"));
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_mock() {
    let body = test_utils::rates_body("IDR", &[("IDR", 1.0), ("USD", 0.000065)]);
    let mock_server = test_utils::create_mock_server("IDR", &body).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = xconv::run_command(
        xconv::AppCommand::Convert {
            amount: Some("250000".to_string()),
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_missing_pair_fails() {
    let body = test_utils::rates_body("IDR", &[("IDR", 1.0), ("USD", 0.000065)]);
    let mock_server = test_utils::create_mock_server("IDR", &body).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = xconv::run_command(
        xconv::AppCommand::Convert {
            amount: None,
            from: None,
            to: Some("gbp".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("missing pair should fail");
    assert_eq!(err.to_string(), "No exchange rate available for IDR → GBP");
}

#[test_log::test(tokio::test)]
async fn test_late_response_does_not_override_newer_selection() {
    use xconv::core::{Action, ConverterSession, ConverterState, RateStatus};
    use xconv::providers::ExchangeRateApiProvider;

    let mock_server = wiremock::MockServer::start().await;
    let ok = |body: String| wiremock::ResponseTemplate::new(200).set_body_string(body);
    test_utils::mount_rates(
        &mock_server,
        "IDR",
        ok(test_utils::rates_body("IDR", &[("IDR", 1.0), ("USD", 0.000065), ("EUR", 0.00006)])),
    )
    .await;
    test_utils::mount_rates(
        &mock_server,
        "USD",
        ok(test_utils::rates_body("USD", &[("USD", 1.0), ("EUR", 0.92), ("IDR", 15400.0)]))
            .set_delay(Duration::from_millis(500)),
    )
    .await;
    test_utils::mount_rates(
        &mock_server,
        "EUR",
        ok(test_utils::rates_body("EUR", &[("EUR", 1.0), ("USD", 1.08), ("IDR", 16700.0)])),
    )
    .await;

    let provider =
        ExchangeRateApiProvider::new(&mock_server.uri(), Duration::from_secs(5)).unwrap();
    let mut session = ConverterSession::start(
        Arc::new(provider),
        ConverterState::new("IDR", "IDR", "1", None),
    );
    session.settle().await;

    session.dispatch(Action::SetFrom("USD".to_string()));
    session.dispatch(Action::SetFrom("EUR".to_string()));
    session.settle().await;

    let state = session.state();
    info!(from = state.from(), status = ?state.status(), "Session settled");
    assert_eq!(state.from(), "EUR");
    assert_eq!(state.rates().map(|t| t.base.as_str()), Some("EUR"));
    assert_eq!(state.status(), RateStatus::Ready(16700.0));
    assert_eq!(state.currencies(), ["EUR", "IDR", "USD"]);
}

#[test_log::test]
fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.yaml");

    xconv::cli::setup::setup_at_path(&config_path).expect("setup failed");
    let config = xconv::core::config::AppConfig::load_from_path(&config_path)
        .expect("written config should load");
    assert_eq!(config.board.base, "IDR");
    assert!(fs::metadata(&config_path).is_ok());
}
