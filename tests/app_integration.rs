use std::fs;
use tracing::info;
use xrate::core::config::AppConfig;
use xrate::core::{Asset, RatePair};

mod test_utils {
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const FIAT_RESPONSE: &str = r#"{"result":"success","base_code":"USD","conversion_rates":{"USD":1,"RUB":90.12345,"EUR":0.92}}"#;
    pub const CRYPTO_RESPONSE: &str = r#"{"bitcoin":{"usd":50123.456},"ethereum":{"usd":3000.0}}"#;

    /// Serves both upstreams from one server with the expected call counts.
    pub async fn create_mock_server(fiat_hits: u64, crypto_hits: u64) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex(r"/latest/USD$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FIAT_RESPONSE))
            .expect(fiat_hits)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin,ethereum"))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CRYPTO_RESPONSE))
            .expect(crypto_hits)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn config_yaml(base_uri: &str, ttl_secs: u64) -> String {
        format!(
            r#"
        cache:
          ttl_secs: {ttl_secs}
        http:
          timeout_secs: 5
        providers:
          exchangerate:
            base_url: {base_uri}
          coingecko:
            base_url: {base_uri}
    "#
        )
    }
}

fn load_config(base_uri: &str, ttl_secs: u64) -> AppConfig {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), test_utils::config_yaml(base_uri, ttl_secs))
        .expect("Failed to write config file");
    AppConfig::load_from_path(config_file.path()).expect("Failed to load config")
}

#[test_log::test(tokio::test)]
async fn test_cold_then_warm_quote() {
    let mock_server = test_utils::create_mock_server(1, 0).await;
    let config = load_config(&mock_server.uri(), 60);
    let resolver = xrate::build_resolver(&config, "test-key").expect("Failed to build resolver");

    let cold = resolver.quote(RatePair::UsdRub).await.unwrap();
    info!(?cold, "Cold quote");
    assert_eq!(cold.source, "exchangerate-api.com");
    assert_eq!(cold.rate, 90.12345);

    let warm = resolver.quote(RatePair::UsdRub).await.unwrap();
    assert_eq!(warm.source, "cache");
    assert_eq!(warm.rate, cold.rate);
    assert_eq!(warm.fetched_at, cold.fetched_at);

    assert_eq!(
        xrate::core::format::format_quote(&cold).split(" (").next(),
        Some("1 USD ≈ 90.1235 RUB")
    );
}

#[test_log::test(tokio::test)]
async fn test_one_crypto_request_populates_both_pairs() {
    let mock_server = test_utils::create_mock_server(0, 1).await;
    let config = load_config(&mock_server.uri(), 60);
    let resolver = xrate::build_resolver(&config, "test-key").expect("Failed to build resolver");

    let btc = resolver.quote(RatePair::BtcUsd).await.unwrap();
    assert_eq!(btc.source, "CoinGecko");

    let eth = resolver.quote(RatePair::EthUsd).await.unwrap();
    assert_eq!(eth.source, "cache");
    assert_eq!(eth.rate, 3000.0);
    assert_eq!(eth.fetched_at, btc.fetched_at);
}

#[test_log::test(tokio::test)]
async fn test_cross_conversion_through_usd() {
    let mock_server = test_utils::create_mock_server(1, 1).await;
    let config = load_config(&mock_server.uri(), 60);
    let resolver = xrate::build_resolver(&config, "test-key").expect("Failed to build resolver");

    let breakdown = resolver.convert(Asset::Eth, 0.3).await.unwrap();
    assert!((breakdown.usd_amount.unwrap() - 900.0).abs() < 1e-9);
    assert!((breakdown.rub_amount - 900.0 * 90.12345).abs() < 1e-6);

    let rate = resolver.rate_value(Asset::Btc, Asset::Rub).await.unwrap();
    assert!((rate - 50123.456 * 90.12345).abs() < 1e-6);
}

#[test_log::test(tokio::test)]
async fn test_upstream_failure_is_reported() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(wiremock::ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let config = load_config(&mock_server.uri(), 60);
    let resolver = xrate::build_resolver(&config, "test-key").expect("Failed to build resolver");

    let reply = xrate::bot::handle(&resolver, "/btc").await;
    assert!(reply.contains("CoinGecko"), "unexpected reply: {reply}");
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(1, 1).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(config_path, test_utils::config_yaml(&mock_server.uri(), 60))
        .expect("Failed to write config file");

    let result = xrate::run_command(
        xrate::AppCommand::Rates,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Rates command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_quote_and_convert_commands_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    let fiat = wiremock::Mock::given(wiremock::matchers::path_regex(r"/latest/USD$"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_string(test_utils::FIAT_RESPONSE),
        );
    let crypto = wiremock::Mock::given(wiremock::matchers::path("/simple/price")).respond_with(
        wiremock::ResponseTemplate::new(200).set_body_string(test_utils::CRYPTO_RESPONSE),
    );
    fiat.mount(&mock_server).await;
    crypto.mount(&mock_server).await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    fs::write(config_path, test_utils::config_yaml(&mock_server.uri(), 60))
        .expect("Failed to write config file");
    let config_path = config_path.to_str().unwrap();

    let quote = xrate::run_command(xrate::AppCommand::Quote(RatePair::BtcUsd), Some(config_path)).await;
    assert!(quote.is_ok(), "Quote command failed with: {:?}", quote.err());

    let convert = xrate::run_command(
        xrate::AppCommand::Convert {
            asset: Asset::Eth,
            amount: 0.3,
        },
        Some(config_path),
    )
    .await;
    assert!(convert.is_ok(), "Convert command failed with: {:?}", convert.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result = xrate::run_command(xrate::AppCommand::Rates, Some("/nonexistent/xrate.yaml")).await;
    assert!(result.is_err());
}
