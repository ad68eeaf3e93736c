mod common;

use coincast::Error;
use coincast::api::{PredictionService, PredictorClient};
use coincast::state::Timeframe;
use httpmock::Method::{GET, POST};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn offline_health_reports_models() {
    let server = common::setup_server();

    let mock = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "status": "healthy",
                "models_loaded": true,
                "available_timeframes": ["1d", "1w", "1m", "3m"]
            }));
    });

    let client = PredictorClient::new(&common::predictor_config(&server)).unwrap();
    let health = client.health().await.unwrap();

    mock.assert();
    assert_eq!(health.status, "healthy");
    assert!(health.models_loaded);
    assert_eq!(health.available_timeframes.len(), 4);
}

#[tokio::test]
async fn offline_predict_posts_timeframe_code() {
    let server = common::setup_server();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/predict")
            .header("content-type", "application/json")
            .json_body(json!({ "timeframe": "1m" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "predicted_price": 45000.5,
                "confidence": 0.82,
                "current_price": 44000,
                "timeframe": "1m",
                "status": "success",
                "message": "Prediction generated"
            }));
    });

    let client = PredictorClient::new(&common::predictor_config(&server)).unwrap();
    let result = client.predict(Timeframe::OneMonth).await.unwrap();

    mock.assert();
    assert_eq!(result.predicted_price, dec!(45000.5));
    assert_eq!(result.current_price, dec!(44000));
    assert_eq!(result.timeframe, "1m");
    assert_eq!(result.status, "success");
}

#[tokio::test]
async fn offline_error_detail_becomes_message() {
    let server = common::setup_server();

    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(503)
            .header("content-type", "application/json")
            .json_body(json!({ "detail": "Models not loaded" }));
    });

    let client = PredictorClient::new(&common::predictor_config(&server)).unwrap();
    let err = client.predict(Timeframe::OneDay).await.unwrap_err();

    assert_eq!(err.user_message(), "Models not loaded");
    assert!(matches!(err, Error::Remote { status: 503, .. }));
}

#[tokio::test]
async fn offline_error_without_detail_uses_status() {
    let server = common::setup_server();

    server.mock(|when, then| {
        when.method(POST).path("/predict");
        then.status(500).body("Internal Server Error");
    });

    let client = PredictorClient::new(&common::predictor_config(&server)).unwrap();
    let err = client.predict(Timeframe::ThreeMonths).await.unwrap_err();

    assert_eq!(err.user_message(), "HTTP error! status: 500");
}

#[tokio::test]
async fn offline_unreachable_service_is_a_network_error() {
    // Reserve a port, then free it so nothing is listening there
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = coincast::config::PredictorConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        timeout_secs: Some(2),
    };
    let client = PredictorClient::new(&config).unwrap();
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)), "got {err:?}");
    assert!(err.is_recoverable());
}
