#![allow(dead_code)]

use coincast::config::{NewsApiConfig, PredictorConfig};
use httpmock::MockServer;
use std::{fs, path::Path};

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn news_config(server: &MockServer, token: Option<&str>) -> NewsApiConfig {
    NewsApiConfig {
        base_url: server.url("/api/developer/v2/posts/"),
        auth_token: token.map(str::to_string),
        timeout_secs: Some(5),
    }
}

pub fn predictor_config(server: &MockServer) -> PredictorConfig {
    PredictorConfig {
        base_url: server.base_url(),
        timeout_secs: Some(5),
    }
}
