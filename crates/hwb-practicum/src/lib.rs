//! Practicum API adapter.
//!
//! Implements the `hwb-core` StatusSource port over the homework-status
//! HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, StatusCode};

use hwb_core::{errors::Error, ports::StatusSource, Result};

#[derive(Clone, Debug)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, since: i64) -> Result<serde_json::Value> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", since)])
            .send()
            .await
            .map_err(|e| Error::Transport(format!("practicum request error: {e}")))?;

        // The API contract is exactly 200; anything else (including redirects
        // to an error page) is reported with its code.
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| Error::MalformedResponse(format!("practicum body is not valid JSON: {e}")))
    }
}
