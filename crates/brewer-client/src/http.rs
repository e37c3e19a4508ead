use crate::error::ClientError;
use crate::throttle::Throttle;
use crate::Result;
use brewer_core::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared client settings: per-request timeout, user agent, JSON accept.
pub(crate) fn build_client(cfg: &HttpConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let client = reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .build()?;
    Ok(client)
}

/// Throttled GET decoding a JSON body. `Ok(None)` on 404.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    throttle: &Throttle,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Option<T>> {
    throttle.wait().await;
    tracing::debug!(url, ?query, "GET");

    let mut req = http.get(url);
    if !query.is_empty() {
        req = req.query(query);
    }
    let resp = req.send().await?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(url, "404");
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = resp.text().await?;
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| ClientError::Malformed {
            url: url.to_string(),
            message: e.to_string(),
        })
}
