//! Fetch worker: one upstream exchange from request to normalized items.
//!
//! Failures never escape as errors. Every run lands in a [`FetchOutcome`]
//! with the reason recorded, so one bad upstream cannot poison a round.

use std::time::Duration;

use metrics::counter;
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::types::{FailureReason, FetchOutcome, SourceDescriptor};

/// Fetches one descriptor and decodes its payload, yielding at most `cap`
/// items. The whole exchange, cookie priming included, shares one
/// `request_timeout` deadline.
pub async fn fetch_source(
    client: &reqwest::Client,
    desc: &SourceDescriptor,
    request_timeout: Duration,
    cap: usize,
) -> FetchOutcome {
    match fetch_raw(client, desc, request_timeout).await {
        Ok(raw) => match desc.extractor.extract(&raw, desc, cap) {
            Ok(items) => {
                debug!(source = desc.key, items = items.len(), "source decoded");
                counter!("aggregate_items_total", "source" => desc.key)
                    .increment(items.len() as u64);
                FetchOutcome::success(desc.key, items)
            }
            Err(e) => {
                warn!(source = desc.key, error = %e, "payload extraction failed");
                record_failure(desc.key, FailureReason::Parse)
            }
        },
        Err(reason) => {
            warn!(source = desc.key, reason = %reason, "upstream fetch failed");
            record_failure(desc.key, reason)
        }
    }
}

fn record_failure(key: &'static str, reason: FailureReason) -> FetchOutcome {
    counter!("aggregate_failures_total", "source" => key, "reason" => reason.to_string())
        .increment(1);
    FetchOutcome::failure(key, reason)
}

async fn fetch_raw(
    client: &reqwest::Client,
    desc: &SourceDescriptor,
    request_timeout: Duration,
) -> Result<String, FailureReason> {
    let deadline = Instant::now() + request_timeout;

    let mut cookies: Option<HeaderValue> = None;
    if let Some(prime) = &desc.prime {
        let resp = send(client, prime, desc, None, remaining(deadline)).await?;
        // Only the name=value prefix of each cookie travels onward;
        // attributes like Path or Expires do not belong in a Cookie header.
        let pairs: Vec<&str> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if !pairs.is_empty() {
            cookies = HeaderValue::from_str(&pairs.join("; ")).ok();
        }
    }

    let resp = send(client, &desc.endpoint, desc, cookies, remaining(deadline)).await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FailureReason::HttpStatus(status.as_u16()));
    }
    resp.text().await.map_err(classify)
}

async fn send(
    client: &reqwest::Client,
    url: &str,
    desc: &SourceDescriptor,
    cookies: Option<HeaderValue>,
    timeout: Duration,
) -> Result<reqwest::Response, FailureReason> {
    let mut req = client.get(url).timeout(timeout);
    for (name, value) in desc.headers {
        req = req.header(*name, *value);
    }
    if let Some(cookies) = cookies {
        req = req.header(COOKIE, cookies);
    }
    req.send().await.map_err(classify)
}

fn classify(e: reqwest::Error) -> FailureReason {
    if e.is_timeout() {
        FailureReason::Timeout
    } else {
        FailureReason::Transport
    }
}

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}
