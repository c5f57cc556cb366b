//! Thin fetch wrappers around the validation service endpoints.
//!
//! Every failure path collapses into an `anyhow::Error`; callers decide how
//! quietly to degrade (the board never surfaces these as text).

use anyhow::{Result, anyhow};
use gloo::net::http::Request;
use nanpure_protocol as protocol;

/// Joins the configured base with an endpoint path. An empty base means
/// same-origin requests.
fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

pub(crate) async fn fetch_puzzle(base: &str) -> Result<protocol::PuzzleResponse> {
    let url = endpoint(base, protocol::PUZZLE_ENDPOINT);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|err| anyhow!("{url} unreachable: {err}"))?;
    if !response.ok() {
        return Err(anyhow!("{url} returned status {}", response.status()));
    }
    response
        .json()
        .await
        .map_err(|err| anyhow!("bad puzzle payload: {err}"))
}

pub(crate) async fn validate_entry(
    base: &str,
    request: &protocol::ValidateRequest,
) -> Result<protocol::ValidateResponse> {
    post_json(&endpoint(base, protocol::VALIDATE_ENDPOINT), request).await
}

pub(crate) async fn check_grid(
    base: &str,
    request: &protocol::CheckRequest,
) -> Result<protocol::CheckResponse> {
    post_json(&endpoint(base, protocol::CHECK_ENDPOINT), request).await
}

async fn post_json<B, T>(url: &str, body: &B) -> Result<T>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let response = Request::post(url)
        .json(body)
        .map_err(|err| anyhow!("could not encode request body: {err}"))?
        .send()
        .await
        .map_err(|err| anyhow!("{url} unreachable: {err}"))?;
    if !response.ok() {
        return Err(anyhow!("{url} returned status {}", response.status()));
    }
    response
        .json()
        .await
        .map_err(|err| anyhow!("bad response payload: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        assert_eq!(endpoint("", protocol::PUZZLE_ENDPOINT), "/api/puzzle");
        assert_eq!(
            endpoint("http://localhost:8000", protocol::VALIDATE_ENDPOINT),
            "http://localhost:8000/api/validate"
        );
        assert_eq!(
            endpoint("http://localhost:8000/", protocol::CHECK_ENDPOINT),
            "http://localhost:8000/api/check"
        );
    }
}
