//! Async client for exercise suggestions from the wger REST API.
//!
//! One request per call: no retries, no caching, and no timeout unless the
//! caller configures one. Failures are returned to the caller, who decides how
//! to present them.

pub mod error;

use std::time::Duration;

use fitcrm_core::exercise::Exercise;
use reqwest::{Client, header};
use serde::Deserialize;

pub use error::{Error, Result};

/// Public wger API root.
pub const DEFAULT_BASE_URL: &str = "https://wger.de/api/v2";

/// wger language id for English.
pub const DEFAULT_LANGUAGE: u32 = 2;

/// Number of suggestions requested when the caller has no preference.
pub const DEFAULT_LIMIT: u32 = 5;

/// Connection settings for the exercise API.
#[derive(Debug, Clone)]
pub struct ExerciseConfig {
  pub base_url: String,
  pub language: u32,
  pub timeout:  Option<Duration>,
}

impl Default for ExerciseConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      language: DEFAULT_LANGUAGE,
      timeout:  None,
    }
  }
}

/// The paged list envelope; only `results` is used.
#[derive(Debug, Deserialize)]
struct Page {
  #[serde(default)]
  results: Option<Vec<Exercise>>,
}

/// Async HTTP client for the exercise endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ExerciseClient {
  client: Client,
  config: ExerciseConfig,
}

impl ExerciseClient {
  pub fn new(config: ExerciseConfig) -> Result<Self> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout {
      builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ExerciseConfig { &self.config }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /exercise/?language=<id>&limit=<limit>`
  ///
  /// A response without a `results` field yields an empty list.
  pub async fn fetch_exercises(&self, limit: u32) -> Result<Vec<Exercise>> {
    let url = self.url("/exercise/");
    tracing::debug!(%url, limit, "fetching exercises");

    let result = self.request(&url, limit).await;
    if let Err(e) = &result {
      tracing::error!(error = %e, "error fetching exercises");
    }
    result
  }

  async fn request(&self, url: &str, limit: u32) -> Result<Vec<Exercise>> {
    let resp = self
      .client
      .get(url)
      .header(header::ACCEPT, "application/json")
      .query(&[("language", self.config.language), ("limit", limit)])
      .send()
      .await
      .map_err(Error::Transport)?;

    if !resp.status().is_success() {
      return Err(Error::Status(resp.status()));
    }

    let body = resp.text().await.map_err(Error::Transport)?;
    let page: Page = serde_json::from_str(&body)?;
    Ok(page.results.unwrap_or_default())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
  };
  use serde_json::{Value, json};

  use super::*;

  async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
  }

  fn client(base_url: String) -> ExerciseClient {
    ExerciseClient::new(ExerciseConfig { base_url, ..Default::default() }).unwrap()
  }

  async fn exercise_page(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
  ) -> Result<Json<Value>, StatusCode> {
    if params.get("language").map(String::as_str) != Some("2") {
      return Err(StatusCode::BAD_REQUEST);
    }
    if headers.get("accept").and_then(|v| v.to_str().ok()) != Some("application/json") {
      return Err(StatusCode::NOT_ACCEPTABLE);
    }
    let limit: usize = params
      .get("limit")
      .and_then(|l| l.parse().ok())
      .ok_or(StatusCode::BAD_REQUEST)?;

    let results: Vec<Value> = (0..limit)
      .map(|i| {
        json!({
          "id": i,
          "name": format!("Exercise {i}"),
          "description": "<p>Do it <b>slowly</b></p>",
          "category": 10
        })
      })
      .collect();
    Ok(Json(json!({ "count": 800, "next": null, "results": results })))
  }

  #[tokio::test]
  async fn fetches_requested_number_of_exercises() {
    let base = serve(Router::new().route("/exercise/", get(exercise_page))).await;

    let exercises = client(base).fetch_exercises(3).await.unwrap();
    assert_eq!(exercises.len(), 3);
    assert_eq!(exercises[0].name, "Exercise 0");
    assert_eq!(exercises[2].id, Some(2));
    assert_eq!(exercises[1].plain_description().as_deref(), Some("Do it slowly"));
  }

  #[tokio::test]
  async fn trailing_slash_on_base_url_is_tolerated() {
    let base = serve(Router::new().route("/exercise/", get(exercise_page))).await;

    let exercises = client(format!("{base}/")).fetch_exercises(1).await.unwrap();
    assert_eq!(exercises.len(), 1);
  }

  #[tokio::test]
  async fn missing_results_is_empty() {
    let router = Router::new().route("/exercise/", get(|| async { Json(json!({ "count": 0 })) }));
    let base = serve(router).await;

    let exercises = client(base).fetch_exercises(5).await.unwrap();
    assert!(exercises.is_empty());
  }

  #[tokio::test]
  async fn null_description_does_not_fail_the_page() {
    let router = Router::new().route(
      "/exercise/",
      get(|| async {
        Json(json!({
          "results": [
            { "id": 1, "name": "Squat", "description": null },
            { "id": 2, "name": "Plank", "description": "<p>Hold</p>" }
          ]
        }))
      }),
    );
    let base = serve(router).await;

    let exercises = client(base).fetch_exercises(2).await.unwrap();
    assert_eq!(exercises.len(), 2);
    assert!(exercises[0].plain_description().is_none());
    assert_eq!(exercises[1].plain_description().as_deref(), Some("Hold"));
    let card = fitcrm_core::render::exercise_cards_html(&exercises[..1]);
    assert!(card.contains("No description available"));
  }

  #[tokio::test]
  async fn error_status_is_reported() {
    let router =
      Router::new().route("/exercise/", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = serve(router).await;

    let err = client(base).fetch_exercises(5).await.unwrap_err();
    assert!(matches!(err, Error::Status(s) if s.as_u16() == 503));
    assert_eq!(err.to_string(), "API request failed: 503 Service Unavailable");
  }

  #[tokio::test]
  async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route("/exercise/", get(|| async { "<html>oops</html>" }));
    let base = serve(router).await;

    let err = client(base).fetch_exercises(5).await.unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
  }

  #[tokio::test]
  async fn unreachable_host_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(format!("http://{addr}")).fetch_exercises(5).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
  }
}
