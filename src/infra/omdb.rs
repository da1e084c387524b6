use serde::Deserialize;
use std::time::Duration;

use crate::domain::models::MovieMatch;
use crate::error::LookupError;
use crate::workflows::matcher::TitleSearch;

pub const OMDB_API_BASE: &str = "http://www.omdbapi.com/";

/// Blocking client for the OMDb title search endpoint (`?s=<title>`).
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Search", default)]
    search: Option<Vec<MovieMatch>>,
}

impl OmdbClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }
}

/// Candidates from a search response body, in the service's ranking order.
/// A body without `Search` (the service's "not found" reply) has none.
pub fn parse_search_response(title: &str, body: &str) -> Result<Vec<MovieMatch>, LookupError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|source| LookupError::Decode {
            title: title.to_string(),
            source,
        })?;
    Ok(response.search.unwrap_or_default())
}

impl TitleSearch for OmdbClient {
    fn search(&self, title: &str) -> Result<Vec<MovieMatch>, LookupError> {
        let mut request = self.client.get(&self.base_url).query(&[("s", title)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apikey", key.as_str())]);
        }

        let response = request.send().map_err(|source| LookupError::Request {
            title: title.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(LookupError::Status {
                title: title.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().map_err(|source| LookupError::Request {
            title: title.to_string(),
            source,
        })?;
        parse_search_response(title, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    /// Runs `app` on a background thread and returns its base url.
    fn spawn_stub(app: Router) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        format!("http://{addr}/")
    }

    fn echo_stub() -> Router {
        Router::new().route(
            "/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let title = params.get("s").cloned().unwrap_or_default();
                let key = params.get("apikey").cloned().unwrap_or_default();
                serde_json::json!({
                    "Search": [
                        {"Title": title, "Year": key, "imdbID": "tt1", "Type": "movie", "Poster": "p1"},
                        {"Title": "Second", "Year": "", "imdbID": "tt2", "Type": "movie", "Poster": "p2"}
                    ]
                })
                .to_string()
            }),
        )
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{"Search":[{"Title":"The Matrix","Year":"1999","imdbID":"tt0133093","Type":"movie","Poster":"http://p"}],"totalResults":"1","Response":"True"}"#;
        let results = parse_search_response("The Matrix", body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].year, "1999");
        assert_eq!(results[0].imdb_id, "tt0133093");
    }

    #[test]
    fn test_parse_not_found_response() {
        let body = r#"{"Response":"False","Error":"Movie not found!"}"#;
        assert!(parse_search_response("x", body).unwrap().is_empty());
        assert!(parse_search_response("x", r#"{"Search":[]}"#).unwrap().is_empty());
        assert!(parse_search_response("x", r#"{"Search":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_response() {
        let err = parse_search_response("Heat", "<html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode { ref title, .. } if title == "Heat"));
    }

    #[test]
    fn test_search_sends_escaped_title_and_key() {
        let base = spawn_stub(echo_stub());
        let client = OmdbClient::new(base, Some("k3y".into()), Duration::from_secs(5)).unwrap();

        let results = client.search("The Matrix & Co 1999").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "The Matrix & Co 1999");
        assert_eq!(results[0].year, "k3y");
        assert_eq!(results[1].imdb_id, "tt2");
    }

    #[test]
    fn test_search_reports_http_status() {
        let app = Router::new().route(
            "/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down").into_response() }),
        );
        let client = OmdbClient::new(spawn_stub(app), None, Duration::from_secs(5)).unwrap();

        let err = client.search("Heat").unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 503, .. }));
    }

    #[test]
    fn test_search_times_out() {
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let client = OmdbClient::new(spawn_stub(app), None, Duration::from_millis(200)).unwrap();

        let err = client.search("Heat").unwrap_err();
        assert!(matches!(err, LookupError::Request { .. }));
    }
}
