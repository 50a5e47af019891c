use std::io::Read;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::HttpSettings;
use crate::data::models::{FetchError, SourceDescriptor};

/// Opens the raw byte stream of a dictionary source.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, source: &SourceDescriptor) -> Result<Box<dyn Read + Send>, FetchError>;
}

/// Downloads sources over HTTP(S).
///
/// Uses the blocking client: construct and call it from a blocking thread,
/// never from inside an async task.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &HttpSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl SourceFetcher for HttpFetcher {
    fn fetch(&self, source: &SourceDescriptor) -> Result<Box<dyn Read + Send>, FetchError> {
        log::debug!("Connecting to {}", source.url);
        let response = self.client.get(&source.url).send()?;

        if response.status() != StatusCode::OK {
            log::error!(
                "Download of {} failed with status {}",
                source.url,
                response.status()
            );
            return Err(FetchError::HttpStatus(response.status()));
        }

        log::debug!("Connected to {}, streaming body", source.url);
        Ok(Box::new(response))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{header::USER_AGENT, HeaderMap, StatusCode as HttpStatus};
    use axum::{routing::get, Router};
    use tokio::net::TcpListener;

    /// `/agent` echoes the User-Agent, `/dict.json` serves two entries and
    /// `/gone` answers 410.
    pub(crate) fn test_router() -> Router {
        let dictionary = serde_json::json!([
            {"title": "火", "heteronyms": [{"bopomofo": "ㄏㄨㄛˇ", "definitions": [{"def": "物體燃燒所發出的光和熱。"}]}]},
            {"title": "水", "heteronyms": [{"bopomofo": "ㄕㄨㄟˇ", "definitions": [{"def": "無色無臭的液體。"}]}]}
        ])
        .to_string();

        Router::new()
            .route(
                "/agent",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            )
            .route("/dict.json", get(move || async move { dictionary }))
            .route("/gone", get(|| async { (HttpStatus::GONE, "gone") }))
    }

    /// Serves `router` on an ephemeral local port and returns its base URL.
    pub(crate) async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn descriptor(url: String) -> SourceDescriptor {
        SourceDescriptor {
            key: "revised".to_string(),
            url,
            label: "重編國語辭典".to_string(),
            approx_record_count: 2,
            progress_weight: 0.9,
        }
    }

    // The blocking client must live and die off the async runtime.
    async fn fetch_body(settings: HttpSettings, url: String) -> Result<String, FetchError> {
        tokio::task::spawn_blocking(move || -> Result<String, FetchError> {
            let fetcher = HttpFetcher::new(&settings)?;
            let mut reader = fetcher.fetch(&descriptor(url))?;
            let mut body = String::new();
            reader.read_to_string(&mut body).unwrap();
            Ok(body)
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn sends_the_default_user_agent() {
        let base = serve(test_router()).await;
        let body = fetch_body(HttpSettings::default(), format!("{}/agent", base))
            .await
            .unwrap();
        assert_eq!(body, "Mozilla/5.0");
    }

    #[tokio::test]
    async fn sends_a_configured_user_agent() {
        let base = serve(test_router()).await;
        let settings = HttpSettings {
            user_agent: "moedict-server/0.1".to_string(),
            ..HttpSettings::default()
        };
        let body = fetch_body(settings, format!("{}/agent", base)).await.unwrap();
        assert_eq!(body, "moedict-server/0.1");
    }

    #[tokio::test]
    async fn streams_the_response_body() {
        let base = serve(test_router()).await;
        let body = fetch_body(HttpSettings::default(), format!("{}/dict.json", base))
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn non_ok_status_is_an_error() {
        let base = serve(test_router()).await;
        let err = fetch_body(HttpSettings::default(), format!("{}/gone", base))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus(status) if status == StatusCode::GONE));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let err = fetch_body(HttpSettings::default(), "http://127.0.0.1:1/dict.json".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
    }
}
