use crate::thingspeak::error::ThingSpeakError;
use crate::thingspeak::feed::{Feed, FeedPage};
use log::{info, warn};
use reqwest::Client;

/// Feed endpoint of the buoy's public ThingSpeak channel.
pub const CHANNEL_FEED_URL: &str = "https://api.thingspeak.com/channels/2100599/feeds.json";

pub struct ThingSpeakClient {
    channel_url: String,
    http_client: Client,
}

impl ThingSpeakClient {
    pub fn new(channel_url: impl Into<String>) -> ThingSpeakClient {
        ThingSpeakClient {
            channel_url: channel_url.into(),
            http_client: Client::new(),
        }
    }

    /// Fetches up to `results` most-recent samples from the channel feed.
    ///
    /// A non-success status maps to [`ThingSpeakError::HttpStatus`]; a body
    /// without a decodable `feeds` array maps to
    /// [`ThingSpeakError::FeedDecode`].
    pub async fn fetch_feeds(&self, results: usize) -> Result<Vec<Feed>, ThingSpeakError> {
        let url = format!("{}?results={}", self.channel_url, results);
        info!("Fetching telemetry feed from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ThingSpeakError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ThingSpeakError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ThingSpeakError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .text()
            .await
            .map_err(|e| ThingSpeakError::BodyRead(url.clone(), e))?;
        let page: FeedPage = serde_json::from_str(&body)
            .map_err(|e| ThingSpeakError::FeedDecode { url, source: e })?;

        info!("Fetched {} feed entries", page.feeds.len());
        Ok(page.feeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetches_and_decodes_the_feed_page() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/feeds.json")
                    .query_param("results", "450");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        r#"{"channel":{"id":1},"feeds":[
                            {"created_at":"2025-01-18T01:00:00Z","field1":"28.5","field2":"7.1","field3":"2400","field4":"1.2","field5":"0.9"},
                            {"created_at":"2025-01-18T01:10:00Z","field1":"28.6","field2":"7.0","field3":"2420","field4":"1.3","field5":"0.9"}
                        ]}"#,
                    );
            })
            .await;

        let client = ThingSpeakClient::new(server.url("/feeds.json"));
        let feeds = client.fetch_feeds(450).await.unwrap();

        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[0].field1.as_deref(), Some("28.5"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feeds.json");
                then.status(503);
            })
            .await;

        let client = ThingSpeakClient::new(server.url("/feeds.json"));
        let err = client.fetch_feeds(150).await.unwrap_err();

        assert!(matches!(
            err,
            ThingSpeakError::HttpStatus { status, .. }
                if status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[tokio::test]
    async fn body_without_feeds_key_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/feeds.json");
                then.status(200).body(r#"{"channel":{"id":1}}"#);
            })
            .await;

        let client = ThingSpeakClient::new(server.url("/feeds.json"));
        let err = client.fetch_feeds(150).await.unwrap_err();

        assert!(matches!(err, ThingSpeakError::FeedDecode { .. }));
    }
}
