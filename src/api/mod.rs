//! Photo API seam.
//!
//! The [`PhotoApi`] trait defines the two calls the gallery needs: list a
//! page of recent photos and search photos by text. The production
//! implementation is [`HttpPhotoApi`](http::HttpPhotoApi), which talks to an
//! Unsplash-compatible REST endpoint. Everything above this module is
//! transport-agnostic.
//!
//! | Request | Endpoint | Query parameters | Response |
//! |---|---|---|---|
//! | Browse | `GET photos` | `client_id`, `page`, `per_page` | `[Image]` |
//! | Search | `GET search/photos` | `client_id`, `query`, `page` | `SearchResult` |

pub mod http;

use crate::types::{Image, SearchResult};
use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use http::HttpPhotoApi;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} from {endpoint}")]
    Status { status: u16, endpoint: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A single page request against the photo API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoRequest {
    Browse { page: u32, per_page: u32 },
    Search { query: String, page: u32 },
}

impl PhotoRequest {
    pub fn page(&self) -> u32 {
        match self {
            PhotoRequest::Browse { page, .. } | PhotoRequest::Search { page, .. } => *page,
        }
    }

    /// Path relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            PhotoRequest::Browse { .. } => "photos",
            PhotoRequest::Search { .. } => "search/photos",
        }
    }

    /// Query parameters, excluding the client identifier.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            PhotoRequest::Browse { page, per_page } => vec![
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
            PhotoRequest::Search { query, page } => {
                vec![("query", query.clone()), ("page", page.to_string())]
            }
        }
    }

    /// Full request URL under `base`, with `client_id` as the first parameter.
    ///
    /// `base` is treated as a directory: a missing trailing slash is added
    /// so the endpoint path is appended rather than replacing the last segment.
    pub fn to_url(&self, base: &Url, client_id: &str) -> Result<Url, ApiError> {
        let base = if base.path().ends_with('/') {
            base.clone()
        } else {
            let mut dir = base.clone();
            dir.set_path(&format!("{}/", base.path()));
            dir
        };
        let mut url = base.join(self.endpoint())?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("client_id", client_id);
            for (key, value) in self.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}

/// `url` as a string with the `client_id` value masked, for logging.
pub fn redact_client_id(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "client_id" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.into()
}

/// Source of photo pages.
#[async_trait]
pub trait PhotoApi: Send + Sync {
    /// One page of unfiltered photos.
    async fn list_photos(&self, page: u32, per_page: u32) -> Result<Vec<Image>, ApiError>;

    /// One page of photos matching `query`.
    async fn search_photos(&self, query: &str, page: u32) -> Result<SearchResult, ApiError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::types::ImageUrls;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// `count` images with ids `{prefix}-0`, `{prefix}-1`, ...
    pub fn sample_images(prefix: &str, count: usize) -> Vec<Image> {
        (0..count)
            .map(|i| Image {
                id: format!("{prefix}-{i}"),
                urls: ImageUrls {
                    small: Some(format!("https://images.test/{prefix}-{i}-small.jpg")),
                    full: Some(format!("https://images.test/{prefix}-{i}-full.jpg")),
                },
            })
            .collect()
    }

    pub fn decode_error() -> ApiError {
        ApiError::Decode(serde_json::from_str::<Vec<Image>>("{\"id\":").unwrap_err())
    }

    /// Canned reply for the next call.
    pub enum MockReply {
        Photos(Vec<Image>),
        Search(SearchResult),
        Fail(ApiError),
    }

    /// Mock API that records requests and replays queued replies in order.
    ///
    /// With a gate installed, each call signals `entered` and then parks
    /// until the test calls `release`, which lets tests observe state while
    /// a fetch is outstanding.
    #[derive(Default)]
    pub struct MockPhotoApi {
        pub requests: Mutex<Vec<PhotoRequest>>,
        pub replies: Mutex<VecDeque<MockReply>>,
        gate: Option<Arc<Notify>>,
        pub entered: Arc<Notify>,
    }

    impl MockPhotoApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_replies(replies: Vec<MockReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            }
        }

        pub fn gated(replies: Vec<MockReply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                gate: Some(Arc::new(Notify::new())),
                ..Self::default()
            }
        }

        pub fn push(&self, reply: MockReply) {
            self.replies.lock().unwrap().push_back(reply);
        }

        /// Let one parked call complete.
        pub fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        pub fn get_requests(&self) -> Vec<PhotoRequest> {
            self.requests.lock().unwrap().clone()
        }

        async fn next_reply(&self, request: PhotoRequest) -> MockReply {
            self.requests.lock().unwrap().push(request);
            self.entered.notify_one();
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(MockReply::Fail(decode_error()))
        }
    }

    #[async_trait]
    impl PhotoApi for MockPhotoApi {
        async fn list_photos(&self, page: u32, per_page: u32) -> Result<Vec<Image>, ApiError> {
            match self
                .next_reply(PhotoRequest::Browse { page, per_page })
                .await
            {
                MockReply::Photos(images) => Ok(images),
                MockReply::Search(_) => Err(decode_error()),
                MockReply::Fail(err) => Err(err),
            }
        }

        async fn search_photos(&self, query: &str, page: u32) -> Result<SearchResult, ApiError> {
            let request = PhotoRequest::Search {
                query: query.to_string(),
                page,
            };
            match self.next_reply(request).await {
                MockReply::Search(result) => Ok(result),
                MockReply::Photos(_) => Err(decode_error()),
                MockReply::Fail(err) => Err(err),
            }
        }
    }

    // =========================================================================
    // URL building
    // =========================================================================

    fn base() -> Url {
        Url::parse("https://api.unsplash.com/").unwrap()
    }

    #[test]
    fn browse_url() {
        let request = PhotoRequest::Browse {
            page: 3,
            per_page: 20,
        };
        let url = request.to_url(&base(), "KEY").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.unsplash.com/photos?client_id=KEY&page=3&per_page=20"
        );
    }

    #[test]
    fn search_url_encodes_query() {
        let request = PhotoRequest::Search {
            query: "black cats & dogs".into(),
            page: 1,
        };
        let url = request.to_url(&base(), "KEY").unwrap();
        assert_eq!(url.path(), "/search/photos");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "KEY".to_string()),
                ("query".to_string(), "black cats & dogs".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn base_without_trailing_slash_keeps_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/v1").unwrap();
        let request = PhotoRequest::Browse {
            page: 1,
            per_page: 20,
        };
        let url = request.to_url(&base, "k").unwrap();
        assert_eq!(url.path(), "/v1/photos");
    }

    #[test]
    fn redacted_url_masks_only_client_id() {
        let request = PhotoRequest::Search {
            query: "cats".into(),
            page: 2,
        };
        let url = request.to_url(&base(), "secret-key").unwrap();
        assert_eq!(
            redact_client_id(&url),
            "https://api.unsplash.com/search/photos?client_id=***&query=cats&page=2"
        );
    }

    #[test]
    fn request_page_and_endpoint() {
        let browse = PhotoRequest::Browse {
            page: 4,
            per_page: 20,
        };
        let search = PhotoRequest::Search {
            query: "cats".into(),
            page: 2,
        };
        assert_eq!(browse.page(), 4);
        assert_eq!(search.page(), 2);
        assert_eq!(browse.endpoint(), "photos");
        assert_eq!(search.endpoint(), "search/photos");
    }

    #[tokio::test]
    async fn mock_replays_in_order_and_records() {
        let api = MockPhotoApi::with_replies(vec![
            MockReply::Photos(sample_images("a", 2)),
            MockReply::Fail(decode_error()),
        ]);

        let first = api.list_photos(1, 20).await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(matches!(
            api.search_photos("x", 1).await,
            Err(ApiError::Decode(_))
        ));

        assert_eq!(
            api.get_requests(),
            vec![
                PhotoRequest::Browse {
                    page: 1,
                    per_page: 20
                },
                PhotoRequest::Search {
                    query: "x".into(),
                    page: 1
                },
            ]
        );
    }
}
