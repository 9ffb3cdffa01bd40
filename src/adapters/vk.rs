use crate::domain::model::PhotoDescriptor;
use crate::domain::ports::PhotoSource;
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const VK_API_BASE: &str = "https://api.vk.com/method";
const VK_API_VERSION: &str = "5.131";

/// 相簿照片列表的原始回應（error 與 response 互斥）
#[derive(Debug, Deserialize)]
struct VkPhotosResponse {
    error: Option<VkErrorBody>,
    response: Option<VkPhotoList>,
}

#[derive(Debug, Deserialize)]
struct VkErrorBody {
    error_code: i64,
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct VkPhotoList {
    items: Vec<VkPhoto>,
}

#[derive(Debug, Deserialize)]
struct VkPhoto {
    id: i64,
    date: i64,
    likes: VkLikes,
    sizes: Vec<VkSize>,
}

#[derive(Debug, Deserialize)]
struct VkLikes {
    count: i64,
}

#[derive(Debug, Deserialize)]
struct VkSize {
    #[serde(rename = "type")]
    size_type: String,
    width: u32,
    height: u32,
    url: String,
}

pub struct VkClient {
    client: Client,
    token: String,
    base_url: String,
    api_version: String,
}

impl VkClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: VK_API_BASE.to_string(),
            api_version: VK_API_VERSION.to_string(),
        }
    }

    /// 測試時改用 mock server 的端點
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }

    /// 從所有尺寸變體中挑面積最大的；同面積保留列表中先出現者
    fn best_size(sizes: &[VkSize]) -> Option<&VkSize> {
        sizes.iter().reduce(|best, candidate| {
            let best_area = u64::from(best.width) * u64::from(best.height);
            let candidate_area = u64::from(candidate.width) * u64::from(candidate.height);
            if candidate_area > best_area {
                candidate
            } else {
                best
            }
        })
    }
}

#[async_trait]
impl PhotoSource for VkClient {
    async fn fetch_photos(&self, owner_id: i64, count: u32) -> Result<Vec<PhotoDescriptor>> {
        let url = self.endpoint("photos.get");
        tracing::debug!("📡 Requesting photo listing from: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("owner_id", owner_id.to_string()),
                ("count", count.to_string()),
                ("album_id", "profile".to_string()),
                ("extended", "1".to_string()),
                ("photo_sizes", "1".to_string()),
                ("access_token", self.token.clone()),
                ("v", self.api_version.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 VK response status: {}", status);
        if !status.is_success() {
            return Err(SyncError::VkHttpError {
                status: status.as_u16(),
            });
        }

        let body: VkPhotosResponse = response.json().await?;
        if let Some(error) = body.error {
            return Err(SyncError::VkApiError {
                code: error.error_code,
                message: error.error_msg,
            });
        }

        let listing = body.response.ok_or_else(|| SyncError::ProcessingError {
            message: "VK response carried neither error nor payload".to_string(),
        })?;

        let mut photos = Vec::with_capacity(listing.items.len());
        for item in listing.items {
            let Some(best) = Self::best_size(&item.sizes) else {
                tracing::warn!("⚠️ Photo {} has no size variants, skipping", item.id);
                continue;
            };

            let taken_at = chrono::DateTime::from_timestamp(item.date, 0)
                .map(|date| date.to_rfc3339())
                .unwrap_or_else(|| item.date.to_string());
            tracing::debug!(
                "📡 Photo {}: {} likes, taken {}, best size '{}' ({}x{})",
                item.id,
                item.likes.count,
                taken_at,
                best.size_type,
                best.width,
                best.height
            );

            photos.push(PhotoDescriptor {
                source_id: item.id,
                file_name: format!("{}.jpg", item.likes.count),
                size_label: best.size_type.clone(),
                source_url: best.url.clone(),
                like_count: item.likes.count,
                timestamp: item.date,
            });
        }

        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn listing_json() -> serde_json::Value {
        serde_json::json!({
            "response": {
                "count": 2,
                "items": [
                    {
                        "id": 101,
                        "date": 111,
                        "likes": {"count": 10},
                        "sizes": [
                            {"type": "s", "width": 75, "height": 56, "url": "https://sun.example/s101.jpg"},
                            {"type": "w", "width": 1280, "height": 960, "url": "https://sun.example/w101.jpg"},
                            {"type": "m", "width": 130, "height": 97, "url": "https://sun.example/m101.jpg"}
                        ]
                    },
                    {
                        "id": 102,
                        "date": 222,
                        "likes": {"count": 3},
                        "sizes": [
                            {"type": "x", "width": 604, "height": 453, "url": "https://sun.example/x102.jpg"}
                        ]
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_photos_selects_largest_size() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/photos.get")
                .query_param("owner_id", "158393031")
                .query_param("count", "5")
                .query_param("album_id", "profile")
                .query_param("extended", "1")
                .query_param("photo_sizes", "1")
                .query_param("access_token", "vk-test-token")
                .query_param("v", "5.131");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(listing_json());
        });

        let client = VkClient::new("vk-test-token").with_base_url(server.url("/"));
        let photos = client.fetch_photos(158393031, 5).await.unwrap();

        api_mock.assert();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].size_label, "w");
        assert_eq!(photos[0].source_url, "https://sun.example/w101.jpg");
        assert_eq!(photos[0].file_name, "10.jpg");
        assert_eq!(photos[0].like_count, 10);
        assert_eq!(photos[0].timestamp, 111);
        assert_eq!(photos[1].size_label, "x");
    }

    #[tokio::test]
    async fn test_fetch_photos_ties_keep_first_variant() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/photos.get");
            then.status(200).json_body(serde_json::json!({
                "response": {
                    "count": 1,
                    "items": [{
                        "id": 7,
                        "date": 99,
                        "likes": {"count": 1},
                        "sizes": [
                            {"type": "y", "width": 800, "height": 600, "url": "https://sun.example/y7.jpg"},
                            {"type": "z", "width": 600, "height": 800, "url": "https://sun.example/z7.jpg"}
                        ]
                    }]
                }
            }));
        });

        let client = VkClient::new("t").with_base_url(server.url("/"));
        let photos = client.fetch_photos(1, 1).await.unwrap();

        // Equal areas: the first listed variant wins.
        assert_eq!(photos[0].size_label, "y");
    }

    #[tokio::test]
    async fn test_fetch_photos_http_error_is_fatal() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/photos.get");
            then.status(403);
        });

        let client = VkClient::new("t").with_base_url(server.url("/"));
        let error = client.fetch_photos(1, 5).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(error, SyncError::VkHttpError { status: 403 }));
    }

    #[tokio::test]
    async fn test_fetch_photos_api_error_payload() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/photos.get");
            then.status(200).json_body(serde_json::json!({
                "error": {"error_code": 5, "error_msg": "User authorization failed"}
            }));
        });

        let client = VkClient::new("t").with_base_url(server.url("/"));
        let error = client.fetch_photos(1, 5).await.unwrap_err();

        match error {
            SyncError::VkApiError { code, message } => {
                assert_eq!(code, 5);
                assert_eq!(message, "User authorization failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_photos_skips_items_without_sizes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/photos.get");
            then.status(200).json_body(serde_json::json!({
                "response": {
                    "count": 2,
                    "items": [
                        {"id": 1, "date": 10, "likes": {"count": 2}, "sizes": []},
                        {
                            "id": 2,
                            "date": 20,
                            "likes": {"count": 4},
                            "sizes": [{"type": "m", "width": 130, "height": 97, "url": "https://sun.example/m2.jpg"}]
                        }
                    ]
                }
            }));
        });

        let client = VkClient::new("t").with_base_url(server.url("/"));
        let photos = client.fetch_photos(1, 5).await.unwrap();

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].source_id, 2);
    }
}
