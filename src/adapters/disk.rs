use crate::domain::model::{ContainerStatus, TransferFailure, TransferStatus};
use crate::domain::ports::RemoteStorage;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DISK_API_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

/// 上傳策略：proxy 先下載再上傳，remote 讓後端自己抓
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    #[default]
    Proxy,
    Remote,
}

#[derive(Debug, Deserialize)]
struct UploadLink {
    href: Option<String>,
}

pub struct DiskClient {
    client: Client,
    token: String,
    base_url: String,
    mode: TransferMode,
}

impl DiskClient {
    pub fn new(token: impl Into<String>, mode: TransferMode) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: DISK_API_BASE.to_string(),
            mode,
        }
    }

    /// 測試時改用 mock server 的端點
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> String {
        format!("OAuth {}", self.token)
    }

    /// 後端直接從來源 URL 抓檔，單一請求完成
    async fn remote_fetch(
        &self,
        dest_path: &str,
        source_url: &str,
    ) -> std::result::Result<TransferStatus, reqwest::Error> {
        let response = self
            .client
            .post(self.endpoint("resources/upload"))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("url", source_url), ("path", dest_path)])
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 201 || status == 202 {
            Ok(TransferStatus::Succeeded)
        } else {
            Ok(TransferStatus::Failed(TransferFailure::Upload(status)))
        }
    }

    /// 取上傳連結、下載來源位元組、再上傳
    async fn proxy_upload(
        &self,
        dest_path: &str,
        source_url: &str,
    ) -> std::result::Result<TransferStatus, reqwest::Error> {
        let link_response = self
            .client
            .get(self.endpoint("resources/upload"))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("path", dest_path), ("overwrite", "true")])
            .send()
            .await?;

        let link_status = link_response.status().as_u16();
        if link_status != 200 {
            return Ok(TransferStatus::Failed(TransferFailure::LinkRequest(
                link_status,
            )));
        }

        let link: UploadLink = link_response.json().await?;
        let Some(href) = link.href else {
            return Ok(TransferStatus::Failed(TransferFailure::NoUploadLink));
        };

        let source_response = self.client.get(source_url).send().await?;
        let source_status = source_response.status().as_u16();
        if !source_response.status().is_success() {
            return Ok(TransferStatus::Failed(TransferFailure::SourceDownload(
                source_status,
            )));
        }
        let payload = source_response.bytes().await?;

        tracing::debug!("📦 Uploading {} bytes to {}", payload.len(), dest_path);
        let upload_response = self.client.put(&href).body(payload).send().await?;
        let upload_status = upload_response.status().as_u16();
        if upload_status == 201 || upload_status == 202 {
            Ok(TransferStatus::Succeeded)
        } else {
            Ok(TransferStatus::Failed(TransferFailure::Upload(
                upload_status,
            )))
        }
    }
}

#[async_trait]
impl RemoteStorage for DiskClient {
    async fn ensure_container(&self, name: &str) -> Result<ContainerStatus> {
        let response = self
            .client
            .put(self.endpoint("resources"))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("path", name)])
            .send()
            .await?;

        let status = match response.status().as_u16() {
            201 => ContainerStatus::Created,
            409 => ContainerStatus::AlreadyExists,
            other => ContainerStatus::Failed(other),
        };
        Ok(status)
    }

    async fn transfer(&self, dest_path: &str, source_url: &str) -> TransferStatus {
        let outcome = match self.mode {
            TransferMode::Remote => self.remote_fetch(dest_path, source_url).await,
            TransferMode::Proxy => self.proxy_upload(dest_path, source_url).await,
        };

        match outcome {
            Ok(status) => status,
            Err(error) => TransferStatus::Failed(TransferFailure::Transport(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_ensure_container_created_then_exists() {
        let server = MockServer::start();
        let client = DiskClient::new("disk-token", TransferMode::Proxy)
            .with_base_url(server.url("/"));

        let mut create_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/resources")
                .query_param("path", "vk_photos")
                .header("Authorization", "OAuth disk-token");
            then.status(201);
        });

        assert_eq!(
            client.ensure_container("vk_photos").await.unwrap(),
            ContainerStatus::Created
        );
        create_mock.assert();
        create_mock.delete();

        server.mock(|when, then| {
            when.method(PUT).path("/resources");
            then.status(409);
        });

        // Second create of the same container reports the conflict as success.
        assert_eq!(
            client.ensure_container("vk_photos").await.unwrap(),
            ContainerStatus::AlreadyExists
        );
    }

    #[tokio::test]
    async fn test_ensure_container_unexpected_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/resources");
            then.status(503);
        });

        let client =
            DiskClient::new("t", TransferMode::Proxy).with_base_url(server.url("/"));
        assert_eq!(
            client.ensure_container("vk_photos").await.unwrap(),
            ContainerStatus::Failed(503)
        );
    }

    #[tokio::test]
    async fn test_proxy_transfer_happy_path() {
        let server = MockServer::start();
        let client =
            DiskClient::new("disk-token", TransferMode::Proxy).with_base_url(server.url("/"));

        let link_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/resources/upload")
                .query_param("path", "vk_photos/10.jpg")
                .query_param("overwrite", "true");
            then.status(200).json_body(serde_json::json!({
                "href": server.url("/upload-target"),
                "method": "PUT",
                "templated": false
            }));
        });
        let source_mock = server.mock(|when, then| {
            when.method(GET).path("/photo-source.jpg");
            then.status(200).body("jpeg-bytes");
        });
        let upload_mock = server.mock(|when, then| {
            when.method(PUT).path("/upload-target").body("jpeg-bytes");
            then.status(201);
        });

        let status = client
            .transfer("vk_photos/10.jpg", &server.url("/photo-source.jpg"))
            .await;

        assert_eq!(status, TransferStatus::Succeeded);
        link_mock.assert();
        source_mock.assert();
        upload_mock.assert();
    }

    #[tokio::test]
    async fn test_proxy_transfer_missing_href_skips_download() {
        let server = MockServer::start();
        let client = DiskClient::new("t", TransferMode::Proxy).with_base_url(server.url("/"));

        server.mock(|when, then| {
            when.method(GET).path("/resources/upload");
            then.status(200).json_body(serde_json::json!({"method": "PUT"}));
        });
        let source_mock = server.mock(|when, then| {
            when.method(GET).path("/photo-source.jpg");
            then.status(200).body("jpeg-bytes");
        });

        let status = client
            .transfer("vk_photos/10.jpg", &server.url("/photo-source.jpg"))
            .await;

        assert_eq!(
            status,
            TransferStatus::Failed(TransferFailure::NoUploadLink)
        );
        source_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_proxy_transfer_link_request_failure() {
        let server = MockServer::start();
        let client = DiskClient::new("t", TransferMode::Proxy).with_base_url(server.url("/"));

        server.mock(|when, then| {
            when.method(GET).path("/resources/upload");
            then.status(507);
        });

        let status = client
            .transfer("vk_photos/10.jpg", "https://sun.example/p.jpg")
            .await;
        assert_eq!(
            status,
            TransferStatus::Failed(TransferFailure::LinkRequest(507))
        );
    }

    #[tokio::test]
    async fn test_proxy_transfer_source_download_failure() {
        let server = MockServer::start();
        let client = DiskClient::new("t", TransferMode::Proxy).with_base_url(server.url("/"));

        server.mock(|when, then| {
            when.method(GET).path("/resources/upload");
            then.status(200)
                .json_body(serde_json::json!({"href": server.url("/upload-target")}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/gone.jpg");
            then.status(404);
        });
        let upload_mock = server.mock(|when, then| {
            when.method(PUT).path("/upload-target");
            then.status(201);
        });

        let status = client
            .transfer("vk_photos/10.jpg", &server.url("/gone.jpg"))
            .await;

        assert_eq!(
            status,
            TransferStatus::Failed(TransferFailure::SourceDownload(404))
        );
        upload_mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_remote_transfer_single_request() {
        let server = MockServer::start();
        let client =
            DiskClient::new("disk-token", TransferMode::Remote).with_base_url(server.url("/"));

        let fetch_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/resources/upload")
                .query_param("url", "https://sun.example/w101.jpg")
                .query_param("path", "vk_photos/10.jpg")
                .header("Authorization", "OAuth disk-token");
            then.status(202);
        });

        let status = client
            .transfer("vk_photos/10.jpg", "https://sun.example/w101.jpg")
            .await;

        assert_eq!(status, TransferStatus::Succeeded);
        fetch_mock.assert();
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failed_status() {
        // Point at a closed port: reqwest errors must not propagate out of transfer.
        let client = DiskClient::new("t", TransferMode::Proxy)
            .with_base_url("http://127.0.0.1:1/");

        let status = client
            .transfer("vk_photos/10.jpg", "http://127.0.0.1:1/p.jpg")
            .await;

        assert!(matches!(
            status,
            TransferStatus::Failed(TransferFailure::Transport(_))
        ));
    }
}
