use crate::core::manifest::{self, ManifestFormat};
use crate::core::{
    ContainerStatus, NameAllocator, PhotoDescriptor, PhotoSource, Pipeline, RemoteStorage,
    Storage, TransferReport, TransferStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Run parameters resolved from settings before the pipeline is built.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub owner_id: i64,
    pub count: u32,
    pub folder: String,
    pub output_path: String,
    pub manifest_filename: String,
    pub manifest_format: ManifestFormat,
}

pub struct SyncPipeline<V: PhotoSource, D: RemoteStorage, N: NameAllocator, S: Storage> {
    source: V,
    disk: D,
    names: N,
    storage: S,
    options: RunOptions,
}

impl<V: PhotoSource, D: RemoteStorage, N: NameAllocator, S: Storage> SyncPipeline<V, D, N, S> {
    pub fn new(source: V, disk: D, names: N, storage: S, options: RunOptions) -> Self {
        Self {
            source,
            disk,
            names,
            storage,
            options,
        }
    }
}

#[async_trait]
impl<V: PhotoSource, D: RemoteStorage, N: NameAllocator, S: Storage> Pipeline
    for SyncPipeline<V, D, N, S>
{
    async fn fetch(&self) -> Result<Vec<PhotoDescriptor>> {
        let photos = self
            .source
            .fetch_photos(self.options.owner_id, self.options.count)
            .await?;
        tracing::debug!("Fetched {} photo descriptors", photos.len());

        // 名稱在整批抓完後一次定案，之後不再變動
        Ok(self.names.allocate(photos))
    }

    async fn transfer(&self, photos: &[PhotoDescriptor]) -> Result<TransferReport> {
        // 資料夾建立失敗不中斷：逐項上傳仍會各自回報結果
        match self.disk.ensure_container(&self.options.folder).await {
            Ok(ContainerStatus::Created) => {
                tracing::info!("📁 Folder '{}' created", self.options.folder);
            }
            Ok(ContainerStatus::AlreadyExists) => {
                tracing::info!("📁 Folder '{}' already exists", self.options.folder);
            }
            Ok(ContainerStatus::Failed(status)) => {
                tracing::warn!(
                    "⚠️ Could not create folder '{}' (status {}), attempting transfers anyway",
                    self.options.folder,
                    status
                );
            }
            Err(error) => {
                tracing::warn!(
                    "⚠️ Folder creation request failed ({}), attempting transfers anyway",
                    error
                );
            }
        }

        let mut report = TransferReport::default();
        for photo in photos {
            let dest_path = format!("{}/{}", self.options.folder, photo.file_name);
            report.attempted += 1;

            match self.disk.transfer(&dest_path, &photo.source_url).await {
                TransferStatus::Succeeded => {
                    report.succeeded += 1;
                    tracing::info!("✅ Uploaded: {}", dest_path);
                }
                TransferStatus::Failed(failure) => {
                    tracing::warn!("⚠️ Skipped '{}': {}", dest_path, failure);
                    report.failures.push((dest_path, failure));
                }
            }
        }

        Ok(report)
    }

    async fn finalize(&self, photos: Vec<PhotoDescriptor>) -> Result<String> {
        // manifest 記錄整批描述子，不看個別上傳成敗
        let entries = manifest::entries_for(&photos);
        let rendered = manifest::render(&entries, self.options.manifest_format)?;

        self.storage
            .write_file(&self.options.manifest_filename, rendered.as_bytes())
            .await?;

        tracing::debug!("Manifest recorded {} entries", entries.len());
        Ok(format!(
            "{}/{}",
            self.options.output_path, self.options.manifest_filename
        ))
    }
}
