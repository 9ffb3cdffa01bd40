use crate::domain::model::{
    ContainerStatus, PhotoDescriptor, TransferReport, TransferStatus,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch_photos(&self, owner_id: i64, count: u32) -> Result<Vec<PhotoDescriptor>>;
}

#[async_trait]
pub trait RemoteStorage: Send + Sync {
    async fn ensure_container(&self, name: &str) -> Result<ContainerStatus>;
    async fn transfer(&self, dest_path: &str, source_url: &str) -> TransferStatus;
}

/// Assigns final destination names to a fetched batch. Implementations must
/// preserve order and batch length.
pub trait NameAllocator: Send + Sync {
    fn allocate(&self, photos: Vec<PhotoDescriptor>) -> Vec<PhotoDescriptor>;
}

impl NameAllocator for Box<dyn NameAllocator> {
    fn allocate(&self, photos: Vec<PhotoDescriptor>) -> Vec<PhotoDescriptor> {
        (**self).allocate(photos)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn fetch(&self) -> Result<Vec<PhotoDescriptor>>;
    async fn transfer(&self, photos: &[PhotoDescriptor]) -> Result<TransferReport>;
    async fn finalize(&self, photos: Vec<PhotoDescriptor>) -> Result<String>;
}
