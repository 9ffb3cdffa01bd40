pub mod engine;
pub mod manifest;
pub mod names;
pub mod pipeline;

pub use crate::domain::model::{
    ContainerStatus, PhotoDescriptor, TransferReport, TransferStatus,
};
pub use crate::domain::ports::{NameAllocator, PhotoSource, Pipeline, RemoteStorage, Storage};
pub use crate::utils::error::Result;
