pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::disk::{DiskClient, TransferMode};
pub use adapters::storage::LocalStorage;
pub use adapters::vk::VkClient;
pub use config::settings::Settings;
pub use config::CliConfig;
pub use core::engine::SyncEngine;
pub use core::names::{Passthrough, UniqueNames};
pub use core::pipeline::{RunOptions, SyncPipeline};
pub use utils::error::{Result, SyncError};
