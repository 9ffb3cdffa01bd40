pub mod settings;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "photo-sync")]
#[command(about = "Copy a user's VK profile photos to Yandex.Disk")]
pub struct CliConfig {
    #[arg(long, default_value = "settings.toml")]
    pub config: String,

    #[arg(long, help = "Override the owner id from the settings file")]
    pub owner_id: Option<i64>,

    #[arg(long, help = "Override how many most-recent photos to copy")]
    pub count: Option<u32>,

    #[arg(long, help = "Override the destination folder name")]
    pub folder: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
