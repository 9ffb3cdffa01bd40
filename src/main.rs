use clap::Parser;
use photo_sync::domain::ports::NameAllocator;
use photo_sync::utils::{logger, validation::Validate};
use photo_sync::{
    CliConfig, DiskClient, LocalStorage, Passthrough, Settings, SyncEngine, SyncPipeline,
    UniqueNames, VkClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting photo-sync CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證設定（任何網路呼叫之前）
    let settings = match Settings::from_file(&cli.config) {
        Ok(settings) => settings.with_overrides(&cli),
        Err(e) => {
            tracing::error!("❌ Failed to load settings from '{}': {}", cli.config, e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 建立客戶端與管道
    let options = settings.run_options()?;
    let mut vk = VkClient::new(settings.tokens.vk_token.clone());
    if let Some(base_url) = settings.vk_base_url() {
        vk = vk.with_base_url(base_url);
    }
    let mut disk = DiskClient::new(settings.tokens.disk_token.clone(), settings.transfer_mode());
    if let Some(base_url) = settings.disk_base_url() {
        disk = disk.with_base_url(base_url);
    }
    let names: Box<dyn NameAllocator> = if settings.unique_names() {
        Box::new(UniqueNames)
    } else {
        Box::new(Passthrough)
    };
    let storage = LocalStorage::new(settings.output_path().to_string());

    let pipeline = SyncPipeline::new(vk, disk, names, storage, options);
    let engine = SyncEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Photo sync completed successfully!");
            println!("✅ Photo sync completed successfully!");
            println!("📁 Manifest saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Photo sync failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
