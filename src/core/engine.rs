use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct SyncEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SyncEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting photo sync...");

        // Fetch
        println!("Fetching photo list...");
        let photos = self.pipeline.fetch().await?;
        println!("Fetched {} photos", photos.len());

        // Transfer
        println!("Transferring photos...");
        let report = self.pipeline.transfer(&photos).await?;
        println!(
            "Transferred {}/{} photos",
            report.succeeded, report.attempted
        );
        for (dest_path, failure) in &report.failures {
            println!("  skipped {}: {}", dest_path, failure);
        }

        // Manifest
        println!("Writing manifest...");
        let output_path = self.pipeline.finalize(photos).await?;
        println!("Manifest saved to: {}", output_path);

        Ok(output_path)
    }
}
