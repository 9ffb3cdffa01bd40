use crate::domain::model::{ManifestEntry, PhotoDescriptor};
use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    #[default]
    Json,
    Csv,
}

pub fn entries_for(photos: &[PhotoDescriptor]) -> Vec<ManifestEntry> {
    photos.iter().map(ManifestEntry::from).collect()
}

/// 依設定的格式輸出整份 manifest；每次執行整檔重寫
pub fn render(entries: &[ManifestEntry], format: ManifestFormat) -> Result<String> {
    match format {
        ManifestFormat::Json => render_json(entries),
        ManifestFormat::Csv => render_csv(entries),
    }
}

fn render_json(entries: &[ManifestEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

fn render_csv(entries: &[ManifestEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in entries {
        writer.serialize(entry)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SyncError::ProcessingError {
            message: format!("CSV writer flush failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| SyncError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}
