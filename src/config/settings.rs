use crate::adapters::disk::TransferMode;
use crate::config::CliConfig;
use crate::core::manifest::ManifestFormat;
use crate::core::pipeline::RunOptions;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_required_field, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_COUNT: u32 = 5;
const DEFAULT_FOLDER: &str = "vk_photos";
const DEFAULT_OUTPUT_PATH: &str = ".";
const DEFAULT_MANIFEST_FILENAME: &str = "result.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub tokens: TokensConfig,
    pub sync: SyncConfig,
    pub manifest: Option<ManifestConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokensConfig {
    pub vk_token: String,
    pub disk_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub owner_id: Option<i64>,
    pub count: Option<u32>,
    pub folder: Option<String>,
    pub transfer: Option<TransferMode>,
    pub unique_names: Option<bool>,
    pub vk_base_url: Option<String>,
    pub disk_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    pub output_path: Option<String>,
    pub filename: Option<String>,
    pub format: Option<ManifestFormat>,
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SyncError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SyncError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VK_TOKEN})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// CLI 旗標覆寫設定檔的值
    pub fn with_overrides(mut self, cli: &CliConfig) -> Self {
        if let Some(owner_id) = cli.owner_id {
            self.sync.owner_id = Some(owner_id);
        }
        if let Some(count) = cli.count {
            self.sync.count = Some(count);
        }
        if let Some(folder) = &cli.folder {
            self.sync.folder = Some(folder.clone());
        }
        self
    }

    pub fn owner_id(&self) -> Result<i64> {
        validate_required_field("sync.owner_id", &self.sync.owner_id).copied()
    }

    pub fn count(&self) -> u32 {
        self.sync.count.unwrap_or(DEFAULT_COUNT)
    }

    pub fn folder(&self) -> &str {
        self.sync.folder.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    pub fn transfer_mode(&self) -> TransferMode {
        self.sync.transfer.unwrap_or_default()
    }

    pub fn unique_names(&self) -> bool {
        self.sync.unique_names.unwrap_or(true)
    }

    pub fn vk_base_url(&self) -> Option<&str> {
        self.sync.vk_base_url.as_deref()
    }

    pub fn disk_base_url(&self) -> Option<&str> {
        self.sync.disk_base_url.as_deref()
    }

    pub fn output_path(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(|m| m.output_path.as_deref())
            .unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    pub fn manifest_filename(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(|m| m.filename.as_deref())
            .unwrap_or(DEFAULT_MANIFEST_FILENAME)
    }

    pub fn manifest_format(&self) -> ManifestFormat {
        self.manifest
            .as_ref()
            .and_then(|m| m.format)
            .unwrap_or_default()
    }

    pub fn run_options(&self) -> Result<RunOptions> {
        Ok(RunOptions {
            owner_id: self.owner_id()?,
            count: self.count(),
            folder: self.folder().to_string(),
            output_path: self.output_path().to_string(),
            manifest_filename: self.manifest_filename().to_string(),
            manifest_format: self.manifest_format(),
        })
    }

    fn validate_token(field: &str, value: &str) -> Result<()> {
        validate_non_empty_string(field, value)?;
        // 未解析的 ${VAR} 佔位符視為缺少環境變數
        if value.starts_with("${") {
            return Err(SyncError::InvalidConfigValueError {
                field: field.to_string(),
                value: value.to_string(),
                reason: "Environment variable is not set".to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_settings(&self) -> Result<()> {
        Self::validate_token("tokens.vk_token", &self.tokens.vk_token)?;
        Self::validate_token("tokens.disk_token", &self.tokens.disk_token)?;

        self.owner_id()?;
        validate_positive_number("sync.count", self.count() as usize, 1)?;
        validate_non_empty_string("sync.folder", self.folder())?;
        validate_non_empty_string("manifest.filename", self.manifest_filename())?;

        if let Some(base_url) = self.vk_base_url() {
            validate_url("sync.vk_base_url", base_url)?;
        }
        if let Some(base_url) = self.disk_base_url() {
            validate_url("sync.disk_base_url", base_url)?;
        }

        Ok(())
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validate_settings()
    }
}
