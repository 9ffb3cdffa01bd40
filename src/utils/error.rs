use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("VK request failed with status: {status}")]
    VkHttpError { status: u16 },

    #[error("VK API error {code}: {message}")]
    VkApiError { code: i64, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl SyncError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::ApiError(_) => "Check network connectivity and endpoint availability",
            SyncError::VkHttpError { .. } => {
                "Verify the VK access token is valid and has not expired"
            }
            SyncError::VkApiError { .. } => {
                "Check the VK token scope and that the owner id is accessible"
            }
            SyncError::IoError(_) => "Check file permissions and that the output path exists",
            SyncError::SerializationError(_)
            | SyncError::CsvError(_)
            | SyncError::ProcessingError { .. } => {
                "Inspect the manifest settings and re-run with --verbose"
            }
            SyncError::ConfigError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::InvalidConfigValueError { .. } => {
                "Fix the settings file (see settings.toml.example) and retry"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
