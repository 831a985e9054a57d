use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("HTTP transport failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Unexpected API response: {message}")]
    ProtocolError { message: String },

    #[error("Couldn't gather required number of unique chart entries: found {found}, need {required}")]
    InsufficientResults { found: usize, required: usize },

    #[error("Delivery failed with status {status}: {message}")]
    DeliveryError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Protocol,
    Data,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DigestError {
    pub fn protocol(message: impl Into<String>) -> Self {
        DigestError::ProtocolError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DigestError::TransportError(_) => ErrorCategory::Network,
            DigestError::ProtocolError { .. } => ErrorCategory::Protocol,
            DigestError::InsufficientResults { .. } => ErrorCategory::Data,
            DigestError::DeliveryError { .. } => ErrorCategory::Delivery,
            DigestError::IoError(_) => ErrorCategory::System,
            DigestError::ConfigError { .. }
            | DigestError::MissingConfigError { .. }
            | DigestError::InvalidConfigValueError { .. }
            | DigestError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 外部服務暫時失敗，下次排程重跑即可
            ErrorCategory::Network | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Protocol | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DigestError::TransportError(_) => "Check network connectivity and the configured base URLs",
            DigestError::ProtocolError { .. } => {
                "Verify the API token and that the tracker/catalog API has not changed"
            }
            DigestError::InsufficientResults { .. } => {
                "Try a longer chart period, the current chart has too few unique albums"
            }
            DigestError::DeliveryError { .. } => {
                "Check the email API token, sender signature and template id"
            }
            DigestError::IoError(_) => "Check file permissions and that the config path exists",
            DigestError::ConfigError { .. }
            | DigestError::MissingConfigError { .. }
            | DigestError::InvalidConfigValueError { .. }
            | DigestError::ConfigValidationError { .. } => "Fix the configuration file and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Protocol => format!("A remote service answered unexpectedly: {}", self),
            ErrorCategory::Data => format!("Not enough chart data: {}", self),
            ErrorCategory::Delivery => format!("The digest email was not sent: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
