use crate::adapters::{itunes, postmark};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DigestError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PERIOD: &str = "week";
pub const DEFAULT_COUNTRY: &str = "DE";
pub const DEFAULT_DIGEST_NAME: &str = "Redacted Weekly";
pub const DEFAULT_USER_AGENT: &str = concat!("tracker-weekly/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub base_url: String,
    pub api_token: String,
    pub period: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: Option<String>,
    pub country: Option<String>,
    pub year_tolerance: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub base_url: Option<String>,
    pub api_token: String,
    pub from: String,
    pub to: String,
    pub template_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigestConfig {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DigestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DigestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GAZELLE_API_TOKEN})，找不到的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DigestError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("tracker.base_url", &self.tracker.base_url)?;
        validation::validate_secret("tracker.api_token", &self.tracker.api_token)?;

        validation::validate_url("catalog.base_url", self.catalog_base_url())?;
        validation::validate_country_code("catalog.country", self.country())?;
        validation::validate_range("catalog.year_tolerance", self.year_tolerance(), 0, 10)?;

        validation::validate_url("email.base_url", self.email_base_url())?;
        validation::validate_secret("email.api_token", &self.email.api_token)?;
        validation::validate_email_address("email.from", &self.email.from)?;
        validation::validate_email_address("email.to", &self.email.to)?;

        validation::validate_non_empty_string("digest.name", self.digest_name())?;

        if let Some(timeout) = self.http.timeout_seconds {
            validation::validate_range("http.timeout_seconds", timeout, 1, 600)?;
        }

        Ok(())
    }

    pub fn period(&self) -> &str {
        self.tracker.period.as_deref().unwrap_or(DEFAULT_PERIOD)
    }

    pub fn catalog_base_url(&self) -> &str {
        self.catalog
            .base_url
            .as_deref()
            .unwrap_or(itunes::DEFAULT_BASE_URL)
    }

    pub fn country(&self) -> &str {
        self.catalog.country.as_deref().unwrap_or(DEFAULT_COUNTRY)
    }

    pub fn year_tolerance(&self) -> i32 {
        self.catalog
            .year_tolerance
            .unwrap_or(itunes::DEFAULT_YEAR_TOLERANCE)
    }

    pub fn email_base_url(&self) -> &str {
        self.email
            .base_url
            .as_deref()
            .unwrap_or(postmark::DEFAULT_BASE_URL)
    }

    pub fn digest_name(&self) -> &str {
        self.digest.name.as_deref().unwrap_or(DEFAULT_DIGEST_NAME)
    }

    pub fn user_agent(&self) -> &str {
        self.http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

impl ConfigProvider for TomlConfig {
    fn period(&self) -> &str {
        self.period()
    }

    fn country(&self) -> &str {
        self.country()
    }

    fn digest_name(&self) -> &str {
        self.digest_name()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[tracker]
base_url = "https://tracker.example"
api_token = "gz-token"

[email]
api_token = "pm-token"
from = "digest@example.com"
to = "me@example.com"
template_id = 30755957
"#;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.period(), "week");
        assert_eq!(config.country(), "DE");
        assert_eq!(config.year_tolerance(), 3);
        assert_eq!(config.catalog_base_url(), "https://itunes.apple.com");
        assert_eq!(config.email_base_url(), "https://api.postmarkapp.com");
        assert_eq!(config.digest_name(), "Redacted Weekly");
        assert!(config.user_agent().starts_with("tracker-weekly/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[tracker]
base_url = "https://tracker.example"
api_token = "gz-token"
period = "month"

[catalog]
base_url = "http://127.0.0.1:9000"
country = "US"
year_tolerance = 1

[email]
base_url = "http://127.0.0.1:9001"
api_token = "pm-token"
from = "digest@example.com"
to = "me@example.com"
template_id = 42

[digest]
name = "Orpheus Weekly"

[http]
timeout_seconds = 15
user_agent = "custom-agent"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.period(), "month");
        assert_eq!(config.country(), "US");
        assert_eq!(config.year_tolerance(), 1);
        assert_eq!(config.email.template_id, 42);
        assert_eq!(config.digest_name(), "Orpheus Weekly");
        assert_eq!(config.http.timeout_seconds, Some(15));
        assert_eq!(config.user_agent(), "custom-agent");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TRACKER_WEEKLY_TEST_GZ_TOKEN", "from-env");

        let toml_content = MINIMAL.replace("gz-token", "${TRACKER_WEEKLY_TEST_GZ_TOKEN}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(config.tracker.api_token, "from-env");

        std::env::remove_var("TRACKER_WEEKLY_TEST_GZ_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = MINIMAL.replace("pm-token", "${TRACKER_WEEKLY_TEST_UNSET_VAR}");
        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert_eq!(config.email.api_token, "${TRACKER_WEEKLY_TEST_UNSET_VAR}");
        assert!(matches!(
            config.validate(),
            Err(DigestError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let bad_url = MINIMAL.replace("https://tracker.example", "tracker.example");
        assert!(TomlConfig::from_toml_str(&bad_url).unwrap().validate().is_err());

        let bad_email = MINIMAL.replace("me@example.com", "me");
        assert!(TomlConfig::from_toml_str(&bad_email).unwrap().validate().is_err());

        let bad_country = format!("{}\n[catalog]\ncountry = \"DEU\"\n", MINIMAL);
        assert!(TomlConfig::from_toml_str(&bad_country).unwrap().validate().is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let toml_content = r#"
[tracker]
base_url = "https://tracker.example"
api_token = "gz-token"
"#;
        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(DigestError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.tracker.base_url, "https://tracker.example");
    }
}
