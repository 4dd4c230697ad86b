use crate::adapters::auth::RoleGate;
use crate::core::carrier::{
    default_prefix_rules, CarrierProfile, PrefixRule, DEFAULT_CARRIER_NAME,
    DEFAULT_TRACKING_URL_TEMPLATE, NUMBER_PLACEHOLDER,
};
use crate::utils::error::{Result, TrackingError};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_prefixes,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub carrier: CarrierConfig,
    #[serde(default)]
    pub authorization: AuthorizationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierConfig {
    #[serde(default = "default_carrier_name")]
    pub name: String,
    #[serde(default = "default_tracking_url_template")]
    pub tracking_url_template: String,
    /// None keeps the built-in table; an empty list turns prefix hints off.
    pub prefixes: Option<Vec<PrefixRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(default = "default_staff_roles")]
    pub staff_roles: Vec<String>,
    #[serde(default = "default_customer_roles")]
    pub customer_roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_store_path() -> String {
    "./orders.json".to_string()
}

fn default_carrier_name() -> String {
    DEFAULT_CARRIER_NAME.to_string()
}

fn default_tracking_url_template() -> String {
    DEFAULT_TRACKING_URL_TEMPLATE.to_string()
}

fn default_staff_roles() -> Vec<String> {
    vec!["administrator".to_string(), "shop_manager".to_string()]
}

fn default_customer_roles() -> Vec<String> {
    vec!["customer".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            name: default_carrier_name(),
            tracking_url_template: default_tracking_url_template(),
            prefixes: None,
        }
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            staff_roles: default_staff_roles(),
            customer_roles: default_customer_roles(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackingError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${ORDER_STORE_PATH})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn carrier_profile(&self) -> CarrierProfile {
        CarrierProfile::new(
            &self.carrier.name,
            &self.carrier.tracking_url_template,
            self.carrier
                .prefixes
                .clone()
                .unwrap_or_else(default_prefix_rules),
        )
    }

    pub fn role_gate(&self) -> RoleGate {
        RoleGate::new(
            self.authorization.staff_roles.clone(),
            self.authorization.customer_roles.clone(),
        )
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("store.path", &self.store.path)?;
        validate_non_empty_string("carrier.name", &self.carrier.name)?;

        let template = &self.carrier.tracking_url_template;
        if !template.contains(NUMBER_PLACEHOLDER) {
            return Err(TrackingError::InvalidConfigValueError {
                field: "carrier.tracking_url_template".to_string(),
                value: template.clone(),
                reason: format!("Template must contain {}", NUMBER_PLACEHOLDER),
            });
        }
        validate_url(
            "carrier.tracking_url_template",
            &template.replace(NUMBER_PLACEHOLDER, "0"),
        )?;

        if let Some(prefixes) = &self.carrier.prefixes {
            let values: Vec<String> = prefixes.iter().map(|rule| rule.prefix.clone()).collect();
            validate_prefixes("carrier.prefixes", &values)?;
        }

        validate_non_empty_list("authorization.staff_roles", &self.authorization.staff_roles)?;

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(TrackingError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
