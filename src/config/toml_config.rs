use crate::adapters::http::{DEFAULT_ENDPOINT_PATH, DEFAULT_TIMEOUT_SECONDS};
use crate::config::inputs::AddressFilter;
use crate::core::request::{RequestKind, SET_MODE_METHOD, SET_PARAMETERS_METHOD};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BatchError, Result};
use crate::utils::validation::{
    validate_endpoint_path, validate_non_empty_string, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_TIMEOUT_SECONDS: u64 = 3600;

/// Optional settings file. Every section and key may be left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub client: ClientConfig,
    pub methods: MethodsConfig,
    pub inputs: InputsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_seconds: Option<u64>,
    pub endpoint_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodsConfig {
    pub set_parameters: Option<String>,
    pub set_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub validate_addresses: Option<bool>,
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BatchError::InputError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BatchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BatchError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        if timeout_seconds.is_some() {
            self.client.timeout_seconds = timeout_seconds;
        }
        self
    }

    pub fn with_address_filter_disabled(mut self, disabled: bool) -> Self {
        if disabled {
            self.inputs.validate_addresses = Some(false);
        }
        self
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.client.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn address_filter(&self) -> AddressFilter {
        if self.inputs.validate_addresses.unwrap_or(true) {
            AddressFilter::ValidIpOnly
        } else {
            AddressFilter::AcceptAll
        }
    }

    pub fn set_parameters_request(&self) -> RequestKind {
        RequestKind::SetParameters {
            method: self
                .methods
                .set_parameters
                .clone()
                .unwrap_or_else(|| SET_PARAMETERS_METHOD.to_string()),
        }
    }

    pub fn set_mode_request(&self) -> RequestKind {
        RequestKind::SetModeMediaLevel {
            method: self
                .methods
                .set_mode
                .clone()
                .unwrap_or_else(|| SET_MODE_METHOD.to_string()),
        }
    }
}

impl ConfigProvider for Settings {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds())
    }

    fn endpoint_path(&self) -> &str {
        self.client
            .endpoint_path
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT_PATH)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_range("client.timeout_seconds", self.timeout_seconds(), 1, MAX_TIMEOUT_SECONDS)?;
        validate_endpoint_path("client.endpoint_path", self.endpoint_path())?;

        if let Some(method) = &self.methods.set_parameters {
            validate_non_empty_string("methods.set_parameters", method)?;
        }
        if let Some(method) = &self.methods.set_mode {
            validate_non_empty_string("methods.set_mode", method)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::default();

        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.endpoint_path(), "/xmlrpc.cgi");
        assert_eq!(settings.address_filter(), AddressFilter::ValidIpOnly);
        assert_eq!(settings.set_parameters_request(), RequestKind::set_parameters());
        assert_eq!(settings.set_mode_request(), RequestKind::set_mode());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
[client]
timeout_seconds = 5
endpoint_path = "/cgi-bin/xmlrpc"

[methods]
set_parameters = "setUnitParameters"

[inputs]
validate_addresses = false
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.endpoint_path(), "/cgi-bin/xmlrpc");
        assert_eq!(settings.address_filter(), AddressFilter::AcceptAll);
        assert_eq!(
            settings.set_parameters_request().method_name(),
            "setUnitParameters"
        );
        assert_eq!(settings.set_mode_request().method_name(), "setModeMediaLevel");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RPC_BATCH_TEST_ENDPOINT", "/rpc/from-env");

        let toml_content = r#"
[client]
endpoint_path = "${RPC_BATCH_TEST_ENDPOINT}"
"#;

        let settings = Settings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.endpoint_path(), "/rpc/from-env");

        std::env::remove_var("RPC_BATCH_TEST_ENDPOINT");
    }

    #[test]
    fn test_invalid_settings_fail_validation() {
        let zero_timeout = Settings::from_toml_str("[client]\ntimeout_seconds = 0\n").unwrap();
        assert!(zero_timeout.validate().is_err());

        let bad_path = Settings::from_toml_str("[client]\nendpoint_path = \"xmlrpc.cgi\"\n").unwrap();
        assert!(bad_path.validate().is_err());

        let blank_method = Settings::from_toml_str("[methods]\nset_mode = \" \"\n").unwrap();
        assert!(blank_method.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Settings::from_toml_str("[client\ntimeout_seconds = 5").unwrap_err();
        assert!(matches!(err, BatchError::ConfigError { .. }));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_toml_str("[client]\ntimeout_seconds = 5\n")
            .unwrap()
            .with_timeout(Some(12))
            .with_address_filter_disabled(true);
        assert_eq!(settings.timeout_seconds(), 12);
        assert_eq!(settings.address_filter(), AddressFilter::AcceptAll);

        let untouched = Settings::default().with_timeout(None);
        assert_eq!(untouched.timeout_seconds(), 30);
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[client]\ntimeout_seconds = 7\n")
            .unwrap();

        let settings = Settings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.timeout_seconds(), 7);
    }
}
