use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://autoservicio.ute.com.uy/SelfService";
pub const DEFAULT_LOGIN_PATH: &str = "SSvcController/authenticate";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const REQUIRED_VARS: [&str; 4] = ["UTE_USER", "UTE_PASS", "UTE_SA_ID", "UTE_PS_ID"];

/// Everything needed to log into the portal and query one service point.
#[derive(Clone)]
pub struct PortalConfig {
    pub user: String,
    pub password: String,
    /// Service agreement id (`saId`)
    pub sa_id: String,
    /// Service point id (`psId` / `spId`)
    pub ps_id: String,
    pub base_url: String,
    pub login_path: String,
    pub timeout: Duration,
}

// Manual impl so the password never ends up in logs.
impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("sa_id", &self.sa_id)
            .field("ps_id", &self.ps_id)
            .field("base_url", &self.base_url)
            .field("login_path", &self.login_path)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PortalConfig {
    pub fn new(user: String, password: String, sa_id: String, ps_id: String) -> Self {
        PortalConfig {
            user,
            password,
            sa_id,
            ps_id,
            base_url: DEFAULT_BASE_URL.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the configuration from the process environment, after loading a
    /// `.env` file if there is one.
    pub fn from_env_values() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    ///
    /// All missing required variables are reported at once.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| -> Option<String> {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<String> = REQUIRED_VARS
            .iter()
            .filter(|&&name| get(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let mut config = PortalConfig::new(
            get("UTE_USER").unwrap_or_default(),
            get("UTE_PASS").unwrap_or_default(),
            get("UTE_SA_ID").unwrap_or_default(),
            get("UTE_PS_ID").unwrap_or_default(),
        );

        if let Some(base_url) = get("UTE_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(login_path) = get("UTE_LOGIN_PATH") {
            config.login_path = login_path.trim_start_matches('/').to_string();
        }
        if let Some(timeout) = get("UTE_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|e| ConfigError::InvalidValue {
                name: "UTE_TIMEOUT_SECS".to_string(),
                reason: format!("{e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
