use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Firebase web app settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
}

impl AppConfig {
    /// Build the configuration from a key lookup.
    ///
    /// Required keys:
    /// - `FIREBASE_API_KEY`
    /// - `FIREBASE_AUTH_DOMAIN`
    /// - `FIREBASE_PROJECT_ID`
    ///
    /// `FIREBASE_APP_ID` is optional. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            firebase: FirebaseConfig {
                api_key: required("FIREBASE_API_KEY")?,
                auth_domain: required("FIREBASE_AUTH_DOMAIN")?,
                project_id: required("FIREBASE_PROJECT_ID")?,
                app_id: get("FIREBASE_APP_ID"),
            },
        })
    }
}
