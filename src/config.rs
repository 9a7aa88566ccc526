use std::time::Duration;

/// Fixed per-request timeout for registry lookups.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-company registry settings.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub secondary_enabled: bool,
    pub secondary_base_url: Option<String>,
    pub secondary_user: Option<String>,
    pub secondary_token: Option<String>,
    pub primary_enabled: bool,
    pub primary_base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            secondary_enabled: false,
            secondary_base_url: None,
            secondary_user: None,
            secondary_token: None,
            primary_enabled: false,
            primary_base_url: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl LookupConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_vars(|key| std::env::var(key).ok())?;

        tracing::info!("Lookup configuration loaded successfully");
        tracing::debug!(
            "Hacienda: enabled={} ready={} base_url={:?}",
            config.primary_enabled,
            config.primary_ready(),
            config.primary_base_url
        );
        // Credentials stay out of the logs
        tracing::debug!(
            "Yo Contribuyo: enabled={} ready={} base_url={:?}",
            config.secondary_enabled,
            config.secondary_ready(),
            config.secondary_base_url
        );

        Ok(config)
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            secondary_enabled: parse_flag(
                "YO_CONTRIBUYO_ENABLED",
                non_blank(&var, "YO_CONTRIBUYO_ENABLED"),
            )?,
            secondary_base_url: parse_url(
                "YO_CONTRIBUYO_BASE_URL",
                non_blank(&var, "YO_CONTRIBUYO_BASE_URL"),
            )?,
            secondary_user: non_blank(&var, "YO_CONTRIBUYO_USER"),
            secondary_token: non_blank(&var, "YO_CONTRIBUYO_TOKEN"),
            primary_enabled: parse_flag("HACIENDA_ENABLED", non_blank(&var, "HACIENDA_ENABLED"))?,
            primary_base_url: parse_url(
                "HACIENDA_BASE_URL",
                non_blank(&var, "HACIENDA_BASE_URL"),
            )?,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Flag, base URL and both credentials are all present.
    pub fn secondary_ready(&self) -> bool {
        self.secondary_enabled
            && self.secondary_base_url.is_some()
            && self.secondary_user.is_some()
            && self.secondary_token.is_some()
    }

    pub fn primary_ready(&self) -> bool {
        self.primary_enabled && self.primary_base_url.is_some()
    }
}

/// Settings for the HTTP surface.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub reference_catalog_path: Option<String>,
    pub lookup: LookupConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let lookup = LookupConfig::from_env()?;

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            reference_catalog_path: std::env::var("REFERENCE_CATALOG_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            lookup,
        };

        tracing::debug!("Server Port: {}", config.port);
        if let Some(ref path) = config.reference_catalog_path {
            tracing::info!("Reference catalog configured: {}", path);
        }

        Ok(config)
    }
}

fn non_blank<F>(var: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(key: &str, value: Option<String>) -> anyhow::Result<bool> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(other) => anyhow::bail!("{} must be a boolean flag, got '{}'", key, other),
    }
}

fn parse_url(key: &str, value: Option<String>) -> anyhow::Result<Option<String>> {
    match value {
        Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
            anyhow::bail!("{} must start with http:// or https://", key)
        }
        other => Ok(other),
    }
}
