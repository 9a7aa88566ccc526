use crate::config::LookupConfig;
use crate::errors::AppError;
use crate::models::{EnrichmentPayload, RegistryPayload};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Raw outcome of one registry GET.
#[derive(Debug, Clone)]
pub enum RegistryQueryResult {
    /// The registry answered, whatever the status code.
    Success { status: u16, body: Vec<u8> },
    /// Transport error or timeout; nothing was received.
    Failure(AppError),
}

impl RegistryQueryResult {
    /// Audit string kept as the source's "last response".
    pub fn diagnostic(&self) -> String {
        match self {
            RegistryQueryResult::Success { status, body } => {
                format!("{} - {}", status, String::from_utf8_lossy(body))
            }
            RegistryQueryResult::Failure(e) => format!("Error: {}", e),
        }
    }

    /// Body worth parsing: status 200 or 202 and non-empty.
    pub fn usable_body(&self) -> Option<&[u8]> {
        match self {
            RegistryQueryResult::Success { status, body } if is_usable(*status, body) => Some(body),
            _ => None,
        }
    }

    /// Decode the usable body into the source's payload schema.
    pub fn into_lookup<T: DeserializeOwned>(self) -> LookupResponse<T> {
        let diagnostic = self.diagnostic();

        let body = match self {
            RegistryQueryResult::Success { status, body } if is_usable(status, &body) => body,
            RegistryQueryResult::Success { .. } => {
                return LookupResponse {
                    outcome: RegistryLookup::NoData,
                    diagnostic,
                }
            }
            RegistryQueryResult::Failure(e) => {
                return LookupResponse {
                    outcome: RegistryLookup::Failed(e),
                    diagnostic,
                }
            }
        };

        match decode::<T>(&body) {
            Ok(payload) => LookupResponse {
                outcome: RegistryLookup::Data(payload),
                diagnostic,
            },
            Err(e) => LookupResponse {
                outcome: RegistryLookup::Failed(e),
                diagnostic,
            },
        }
    }
}

fn is_usable(status: u16, body: &[u8]) -> bool {
    matches!(status, 200 | 202) && !body.is_empty()
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let text = std::str::from_utf8(body).map_err(|e| {
        AppError::MalformedResponse(format!("Response body is not valid UTF-8: {}", e))
    })?;
    // Both envelopes are JSON objects; derived struct impls would also take arrays
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(AppError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// What a registry lookup yielded for the reconciler.
#[derive(Debug, Clone)]
pub enum RegistryLookup<T> {
    Data(T),
    /// Non-200/202 status or empty body: nothing to apply.
    NoData,
    Failed(AppError),
}

#[derive(Debug, Clone)]
pub struct LookupResponse<T> {
    pub outcome: RegistryLookup<T>,
    pub diagnostic: String,
}

impl<T> LookupResponse<T> {
    /// Replace the raw diagnostic with the error text when the body was undecodable.
    pub fn with_error_diagnostic(mut self) -> Self {
        if let RegistryLookup::Failed(ref e @ AppError::MalformedResponse(_)) = self.outcome {
            self.diagnostic = format!("Error: {}", e);
        }
        self
    }
}

/// Shared GET `{base_url}identificacion={id}` plumbing for both registries.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    source: &'static str,
    base_url: String,
    headers: Vec<(&'static str, String)>,
}

impl RegistryClient {
    pub fn new(
        source: &'static str,
        base_url: String,
        headers: Vec<(&'static str, String)>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::InternalError(format!("Failed to create {} client: {}", source, e))
        })?;

        Ok(Self {
            client,
            source,
            base_url,
            headers,
        })
    }

    pub fn endpoint(&self, identifier: &str) -> String {
        format!("{}identificacion={}", self.base_url, identifier)
    }

    /// Never fails: transport errors come back as `RegistryQueryResult::Failure`.
    pub async fn query(&self, identifier: &str) -> RegistryQueryResult {
        match self.send(identifier).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("{}: request for {} failed: {}", self.source, identifier, e);
                RegistryQueryResult::Failure(e)
            }
        }
    }

    async fn send(&self, identifier: &str) -> Result<RegistryQueryResult, AppError> {
        let url = self.endpoint(identifier);
        tracing::info!("{}: looking up identifier {}", self.source, identifier);
        tracing::debug!("{} URL: {}", self.source, url);

        let mut request = self.client.get(&url);
        for (name, value) in &self.headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        if matches!(status, 200 | 202) {
            tracing::info!("{}: received {} ({} bytes)", self.source, status, body.len());
        } else {
            tracing::warn!("{}: registry returned status {}", self.source, status);
        }

        Ok(RegistryQueryResult::Success { status, body })
    }
}

/// Yo Contribuyo: secondary source, used only for registered e-mail addresses.
#[derive(Clone)]
pub struct YoContribuyoService {
    registry: RegistryClient,
}

impl YoContribuyoService {
    pub fn new(
        base_url: String,
        user: String,
        token: String,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let headers = vec![("access-user", user), ("access-token", token)];
        Ok(Self {
            registry: RegistryClient::new("Yo Contribuyo", base_url, headers, timeout)?,
        })
    }

    /// `None` unless the flag, base URL and both credentials are configured.
    pub fn from_config(config: &LookupConfig) -> Result<Option<Self>, AppError> {
        if !config.secondary_ready() {
            return Ok(None);
        }
        match (
            &config.secondary_base_url,
            &config.secondary_user,
            &config.secondary_token,
        ) {
            (Some(base_url), Some(user), Some(token)) => Self::new(
                base_url.clone(),
                user.clone(),
                token.clone(),
                config.request_timeout,
            )
            .map(Some),
            _ => Ok(None),
        }
    }

    pub async fn lookup(&self, identifier: &str) -> LookupResponse<EnrichmentPayload> {
        self.registry.query(identifier).await.into_lookup()
    }
}

/// Hacienda taxpayer registry: primary source for name, status and activities.
#[derive(Clone)]
pub struct HaciendaService {
    registry: RegistryClient,
}

impl HaciendaService {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let headers = vec![("content-type", "application/json".to_string())];
        Ok(Self {
            registry: RegistryClient::new("Hacienda", base_url, headers, timeout)?,
        })
    }

    /// `None` unless the flag and base URL are configured.
    pub fn from_config(config: &LookupConfig) -> Result<Option<Self>, AppError> {
        match &config.primary_base_url {
            Some(base_url) if config.primary_enabled => {
                Self::new(base_url.clone(), config.request_timeout).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// An undecodable body is recorded as `"Error: ..."`, like a transport failure.
    pub async fn lookup(&self, identifier: &str) -> LookupResponse<RegistryPayload> {
        self.registry
            .query(identifier)
            .await
            .into_lookup()
            .with_error_diagnostic()
    }
}
