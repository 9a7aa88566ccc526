use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============ Yo Contribuyo (secondary registry) ============

/// Envelope returned by Yo Contribuyo: `{"Resultado": {"Correos": [...]}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    #[serde(rename = "Resultado", default)]
    pub resultado: Option<EnrichmentResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(rename = "Correos", default, deserialize_with = "null_as_empty")]
    pub correos: Vec<EmailEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailEntry {
    #[serde(rename = "Correo", default)]
    pub correo: Option<String>,
}

impl EnrichmentPayload {
    /// All registered addresses joined with `", "`, or `None` when the list is empty.
    pub fn joined_emails(&self) -> Option<String> {
        let correos = self.resultado.as_ref().map(|r| r.correos.as_slice())?;
        if correos.is_empty() {
            return None;
        }
        Some(
            correos
                .iter()
                .map(|c| c.correo.as_deref().unwrap_or(""))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

// ============ Hacienda (primary registry) ============

/// Envelope returned by the Hacienda taxpayer endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryPayload {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(rename = "tipoIdentificacion", default)]
    pub tipo_identificacion: Option<String>,
    #[serde(default)]
    pub situacion: Option<RegistryStatus>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actividades: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryStatus {
    #[serde(default)]
    pub estado: Option<String>,
}

/// One economic activity registered for the taxpayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(rename = "codigo", default, deserialize_with = "string_or_number")]
    pub code: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
}

impl ActivityEntry {
    pub fn new(code: &str, status: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            status: Some(status.to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(ACTIVE_STATUS)
    }
}

/// Status code Hacienda uses for an active economic activity.
pub const ACTIVE_STATUS: &str = "A";

impl RegistryPayload {
    pub fn status_text(&self) -> &str {
        self.situacion
            .as_ref()
            .and_then(|s| s.estado.as_deref())
            .unwrap_or("")
    }
}

// ============ Lookup result ============

/// Raw "last response" per source, kept for audit logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub secondary_source_last: String,
    pub primary_source_last: String,
}

/// Merged taxpayer data for one partner.
///
/// `None` means the lookup left the field alone. `activity_code` is the one
/// field that is reset on every successful Hacienda answer; `Some("")` there
/// means the stale value must be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub identification_type_code: Option<String>,
    pub identification_type_id: Option<i64>,
    pub activity_code: Option<String>,
    pub economic_activity_id: Option<i64>,
    pub inscription_status_text: Option<String>,
    pub inscribed: Option<bool>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

/// Body of `GET /api/v1/partners/:identifier/tax-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerTaxInfoResponse {
    pub identifier: String,
    pub partner: PartnerInfo,
    pub checked_at: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registry_payload_accepts_numeric_code() {
        let payload: RegistryPayload = serde_json::from_value(json!({
            "nombre": "ACME SOCIEDAD ANONIMA",
            "actividades": [{"codigo": 620100, "estado": "A"}]
        }))
        .unwrap();
        assert_eq!(payload.actividades[0].code.as_deref(), Some("620100"));
        assert!(payload.actividades[0].is_active());
    }

    #[test]
    fn test_registry_payload_null_activities() {
        let payload: RegistryPayload =
            serde_json::from_value(json!({"actividades": null, "situacion": null})).unwrap();
        assert!(payload.actividades.is_empty());
        assert_eq!(payload.status_text(), "");
    }

    #[test]
    fn test_joined_emails() {
        let payload: EnrichmentPayload = serde_json::from_value(json!({
            "Resultado": {"Correos": [
                {"Correo": "facturas@acme.cr"},
                {"Correo": "contabilidad@acme.cr"}
            ]}
        }))
        .unwrap();
        assert_eq!(
            payload.joined_emails().as_deref(),
            Some("facturas@acme.cr, contabilidad@acme.cr")
        );
    }

    #[test]
    fn test_joined_emails_empty_list_is_none() {
        let payload: EnrichmentPayload =
            serde_json::from_value(json!({"Resultado": {"Correos": []}})).unwrap();
        assert_eq!(payload.joined_emails(), None);

        let payload: EnrichmentPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.joined_emails(), None);
    }
}
