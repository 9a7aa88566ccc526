/// Unit tests for registry payload handling
/// Tests wire-contract parsing and the reconciliation rules applied to real-shaped responses
use rust_hacienda_api::enrichment::{is_inscribed, normalize_identifier, select_activity};
use rust_hacienda_api::models::{EnrichmentPayload, PartnerInfo, RegistryPayload};
use rust_hacienda_api::reconciler::{apply_registry, ReferenceResolvers};
use rust_hacienda_api::services::RegistryQueryResult;

fn hacienda_response(status: u16, body: &str) -> RegistryQueryResult {
    RegistryQueryResult::Success {
        status,
        body: body.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod identifier_tests {
    use super::*;

    #[test]
    fn test_physical_person_cedula() {
        assert_eq!(normalize_identifier("1-0234-0567"), "102340567");
    }

    #[test]
    fn test_legal_entity_cedula() {
        assert_eq!(normalize_identifier("3-101-123456"), "3101123456");
    }

    #[test]
    fn test_dimex_without_separators() {
        assert_eq!(normalize_identifier("155812345678"), "155812345678");
    }
}

#[cfg(test)]
mod hacienda_payload_tests {
    use super::*;

    #[test]
    fn test_full_hacienda_response() {
        let body = r#"{
            "nombre": "ACME SOCIEDAD ANONIMA",
            "tipoIdentificacion": "02",
            "regimen": {"codigo": 1, "descripcion": "Régimen General"},
            "situacion": {"moroso": "NO", "omiso": "NO", "estado": "Inscrito de Oficio"},
            "actividades": [
                {"estado": "I", "tipo": "P", "codigo": "620100", "descripcion": "PROGRAMACION"},
                {"estado": "A", "tipo": "S", "codigo": "477100", "descripcion": "VENTA"}
            ]
        }"#;
        let payload: RegistryPayload = serde_json::from_str(body).unwrap();

        assert_eq!(payload.nombre.as_deref(), Some("ACME SOCIEDAD ANONIMA"));
        assert_eq!(payload.tipo_identificacion.as_deref(), Some("02"));
        assert!(is_inscribed(payload.status_text()));
        assert_eq!(
            select_activity(&payload.actividades).and_then(|a| a.code.as_deref()),
            Some("477100")
        );
    }

    #[test]
    fn test_minimal_hacienda_response() {
        let payload: RegistryPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.nombre, None);
        assert_eq!(payload.status_text(), "");
        assert!(select_activity(&payload.actividades).is_none());
    }

    #[test]
    fn test_apply_raw_response() {
        let result = hacienda_response(
            200,
            r#"{"situacion": {"estado": "Activo"}, "actividades": [{"codigo": "620100", "estado": "B"}]}"#,
        );
        let mut info = PartnerInfo::default();
        apply_registry(&mut info, result.into_lookup(), &ReferenceResolvers::none());

        assert_eq!(info.activity_code.as_deref(), Some("620100"));
        assert_eq!(info.inscribed, Some(true));
        assert!(info.diagnostics.primary_source_last.starts_with("200 - {"));
    }

    #[test]
    fn test_apply_non_usable_status() {
        let result = hacienda_response(400, r#"{"code": 400, "message": "Cédula inválida"}"#);
        let mut info = PartnerInfo::default();
        apply_registry(&mut info, result.into_lookup(), &ReferenceResolvers::none());

        assert_eq!(info.activity_code, None);
        assert_eq!(
            info.diagnostics.primary_source_last,
            r#"400 - {"code": 400, "message": "Cédula inválida"}"#
        );
    }

    #[test]
    fn test_array_body_keeps_stored_activity() {
        let mut info = PartnerInfo {
            activity_code: Some("123".to_string()),
            ..Default::default()
        };
        let lookup = hacienda_response(200, "[]").into_lookup();
        apply_registry(&mut info, lookup, &ReferenceResolvers::none());

        assert_eq!(info.activity_code.as_deref(), Some("123"));
        assert_eq!(info.inscribed, None);
        assert_eq!(info.inscription_status_text, None);
    }
}

#[cfg(test)]
mod yo_contribuyo_payload_tests {
    use super::*;

    #[test]
    fn test_multiple_emails() {
        let body = r#"{"Resultado": {"Correos": [
            {"Correo": "a@acme.cr", "Fecha": "2023-01-01"},
            {"Correo": "b@acme.cr"}
        ]}}"#;
        let payload: EnrichmentPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.joined_emails().as_deref(), Some("a@acme.cr, b@acme.cr"));
    }

    #[test]
    fn test_entry_without_address_kept_as_empty() {
        let body = r#"{"Resultado": {"Correos": [{"Correo": "a@acme.cr"}, {}]}}"#;
        let payload: EnrichmentPayload = serde_json::from_str(body).unwrap();
        assert_eq!(payload.joined_emails().as_deref(), Some("a@acme.cr, "));
    }

    #[test]
    fn test_null_result() {
        let payload: EnrichmentPayload =
            serde_json::from_str(r#"{"Resultado": null}"#).unwrap();
        assert_eq!(payload.joined_emails(), None);
    }
}
