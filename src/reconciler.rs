//! Merges the Yo Contribuyo and Hacienda answers into one `PartnerInfo`.
//!
//! Phase A (Yo Contribuyo) only ever contributes the e-mail. Phase B
//! (Hacienda) contributes name, identification type, registration status and
//! economic activity. A failure in either phase leaves its fields untouched
//! and never prevents the other phase from running.

use crate::config::LookupConfig;
use crate::enrichment::{
    first_active_activity, is_inscribed, normalize_identifier, select_activity,
};
use crate::errors::AppError;
use crate::models::{Diagnostics, EnrichmentPayload, PartnerInfo, RegistryPayload};
use crate::services::{HaciendaService, LookupResponse, RegistryLookup, YoContribuyoService};
use std::sync::Arc;

/// Maps a registry code to the caller's internal reference id.
pub trait ReferenceLookup: Send + Sync {
    fn resolve(&self, code: &str) -> Option<i64>;
}

/// Invoked after the economic-activity reference id was set.
pub type ActivityHook = Arc<dyn Fn(&mut PartnerInfo) + Send + Sync>;

/// Optional capabilities of the entity being populated.
///
/// A capability left as `None` means the target has no such field and the
/// corresponding resolution step is skipped.
#[derive(Clone, Default)]
pub struct ReferenceResolvers {
    pub identification_type: Option<Arc<dyn ReferenceLookup>>,
    pub economic_activity: Option<Arc<dyn ReferenceLookup>>,
    pub on_activity_resolved: Option<ActivityHook>,
}

impl ReferenceResolvers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_identification_types(mut self, lookup: Arc<dyn ReferenceLookup>) -> Self {
        self.identification_type = Some(lookup);
        self
    }

    pub fn with_economic_activities(mut self, lookup: Arc<dyn ReferenceLookup>) -> Self {
        self.economic_activity = Some(lookup);
        self
    }

    pub fn with_activity_hook(mut self, hook: ActivityHook) -> Self {
        self.on_activity_resolved = Some(hook);
        self
    }
}

#[derive(Clone)]
pub struct PartnerInfoReconciler {
    yo_contribuyo: Option<YoContribuyoService>,
    hacienda: Option<HaciendaService>,
}

impl PartnerInfoReconciler {
    /// Builds the clients for every source the config fully enables.
    pub fn new(config: &LookupConfig) -> Result<Self, AppError> {
        let reconciler = Self {
            yo_contribuyo: YoContribuyoService::from_config(config)?,
            hacienda: HaciendaService::from_config(config)?,
        };

        tracing::info!(
            "Partner lookup sources: yo_contribuyo={} hacienda={}",
            reconciler.yo_contribuyo.is_some(),
            reconciler.hacienda.is_some()
        );

        Ok(reconciler)
    }

    pub fn with_services(
        yo_contribuyo: Option<YoContribuyoService>,
        hacienda: Option<HaciendaService>,
    ) -> Self {
        Self {
            yo_contribuyo,
            hacienda,
        }
    }

    /// Look up a partner that has no previously stored values.
    pub async fn resolve(&self, identifier: &str, refs: &ReferenceResolvers) -> PartnerInfo {
        self.resolve_onto(PartnerInfo::default(), identifier, refs)
            .await
    }

    /// Look up a partner, starting from the values the caller currently holds.
    ///
    /// Diagnostics are never carried over from `prior`.
    pub async fn resolve_onto(
        &self,
        prior: PartnerInfo,
        identifier: &str,
        refs: &ReferenceResolvers,
    ) -> PartnerInfo {
        let mut info = PartnerInfo {
            diagnostics: Diagnostics::default(),
            ..prior
        };

        let identifier = normalize_identifier(identifier);
        if identifier.is_empty() {
            tracing::debug!("Empty identifier, skipping registry lookups");
            return info;
        }

        if let Some(ref service) = self.yo_contribuyo {
            let response = service.lookup(&identifier).await;
            apply_enrichment(&mut info, response);
        }

        if let Some(ref service) = self.hacienda {
            let response = service.lookup(&identifier).await;
            apply_registry(&mut info, response, refs);
        }

        info
    }
}

/// Phase A: only the e-mail list is applied, and only when non-empty.
pub fn apply_enrichment(info: &mut PartnerInfo, response: LookupResponse<EnrichmentPayload>) {
    info.diagnostics.secondary_source_last = response.diagnostic;

    match response.outcome {
        RegistryLookup::Data(payload) => match payload.joined_emails() {
            Some(emails) => {
                tracing::info!("Yo Contribuyo: applying registered e-mails");
                info.email = Some(emails);
            }
            None => tracing::info!("Yo Contribuyo: no registered e-mails"),
        },
        RegistryLookup::NoData => tracing::warn!("Yo Contribuyo: no data available"),
        RegistryLookup::Failed(e) => tracing::error!("Yo Contribuyo lookup failed: {}", e),
    }
}

/// Phase B: name, identification type, status and activity from Hacienda.
pub fn apply_registry(
    info: &mut PartnerInfo,
    response: LookupResponse<RegistryPayload>,
    refs: &ReferenceResolvers,
) {
    info.diagnostics.primary_source_last = response.diagnostic;

    let payload = match response.outcome {
        RegistryLookup::Data(payload) => payload,
        RegistryLookup::NoData => {
            tracing::warn!("Hacienda: no data available");
            return;
        }
        RegistryLookup::Failed(e) => {
            tracing::error!("Hacienda lookup failed: {}", e);
            return;
        }
    };

    if let Some(nombre) = payload.nombre.as_deref().filter(|n| !n.is_empty()) {
        info.name = Some(nombre.to_string());
    }

    if let Some(code) = payload
        .tipo_identificacion
        .as_deref()
        .filter(|c| !c.is_empty())
    {
        info.identification_type_code = Some(code.to_string());
        if let Some(ref lookup) = refs.identification_type {
            match lookup.resolve(code) {
                Some(id) => info.identification_type_id = Some(id),
                None => tracing::debug!("No identification type for code {}", code),
            }
        }
    }

    let status_text = payload.status_text().to_string();
    info.inscribed = Some(is_inscribed(&status_text));
    info.inscription_status_text = Some(status_text);

    // Clear first so a partner without activities loses its stale code
    info.activity_code = Some(String::new());
    if let Some(activity) = select_activity(&payload.actividades) {
        info.activity_code = Some(activity.code.clone().unwrap_or_default());
    }

    if let Some(ref lookup) = refs.economic_activity {
        let active_code =
            first_active_activity(&payload.actividades).and_then(|a| a.code.as_deref());
        if let Some(code) = active_code {
            match lookup.resolve(code) {
                Some(id) => {
                    info.economic_activity_id = Some(id);
                    if let Some(ref hook) = refs.on_activity_resolved {
                        hook(info);
                    }
                }
                None => tracing::debug!("No economic activity for code {}", code),
            }
        }
    }
}
