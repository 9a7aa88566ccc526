use crate::config::LookupConfig;
use crate::enrichment::normalize_identifier;
use crate::errors::AppError;
use crate::models::PartnerTaxInfoResponse;
use crate::reconciler::{PartnerInfoReconciler, ReferenceResolvers};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry clients for every enabled source.
    pub reconciler: PartnerInfoReconciler,
    /// Reference tables available to this deployment.
    pub resolvers: ReferenceResolvers,
}

impl AppState {
    pub fn new(
        config: &LookupConfig,
        resolvers: ReferenceResolvers,
    ) -> Result<Self, AppError> {
        Ok(Self {
            reconciler: PartnerInfoReconciler::new(config)?,
            resolvers,
        })
    }
}

/// Routes served by the lookup service, without middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/partners/:identifier/tax-info",
            get(get_partner_tax_info),
        )
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-hacienda-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/partners/:identifier/tax-info
///
/// Runs both registry phases for the identifier. Registry outages do not fail
/// the request; they show up in `partner.diagnostics`.
pub async fn get_partner_tax_info(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<PartnerTaxInfoResponse>, AppError> {
    let identifier = normalize_identifier(&identifier);
    if identifier.is_empty() {
        return Err(AppError::BadRequest("Identifier is required".to_string()));
    }

    tracing::info!("GET /partners/{}/tax-info", identifier);
    let partner = state.reconciler.resolve(&identifier, &state.resolvers).await;

    Ok(Json(PartnerTaxInfoResponse {
        identifier,
        partner,
        checked_at: Utc::now().to_rfc3339(),
    }))
}
