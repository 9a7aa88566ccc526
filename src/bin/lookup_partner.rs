//! One-shot lookup of a single identifier against the configured registries.
//!
//! Usage: `lookup_partner <identifier>`

use dotenvy::dotenv;
use rust_hacienda_api::catalog::ReferenceCatalog;
use rust_hacienda_api::config::LookupConfig;
use rust_hacienda_api::reconciler::{PartnerInfoReconciler, ReferenceResolvers};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let identifier = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: lookup_partner <identifier>"))?;

    let config = LookupConfig::from_env()?;
    let resolvers = match env::var("REFERENCE_CATALOG_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            ReferenceCatalog::from_file(path)?.into_resolvers()
        }
        _ => ReferenceResolvers::none(),
    };

    let reconciler = PartnerInfoReconciler::new(&config)?;
    let info = reconciler.resolve(&identifier, &resolvers).await;

    println!("{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}
