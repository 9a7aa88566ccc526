//! Costa Rica taxpayer lookup library.
//!
//! Resolves a business partner's tax registration data from the Hacienda
//! taxpayer registry and the Yo Contribuyo e-mail registry, keyed by national
//! identification number, and reconciles both answers into one record.
//!
//! # Modules
//!
//! - `catalog`: Reference tables for identification types and economic activities.
//! - `config`: Configuration management.
//! - `enrichment`: Identifier normalization, activity selection, status classification.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Registry payloads and the merged partner record.
//! - `reconciler`: Two-phase lookup and merge.
//! - `services`: Registry clients (Hacienda, Yo Contribuyo).

pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reconciler;
pub mod services;
