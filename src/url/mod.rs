//! URL handling module for Site-Ingest
//!
//! This module provides origin normalization, host extraction, the organization
//! label heuristic, and the policy deciding which links belong to an origin.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{extract_company_label, extract_domain, staging_file_name};
pub use matcher::OriginMatch;
pub use normalize::{normalize_origin, origin_from_domain};
