// ============================================================================
// Company Domain
// ============================================================================
//
// Everything Company-specific lives here:
// - Model (Company entity, CompanyType closed set)
// - Errors (CompanyError taxonomy)
// - Service (the write-path consistency coordinator)
//
// ============================================================================

pub mod errors;
pub mod model;
pub mod service;

// Re-export for convenience
pub use errors::CompanyError;
pub use model::{Company, CompanyType};
pub use service::CompanyService;
