// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// One subdirectory per managed resource, each carrying its model, error
// taxonomy, and the write-path coordinator for that resource.
//
// This layer knows nothing about transports or drivers; it talks to the
// record store and the event bus through the traits in `crate::store` and
// `crate::messaging`.
//
// ============================================================================

pub mod company;
