use uuid::Uuid;

// ============================================================================
// Company Coordinator Errors
// ============================================================================
//
// Tagged per outcome so callers are forced to treat the inconsistent-state
// case distinctly from clean failures. `Store` and `Publish` both mean
// "nothing observable happened, the whole call may be retried";
// `Inconsistent` means a primary write stuck without its event and no
// automatic retry can resolve it.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    #[error("company {0} not found")]
    NotFound(Uuid),

    #[error("company \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("record store failure: {0}")]
    Store(#[source] anyhow::Error),

    #[error("event publish failed, store change was rolled back: {0}")]
    Publish(#[source] anyhow::Error),

    #[error(
        "inconsistent state during {operation} of company {id}: \
         event publish failed ({publish_error}) and compensation failed ({compensation_error})"
    )]
    Inconsistent {
        operation: &'static str,
        id: Uuid,
        publish_error: anyhow::Error,
        compensation_error: anyhow::Error,
    },
}
