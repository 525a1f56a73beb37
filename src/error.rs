//! Failure taxonomy for the simplification call.

use thiserror::Error;

/// Any failure while asking the provider for a simplification.
///
/// Network errors, missing credentials, HTTP error statuses, malformed bodies
/// and empty answers all collapse into this one error. The cause is kept for
/// the log; the form only ever shows the fixed localized message.
#[derive(Debug, Error)]
#[error("provider call failed: {source:#}")]
pub struct ProviderCallFailed {
    #[source]
    source: anyhow::Error,
}

impl From<anyhow::Error> for ProviderCallFailed {
    fn from(source: anyhow::Error) -> Self {
        Self { source }
    }
}
