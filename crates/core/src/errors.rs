use thiserror::Error;

/// A stored or typed label that names no known variant.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown {field} value `{value}`")]
    UnknownValue { field: &'static str, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFailure {
    /// The reservation store could not be reached or queried.
    StoreUnavailable,
    /// A stored row no longer decodes into a booking.
    UnreadableRecord,
}

/// Failure of a reservation report request, in the form handed back to the caller.
///
/// `detail` is for logs only; callers receive `user_message` and the correlation id.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{failure:?} [{correlation_id}]: {detail}")]
pub struct ReportError {
    failure: ReportFailure,
    detail: String,
    correlation_id: String,
}

impl ReportError {
    pub fn new(
        failure: ReportFailure,
        detail: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self { failure, detail: detail.into(), correlation_id: correlation_id.into() }
    }

    pub fn failure(&self) -> ReportFailure {
        self.failure
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Retrying helps only when the store itself was the problem.
    pub fn is_retryable(&self) -> bool {
        self.failure == ReportFailure::StoreUnavailable
    }

    pub fn user_message(&self) -> &'static str {
        match self.failure {
            ReportFailure::StoreUnavailable => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            ReportFailure::UnreadableRecord => {
                "A stored reservation could not be read. Quote the correlation id to support."
            }
        }
    }
}
