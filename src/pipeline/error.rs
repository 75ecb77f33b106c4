use thiserror::Error;

use crate::mx::Error as MxError;

/// Failures the pipeline did not expect. Any of them turns the verdict into
/// `status = Error`; ordinary negative answers never do.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("address '{email}' passed validation but could not be split")]
    Decompose { email: String },
    #[error("MX stage failed: {source}")]
    Mx {
        #[from]
        source: MxError,
    },
    #[error("verification aborted: {message}")]
    Panicked { message: String },
}

impl PipelineError {
    pub(crate) fn decompose(email: &str) -> Self {
        Self::Decompose {
            email: email.to_string(),
        }
    }

    /// Builds the error from a caught panic payload.
    pub(crate) fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        Self::Panicked {
            message: panic_message(payload),
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
