use thiserror::Error;

/// Everything that can go wrong between the page, the platform push API,
/// and the remote subscription service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("push messaging is not supported on this platform")]
    Unsupported,
    #[error("worker registration failed: {message}")]
    Registration { message: String },
    #[error("platform call failed: {message}")]
    Platform { message: String },
    #[error("service base url must not be empty")]
    BaseUrlMissing,
    #[error("service base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
    #[error("request path must not be empty")]
    InvalidPath,
    #[error("application server key must not be empty")]
    EmptyKey,
    #[error("application server key is not valid base64url: {0}")]
    InvalidKey(#[from] base64::DecodeError),
    #[error("request failed: {message}")]
    Request { message: String },
    #[error("response read failed: {message}")]
    Read { message: String },
    #[error("json decode failed: {message}")]
    Decode { message: String },
    /// The service refused the operation. `message` is the error body's
    /// `message` field when present, otherwise a per-action fallback.
    #[error("{message}")]
    Rejected { message: String },
}

impl ClientError {
    /// Text shown to the user when `action` ("subscribe"/"unsubscribe")
    /// fails. Service rejections are surfaced verbatim; everything else
    /// gets a generic retry prompt.
    #[must_use]
    pub fn user_message(&self, action: &str) -> String {
        match self {
            Self::Rejected { message } => message.clone(),
            _ => format!("Failed to {action}. Please try again later."),
        }
    }

    /// Convenience for platform bindings that only have a stringly error.
    #[must_use]
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_surfaced_verbatim() {
        let error = ClientError::Rejected {
            message: "quota exceeded".to_string(),
        };
        assert_eq!(error.user_message("subscribe"), "quota exceeded");
    }

    #[test]
    fn transport_errors_fall_back_to_generic_text() {
        let error = ClientError::Request {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.user_message("unsubscribe"),
            "Failed to unsubscribe. Please try again later."
        );
    }
}
