use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntranetError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A client-side check refused the input; nothing was sent.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("No active session, run `intranet login` first")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type IntranetResult<T> = Result<T, IntranetError>;

impl IntranetError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        IntranetError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, IntranetError::Validation { .. })
    }

    /// Text for an error banner: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            IntranetError::Http { message, .. } if !message.is_empty() => message.clone(),
            IntranetError::Validation { message, .. } => message.clone(),
            IntranetError::Forbidden(reason) => reason.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Pulls the human readable message out of a DRF error body.
///
/// DRF answers with `{"error": ..}`, `{"detail": ..}` or a field map such as
/// `{"fecha_inicio": ["..."]}` depending on the view.
pub fn server_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return body.trim().to_string(),
    };

    for key in ["error", "detail", "message", "non_field_errors"] {
        if let Some(found) = value.get(key) {
            return flatten(found);
        }
    }

    match value.as_object() {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, flatten(v)))
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    }
}

fn flatten(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
