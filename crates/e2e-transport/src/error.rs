use serde_json::Value;
use std::fmt;

/// Failures talking to the node. None of these is a contract abort: an
/// abort is a committed transaction with `success == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced an HTTP response (DNS, TLS, connection, I/O).
    Request { url: String, message: String },
    /// The node answered with a non-2xx status.
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
        vm_error_code: Option<u64>,
    },
    /// The node answered, but not with the JSON shape we expected.
    Decode { context: String, message: String },
    /// The transaction stayed pending past the configured bound.
    WaitTimeout { hash: String, waited_ms: u128 },
    /// The signing message could not be built or signed.
    Signing(String),
}

impl TransportError {
    /// Build an `Api` error from a status and the node's error body
    /// (`{"message": …, "error_code": …, "vm_error_code": …}`).
    pub fn api(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let field = |name: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(name))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        };
        TransportError::Api {
            status,
            message: field("message").unwrap_or_else(|| body.trim().to_string()),
            error_code: field("error_code"),
            vm_error_code: parsed
                .as_ref()
                .and_then(|v| v.get("vm_error_code"))
                .and_then(|v| v.as_u64()),
        }
    }

    pub fn decode(context: impl Into<String>, message: impl fmt::Display) -> Self {
        TransportError::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Api { status: 404, .. })
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            TransportError::Api { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request { url, message } => {
                write!(f, "request to {} failed: {}", url, message)
            }
            TransportError::Api {
                status,
                message,
                error_code,
                vm_error_code,
            } => {
                write!(f, "node returned HTTP {}: {}", status, message)?;
                if let Some(code) = error_code {
                    write!(f, " ({})", code)?;
                }
                if let Some(vm) = vm_error_code {
                    write!(f, " [vm_error_code {}]", vm)?;
                }
                Ok(())
            }
            TransportError::Decode { context, message } => {
                write!(f, "unexpected response for {}: {}", context, message)
            }
            TransportError::WaitTimeout { hash, waited_ms } => {
                write!(f, "transaction {} still pending after {} ms", hash, waited_ms)
            }
            TransportError::Signing(msg) => write!(f, "signing failed: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}
