// ============================================================================
// MENSAJES DE ERROR - FetchError → texto para el usuario
// ============================================================================

use crate::services::FetchError;

pub const SESSION_EXPIRED: &str = "Session expired, please log in again.";
pub const NETWORK_UNREACHABLE: &str = "Unable to reach the server, please check your connection.";
pub const REQUEST_TIMED_OUT: &str = "The server took too long to respond, please try again.";
pub const NOT_LOGGED_IN: &str = "You are not logged in, please log in again.";
pub const UNEXPECTED_RESPONSE: &str = "The server sent an unexpected response.";

/// Mensaje común a todas las pantallas; `None` para HttpError no-401
fn common_message(error: &FetchError) -> Option<String> {
    match error {
        FetchError::Unauthenticated => Some(NOT_LOGGED_IN.to_string()),
        FetchError::Timeout { .. } => Some(REQUEST_TIMED_OUT.to_string()),
        FetchError::NetworkError(_) => Some(NETWORK_UNREACHABLE.to_string()),
        FetchError::MalformedResponse(_) => Some(UNEXPECTED_RESPONSE.to_string()),
        FetchError::NotFound { resource, .. } => Some(format!("This {} no longer exists.", resource)),
        FetchError::HttpError { .. } if error.is_session_expired() => Some(SESSION_EXPIRED.to_string()),
        FetchError::HttpError { .. } => None,
    }
}

/// Texto en lugar de la tabla cuando falla un listado
pub fn load_error_message(label: &str, error: &FetchError) -> String {
    common_message(error).unwrap_or_else(|| match error {
        FetchError::HttpError { message, .. } => format!("Could not load {}s: {}", label, message),
        other => other.to_string(),
    })
}

/// Texto del slot de error del modal (o del alert de delete)
pub fn mutation_error_message(error: &FetchError) -> String {
    common_message(error).unwrap_or_else(|| match error {
        FetchError::HttpError { message, .. } => message.clone(),
        other => other.to_string(),
    })
}

/// Login / signup: el mensaje del servidor va tal cual, incluso en 401
pub fn auth_error_message(error: &FetchError) -> String {
    match error {
        FetchError::HttpError { message, .. } => message.clone(),
        other => mutation_error_message(other),
    }
}
