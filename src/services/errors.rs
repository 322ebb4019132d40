// ============================================================================
// ERRORES DE RED - Taxonomía cerrada que devuelve el RequestGateway
// ============================================================================

/// Fallo clasificado de una llamada al backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No hay token: la llamada ni siquiera sale a la red
    #[error("not authenticated")]
    Unauthenticated,
    #[error("request timed out after {after_ms} ms")]
    Timeout { after_ms: u32 },
    #[error("network error: {0}")]
    NetworkError(String),
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// Nivel aplicación: el id no aparece en el listado
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
}

impl FetchError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, FetchError::HttpError { status: 401, .. })
    }
}

/// Fallo del transporte HTTP (antes de tener status)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request aborted")]
    Aborted,
    #[error("{0}")]
    Network(String),
}
