// ============================================================================
// SERVICES - SOLO comunicación (HTTP, WebSocket, timers)
// ============================================================================

pub mod auth_service;
pub mod cancel;
pub mod channel_transport;
pub mod errors;
pub mod http_transport;
pub mod request_gateway;
pub mod resource_service;
pub mod timer;

pub use auth_service::AuthService;
pub use cancel::CancelHandle;
pub use channel_transport::{
    ChannelError, ChannelTransport, EventHandler, TransportEvent, WebSocketTransport,
};
pub use errors::{FetchError, TransportError};
pub use http_transport::{GlooTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use request_gateway::{ApiCall, RequestGateway};
pub use resource_service::{ResourceEndpoints, ResourceService};
pub use timer::{BrowserTimer, Timer};
