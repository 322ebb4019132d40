// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> / Cell
// ============================================================================

pub mod channel_state;
pub mod notification_state;
pub mod operations_state;
pub mod row_bindings;
pub mod session_state;

pub use channel_state::{ChannelMembership, ConnectionState};
pub use notification_state::NotificationIndicator;
pub use operations_state::{OperationKind, PendingGuard, PendingOperation, PendingOperations};
pub use row_bindings::RowBindings;
pub use session_state::{Session, SessionWriter};
