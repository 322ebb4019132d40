// ============================================================================
// VIEWMODELS - Lógica de UI (sin DOM: todo pasa por RenderSink)
// ============================================================================

pub mod auth_viewmodel;
pub mod notification_channel;
pub mod resource_sync;

pub use auth_viewmodel::{AuthPages, AuthViewModel};
pub use notification_channel::NotificationChannel;
pub use resource_sync::{
    LoadOutcome, LoadState, MutateOutcome, MutateState, ResourceSyncController, RowOutcome,
};
