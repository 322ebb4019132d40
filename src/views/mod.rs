// ============================================================================
// VIEWS - Contrato de render + implementación DOM
// ============================================================================

pub mod dom_sink;
pub mod render_sink;

pub use dom_sink::{dom_sink, DomRenderSink};
pub use render_sink::{AuthView, RenderSink, ResourceView, RowAction, RowActionHandler};
