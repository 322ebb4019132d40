// ============================================================================
// TIMER - Plazo de un request (gloo-timers en el navegador)
// ============================================================================

use futures::future::LocalBoxFuture;
use gloo_timers::future::TimeoutFuture;

/// Fuente de plazos. Soltar el future devuelto limpia el timer.
pub trait Timer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// `setTimeout` del navegador; `TimeoutFuture` hace `clearTimeout` al soltarse
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(TimeoutFuture::new(ms))
    }
}
