// ============================================================================
// CLINIC ROSTER ADMIN - FRONTEND MVVM (RUST PURO + WASM)
// ============================================================================
// - Views: RenderSink + implementación DOM
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación (HTTP, WebSocket)
// - State: State Management con Rc<RefCell>
// - Models: Estructuras compartidas con backend
// ============================================================================

pub mod app;
pub mod config;
pub mod dom;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;
pub mod views;

#[cfg(test)]
mod test_support;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::app::App;
use crate::config::CONFIG;

// Instancia global: mantiene vivos controladores y canal
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        wasm_logger::init(Config::default());
    }
    log::info!("🚀 Clinic Roster Admin - Rust Puro + MVVM");
    log::debug!("⚙️ [MAIN] Backend: {}", CONFIG.backend_url);

    let mut app = App::new()?;
    app.start()?;

    APP.with(|cell| {
        *cell.borrow_mut() = Some(app);
    });
    Ok(())
}
