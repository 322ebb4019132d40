// ============================================================================
// EVENT HANDLING - Listeners DOM
// ============================================================================
// on_click / on_submit hacen closure.forget(): la closure vive en el heap de
// WASM para siempre. Solo para elementos fijos, registrados UNA vez al inicio.
// Contenido que se re-renderiza (filas de tabla) → delegate_click en el
// contenedor, y quien lo registra se queda con la closure.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, MouseEvent};

pub type ClickListener = Closure<dyn FnMut(MouseEvent)>;

/// Click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Un solo listener en `container` para todos los descendientes que matchean
/// `selector`. `handler` recibe el elemento matcheado más cercano al click.
/// La closure devuelta NO se olvida: soltarla deja el listener muerto.
pub fn delegate_click<F>(container: &Element, selector: &str, mut handler: F) -> Result<ClickListener, JsValue>
where
    F: FnMut(Element) + 'static,
{
    let selector = selector.to_string();
    let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
        let matched = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .and_then(|target| target.closest(&selector).ok().flatten());
        if let Some(element) = matched {
            handler(element);
        }
    }) as Box<dyn FnMut(MouseEvent)>);
    container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// Submit handler: cancela el envío nativo del formulario antes de llamar `handler`
pub fn on_submit<F>(element: &Element, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        handler();
    }) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
