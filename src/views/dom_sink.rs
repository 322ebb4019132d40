// ============================================================================
// DOM RENDER SINK - Implementación de RenderSink sobre web-sys
// ============================================================================
// Nodo ausente → log + return (una respuesta tardía puede apuntar a una
// sección que ya no está en pantalla)
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::{
    add_class, append_child, clear_children, control_value, delegate_click, get_element_by_id,
    get_form_by_id, named_controls, remove_class, set_control_value, set_text_content, window,
    ClickListener, ElementBuilder,
};
use crate::models::{FormValues, TableRow};
use crate::utils::constants::HAS_NOTIFICATION_CLASS;
use crate::views::render_sink::{
    dispatch_from, RenderSink, RowAction, RowActionHandler, RowActionSlots, NOTIFICATION_BELL_ID,
    NOTIFICATION_TOAST_ID,
};

const TOAST_VISIBLE_MS: u32 = 4_000;
const ROW_ACTION_SELECTOR: &str = "button[data-action]";

#[derive(Default)]
pub struct DomRenderSink {
    row_actions: RowActionSlots,
    /// Un listener delegado por `<tbody>`, vive lo que vive el sink
    row_listeners: RefCell<HashMap<String, ClickListener>>,
    /// Ocultado pendiente del toast; uno nuevo cancela el anterior
    toast_timeout: RefCell<Option<Timeout>>,
}

impl DomRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn target(&self, id: &str) -> Option<Element> {
        let element = get_element_by_id(id);
        if element.is_none() {
            log::debug!("🫥 [RENDER] #{} no existe, nada que renderizar", id);
        }
        element
    }

    /// Registra el listener delegado la primera vez; después solo reemplaza el handler
    fn bind_row_actions(&self, table: &str, body: &Element, on_action: RowActionHandler) -> Result<(), JsValue> {
        let Some(slot) = self.row_actions.install(table, on_action) else {
            return Ok(());
        };

        let listener = delegate_click(body, ROW_ACTION_SELECTOR, move |button| {
            let action = button.get_attribute("data-action").unwrap_or_default();
            let id = button.get_attribute("data-id").unwrap_or_default();
            match RowAction::from_attrs(&action, &id) {
                Some(action) => dispatch_from(&slot, action),
                None => log::warn!("⚠️ [RENDER] Click en fila sin acción válida ({} / {})", action, id),
            }
        })?;
        self.row_listeners.borrow_mut().insert(table.to_string(), listener);
        log::debug!("🖱️ [RENDER] Listener de filas registrado en #{}", table);
        Ok(())
    }

    /// Una sola fila con un mensaje ocupando toda la tabla
    fn show_message(&self, table: &str, message: &str, kind: &str) {
        let Some(body) = self.target(table) else {
            return;
        };
        clear_children(&body);
        if let Err(e) = message_row(message, kind).and_then(|row| append_child(&body, &row)) {
            log::error!("❌ [RENDER] Error mostrando mensaje en #{}: {:?}", table, e);
        }
    }
}

fn message_row(message: &str, kind: &str) -> Result<Element, JsValue> {
    let cell = ElementBuilder::new("td")?
        .attr("colspan", "100")?
        .class(&format!("table-message {}", kind))
        .text(message)
        .build();
    Ok(ElementBuilder::new("tr")?.child(cell)?.build())
}

/// Los botones solo llevan atributos; el click lo atiende el listener del `<tbody>`
fn action_button(label: &str, class: &str, action: &RowAction) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("button")?
        .attr("type", "button")?
        .attr("data-action", action.as_attr())?
        .attr("data-id", action.id().as_str())?
        .class(class)
        .text(label)
        .build())
}

fn table_row(row: &TableRow) -> Result<Element, JsValue> {
    let tr = ElementBuilder::new("tr")?.attr("data-id", row.id.as_str())?.build();
    for cell in &row.cells {
        append_child(&tr, &ElementBuilder::new("td")?.text(cell).build())?;
    }

    let actions = ElementBuilder::new("td")?
        .class("row-actions")
        .child(action_button("Edit", "btn-edit", &RowAction::Edit(row.id.clone()))?)?
        .child(action_button("Delete", "btn-delete", &RowAction::Delete(row.id.clone()))?)?
        .build();
    append_child(&tr, &actions)?;
    Ok(tr)
}

fn toggle_class(element: &Element, id: &str, class: &str, present: bool) {
    let result = if present {
        add_class(element, class)
    } else {
        remove_class(element, class)
    };
    if let Err(e) = result {
        log::warn!("⚠️ [RENDER] No se pudo cambiar la clase '{}' de #{}: {:?}", class, id, e);
    }
}

impl RenderSink for DomRenderSink {
    fn show_loading(&self, table: &str, message: &str) {
        self.show_message(table, message, "loading");
    }

    fn render_rows(&self, table: &str, rows: &[TableRow], on_action: RowActionHandler) {
        let Some(body) = self.target(table) else {
            return;
        };
        if let Err(e) = self.bind_row_actions(table, &body, on_action) {
            log::error!("❌ [RENDER] No se pudo registrar el listener de #{}: {:?}", table, e);
        }
        clear_children(&body);
        for row in rows {
            if let Err(e) = table_row(row).and_then(|tr| append_child(&body, &tr)) {
                log::error!("❌ [RENDER] Error renderizando fila {}: {:?}", row.id, e);
            }
        }
        log::debug!("📋 [RENDER] #{}: {} filas", table, rows.len());
    }

    fn show_empty(&self, table: &str, message: &str) {
        self.show_message(table, message, "empty");
    }

    fn show_error(&self, table: &str, message: &str) {
        self.show_message(table, message, "error");
    }

    fn open_modal(&self, modal: &str) {
        if let Some(element) = self.target(modal) {
            toggle_class(&element, modal, "show", true);
        }
    }

    fn close_modal(&self, modal: &str) {
        if let Some(element) = self.target(modal) {
            toggle_class(&element, modal, "show", false);
        }
    }

    fn fill_form(&self, form: &str, values: &FormValues) {
        let Some(element) = self.target(form) else {
            return;
        };
        let controls = match named_controls(&element) {
            Ok(controls) => controls,
            Err(e) => {
                log::error!("❌ [RENDER] No se pudieron leer los campos de #{}: {:?}", form, e);
                return;
            }
        };
        for (name, control) in controls {
            if let Some(value) = values.get(&name) {
                set_control_value(&control, value);
            }
        }
    }

    fn clear_form(&self, form: &str) {
        match get_form_by_id(form) {
            Some(element) => element.reset(),
            None => log::debug!("🫥 [RENDER] Formulario #{} no existe", form),
        }
    }

    fn read_form(&self, form: &str) -> FormValues {
        let Some(element) = self.target(form) else {
            return FormValues::new();
        };
        match named_controls(&element) {
            Ok(controls) => controls
                .into_iter()
                .filter_map(|(name, control)| control_value(&control).map(|value| (name, value)))
                .collect(),
            Err(e) => {
                log::error!("❌ [RENDER] No se pudo leer #{}: {:?}", form, e);
                FormValues::new()
            }
        }
    }

    fn show_inline_error(&self, slot: &str, message: &str) {
        if let Some(element) = self.target(slot) {
            set_text_content(&element, message);
            toggle_class(&element, slot, "visible", true);
        }
    }

    fn clear_inline_error(&self, slot: &str) {
        if let Some(element) = self.target(slot) {
            set_text_content(&element, "");
            toggle_class(&element, slot, "visible", false);
        }
    }

    fn alert(&self, message: &str) {
        if let Some(win) = window() {
            if let Err(e) = win.alert_with_message(message) {
                log::error!("❌ [RENDER] alert() falló: {:?}", e);
            }
        }
    }

    fn confirm(&self, message: &str) -> bool {
        window()
            .and_then(|win| win.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn redirect(&self, path: &str) {
        log::info!("➡️ [RENDER] Redirigiendo a {}", path);
        if let Some(win) = window() {
            if let Err(e) = win.location().set_href(path) {
                log::error!("❌ [RENDER] No se pudo navegar a {}: {:?}", path, e);
            }
        }
    }

    fn notify(&self, message: &str) {
        let Some(toast) = self.target(NOTIFICATION_TOAST_ID) else {
            log::info!("🔕 [RENDER] Sin toast en pantalla, notificación no mostrada: {}", message);
            return;
        };
        set_text_content(&toast, message);
        toggle_class(&toast, NOTIFICATION_TOAST_ID, "show", true);
        let hide = Timeout::new(TOAST_VISIBLE_MS, move || {
            toggle_class(&toast, NOTIFICATION_TOAST_ID, "show", false);
        });
        self.toast_timeout.replace(Some(hide));
    }

    fn set_notification_mark(&self, marked: bool) {
        if let Some(bell) = self.target(NOTIFICATION_BELL_ID) {
            toggle_class(&bell, NOTIFICATION_BELL_ID, HAS_NOTIFICATION_CLASS, marked);
        }
    }
}

/// Sink compartido para todos los viewmodels
pub fn dom_sink() -> Rc<dyn RenderSink> {
    Rc::new(DomRenderSink::new())
}
