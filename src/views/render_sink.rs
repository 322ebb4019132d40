// ============================================================================
// RENDER SINK - Contrato entre viewmodels y el DOM
// ============================================================================
// Los viewmodels solo hablan con este trait; el DOM real vive en DomRenderSink.
// Si el nodo destino no existe la implementación loguea y retorna.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::{FormValues, ResourceId, TableRow};

/// Acción disparada desde una fila renderizada
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowAction {
    Edit(ResourceId),
    Delete(ResourceId),
}

impl RowAction {
    pub fn id(&self) -> &ResourceId {
        match self {
            RowAction::Edit(id) | RowAction::Delete(id) => id,
        }
    }

    /// Valor del atributo `data-action` del botón de la fila
    pub fn as_attr(&self) -> &'static str {
        match self {
            RowAction::Edit(_) => "edit",
            RowAction::Delete(_) => "delete",
        }
    }

    /// Reconstruye la acción desde `data-action` + `data-id` de un click delegado
    pub fn from_attrs(action: &str, id: &str) -> Option<Self> {
        if id.trim().is_empty() {
            return None;
        }
        let id = ResourceId::new(id);
        match action {
            "edit" => Some(RowAction::Edit(id)),
            "delete" => Some(RowAction::Delete(id)),
            _ => None,
        }
    }
}

pub type RowActionHandler = Rc<dyn Fn(RowAction)>;

/// Handler vigente de cada tabla. Un render REEMPLAZA el anterior (que se
/// libera); el listener del contenedor se registra una sola vez y lee de aquí.
#[derive(Default)]
pub struct RowActionSlots {
    slots: RefCell<HashMap<String, Rc<RefCell<RowActionHandler>>>>,
}

impl RowActionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(slot)` solo la primera vez para `table`: hay que registrar el listener
    pub fn install(&self, table: &str, handler: RowActionHandler) -> Option<Rc<RefCell<RowActionHandler>>> {
        if let Some(slot) = self.slots.borrow().get(table) {
            *slot.borrow_mut() = handler;
            return None;
        }
        let slot = Rc::new(RefCell::new(handler));
        self.slots.borrow_mut().insert(table.to_string(), Rc::clone(&slot));
        Some(slot)
    }

    pub fn dispatch(&self, table: &str, action: RowAction) -> bool {
        let slot = self.slots.borrow().get(table).cloned();
        match slot {
            Some(slot) => {
                dispatch_from(&slot, action);
                true
            }
            None => false,
        }
    }
}

/// Clona el handler antes de llamarlo: puede re-renderizar y reemplazar el slot
pub fn dispatch_from(slot: &RefCell<RowActionHandler>, action: RowAction) {
    let handler = slot.borrow().clone();
    handler(action);
}

pub trait RenderSink {
    // Tabla
    fn show_loading(&self, table: &str, message: &str);
    /// Reemplaza el contenido de la tabla; los botones de cada fila llaman `on_action`
    fn render_rows(&self, table: &str, rows: &[TableRow], on_action: RowActionHandler);
    fn show_empty(&self, table: &str, message: &str);
    fn show_error(&self, table: &str, message: &str);

    // Modal + formulario
    fn open_modal(&self, modal: &str);
    fn close_modal(&self, modal: &str);
    fn fill_form(&self, form: &str, values: &FormValues);
    fn clear_form(&self, form: &str);
    fn read_form(&self, form: &str) -> FormValues;
    fn show_inline_error(&self, slot: &str, message: &str);
    fn clear_inline_error(&self, slot: &str);

    // Primitivas del navegador
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn redirect(&self, path: &str);

    // Notificaciones
    fn notify(&self, message: &str);
    fn set_notification_mark(&self, marked: bool);
}

/// Puntos de inserción + textos fijos de una sección CRUD
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceView {
    pub table_body: &'static str,
    pub modal: &'static str,
    pub form: &'static str,
    pub modal_error: &'static str,
    pub add_button: &'static str,
    pub cancel_button: &'static str,
    pub loading_message: &'static str,
    pub empty_message: &'static str,
    pub created_message: &'static str,
    pub updated_message: &'static str,
    pub deleted_message: &'static str,
    pub delete_prompt: &'static str,
}

impl ResourceView {
    pub fn clinics() -> Self {
        Self {
            table_body: "clinicTableBody",
            modal: "clinicModal",
            form: "clinicForm",
            modal_error: "clinicFormError",
            add_button: "addClinicBtn",
            cancel_button: "closeClinicModal",
            loading_message: "Loading clinics...",
            empty_message: "No clinics found.",
            created_message: "Clinic created successfully.",
            updated_message: "Clinic updated successfully.",
            deleted_message: "Clinic deleted successfully.",
            delete_prompt: "Are you sure you want to delete this clinic?",
        }
    }

    pub fn pay_periods() -> Self {
        Self {
            table_body: "payPeriodTableBody",
            modal: "payPeriodModal",
            form: "payPeriodForm",
            modal_error: "payPeriodFormError",
            add_button: "addPayPeriodBtn",
            cancel_button: "closePayPeriodModal",
            loading_message: "Loading pay periods...",
            empty_message: "No pay periods found.",
            created_message: "Pay period created successfully.",
            updated_message: "Pay period updated successfully.",
            deleted_message: "Pay period deleted successfully.",
            delete_prompt: "Are you sure you want to delete this pay period?",
        }
    }
}

/// Formularios de login / signup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthView {
    pub login_form: &'static str,
    pub login_error: &'static str,
    pub signup_form: &'static str,
    pub signup_error: &'static str,
    pub logout_button: &'static str,
    pub signup_success_message: &'static str,
}

impl Default for AuthView {
    fn default() -> Self {
        Self {
            login_form: "loginForm",
            login_error: "loginError",
            signup_form: "signupForm",
            signup_error: "signupError",
            logout_button: "logoutBtn",
            signup_success_message: "Account created successfully, please log in.",
        }
    }
}

/// Campana de notificaciones
pub const NOTIFICATION_BELL_ID: &str = "notificationBell";
pub const NOTIFICATION_TOAST_ID: &str = "notificationToast";
