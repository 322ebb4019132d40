// ============================================================================
// NOTIFICATION STATE - Indicador "hay notificaciones"
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct NotificationIndicator {
    marked: Rc<Cell<bool>>,
}

impl NotificationIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` solo si cambió (marcar algo ya marcado no hace nada)
    pub fn mark(&self) -> bool {
        !self.marked.replace(true)
    }

    pub fn clear(&self) {
        self.marked.set(false);
    }

    pub fn is_marked(&self) -> bool {
        self.marked.get()
    }
}
