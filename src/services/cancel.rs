// ============================================================================
// CANCEL HANDLE - Disparo único para abortar un request en vuelo
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type AbortCallback = Box<dyn FnOnce()>;

#[derive(Default)]
struct CancelInner {
    fired: Cell<bool>,
    on_fire: RefCell<Option<AbortCallback>>,
}

/// Handle compartido entre el gateway (quien dispara) y el transporte (quien aborta)
#[derive(Clone, Default)]
pub struct CancelHandle {
    inner: Rc<CancelInner>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispara la cancelación. Idempotente: el callback corre como mucho una vez.
    pub fn fire(&self) {
        if self.inner.fired.replace(true) {
            return;
        }
        let callback = self.inner.on_fire.borrow_mut().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn has_fired(&self) -> bool {
        self.inner.fired.get()
    }

    /// Registra la acción de abortar. Si ya se disparó, corre inmediatamente.
    pub fn on_fire<F>(&self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if self.has_fired() {
            callback();
        } else {
            *self.inner.on_fire.borrow_mut() = Some(Box::new(callback));
        }
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("fired", &self.has_fired())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fires_callback_exactly_once() {
        let handle = CancelHandle::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        handle.on_fire(move || counter.set(counter.get() + 1));

        handle.fire();
        handle.clone().fire();

        assert!(handle.has_fired());
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn late_registration_runs_immediately() {
        let handle = CancelHandle::new();
        handle.fire();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        handle.on_fire(move || flag.set(true));
        assert!(ran.get());
    }
}
