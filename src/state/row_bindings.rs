// ============================================================================
// ROW BINDINGS - Ids con acciones vivas tras el último render
// ============================================================================
// Cada render REEMPLAZA el conjunto; nunca se acumulan handlers viejos
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::models::ResourceId;

#[derive(Clone, Default)]
pub struct RowBindings {
    ids: Rc<RefCell<BTreeSet<ResourceId>>>,
}

impl RowBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sustituye los bindings por exactamente `ids`
    pub fn rebind<I>(&self, ids: I)
    where
        I: IntoIterator<Item = ResourceId>,
    {
        *self.ids.borrow_mut() = ids.into_iter().collect();
    }

    /// Tabla sin filas (vacía o error)
    pub fn unbind_all(&self) {
        self.ids.borrow_mut().clear();
    }

    pub fn is_bound(&self, id: &ResourceId) -> bool {
        self.ids.borrow().contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebind_replaces_previous_ids() {
        let bindings = RowBindings::new();
        bindings.rebind(["1", "2"].map(ResourceId::from));
        bindings.rebind(["2", "3"].map(ResourceId::from));

        assert!(!bindings.is_bound(&ResourceId::from("1")));
        assert!(bindings.is_bound(&ResourceId::from("2")));
        assert!(bindings.is_bound(&ResourceId::from("3")));
    }

    #[test]
    fn unbind_all_drops_every_id() {
        let bindings = RowBindings::new();
        bindings.rebind(["4"].map(ResourceId::from));

        bindings.unbind_all();

        assert!(!bindings.is_bound(&ResourceId::from("4")));
    }
}
