// ============================================================================
// OPERATIONS STATE - Operaciones en vuelo por tipo de recurso
// ============================================================================
// Invariante: como mucho UNA operación por (recurso, tipo) a la vez
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

use crate::services::CancelHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    List,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::List => "list",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PendingOperation {
    pub resource: &'static str,
    pub kind: OperationKind,
    pub cancel: CancelHandle,
    pub deadline: DateTime<Utc>,
}

/// Registro de operaciones en vuelo de UN controlador
#[derive(Clone, Default)]
pub struct PendingOperations {
    ops: Rc<RefCell<Vec<PendingOperation>>>,
}

impl PendingOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra la operación. `None` si ya hay una del mismo tipo en vuelo.
    /// El guard la retira al soltarse (también si el future se abandona).
    pub fn begin(
        &self,
        resource: &'static str,
        kind: OperationKind,
        timeout_ms: u32,
    ) -> Option<PendingGuard> {
        if self.is_pending(kind) {
            return None;
        }

        let operation = PendingOperation {
            resource,
            kind,
            cancel: CancelHandle::new(),
            deadline: Utc::now() + Duration::milliseconds(i64::from(timeout_ms)),
        };
        let cancel = operation.cancel.clone();
        self.ops.borrow_mut().push(operation);

        Some(PendingGuard {
            ops: self.clone(),
            kind,
            cancel,
        })
    }

    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.ops.borrow().iter().any(|op| op.kind == kind)
    }

    pub fn snapshot(&self) -> Vec<PendingOperation> {
        self.ops.borrow().clone()
    }

    fn finish(&self, kind: OperationKind) {
        self.ops.borrow_mut().retain(|op| op.kind != kind);
    }
}

pub struct PendingGuard {
    ops: PendingOperations,
    kind: OperationKind,
    cancel: CancelHandle,
}

impl PendingGuard {
    /// Handle a pasar al gateway
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.ops.finish(self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_kind_is_rejected_while_in_flight() {
        let ops = PendingOperations::new();
        let guard = ops.begin("clinic", OperationKind::List, 1_000).expect("first list");

        assert!(ops.begin("clinic", OperationKind::List, 1_000).is_none());
        let other = ops.begin("clinic", OperationKind::Create, 1_000);
        assert!(other.is_some());
        assert_eq!(ops.snapshot().len(), 2);

        drop(guard);
        drop(other);
        assert!(ops.snapshot().is_empty());
        assert!(ops.begin("clinic", OperationKind::List, 1_000).is_some());
    }

    #[rstest]
    fn deadline_is_in_the_future() {
        let ops = PendingOperations::new();
        let _guard = ops.begin("clinic", OperationKind::Delete, 15_000);
        let snapshot = ops.snapshot();
        assert!(snapshot[0].deadline > Utc::now());
        assert!(!snapshot[0].cancel.has_fired());
    }
}
