// ============================================================================
// RESOURCE SYNC VIEWMODEL - load → render → mutar → reload
// ============================================================================
// Una instancia por tipo de recurso (clínicas, periodos de nómina...).
// La tabla SIEMPRE refleja al backend: nunca se parchean filas localmente,
// toda mutación exitosa termina en un reload.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::models::{FormValues, Resource, ResourceId, TableRow};
use crate::services::{CancelHandle, FetchError, ResourceService};
use crate::state::{OperationKind, PendingGuard, PendingOperation, PendingOperations, RowBindings};
use crate::utils::messages::{load_error_message, mutation_error_message};
use crate::views::render_sink::{RenderSink, ResourceView, RowAction, RowActionHandler};

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded(usize),
    Empty,
    LoadFailed(FetchError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum MutateState {
    Idle,
    Mutating(OperationKind),
    Succeeded(OperationKind),
    Failed(OperationKind, FetchError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    Loaded(usize),
    Empty,
    Failed(FetchError),
    /// Ya había un listado en vuelo: no sale ningún request
    Suppressed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MutateOutcome {
    Succeeded,
    Failed(FetchError),
    Suppressed,
    /// El usuario rechazó la confirmación
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RowOutcome {
    /// La fila ya no está en el último render
    Stale,
    Edit(Result<(), FetchError>),
    Delete(MutateOutcome),
}

struct ControllerInner<R: Resource> {
    service: ResourceService<R>,
    view: ResourceView,
    sink: Rc<dyn RenderSink>,
    operations: PendingOperations,
    bindings: RowBindings,
    load_state: RefCell<LoadState>,
    mutate_state: RefCell<MutateState>,
    reload_requested: Cell<bool>,
    editing: RefCell<Option<ResourceId>>,
}

/// Controlador de una sección CRUD. Clonar comparte el mismo estado.
pub struct ResourceSyncController<R: Resource> {
    inner: Rc<ControllerInner<R>>,
}

impl<R: Resource> Clone for ResourceSyncController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: Resource> ResourceSyncController<R> {
    pub fn new(service: ResourceService<R>, view: ResourceView, sink: Rc<dyn RenderSink>) -> Self {
        Self {
            inner: Rc::new(ControllerInner {
                service,
                view,
                sink,
                operations: PendingOperations::new(),
                bindings: RowBindings::new(),
                load_state: RefCell::new(LoadState::Idle),
                mutate_state: RefCell::new(MutateState::Idle),
                reload_requested: Cell::new(false),
                editing: RefCell::new(None),
            }),
        }
    }

    pub fn view(&self) -> &ResourceView {
        &self.inner.view
    }

    pub fn load_state(&self) -> LoadState {
        self.inner.load_state.borrow().clone()
    }

    pub fn mutate_state(&self) -> MutateState {
        self.inner.mutate_state.borrow().clone()
    }

    pub fn editing_id(&self) -> Option<ResourceId> {
        self.inner.editing.borrow().clone()
    }

    pub fn pending_operations(&self) -> Vec<PendingOperation> {
        self.inner.operations.snapshot()
    }

    pub fn is_row_bound(&self, id: &ResourceId) -> bool {
        self.inner.bindings.is_bound(id)
    }

    fn begin(&self, kind: OperationKind) -> Option<PendingGuard> {
        let guard = self
            .inner
            .operations
            .begin(R::LABEL, kind, self.inner.service.default_timeout_ms());
        if guard.is_none() {
            log::debug!("⏭️ [{}] {} ya en vuelo, ignorando", R::LABEL, kind.as_str());
        }
        guard
    }

    // ========================================================================
    // LISTADO
    // ========================================================================

    /// Carga el listado y lo renderiza. Si mientras tanto se pidió un reload,
    /// corre UNA vez más al terminar.
    pub async fn load(&self) -> LoadOutcome {
        let Some(mut guard) = self.begin(OperationKind::List) else {
            return LoadOutcome::Suppressed;
        };

        loop {
            let outcome = self.load_once(guard.cancel_handle()).await;
            if !self.inner.reload_requested.replace(false) {
                return outcome;
            }

            log::info!("🔁 [{}] Reload pendiente, recargando", R::LABEL);
            drop(guard);
            match self.begin(OperationKind::List) {
                Some(next) => guard = next,
                None => return outcome,
            }
        }
    }

    async fn load_once(&self, cancel: CancelHandle) -> LoadOutcome {
        let view = &self.inner.view;
        let sink = &self.inner.sink;

        *self.inner.load_state.borrow_mut() = LoadState::Loading;
        sink.show_loading(view.table_body, view.loading_message);

        let (state, outcome) = match self.inner.service.list(cancel).await {
            Ok(records) if records.is_empty() => {
                self.inner.bindings.unbind_all();
                sink.show_empty(view.table_body, view.empty_message);
                log::info!("📭 [{}] Listado vacío", R::LABEL);
                (LoadState::Empty, LoadOutcome::Empty)
            }
            Ok(records) => {
                let rows: Vec<TableRow> = records.iter().map(R::table_row).collect();
                sink.render_rows(view.table_body, &rows, self.row_action_handler());
                self.inner
                    .bindings
                    .rebind(rows.iter().map(|row| row.id.clone()));
                log::info!("✅ [{}] {} registros renderizados", R::LABEL, rows.len());
                (LoadState::Loaded(rows.len()), LoadOutcome::Loaded(rows.len()))
            }
            Err(e) => {
                self.inner.bindings.unbind_all();
                log::warn!("⚠️ [{}] Error cargando listado: {}", R::LABEL, e);
                sink.show_error(view.table_body, &load_error_message(R::LABEL, &e));
                (LoadState::LoadFailed(e.clone()), LoadOutcome::Failed(e))
            }
        };

        *self.inner.load_state.borrow_mut() = state;
        outcome
    }

    /// Reload tras una mutación: si hay un listado en vuelo se encola
    async fn reload(&self) {
        if self.inner.operations.is_pending(OperationKind::List) {
            log::debug!("⏳ [{}] Listado en vuelo, reload encolado", R::LABEL);
            self.inner.reload_requested.set(true);
            return;
        }
        self.load().await;
    }

    /// Handler para los botones de cada fila. Débil: el DOM no mantiene vivo al controlador.
    fn row_action_handler(&self) -> RowActionHandler {
        let weak: Weak<ControllerInner<R>> = Rc::downgrade(&self.inner);
        Rc::new(move |action: RowAction| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = ResourceSyncController { inner };
            spawn_local(async move {
                controller.handle_row_action(action).await;
            });
        })
    }

    // ========================================================================
    // MODAL
    // ========================================================================

    pub fn open_create(&self) {
        let view = &self.inner.view;
        *self.inner.editing.borrow_mut() = None;
        self.inner.sink.clear_form(view.form);
        self.inner.sink.clear_inline_error(view.modal_error);
        self.inner.sink.open_modal(view.modal);
    }

    /// Cerrar sin guardar: se olvida el registro en edición
    pub fn dismiss_modal(&self) {
        let view = &self.inner.view;
        *self.inner.editing.borrow_mut() = None;
        self.inner.sink.clear_inline_error(view.modal_error);
        self.inner.sink.close_modal(view.modal);
    }

    /// No hay endpoint get-by-id: se busca el registro en el listado
    pub async fn open_edit(&self, id: &ResourceId) -> Result<(), FetchError> {
        let view = &self.inner.view;
        let sink = &self.inner.sink;

        let found = self
            .inner
            .service
            .list(CancelHandle::new())
            .await
            .and_then(|records| {
                records
                    .into_iter()
                    .find(|record| record.id() == id)
                    .ok_or_else(|| FetchError::NotFound {
                        resource: R::LABEL,
                        id: id.to_string(),
                    })
            });

        match found {
            Ok(record) => {
                *self.inner.editing.borrow_mut() = Some(id.clone());
                sink.clear_inline_error(view.modal_error);
                sink.fill_form(view.form, &record.form_values());
                sink.open_modal(view.modal);
                log::info!("✏️ [{}] Editando {}", R::LABEL, id);
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ [{}] No se pudo abrir {} para editar: {}", R::LABEL, id, e);
                sink.alert(&mutation_error_message(&e));
                Err(e)
            }
        }
    }

    /// Submit del modal: update si hay registro en edición, create si no
    pub async fn submit(&self, form: &FormValues) -> MutateOutcome {
        let editing = self.editing_id();
        match editing {
            Some(id) => self.update(&id, form).await,
            None => self.create(form).await,
        }
    }

    /// Submit leyendo los valores del formulario del DOM
    pub async fn submit_form(&self) -> MutateOutcome {
        let form = self.inner.sink.read_form(self.inner.view.form);
        self.submit(&form).await
    }

    // ========================================================================
    // MUTACIONES
    // ========================================================================

    pub async fn create(&self, form: &FormValues) -> MutateOutcome {
        let Some(guard) = self.begin_mutation(OperationKind::Create) else {
            return MutateOutcome::Suppressed;
        };
        let result = self.inner.service.create(form, guard.cancel_handle()).await;
        drop(guard);
        self.finish_modal_mutation(OperationKind::Create, result, self.inner.view.created_message)
            .await
    }

    pub async fn update(&self, id: &ResourceId, form: &FormValues) -> MutateOutcome {
        let Some(guard) = self.begin_mutation(OperationKind::Update) else {
            return MutateOutcome::Suppressed;
        };
        let result = self
            .inner
            .service
            .update(id, form, guard.cancel_handle())
            .await;
        drop(guard);
        self.finish_modal_mutation(OperationKind::Update, result, self.inner.view.updated_message)
            .await
    }

    /// Pide confirmación antes de salir a la red. Los errores van por alert.
    pub async fn delete(&self, id: &ResourceId) -> MutateOutcome {
        let view = &self.inner.view;
        let sink = &self.inner.sink;

        if self.inner.operations.is_pending(OperationKind::Delete) {
            return MutateOutcome::Suppressed;
        }
        if !sink.confirm(view.delete_prompt) {
            log::info!("🚫 [{}] Borrado de {} cancelado por el usuario", R::LABEL, id);
            return MutateOutcome::Cancelled;
        }

        let Some(guard) = self.begin_mutation(OperationKind::Delete) else {
            return MutateOutcome::Suppressed;
        };
        let result = self.inner.service.delete(id, guard.cancel_handle()).await;
        drop(guard);

        match result {
            Ok(_) => {
                *self.inner.mutate_state.borrow_mut() = MutateState::Succeeded(OperationKind::Delete);
                log::info!("🗑️ [{}] {} eliminado", R::LABEL, id);
                sink.alert(view.deleted_message);
                self.reload().await;
                MutateOutcome::Succeeded
            }
            Err(e) => {
                *self.inner.mutate_state.borrow_mut() =
                    MutateState::Failed(OperationKind::Delete, e.clone());
                log::warn!("⚠️ [{}] Error eliminando {}: {}", R::LABEL, id, e);
                sink.alert(&mutation_error_message(&e));
                MutateOutcome::Failed(e)
            }
        }
    }

    /// Despacho desde una fila renderizada; ids fuera del último render se ignoran
    pub async fn handle_row_action(&self, action: RowAction) -> RowOutcome {
        if !self.inner.bindings.is_bound(action.id()) {
            log::warn!("👻 [{}] Acción sobre fila obsoleta {}, ignorada", R::LABEL, action.id());
            return RowOutcome::Stale;
        }
        match action {
            RowAction::Edit(id) => RowOutcome::Edit(self.open_edit(&id).await),
            RowAction::Delete(id) => RowOutcome::Delete(self.delete(&id).await),
        }
    }

    fn begin_mutation(&self, kind: OperationKind) -> Option<PendingGuard> {
        let guard = self.begin(kind)?;
        *self.inner.mutate_state.borrow_mut() = MutateState::Mutating(kind);
        if kind != OperationKind::Delete {
            self.inner.sink.clear_inline_error(self.inner.view.modal_error);
        }
        Some(guard)
    }

    /// Create/update: éxito cierra el modal ANTES del reload; error queda en el modal
    async fn finish_modal_mutation(
        &self,
        kind: OperationKind,
        result: Result<Value, FetchError>,
        confirmation: &str,
    ) -> MutateOutcome {
        let view = &self.inner.view;
        let sink = &self.inner.sink;

        match result {
            Ok(_) => {
                *self.inner.mutate_state.borrow_mut() = MutateState::Succeeded(kind);
                *self.inner.editing.borrow_mut() = None;
                log::info!("✅ [{}] {} OK", R::LABEL, kind.as_str());
                sink.close_modal(view.modal);
                sink.clear_form(view.form);
                sink.alert(confirmation);
                self.reload().await;
                MutateOutcome::Succeeded
            }
            Err(e) => {
                *self.inner.mutate_state.borrow_mut() = MutateState::Failed(kind, e.clone());
                log::warn!("⚠️ [{}] Error en {}: {}", R::LABEL, kind.as_str(), e);
                sink.show_inline_error(view.modal_error, &mutation_error_message(&e));
                MutateOutcome::Failed(e)
            }
        }
    }
}
