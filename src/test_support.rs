// ============================================================================
// TEST SUPPORT - Fakes para correr los viewmodels fuera del navegador
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

use crate::models::{ClientMessage, FormValues, TableRow};
use crate::services::{
    AuthService, CancelHandle, ChannelError, ChannelTransport, HttpRequest, HttpResponse,
    HttpTransport, RequestGateway, Timer, TransportError,
};
use crate::state::{Session, SessionWriter};
use crate::utils::constants::AUTH_TOKEN_KEY;
use crate::utils::storage::{CredentialStorage, StorageError};
use crate::views::render_sink::{RenderSink, RowActionHandler};

pub const TEST_BASE_URL: &str = "http://backend.test";
pub const TEST_TIMEOUT_MS: u32 = 15_000;

pub fn http_response(status: u16, body: &str) -> HttpResponse {
    let status_text = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        409 => "Conflict",
        500 => "Internal Server Error",
        _ => "",
    };
    HttpResponse {
        status,
        status_text: status_text.to_string(),
        body: body.to_string(),
    }
}

// ----------------------------------------------------------------------------
// HTTP
// ----------------------------------------------------------------------------

enum Reply {
    Respond(HttpResponse),
    Fail(String),
    /// Responde cuando el test suelta el sender
    Hold(oneshot::Receiver<HttpResponse>),
    Hang,
}

/// Transporte con respuestas guionizadas en orden FIFO.
/// Sin guion responde 500 para que un test nunca quede colgado.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Respond(http_response(status, body)));
    }

    pub fn fail(&self, detail: &str) {
        self.replies.borrow_mut().push_back(Reply::Fail(detail.to_string()));
    }

    pub fn hang(&self) {
        self.replies.borrow_mut().push_back(Reply::Hang);
    }

    /// El request queda en vuelo hasta que se envíe la respuesta por el sender
    pub fn hold(&self) -> oneshot::Sender<HttpResponse> {
        let (sender, receiver) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Hold(receiver));
        sender
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    /// URLs pedidas, sin la base
    pub fn paths(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| request.url.trim_start_matches(TEST_BASE_URL).to_string())
            .collect()
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(
        &self,
        request: HttpRequest,
        _cancel: CancelHandle,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Reply::Respond(http_response(500, r#"{"message":"unscripted request"}"#)));

        match reply {
            Reply::Respond(response) => Ok(response),
            Reply::Fail(detail) => Err(TransportError::Network(detail)),
            Reply::Hold(receiver) => receiver
                .await
                .map_err(|_| TransportError::Network("held reply dropped".to_string())),
            Reply::Hang => future::pending().await,
        }
    }
}

// ----------------------------------------------------------------------------
// Timer
// ----------------------------------------------------------------------------

#[derive(Default)]
struct TimerCounters {
    started: Cell<usize>,
    released: Cell<usize>,
    last_duration: Cell<Option<u32>>,
}

/// Timer controlable: `never()` nunca vence, `expiring()` vence en el acto
pub struct FakeTimer {
    expires: bool,
    counters: Rc<TimerCounters>,
}

impl FakeTimer {
    pub fn never() -> Self {
        Self {
            expires: false,
            counters: Rc::default(),
        }
    }

    pub fn expiring() -> Self {
        Self {
            expires: true,
            counters: Rc::default(),
        }
    }

    pub fn started(&self) -> usize {
        self.counters.started.get()
    }

    /// Timers creados y todavía no soltados
    pub fn active(&self) -> usize {
        self.counters.started.get() - self.counters.released.get()
    }

    pub fn last_duration(&self) -> Option<u32> {
        self.counters.last_duration.get()
    }
}

struct TrackedDelay {
    counters: Rc<TimerCounters>,
}

impl Drop for TrackedDelay {
    fn drop(&mut self) {
        self.counters.released.set(self.counters.released.get() + 1);
    }
}

impl Timer for FakeTimer {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        self.counters.started.set(self.counters.started.get() + 1);
        self.counters.last_duration.set(Some(ms));
        let tracked = TrackedDelay {
            counters: self.counters.clone(),
        };
        let expires = self.expires;
        async move {
            let _tracked = tracked;
            if !expires {
                future::pending::<()>().await;
            }
        }
        .boxed_local()
    }
}

// ----------------------------------------------------------------------------
// Storage
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with(entries: &[(&str, &str)]) -> Rc<Self> {
        let storage = Self::default();
        for (key, value) in entries {
            storage
                .entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }
        Rc::new(storage)
    }
}

impl CredentialStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Harness: gateway + fakes cableados
// ----------------------------------------------------------------------------

pub struct TestHarness {
    pub gateway: RequestGateway,
    pub transport: Rc<FakeTransport>,
    pub timer: Rc<FakeTimer>,
    pub session: Session,
    pub writer: Rc<SessionWriter>,
    pub storage: Rc<MemoryStorage>,
}

impl TestHarness {
    pub fn anonymous() -> Self {
        Self::with_parts(None, FakeTransport::new(), FakeTimer::never())
    }

    pub fn logged_in(token: &str) -> Self {
        Self::with_parts(Some(token), FakeTransport::new(), FakeTimer::never())
    }

    pub fn with_parts(token: Option<&str>, transport: FakeTransport, timer: FakeTimer) -> Self {
        let storage = match token {
            Some(token) => MemoryStorage::with(&[(AUTH_TOKEN_KEY, token)]),
            None => MemoryStorage::new(),
        };
        let (session, writer) = Session::restore(storage.clone());
        let transport = Rc::new(transport);
        let timer = Rc::new(timer);
        let gateway = RequestGateway::new(
            TEST_BASE_URL,
            TEST_TIMEOUT_MS,
            session.clone(),
            transport.clone(),
            timer.clone(),
        );
        Self {
            gateway,
            transport,
            timer,
            session,
            writer: Rc::new(writer),
            storage,
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.gateway.clone())
    }
}

// ----------------------------------------------------------------------------
// Render sink
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    ShowLoading { table: String, message: String },
    RenderRows { table: String, rows: Vec<TableRow> },
    ShowEmpty { table: String, message: String },
    ShowError { table: String, message: String },
    OpenModal(String),
    CloseModal(String),
    FillForm { form: String, values: FormValues },
    ClearForm(String),
    ShowInlineError { slot: String, message: String },
    ClearInlineError(String),
    Alert(String),
    Confirm(String),
    Redirect(String),
    Notify(String),
    NotificationMark(bool),
}

/// Sink que registra cada llamada en orden
pub struct RecordingSink {
    calls: RefCell<Vec<SinkCall>>,
    confirm_answer: Cell<bool>,
    form: RefCell<FormValues>,
    row_handler: RefCell<Option<RowActionHandler>>,
}

impl RecordingSink {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
            form: RefCell::new(FormValues::new()),
            row_handler: RefCell::new(None),
        })
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    /// Lo que devolverá `read_form`
    pub fn set_form(&self, values: FormValues) {
        *self.form.borrow_mut() = values;
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn position(&self, expected: &SinkCall) -> Option<usize> {
        self.calls.borrow().iter().position(|call| call == expected)
    }

    pub fn contains(&self, expected: &SinkCall) -> bool {
        self.position(expected).is_some()
    }

    pub fn last_rows(&self) -> Option<Vec<TableRow>> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SinkCall::RenderRows { rows, .. } => Some(rows.clone()),
            _ => None,
        })
    }

    pub fn row_handler(&self) -> Option<RowActionHandler> {
        self.row_handler.borrow().clone()
    }

    pub fn reset(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: SinkCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl RenderSink for RecordingSink {
    fn show_loading(&self, table: &str, message: &str) {
        self.record(SinkCall::ShowLoading {
            table: table.to_string(),
            message: message.to_string(),
        });
    }

    fn render_rows(&self, table: &str, rows: &[TableRow], on_action: RowActionHandler) {
        *self.row_handler.borrow_mut() = Some(on_action);
        self.record(SinkCall::RenderRows {
            table: table.to_string(),
            rows: rows.to_vec(),
        });
    }

    fn show_empty(&self, table: &str, message: &str) {
        self.record(SinkCall::ShowEmpty {
            table: table.to_string(),
            message: message.to_string(),
        });
    }

    fn show_error(&self, table: &str, message: &str) {
        self.record(SinkCall::ShowError {
            table: table.to_string(),
            message: message.to_string(),
        });
    }

    fn open_modal(&self, modal: &str) {
        self.record(SinkCall::OpenModal(modal.to_string()));
    }

    fn close_modal(&self, modal: &str) {
        self.record(SinkCall::CloseModal(modal.to_string()));
    }

    fn fill_form(&self, form: &str, values: &FormValues) {
        self.record(SinkCall::FillForm {
            form: form.to_string(),
            values: values.clone(),
        });
    }

    fn clear_form(&self, form: &str) {
        self.record(SinkCall::ClearForm(form.to_string()));
    }

    fn read_form(&self, _form: &str) -> FormValues {
        self.form.borrow().clone()
    }

    fn show_inline_error(&self, slot: &str, message: &str) {
        self.record(SinkCall::ShowInlineError {
            slot: slot.to_string(),
            message: message.to_string(),
        });
    }

    fn clear_inline_error(&self, slot: &str) {
        self.record(SinkCall::ClearInlineError(slot.to_string()));
    }

    fn alert(&self, message: &str) {
        self.record(SinkCall::Alert(message.to_string()));
    }

    fn confirm(&self, message: &str) -> bool {
        self.record(SinkCall::Confirm(message.to_string()));
        self.confirm_answer.get()
    }

    fn redirect(&self, path: &str) {
        self.record(SinkCall::Redirect(path.to_string()));
    }

    fn notify(&self, message: &str) {
        self.record(SinkCall::Notify(message.to_string()));
    }

    fn set_notification_mark(&self, marked: bool) {
        self.record(SinkCall::NotificationMark(marked));
    }
}

// ----------------------------------------------------------------------------
// Canal
// ----------------------------------------------------------------------------

pub struct RecordingChannel {
    sent: RefCell<Vec<ClientMessage>>,
    connected: Cell<bool>,
}

impl RecordingChannel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            sent: RefCell::new(Vec::new()),
            connected: Cell::new(true),
        })
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.set(connected);
    }

    pub fn sent(&self) -> Vec<ClientMessage> {
        self.sent.borrow().clone()
    }
}

impl ChannelTransport for RecordingChannel {
    fn send(&self, message: &ClientMessage) -> Result<(), ChannelError> {
        if !self.connected.get() {
            return Err(ChannelError::NotConnected);
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }
}
