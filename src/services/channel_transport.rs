// ============================================================================
// CHANNEL TRANSPORT - Conexión persistente (WebSocket) con reconexión
// ============================================================================
// La reconexión es responsabilidad del transporte, NO del NotificationChannel:
// el canal solo ve Connected / Disconnected / Message
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::future::{select, Either};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::{futures::WebSocket, Message};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::models::ClientMessage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Connected,
    Disconnected { reason: String },
    Message(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("notification channel is not connected")]
    NotConnected,
    #[error("could not encode message: {0}")]
    Encode(String),
}

pub type EventHandler = Rc<dyn Fn(TransportEvent)>;

/// Envío cliente → servidor
pub trait ChannelTransport {
    fn send(&self, message: &ClientMessage) -> Result<(), ChannelError>;
}

pub struct WebSocketTransport {
    url: String,
    reconnect_delay_ms: u32,
    outbox: RefCell<Option<UnboundedSender<String>>>,
    started: Cell<bool>,
}

impl WebSocketTransport {
    pub fn new(url: impl Into<String>, reconnect_delay_ms: u32) -> Rc<Self> {
        Rc::new(Self {
            url: url.into(),
            reconnect_delay_ms,
            outbox: RefCell::new(None),
            started: Cell::new(false),
        })
    }

    /// Arranca el bucle de conexión. Solo una vez por transporte.
    pub fn start(self: &Rc<Self>, on_event: EventHandler) {
        if self.started.replace(true) {
            log::warn!("⚠️ [CHANNEL] start() ya fue llamado, ignorando llamada duplicada");
            return;
        }
        let transport = Rc::clone(self);
        spawn_local(async move {
            transport.run(on_event).await;
        });
    }

    async fn run(self: Rc<Self>, on_event: EventHandler) {
        loop {
            match self.run_connection(&on_event).await {
                Ok(reason) => {
                    self.outbox.borrow_mut().take();
                    log::warn!("📴 [CHANNEL] Desconectado: {}", reason);
                    on_event(TransportEvent::Disconnected { reason });
                }
                Err(e) => log::error!("❌ [CHANNEL] No se pudo abrir {}: {}", self.url, e),
            }
            TimeoutFuture::new(self.reconnect_delay_ms).await;
            log::info!("🔄 [CHANNEL] Reintentando conexión...");
        }
    }

    /// `Err` si el socket no llegó a abrirse; `Ok(motivo)` cuando se cierra
    async fn run_connection(&self, on_event: &EventHandler) -> Result<String, String> {
        let socket = WebSocket::open(&self.url).map_err(|e| format!("{:?}", e))?;
        let (mut write, mut read) = socket.split();
        let (outbox, mut pending) = mpsc::unbounded::<String>();
        *self.outbox.borrow_mut() = Some(outbox);

        // Los frames encolados esperan a que el socket termine de abrir
        log::info!("🔌 [CHANNEL] Conectado a {}", self.url);
        on_event(TransportEvent::Connected);

        let writer = async move {
            while let Some(frame) = pending.next().await {
                if let Err(e) = write.send(Message::Text(frame)).await {
                    return format!("send failed: {:?}", e);
                }
            }
            "outbox closed".to_string()
        };

        let reader = async {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => on_event(TransportEvent::Message(text)),
                    Ok(Message::Bytes(bytes)) => {
                        log::debug!("📦 [CHANNEL] Frame binario ignorado ({} bytes)", bytes.len())
                    }
                    Err(e) => return format!("{:?}", e),
                }
            }
            "socket closed".to_string()
        };

        let reason = match select(Box::pin(writer), Box::pin(reader)).await {
            Either::Left((reason, _)) | Either::Right((reason, _)) => reason,
        };
        Ok(reason)
    }
}

impl ChannelTransport for WebSocketTransport {
    fn send(&self, message: &ClientMessage) -> Result<(), ChannelError> {
        let frame =
            serde_json::to_string(message).map_err(|e| ChannelError::Encode(e.to_string()))?;
        match self.outbox.borrow().as_ref() {
            Some(outbox) => outbox
                .unbounded_send(frame)
                .map_err(|_| ChannelError::NotConnected),
            None => Err(ChannelError::NotConnected),
        }
    }
}
