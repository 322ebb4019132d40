// ============================================================================
// NOTIFICATION CHANNEL - Disconnected → Connecting → Joined
// ============================================================================
// connect → GET /user/me → join{userId} → reenviar eventos push al sink.
// La reconexión es del transporte; aquí solo se reacciona a sus eventos.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;

use crate::models::{ClientMessage, ServerEnvelope, ServerEvent};
use crate::services::{AuthService, ChannelTransport, EventHandler, TransportEvent};
use crate::state::{ChannelMembership, ConnectionState, NotificationIndicator};
use crate::views::render_sink::RenderSink;

struct ChannelInner {
    auth: AuthService,
    transport: Rc<dyn ChannelTransport>,
    sink: Rc<dyn RenderSink>,
    membership: RefCell<ChannelMembership>,
    indicator: NotificationIndicator,
}

#[derive(Clone)]
pub struct NotificationChannel {
    inner: Rc<ChannelInner>,
}

impl NotificationChannel {
    pub fn new(
        auth: AuthService,
        transport: Rc<dyn ChannelTransport>,
        sink: Rc<dyn RenderSink>,
    ) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                auth,
                transport,
                sink,
                membership: RefCell::new(ChannelMembership::default()),
                indicator: NotificationIndicator::new(),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.membership.borrow().state
    }

    pub fn membership(&self) -> ChannelMembership {
        self.inner.membership.borrow().clone()
    }

    pub fn has_notifications(&self) -> bool {
        self.inner.indicator.is_marked()
    }

    /// Callback para el transporte: cada evento se procesa en su propia tarea
    pub fn event_handler(&self) -> EventHandler {
        let channel = self.clone();
        Rc::new(move |event: TransportEvent| {
            let channel = channel.clone();
            spawn_local(async move {
                channel.handle_event(event).await;
            });
        })
    }

    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => self.on_connected().await,
            TransportEvent::Disconnected { reason } => self.on_disconnected(&reason),
            TransportEvent::Message(text) => self.on_message(&text),
        }
    }

    async fn on_connected(&self) {
        let epoch = self.inner.membership.borrow_mut().connecting();
        log::info!("🔌 [NOTIFY] Conectado, resolviendo identidad...");

        let profile = match self.inner.auth.me().await {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("⚠️ [NOTIFY] Sin identidad, no se hace join: {}", e);
                return;
            }
        };

        let user_id = profile.id.to_string();
        if self.inner.membership.borrow().epoch != epoch {
            log::warn!("📴 [NOTIFY] Conexión perdida durante la resolución, join abandonado");
            return;
        }

        let join = ClientMessage::Join {
            user_id: user_id.clone(),
        };
        if let Err(e) = self.inner.transport.send(&join) {
            log::warn!("⚠️ [NOTIFY] No se pudo enviar join: {}", e);
            return;
        }

        if self.inner.membership.borrow_mut().join(epoch, user_id.clone()) {
            log::info!("✅ [NOTIFY] Unido al canal de {}", user_id);
        }
    }

    fn on_disconnected(&self, reason: &str) {
        self.inner.membership.borrow_mut().disconnected();
        log::warn!("📴 [NOTIFY] Desconectado: {}", reason);
    }

    fn on_message(&self, text: &str) {
        if !self.inner.membership.borrow().is_joined() {
            log::debug!("🔇 [NOTIFY] Evento recibido fuera del canal, descartado");
            return;
        }

        let envelope = match ServerEnvelope::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("⚠️ [NOTIFY] Frame inválido descartado: {}", e);
                return;
            }
        };
        let name = envelope.event.clone();
        match envelope.into_event() {
            Some(event) => self.deliver(&event),
            None => log::debug!("📭 [NOTIFY] Evento '{}' sin mensaje, descartado", name),
        }
    }

    /// Sin cola ni dedupe: cada evento se muestra una vez, al llegar
    fn deliver(&self, event: &ServerEvent) {
        log::info!("🔔 [NOTIFY] {}: {}", event.name(), event.message());
        if self.inner.indicator.mark() {
            self.inner.sink.set_notification_mark(true);
        }
        self.inner.sink.notify(event.message());
    }

    pub fn clear_notifications(&self) {
        self.inner.indicator.clear();
        self.inner.sink.set_notification_mark(false);
    }
}
