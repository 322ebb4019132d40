// ============================================================================
// APP - Cableado de la página actual (login, signup o dashboard)
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::dom::{get_element_by_id, on_click, on_submit};
use crate::models::{Clinic, PayPeriod, Resource};
use crate::services::{AuthService, RequestGateway, ResourceEndpoints, ResourceService, WebSocketTransport};
use crate::state::Session;
use crate::utils::storage::{BrowserStorage, CredentialStorage};
use crate::viewmodels::{AuthPages, AuthViewModel, NotificationChannel, ResourceSyncController};
use crate::views::dom_sink::dom_sink;
use crate::views::render_sink::{AuthView, RenderSink, ResourceView, NOTIFICATION_BELL_ID};

/// Página detectada por los nodos presentes en el documento
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Login,
    Signup,
    Dashboard,
}

impl Page {
    fn detect(auth_view: &AuthView) -> Self {
        if get_element_by_id(auth_view.login_form).is_some() {
            Page::Login
        } else if get_element_by_id(auth_view.signup_form).is_some() {
            Page::Signup
        } else {
            Page::Dashboard
        }
    }
}

/// Aplicación principal
pub struct App {
    session: Session,
    gateway: RequestGateway,
    sink: Rc<dyn RenderSink>,
    auth: Rc<AuthViewModel>,
    clinics: ResourceSyncController<Clinic>,
    pay_periods: ResourceSyncController<PayPeriod>,
    channel: Option<NotificationChannel>,
}

impl App {
    pub fn new() -> Result<Self, JsValue> {
        let storage: Rc<dyn CredentialStorage> = Rc::new(BrowserStorage);
        let (session, writer) = Session::restore(storage);
        let gateway = RequestGateway::browser(session.clone());
        let sink = dom_sink();

        let auth = Rc::new(AuthViewModel::new(
            AuthService::new(gateway.clone()),
            Rc::new(writer),
            AuthPages::from_config(),
            sink.clone(),
        ));
        let clinics = ResourceSyncController::new(
            ResourceService::new(gateway.clone(), ResourceEndpoints::clinics()),
            ResourceView::clinics(),
            sink.clone(),
        );
        let pay_periods = ResourceSyncController::new(
            ResourceService::new(gateway.clone(), ResourceEndpoints::pay_periods()),
            ResourceView::pay_periods(),
            sink.clone(),
        );

        Ok(Self {
            session,
            gateway,
            sink,
            auth,
            clinics,
            pay_periods,
            channel: None,
        })
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        let page = Page::detect(self.auth.view());
        log::info!("🧭 [APP] Página detectada: {:?}", page);

        match page {
            Page::Login => self.wire_login(),
            Page::Signup => self.wire_signup(),
            Page::Dashboard => {
                if !self.session.is_authenticated() {
                    log::warn!("🔒 [APP] Sin sesión, redirigiendo a login");
                    self.sink.redirect(&CONFIG.login_page);
                    return Ok(());
                }
                self.wire_logout()?;
                wire_section(&self.clinics)?;
                wire_section(&self.pay_periods)?;
                self.start_notifications()
            }
        }
    }

    fn wire_login(&self) -> Result<(), JsValue> {
        let Some(form) = get_element_by_id(self.auth.view().login_form) else {
            return Ok(());
        };
        let auth = self.auth.clone();
        on_submit(&form, move || {
            let auth = auth.clone();
            spawn_local(async move {
                let _ = auth.login_form().await;
            });
        })
    }

    fn wire_signup(&self) -> Result<(), JsValue> {
        let Some(form) = get_element_by_id(self.auth.view().signup_form) else {
            return Ok(());
        };
        let auth = self.auth.clone();
        on_submit(&form, move || {
            let auth = auth.clone();
            spawn_local(async move {
                let _ = auth.signup_form().await;
            });
        })
    }

    fn wire_logout(&self) -> Result<(), JsValue> {
        if let Some(button) = get_element_by_id(self.auth.view().logout_button) {
            let auth = self.auth.clone();
            on_click(&button, move |_| auth.logout())?;
        }
        Ok(())
    }

    fn start_notifications(&mut self) -> Result<(), JsValue> {
        let socket = WebSocketTransport::new(CONFIG.notifications_url.clone(), CONFIG.reconnect_delay_ms);
        let channel = NotificationChannel::new(
            AuthService::new(self.gateway.clone()),
            socket.clone(),
            self.sink.clone(),
        );

        if let Some(bell) = get_element_by_id(NOTIFICATION_BELL_ID) {
            let channel = channel.clone();
            on_click(&bell, move |_| channel.clear_notifications())?;
        }

        socket.start(channel.event_handler());
        self.channel = Some(channel);
        Ok(())
    }
}

/// Botones + formulario de una sección CRUD; carga inicial si la tabla está en la página
fn wire_section<R: Resource>(controller: &ResourceSyncController<R>) -> Result<(), JsValue> {
    let view = controller.view().clone();
    if get_element_by_id(view.table_body).is_none() {
        log::debug!("🫥 [APP] Sección de {} ausente en esta página", R::LABEL);
        return Ok(());
    }

    if let Some(button) = get_element_by_id(view.add_button) {
        let controller = controller.clone();
        on_click(&button, move |_| controller.open_create())?;
    }
    if let Some(button) = get_element_by_id(view.cancel_button) {
        let controller = controller.clone();
        on_click(&button, move |_| controller.dismiss_modal())?;
    }
    if let Some(form) = get_element_by_id(view.form) {
        let controller = controller.clone();
        on_submit(&form, move || {
            let controller = controller.clone();
            spawn_local(async move {
                controller.submit_form().await;
            });
        })?;
    }

    let controller = controller.clone();
    spawn_local(async move {
        controller.load().await;
    });
    Ok(())
}
