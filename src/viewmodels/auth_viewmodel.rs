// ============================================================================
// AUTH VIEWMODEL - login / signup / logout
// ============================================================================
// ÚNICO dueño del SessionWriter: nadie más escribe token ni perfil
// ============================================================================

use std::rc::Rc;

use crate::config::CONFIG;
use crate::models::{FormValues, SignupRequest, UserProfile};
use crate::services::{AuthService, FetchError};
use crate::state::SessionWriter;
use crate::utils::messages::{auth_error_message, mutation_error_message};
use crate::views::render_sink::{AuthView, RenderSink};

/// Destinos de navegación tras login / logout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthPages {
    pub login: String,
    pub dashboard: String,
}

impl AuthPages {
    pub fn from_config() -> Self {
        Self {
            login: CONFIG.login_page.clone(),
            dashboard: CONFIG.dashboard_page.clone(),
        }
    }
}

pub struct AuthViewModel {
    service: AuthService,
    writer: Rc<SessionWriter>,
    view: AuthView,
    pages: AuthPages,
    sink: Rc<dyn RenderSink>,
}

impl AuthViewModel {
    pub fn new(
        service: AuthService,
        writer: Rc<SessionWriter>,
        pages: AuthPages,
        sink: Rc<dyn RenderSink>,
    ) -> Self {
        Self {
            service,
            writer,
            view: AuthView::default(),
            pages,
            sink,
        }
    }

    pub fn view(&self) -> &AuthView {
        &self.view
    }

    /// Login → guardar token → `/user/me` → guardar perfil → dashboard
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, FetchError> {
        self.sink.clear_inline_error(self.view.login_error);

        let response = match self.service.login(email.trim(), password).await {
            Ok(response) if !response.token.trim().is_empty() => response,
            Ok(_) => {
                let error = FetchError::MalformedResponse("login response without token".to_string());
                return Err(self.login_failed(error));
            }
            Err(e) => return Err(self.login_failed(e)),
        };
        self.writer.set_token(&response.token);
        log::info!("🔑 [AUTH] Token guardado");

        match self.service.me().await {
            Ok(profile) => {
                log::info!("👤 [AUTH] Perfil cargado: {}", profile.id);
                self.writer.set_profile(profile.clone());
                self.sink.redirect(&self.pages.dashboard);
                Ok(profile)
            }
            Err(e) => {
                log::error!("❌ [AUTH] Error cargando perfil: {}", e);
                // Sin perfil no hay sesión utilizable
                self.writer.clear();
                self.sink
                    .show_inline_error(self.view.login_error, &mutation_error_message(&e));
                Err(e)
            }
        }
    }

    /// Login con los campos `email` / `password` del formulario
    pub async fn login_form(&self) -> Result<UserProfile, FetchError> {
        let form = self.sink.read_form(self.view.login_form);
        let password = form.get("password").unwrap_or_default().to_string();
        self.login(&form.value("email"), &password).await
    }

    fn login_failed(&self, error: FetchError) -> FetchError {
        log::warn!("🔒 [AUTH] Login rechazado: {}", error);
        self.sink
            .show_inline_error(self.view.login_error, &auth_error_message(&error));
        error
    }

    /// Alta de cuenta; éxito → aviso y a la página de login
    pub async fn signup(&self, form: &FormValues) -> Result<(), FetchError> {
        self.sink.clear_inline_error(self.view.signup_error);
        let request = SignupRequest {
            name: form.value("name"),
            email: form.value("email"),
            password: form.get("password").unwrap_or_default().to_string(),
        };

        match self.service.create_user(&request).await {
            Ok(()) => {
                log::info!("✅ [AUTH] Usuario {} creado", request.email);
                self.sink.alert(self.view.signup_success_message);
                self.sink.redirect(&self.pages.login);
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ [AUTH] Error creando usuario: {}", e);
                self.sink
                    .show_inline_error(self.view.signup_error, &auth_error_message(&e));
                Err(e)
            }
        }
    }

    pub async fn signup_form(&self) -> Result<(), FetchError> {
        let form = self.sink.read_form(self.view.signup_form);
        self.signup(&form).await
    }

    pub fn logout(&self) {
        log::info!("👋 [AUTH] Logout");
        self.writer.clear();
        self.sink.redirect(&self.pages.login);
    }
}
