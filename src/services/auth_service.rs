// ============================================================================
// AUTH SERVICE - SOLO comunicación API de usuarios (login, signup, perfil)
// ============================================================================

use serde_json::json;

use crate::models::{LoginRequest, LoginResponse, SignupRequest, UserProfile};
use crate::services::errors::FetchError;
use crate::services::request_gateway::{ApiCall, RequestGateway};
use crate::utils::constants::{CREATE_USER_PATH, LOGIN_PATH, PROFILE_PATH};

#[derive(Clone)]
pub struct AuthService {
    gateway: RequestGateway,
}

impl AuthService {
    pub fn new(gateway: RequestGateway) -> Self {
        Self { gateway }
    }

    /// Login con email + password (endpoint público)
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, FetchError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        log::info!("🔐 [AUTH] Login para {}", email);
        self.gateway
            .call_as(ApiCall::post(LOGIN_PATH, json!(request)).public())
            .await
    }

    /// Crear cuenta (endpoint público); el body de respuesta se ignora
    pub async fn create_user(&self, request: &SignupRequest) -> Result<(), FetchError> {
        log::info!("📝 [AUTH] Creando usuario {}", request.email);
        self.gateway
            .call(ApiCall::post(CREATE_USER_PATH, json!(request)).public())
            .await
            .map(|_| ())
    }

    /// Perfil del usuario autenticado
    pub async fn me(&self) -> Result<UserProfile, FetchError> {
        self.gateway.call_as(ApiCall::get(PROFILE_PATH)).await
    }
}
