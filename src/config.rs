// ============================================================================
// CONFIGURACIÓN - Una sola URL base para todos los endpoints
// ============================================================================
// Valores leídos en tiempo de compilación (build.rs reenvía .env)
// ============================================================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_NOTIFICATIONS_URL: &str = "ws://localhost:5000/notifications";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;
pub const DEFAULT_RECONNECT_DELAY_MS: u32 = 3_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub notifications_url: String,
    pub request_timeout_ms: u32,
    pub reconnect_delay_ms: u32,
    pub enable_logging: bool,
    pub login_page: String,
    pub dashboard_page: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            notifications_url: DEFAULT_NOTIFICATIONS_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            enable_logging: true,
            login_page: "login.html".to_string(),
            dashboard_page: "dashboard.html".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match key {
            "BACKEND_URL" => option_env!("BACKEND_URL"),
            "NOTIFICATIONS_URL" => option_env!("NOTIFICATIONS_URL"),
            "REQUEST_TIMEOUT_MS" => option_env!("REQUEST_TIMEOUT_MS"),
            "RECONNECT_DELAY_MS" => option_env!("RECONNECT_DELAY_MS"),
            "ENABLE_LOGGING" => option_env!("ENABLE_LOGGING"),
            "LOGIN_PAGE" => option_env!("LOGIN_PAGE"),
            "DASHBOARD_PAGE" => option_env!("DASHBOARD_PAGE"),
            _ => None,
        })
    }

    /// Construye la configuración a partir de una función de búsqueda de claves.
    /// Valores ausentes o no parseables caen en el valor por defecto.
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let defaults = Self::default();
        Self {
            backend_url: lookup("BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            notifications_url: lookup("NOTIFICATIONS_URL")
                .map(str::to_string)
                .unwrap_or(defaults.notifications_url),
            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout_ms),
            reconnect_delay_ms: lookup("RECONNECT_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reconnect_delay_ms),
            enable_logging: lookup("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            login_page: lookup("LOGIN_PAGE")
                .map(str::to_string)
                .unwrap_or(defaults.login_page),
            dashboard_page: lookup("DASHBOARD_PAGE")
                .map(str::to_string)
                .unwrap_or(defaults.dashboard_page),
        }
    }

    /// Verifica si el modo de logging está habilitado
    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_keys_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.request_timeout_ms, 15_000);
        assert!(config.is_logging_enabled());
    }

    #[rstest]
    fn backend_url_loses_trailing_slash() {
        let config = AppConfig::from_lookup(|key| match key {
            "BACKEND_URL" => Some("https://api.example.test/"),
            _ => None,
        });
        assert_eq!(config.backend_url, "https://api.example.test");
    }

    #[rstest]
    #[case("2500", 2_500)]
    #[case("not-a-number", DEFAULT_REQUEST_TIMEOUT_MS)]
    fn timeout_is_parsed_or_defaulted(#[case] raw: &str, #[case] expected: u32) {
        let config = AppConfig::from_lookup(|key| (key == "REQUEST_TIMEOUT_MS").then_some(raw));
        assert_eq!(config.request_timeout_ms, expected);
    }
}
