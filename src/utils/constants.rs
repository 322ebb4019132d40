// ============================================================================
// CONSTANTES - Claves de storage y endpoints del backend
// ============================================================================

/// Claves fijas en localStorage
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_PROFILE_KEY: &str = "userProfile";

// Usuarios
pub const LOGIN_PATH: &str = "/user/login";
pub const CREATE_USER_PATH: &str = "/user/createUser";
pub const PROFILE_PATH: &str = "/user/me";

// Clínicas
pub const CLINICS_LIST_PATH: &str = "/clinic/getClinics";
pub const CLINICS_CREATE_PATH: &str = "/clinic/createClinic";
pub const CLINICS_UPDATE_PATH: &str = "/clinic/updateClinic";
pub const CLINICS_DELETE_PATH: &str = "/clinic/deleteClinic";

// Periodos de nómina
pub const PAY_PERIODS_LIST_PATH: &str = "/payroll/getPayPeriods";
pub const PAY_PERIODS_CREATE_PATH: &str = "/payroll/createPayPeriod";
pub const PAY_PERIODS_UPDATE_PATH: &str = "/payroll/updatePayPeriod";
pub const PAY_PERIODS_DELETE_PATH: &str = "/payroll/deletePayPeriod";

/// Clase CSS del indicador de notificaciones
pub const HAS_NOTIFICATION_CLASS: &str = "has-notification";
