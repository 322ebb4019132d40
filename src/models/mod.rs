pub mod auth;
pub mod clinic;
pub mod notification;
pub mod payroll;
pub mod resource;

pub use auth::{LoginRequest, LoginResponse, SignupRequest, UserProfile};
pub use clinic::Clinic;
pub use notification::{ClientMessage, ServerEnvelope, ServerEvent};
pub use payroll::PayPeriod;
pub use resource::{FormValues, Resource, ResourceId, TableRow};
