// ============================================================================
// MENSAJES DEL CANAL DE NOTIFICACIONES
// ============================================================================
// Formato en el cable: {"event": "<nombre>", "data": {...}}
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mensajes cliente → servidor
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

/// Frame crudo servidor → cliente
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ServerEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Eventos push que llevan un mensaje para mostrar
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    ShiftAdded { message: String },
    AvailabilityUpdated { message: String },
    /// Cualquier otro evento con `message`
    Other { event: String, message: String },
}

impl ServerEnvelope {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// `data.message`, o `data` si es directamente un string
    fn message(&self) -> Option<String> {
        match &self.data {
            Value::String(message) => Some(message.clone()),
            Value::Object(fields) => fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        }
    }

    /// `None` si el evento no trae mensaje
    pub fn into_event(self) -> Option<ServerEvent> {
        let message = self.message()?;
        Some(match self.event.as_str() {
            "shift_added" => ServerEvent::ShiftAdded { message },
            "availability_updated" => ServerEvent::AvailabilityUpdated { message },
            _ => ServerEvent::Other {
                event: self.event,
                message,
            },
        })
    }
}

impl ServerEvent {
    pub fn name(&self) -> &str {
        match self {
            ServerEvent::ShiftAdded { .. } => "shift_added",
            ServerEvent::AvailabilityUpdated { .. } => "availability_updated",
            ServerEvent::Other { event, .. } => event,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServerEvent::ShiftAdded { message }
            | ServerEvent::AvailabilityUpdated { message }
            | ServerEvent::Other { message, .. } => message,
        }
    }
}
