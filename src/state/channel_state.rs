// ============================================================================
// CHANNEL STATE - Membresía del canal de notificaciones
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Joined,
}

/// La clave del canal es el id del usuario; nunca sobrevive a una desconexión
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelMembership {
    pub state: ConnectionState,
    pub channel_key: Option<String>,
    /// Se incrementa en cada connect/disconnect para descartar resoluciones viejas
    pub epoch: u64,
}

impl Default for ChannelMembership {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            channel_key: None,
            epoch: 0,
        }
    }
}

impl ChannelMembership {
    /// Nueva conexión: Connecting, sin clave. Devuelve la época de esta conexión.
    pub fn connecting(&mut self) -> u64 {
        self.epoch += 1;
        self.state = ConnectionState::Connecting;
        self.channel_key = None;
        self.epoch
    }

    /// `false` si la conexión de `epoch` ya no es la actual
    pub fn join(&mut self, epoch: u64, user_id: String) -> bool {
        if epoch != self.epoch || self.state != ConnectionState::Connecting {
            return false;
        }
        self.state = ConnectionState::Joined;
        self.channel_key = Some(user_id);
        true
    }

    pub fn disconnected(&mut self) {
        self.epoch += 1;
        self.state = ConnectionState::Disconnected;
        self.channel_key = None;
    }

    pub fn is_joined(&self) -> bool {
        self.state == ConnectionState::Joined
    }
}
