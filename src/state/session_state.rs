// ============================================================================
// SESSION STATE - Credential Store (token + perfil)
// ============================================================================
// Lectura: `Session` (clonable, todos los componentes)
// Escritura: `SessionWriter` (solo el flujo de login)
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::UserProfile;
use crate::utils::constants::{AUTH_TOKEN_KEY, USER_PROFILE_KEY};
use crate::utils::storage::{load_json, save_json, CredentialStorage};

/// Vista de solo lectura de la sesión
#[derive(Clone, Default)]
pub struct Session {
    token: Rc<RefCell<Option<String>>>,
    profile: Rc<RefCell<Option<UserProfile>>>,
}

impl Session {
    /// Sesión vacía, sin persistencia
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Restaura token y perfil desde storage. El writer va al flujo de login.
    pub fn restore(storage: Rc<dyn CredentialStorage>) -> (Session, SessionWriter) {
        let session = Session::anonymous();

        let token = storage
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty());
        let profile = load_json::<UserProfile>(storage.as_ref(), USER_PROFILE_KEY);

        if token.is_some() {
            log::info!("💾 [SESSION] Token restaurado desde storage");
        }
        *session.token.borrow_mut() = token;
        *session.profile.borrow_mut() = profile;

        let writer = SessionWriter {
            session: session.clone(),
            storage,
        };
        (session, writer)
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }
}

/// Único escritor de la sesión (memoria + storage)
pub struct SessionWriter {
    session: Session,
    storage: Rc<dyn CredentialStorage>,
}

impl SessionWriter {
    /// Errores de storage se loguean: la sesión en memoria sigue siendo válida
    pub fn set_token(&self, token: &str) {
        *self.session.token.borrow_mut() = Some(token.to_string());
        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, token) {
            log::error!("❌ [SESSION] Error guardando token: {}", e);
        }
    }

    pub fn set_profile(&self, profile: UserProfile) {
        if let Err(e) = save_json(self.storage.as_ref(), USER_PROFILE_KEY, &profile) {
            log::error!("❌ [SESSION] Error guardando perfil: {}", e);
        }
        *self.session.profile.borrow_mut() = Some(profile);
    }

    /// Logout / expiración
    pub fn clear(&self) {
        *self.session.token.borrow_mut() = None;
        *self.session.profile.borrow_mut() = None;
        for key in [AUTH_TOKEN_KEY, USER_PROFILE_KEY] {
            if let Err(e) = self.storage.remove(key) {
                log::warn!("⚠️ [SESSION] Error limpiando '{}': {}", key, e);
            }
        }
        log::info!("🗑️ [SESSION] Sesión limpiada");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceId;
    use crate::test_support::MemoryStorage;
    use rstest::rstest;

    fn profile() -> UserProfile {
        UserProfile {
            id: ResourceId::from("7"),
            name: Some("Ana".to_string()),
            email: None,
            role: Some("admin".to_string()),
        }
    }

    #[rstest]
    fn restores_token_and_profile_from_storage() {
        let storage = MemoryStorage::with(&[
            (AUTH_TOKEN_KEY, "tok"),
            (USER_PROFILE_KEY, r#"{"id":"7","name":"Ana","role":"admin"}"#),
        ]);
        let (session, _writer) = Session::restore(storage);
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.profile(), Some(profile()));
    }

    #[rstest]
    fn corrupt_profile_and_blank_token_are_ignored() {
        let storage = MemoryStorage::with(&[(AUTH_TOKEN_KEY, "  "), (USER_PROFILE_KEY, "{oops")]);
        let (session, _writer) = Session::restore(storage);
        assert!(!session.is_authenticated());
        assert_eq!(session.profile(), None);
    }

    #[rstest]
    fn writer_updates_every_reader_and_storage() {
        let storage = MemoryStorage::new();
        let (session, writer) = Session::restore(storage.clone());
        let reader = session.clone();

        writer.set_token("fresh");
        writer.set_profile(profile());

        assert_eq!(reader.token().as_deref(), Some("fresh"));
        assert_eq!(storage.get(AUTH_TOKEN_KEY).as_deref(), Some("fresh"));
        assert!(storage.get(USER_PROFILE_KEY).is_some());

        writer.clear();
        assert!(!reader.is_authenticated());
        assert_eq!(storage.get(AUTH_TOKEN_KEY), None);
        assert_eq!(storage.get(USER_PROFILE_KEY), None);
    }
}
