use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::{keys, read_json, write_json, KeyValueStore, UserRepository};
use crate::domain::user::{NewUser, SessionUser};

const MIN_PASSWORD_LEN: usize = 6;

/// Email/password authentication against the users table, with the session
/// recorded as a blob under the `"user"` key.
///
/// Credentials are compared as plaintext, exactly as the source system does.
/// Unknown email and wrong password intentionally produce the same error so
/// responses cannot be used to enumerate accounts.
pub struct AuthService<U> {
    users: U,
    store: Arc<dyn KeyValueStore>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, store: Arc<dyn KeyValueStore>) -> Self {
        Self { users, store }
    }

    pub fn register(&self, input: NewUser) -> Result<SessionUser, DomainError> {
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if input.email.trim().is_empty() {
            return Err(DomainError::InvalidInput("email must not be empty".to_string()));
        }
        if self.users.find_by_email(&input.email)?.is_some() {
            return Err(DomainError::Conflict(
                "an account with this email already exists".to_string(),
            ));
        }

        let user = self.users.insert(input)?;
        let session = SessionUser::from(&user);
        write_json(self.store.as_ref(), keys::USER, &session)?;
        log::info!("registered user {}", user.id);
        Ok(session)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<SessionUser, DomainError> {
        let session = match self.users.find_by_email(email)? {
            Some(user) if user.password == password => SessionUser::from(&user),
            // One error for both unknown email and wrong password.
            _ => return Err(DomainError::Credentials),
        };
        write_json(self.store.as_ref(), keys::USER, &session)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), DomainError> {
        self.store.remove(keys::USER)
    }

    pub fn current_user(&self) -> Result<Option<SessionUser>, DomainError> {
        read_json(self.store.as_ref(), keys::USER)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::kv_store::MemoryStore;

    #[derive(Default)]
    struct InMemoryUsers {
        rows: Mutex<Vec<User>>,
    }

    impl UserRepository for InMemoryUsers {
        fn insert(&self, input: NewUser) -> Result<User, DomainError> {
            let user = User {
                id: Uuid::new_v4(),
                email: input.email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(user.clone());
            Ok(user)
        }
        fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }
        fn list(&self) -> Result<Vec<User>, DomainError> {
            Ok(self.rows.lock().unwrap().clone())
        }
        fn delete(&self, id: Uuid) -> Result<(), DomainError> {
            self.rows.lock().unwrap().retain(|u| u.id != id);
            Ok(())
        }
    }

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
        }
    }

    fn service() -> AuthService<InMemoryUsers> {
        AuthService::new(InMemoryUsers::default(), Arc::new(MemoryStore::default()))
    }

    #[test]
    fn register_records_the_session() {
        let svc = service();
        let session = svc
            .register(new_user("jean@example.com", "secret1"))
            .expect("register");

        assert_eq!(session.email, "jean@example.com");
        assert_eq!(svc.current_user().expect("current"), Some(session));
    }

    #[test]
    fn register_rejects_short_passwords() {
        let svc = service();
        assert!(matches!(
            svc.register(new_user("jean@example.com", "abc")),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn register_rejects_duplicate_emails() {
        let svc = service();
        svc.register(new_user("jean@example.com", "secret1"))
            .expect("first register");
        assert!(matches!(
            svc.register(new_user("jean@example.com", "secret2")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn login_failure_is_identical_for_unknown_email_and_wrong_password() {
        let svc = service();
        svc.register(new_user("jean@example.com", "secret1"))
            .expect("register");
        svc.logout().expect("logout");

        let unknown = svc.login("nobody@example.com", "secret1");
        let wrong = svc.login("jean@example.com", "wrong-password");

        assert!(matches!(unknown, Err(DomainError::Credentials)));
        assert!(matches!(wrong, Err(DomainError::Credentials)));
    }

    #[test]
    fn login_then_logout_clears_the_session() {
        let svc = service();
        svc.register(new_user("jean@example.com", "secret1"))
            .expect("register");
        svc.logout().expect("logout");
        assert_eq!(svc.current_user().expect("current"), None);

        svc.login("jean@example.com", "secret1").expect("login");
        assert!(svc.current_user().expect("current").is_some());

        svc.logout().expect("logout");
        assert_eq!(svc.current_user().expect("current"), None);
    }
}
