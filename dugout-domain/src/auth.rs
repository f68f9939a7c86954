use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Identity of the signed-in account, as reported by the hosted auth
/// provider. Team ownership checks compare against `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

pub type ArcAuthProvider = Arc<Box<dyn AuthProvider + Send + Sync + 'static>>;

pub trait AuthProvider {
    fn current_user(&self) -> Option<AuthUser>;
}

#[derive(Clone, Default)]
pub struct MockAuthProvider {
    user: Arc<Mutex<Option<AuthUser>>>,
}

#[allow(unused)]
impl MockAuthProvider {
    pub fn signed_in(id: Uuid, email: &str) -> Self {
        Self {
            user: Arc::new(Mutex::new(Some(AuthUser {
                id,
                email: email.to_string(),
            }))),
        }
    }

    pub fn sign_out(&self) {
        self.user.lock().unwrap().take();
    }
}

impl AuthProvider for MockAuthProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.user.lock().unwrap().clone()
    }
}
