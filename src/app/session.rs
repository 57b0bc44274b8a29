use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::app::gateway::TokenSource;
use crate::domain::{BrandContext, DomainError};
use crate::ports::KeyValueStore;

const TOKEN_KEY: &str = "brand_token";
const NAME_KEY: &str = "brand_name";
const EMAIL_KEY: &str = "remembered_email";
const CONTEXT_KEY: &str = "brand_craft_context";

/// Bearer credential, zeroed when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<AuthToken>,
    display_name: Option<String>,
    remembered_email: Option<String>,
    context: Option<BrandContext>,
}

/// Shared application state, passed explicitly to whatever needs it.
///
/// This is the only writer to the key-value store. The gateway reads the
/// token through [`TokenSource`] and never mutates it.
pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    session: RwLock<Session>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            session: RwLock::new(Session::default()),
        }
    }

    /// Load persisted session data. A corrupt brand context is discarded.
    pub fn restore(&self) -> Result<(), DomainError> {
        let token = self.store.get(TOKEN_KEY)?.map(AuthToken::new);
        let display_name = self.store.get(NAME_KEY)?;
        let remembered_email = self.store.get(EMAIL_KEY)?;
        let context = match self.store.get(CONTEXT_KEY)? {
            Some(raw) => match serde_json::from_str::<BrandContext>(&raw) {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable brand context");
                    None
                }
            },
            None => None,
        };

        let authenticated = token.is_some();
        *self.session.write() = Session {
            token,
            display_name,
            remembered_email,
            context,
        };

        info!(authenticated = authenticated, "Session restored");
        Ok(())
    }

    pub fn login(&self, token: AuthToken, display_name: &str) -> Result<(), DomainError> {
        self.store.set(TOKEN_KEY, token.expose())?;
        self.store.set(NAME_KEY, display_name)?;

        let mut session = self.session.write();
        session.token = Some(token);
        session.display_name = Some(display_name.to_string());
        info!(name = display_name, "Signed in");
        Ok(())
    }

    /// Clear credentials. The remembered email and brand context survive.
    pub fn logout(&self) -> Result<(), DomainError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(NAME_KEY)?;

        let mut session = self.session.write();
        session.token = None;
        session.display_name = None;
        info!("Signed out");
        Ok(())
    }

    pub fn set_context(&self, context: BrandContext) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&context)?;
        self.store.set(CONTEXT_KEY, &raw)?;
        self.session.write().context = Some(context);
        Ok(())
    }

    pub fn remember_email(&self, email: Option<&str>) -> Result<(), DomainError> {
        match email {
            Some(email) => self.store.set(EMAIL_KEY, email)?,
            None => self.store.remove(EMAIL_KEY)?,
        }
        self.session.write().remembered_email = email.map(str::to_string);
        Ok(())
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.session.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().token.is_some()
    }

    pub fn display_name(&self) -> Option<String> {
        self.session.read().display_name.clone()
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.session.read().remembered_email.clone()
    }

    pub fn context(&self) -> Option<BrandContext> {
        self.session.read().context.clone()
    }
}

impl TokenSource for AppState {
    fn bearer_token(&self) -> Option<String> {
        self.token().map(|t| t.expose().to_string())
    }
}
