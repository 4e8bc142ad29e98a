//! Account session state.

use crate::domain::{AccountAddress, Password, Session};
use crate::error::ClientError;
use crate::facade::user::UserApi;
use crate::ports::BackendConnector;

/// One identity and its authentication state.
///
/// The transport never holds session state; it lives here.
pub struct Account<C> {
    users: UserApi<C>,
    address: AccountAddress,
    authenticated: bool,
    session: Option<Session>,
}

impl<C: BackendConnector> Account<C> {
    /// A logged out account for `address` (`user@provider` or a provider).
    pub fn new(users: UserApi<C>, address: &str) -> Self {
        Self {
            users,
            address: AccountAddress::new(address),
            authenticated: false,
            session: None,
        }
    }

    /// The account the backend reports as logged in, if any.
    pub async fn active(users: &UserApi<C>) -> Result<Option<Self>, ClientError> {
        let Some(uid) = users.active().await? else {
            return Ok(None);
        };
        let mut account = Self::new(users.clone(), &uid);
        account.authenticated = true;
        Ok(Some(account))
    }

    /// Full address, e.g. `alice@example.org` or `@example.org`.
    pub fn id(&self) -> &str {
        self.address.as_str()
    }

    pub fn address(&self) -> &AccountAddress {
        &self.address
    }

    pub fn domain(&self) -> &str {
        self.address.domain()
    }

    pub fn userpart(&self) -> &str {
        self.address.userpart()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Session of the last login on this handle.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Authenticate with `password`.
    ///
    /// Rejected credentials surface as [`ClientError::Auth`] and leave the
    /// account unchanged.
    pub async fn login(&mut self, password: impl Into<Password>) -> Result<&Session, ClientError> {
        let session = self.users.authenticate(self.id(), password).await?;
        self.authenticated = true;
        Ok(self.session.insert(session))
    }

    /// End the session. The address keeps only its provider part.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.users.logout(Some(self.address.as_str())).await?;
        self.address = self.address.domain_only();
        self.authenticated = false;
        self.session = None;
        Ok(())
    }
}
