//! Account handling for ledger owners.
//!
//! The ledger only needs to know who owns which rows. Credentials are stored
//! and compared as opaque strings.

use tracing::{info, warn};

use crate::domain::errors::{LedgerError, LedgerResult, ValidationError};
use crate::domain::models::User;
use crate::storage::LedgerStore;

const MIN_USERNAME_LEN: usize = 3;
const MIN_CREDENTIAL_LEN: usize = 6;

/// `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn require_credential(credential: &str) -> Result<(), ValidationError> {
    if credential.chars().count() < MIN_CREDENTIAL_LEN {
        return Err(ValidationError::CredentialTooShort);
    }
    Ok(())
}

fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

#[derive(Clone)]
pub struct UserService {
    store: LedgerStore,
}

impl UserService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn sign_up(&self, email: &str, username: &str, credential: &str) -> LedgerResult<User> {
        let email = normalize_email(email)?;
        let username = username.trim();
        info!("Signing up {} as {}", email, username);

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::UsernameTooShort.into());
        }
        require_credential(credential)?;

        if self.store.users.get_user_by_email(&email).await?.is_some() {
            return Err(LedgerError::Conflict("An account with this email already exists".to_string()));
        }
        if self.store.users.get_user_by_username(username).await?.is_some() {
            return Err(LedgerError::Conflict("This username is already taken".to_string()));
        }

        self.store.users.insert_user(&email, username, credential).await?;
        self.store
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| LedgerError::not_found("User", &email))
    }

    pub async fn sign_in(&self, email: &str, credential: &str) -> LedgerResult<User> {
        let email = normalize_email(email)?;
        info!("Signing in {}", email);

        let user = self
            .store
            .users
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| LedgerError::not_found("User", &email))?;

        if user.credential != credential {
            warn!("Credential mismatch for {}", email);
            return Err(LedgerError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn reset_credential(&self, email: &str, credential: &str) -> LedgerResult<()> {
        let email = normalize_email(email)?;
        info!("Resetting credential for {}", email);
        require_credential(credential)?;

        if !self.store.users.update_credential(&email, credential).await? {
            return Err(LedgerError::not_found("User", &email));
        }
        Ok(())
    }

    /// Profile lookup used by the dashboard; a missing user is not an error
    pub async fn find_user(&self, email: &str) -> LedgerResult<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.store.users.get_user_by_email(&email).await?)
    }
}
