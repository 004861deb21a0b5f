use tracing::info;

use crate::domain::errors::{LedgerResult, ValidationError};
use crate::storage::LedgerStore;

/// Thin key/value access for session flags and UI preferences
#[derive(Clone)]
pub struct SettingsService {
    store: LedgerStore,
}

impl SettingsService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.store.settings.get_setting(require_key(key)?).await?)
    }

    pub async fn set(&self, key: &str, value: &str) -> LedgerResult<()> {
        info!("Setting {}", key);
        Ok(self.store.settings.set_setting(require_key(key)?, value).await?)
    }

    pub async fn delete(&self, key: &str) -> LedgerResult<bool> {
        info!("Deleting setting {}", key);
        Ok(self.store.settings.delete_setting(require_key(key)?).await?)
    }
}

fn require_key(key: &str) -> Result<&str, ValidationError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(key)
}
