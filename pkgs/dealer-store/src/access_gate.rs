//! Local PIN check
//!
//! The PIN is kept as plain text and compared for equality. It keeps a
//! casual user out of the app on a shared machine and nothing more; there is
//! no hashing and no attempt limiting.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::key_value::KeyValueStore;

/// Key the PIN is stored under
pub const PIN_KEY: &str = "dealer_pin";

/// Shortest PIN accepted by [`AccessGate::set_secret`]
pub const MIN_PIN_LENGTH: usize = 4;

pub struct AccessGate {
    kv: Arc<dyn KeyValueStore>,
}

impl AccessGate {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Whether a PIN has been set up
    pub async fn has_stored_secret(&self) -> Result<bool> {
        Ok(self.kv.get(PIN_KEY).await?.is_some())
    }

    /// Store `secret` as the PIN, replacing any previous one
    pub async fn set_secret(&self, secret: &str) -> Result<()> {
        if secret.chars().count() < MIN_PIN_LENGTH {
            return Err(StoreError::Validation(format!(
                "PIN must be at least {} characters",
                MIN_PIN_LENGTH
            )));
        }
        self.kv.prepare().await;
        self.kv.set(PIN_KEY, secret).await?;
        info!("Access PIN updated");
        Ok(())
    }

    /// Compare `candidate` with the stored PIN. False when none is stored.
    pub async fn validate_secret(&self, candidate: &str) -> Result<bool> {
        let valid = match self.kv.get(PIN_KEY).await? {
            Some(stored) => stored == candidate,
            None => false,
        };
        debug!("PIN check: {}", if valid { "accepted" } else { "rejected" });
        Ok(valid)
    }

    /// Forget the stored PIN
    pub async fn clear_secret(&self) -> Result<()> {
        self.kv.remove(PIN_KEY).await
    }
}
