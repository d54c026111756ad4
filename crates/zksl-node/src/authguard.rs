//! API-key authentication guard. An empty configured key set means any
//! request in non-production is refused with `AuthRequired` — production
//! here is whatever the caller's deployment considers it; this workspace
//! only models the policy, not an environment-detection mechanism.

use zksl_core::AnchorError;

pub struct ApiKeyGuard {
    keys: Vec<String>,
    is_production: bool,
}

impl ApiKeyGuard {
    pub fn new(keys: Vec<String>, is_production: bool) -> Self {
        Self { keys, is_production }
    }

    /// Check a presented API key. `None` means no `Authorization`/API-key
    /// header was sent at all.
    pub fn check(&self, presented: Option<&str>) -> Result<(), AnchorError> {
        if self.keys.is_empty() {
            if self.is_production {
                return Err(AnchorError::Forbidden);
            }
            return Err(AnchorError::AuthRequired);
        }

        match presented {
            Some(key) if self.keys.iter().any(|k| k == key) => Ok(()),
            Some(_) => Err(AnchorError::Forbidden),
            None => Err(AnchorError::AuthRequired),
        }
    }
}
