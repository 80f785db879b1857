//! Claiming free instances
//!
//! The lookup service only reports what looks free. The allocator closes the
//! gap by claiming the instance in the registry right away, and going back to
//! the lookup when another session claimed it first.

use crate::error::{PoolError, Result};
use crate::instance::FreeInstance;
use crate::lookup::LookupService;
use crate::provider::DeviceClaims;
use std::sync::Arc;

pub const DEFAULT_CLAIM_ATTEMPTS: u32 = 3;

pub struct Allocator {
    lookup: LookupService,
    claims: Arc<dyn DeviceClaims>,
    attempts: u32,
}

impl Allocator {
    /// `claims` should be the same registry the lookup service reads from
    pub fn new(lookup: LookupService, claims: Arc<dyn DeviceClaims>) -> Self {
        Self {
            lookup,
            claims,
            attempts: DEFAULT_CLAIM_ATTEMPTS,
        }
    }

    /// Number of lookup-then-claim rounds before giving up (at least 1)
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn lookup(&self) -> &LookupService {
        &self.lookup
    }

    /// Find a free instance of `recipe_id` and mark it busy
    ///
    /// `Ok(None)` means the pool had nothing eligible. Losing every round
    /// to concurrent claimers yields [`PoolError::ClaimConflict`].
    pub async fn claim_free_instance(&self, recipe_id: &str) -> Result<Option<FreeInstance>> {
        for attempt in 1..=self.attempts {
            let Some(instance) = self.lookup.find_free_instance(recipe_id).await? else {
                return Ok(None);
            };

            if self.claims.try_claim(instance.busy_record()).await? {
                tracing::info!("Claimed {}", instance);
                return Ok(Some(instance));
            }

            tracing::warn!(
                "{} was claimed concurrently (attempt {}/{})",
                instance,
                attempt,
                self.attempts
            );
        }

        Err(PoolError::ClaimConflict(recipe_id.to_string()))
    }

    /// Give a claimed instance back to the pool
    pub async fn release(&self, id: &str) -> Result<bool> {
        let released = self.claims.release(id).await?;
        if released {
            tracing::info!("Released instance {}", id);
        } else {
            tracing::debug!("Instance {} was not claimed", id);
        }
        Ok(released)
    }
}
