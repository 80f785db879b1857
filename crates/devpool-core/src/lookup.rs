//! Instance lookup service
//!
//! Answers "which instance of this recipe is free right now" and "which
//! instance has this id". Every call takes a fresh snapshot from the provider
//! and a fresh busy set from the registry; nothing is cached between calls.
//!
//! Lookup only classifies. It never claims an instance, so two concurrent
//! callers may be handed the same free instance. Claiming is the caller's job
//! (see [`Allocator`](crate::Allocator)).

use crate::error::{PoolError, Result};
use crate::instance::{FreeInstance, Instance, is_disconnected};
use crate::provider::{BusyRegistry, InstanceNaming, InstanceSource};
use std::collections::HashSet;
use std::sync::Arc;

/// Why an instance was not considered free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityCheck {
    NotOnline,
    Disconnected,
    OtherRecipe,
    NotFamilial,
    Busy,
}

impl std::fmt::Display for EligibilityCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EligibilityCheck::NotOnline => write!(f, "not online"),
            EligibilityCheck::Disconnected => write!(f, "no adb address"),
            EligibilityCheck::OtherRecipe => write!(f, "other recipe"),
            EligibilityCheck::NotFamilial => write!(f, "not in family"),
            EligibilityCheck::Busy => write!(f, "busy"),
        }
    }
}

/// Lookup service over a provider, a busy registry and a naming oracle
#[derive(Clone)]
pub struct LookupService {
    source: Arc<dyn InstanceSource>,
    naming: Arc<dyn InstanceNaming>,
    registry: Arc<dyn BusyRegistry>,
}

impl LookupService {
    pub fn new(
        source: Arc<dyn InstanceSource>,
        naming: Arc<dyn InstanceNaming>,
        registry: Arc<dyn BusyRegistry>,
    ) -> Self {
        Self {
            source,
            naming,
            registry,
        }
    }

    /// First free instance of `recipe_id`, in provider order
    ///
    /// Provider order is not guaranteed to be stable between calls, so which
    /// of several free instances is returned is best-effort only.
    pub async fn find_free_instance(&self, recipe_id: &str) -> Result<Option<FreeInstance>> {
        if recipe_id.is_empty() {
            return Err(PoolError::InvalidArgument(
                "recipe id must not be empty".to_string(),
            ));
        }

        let snapshot = self.source.list_instances().await?;
        let busy: HashSet<String> = self
            .registry
            .list_busy_devices()
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();

        tracing::debug!(
            "Looking for a free instance of recipe {} among {} instances ({} busy)",
            recipe_id,
            snapshot.instances.len(),
            busy.len()
        );

        let found = snapshot.instances.into_iter().find(|instance| {
            match self.check(instance, recipe_id, &busy) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::debug!("Skipping {}: {}", instance, reason);
                    false
                }
            }
        });

        Ok(found.map(FreeInstance::from))
    }

    /// Instance with exactly this id, whatever its state
    pub async fn get_instance(&self, id: &str) -> Result<Option<Instance>> {
        let snapshot = self.source.list_instances().await?;
        Ok(snapshot.instances.into_iter().find(|i| i.id == id))
    }

    /// Check an instance against every allocation criterion, in order
    fn check(
        &self,
        instance: &Instance,
        recipe_id: &str,
        busy: &HashSet<String>,
    ) -> std::result::Result<(), EligibilityCheck> {
        if !instance.is_online() {
            return Err(EligibilityCheck::NotOnline);
        }
        if is_disconnected(&instance.connection_address) {
            return Err(EligibilityCheck::Disconnected);
        }
        if instance.recipe.id != recipe_id {
            return Err(EligibilityCheck::OtherRecipe);
        }
        if !self.naming.is_familial(&instance.name) {
            return Err(EligibilityCheck::NotFamilial);
        }
        if busy.contains(&instance.id) {
            return Err(EligibilityCheck::Busy);
        }
        Ok(())
    }
}
