//! Wiring of the lookup service and its collaborators from config

use devpool_config::PoolConfig;
use devpool_core::{Allocator, FileRegistry, LookupService, SessionNaming};
use devpool_gmsaas::{Gmsaas, GmsaasSource};
use std::sync::Arc;

pub struct Pool {
    pub lookup: LookupService,
    pub allocator: Allocator,
    pub registry: Arc<FileRegistry>,
    pub naming: Arc<SessionNaming>,
}

impl Pool {
    pub fn from_config(config: &PoolConfig) -> anyhow::Result<Self> {
        let stale_after = chrono::Duration::from_std(std::time::Duration::from_secs(
            config.lock_stale_after_secs,
        ))?;

        let source = Arc::new(GmsaasSource::new(Gmsaas::new(&config.gmsaas_path)));
        let registry = Arc::new(
            FileRegistry::new(&config.registry_path).with_stale_after(stale_after),
        );
        let naming = Arc::new(SessionNaming::new(&config.name_prefix, &config.session_id));

        let lookup = LookupService::new(source, naming.clone(), registry.clone());
        let allocator = Allocator::new(lookup.clone(), registry.clone())
            .with_attempts(config.claim_attempts);

        Ok(Self {
            lookup,
            allocator,
            registry,
            naming,
        })
    }
}
