//! gmsaas-backed instance source

use crate::gmsaas::Gmsaas;
use async_trait::async_trait;
use devpool_core::{InstanceList, InstanceSource, PoolError};

/// Lists instances of the logged-in Genymotion SaaS account
#[derive(Debug, Clone, Default)]
pub struct GmsaasSource {
    gmsaas: Gmsaas,
}

impl GmsaasSource {
    pub fn new(gmsaas: Gmsaas) -> Self {
        Self { gmsaas }
    }

    pub fn gmsaas(&self) -> &Gmsaas {
        &self.gmsaas
    }
}

#[async_trait]
impl InstanceSource for GmsaasSource {
    async fn list_instances(&self) -> devpool_core::Result<InstanceList> {
        self.gmsaas
            .list_instances()
            .await
            .map_err(|e| PoolError::ApiError(e.to_string()))
    }
}
