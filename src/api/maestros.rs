use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::client::ApiClient;
use crate::error::IntranetResult;
use crate::model::area::{Area, TipoContrato};
use crate::model::role::Rol;
use crate::routes;

fn build_cache<T: Send + Sync + 'static>(ttl: Duration) -> Cache<(), Arc<Vec<T>>> {
    Cache::builder().max_capacity(1).time_to_live(ttl).build()
}

#[derive(Clone)]
pub struct MaestrosService {
    client: ApiClient,
    tipos_contrato: Cache<(), Arc<Vec<TipoContrato>>>,
    roles: Cache<(), Arc<Vec<Rol>>>,
    areas: Cache<(), Arc<Vec<Area>>>,
}

impl MaestrosService {
    pub fn new(client: ApiClient, ttl: Duration) -> Self {
        Self {
            client,
            tipos_contrato: build_cache(ttl),
            roles: build_cache(ttl),
            areas: build_cache(ttl),
        }
    }

    async fn cached<T>(
        &self,
        cache: &Cache<(), Arc<Vec<T>>>,
        path: &str,
    ) -> IntranetResult<Arc<Vec<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if let Some(hit) = cache.get(&()).await {
            debug!(path, "Master data cache hit");
            return Ok(hit);
        }

        let fresh: Arc<Vec<T>> = Arc::new(self.client.get(path, &[]).await?);
        cache.insert((), fresh.clone()).await;
        Ok(fresh)
    }

    pub async fn tipos_contrato(&self) -> IntranetResult<Arc<Vec<TipoContrato>>> {
        self.cached(&self.tipos_contrato, routes::TIPOS_CONTRATO).await
    }

    pub async fn roles(&self) -> IntranetResult<Arc<Vec<Rol>>> {
        self.cached(&self.roles, routes::ROLES).await
    }

    pub async fn areas(&self) -> IntranetResult<Arc<Vec<Area>>> {
        self.cached(&self.areas, routes::AREAS).await
    }

    /// Loads the three lists concurrently.
    pub async fn warmup(&self) -> IntranetResult<()> {
        let (tipos, roles, areas) =
            futures::try_join!(self.tipos_contrato(), self.roles(), self.areas())?;

        info!(
            tipos_contrato = tipos.len(),
            roles = roles.len(),
            areas = areas.len(),
            "Master data warmup complete"
        );
        Ok(())
    }

    pub fn invalidate(&self) {
        self.tipos_contrato.invalidate_all();
        self.roles.invalidate_all();
        self.areas.invalidate_all();
    }
}
