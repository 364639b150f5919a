//! Storage backend selection and seeding

use anyhow::{Context, Result};
use async_trait::async_trait;
use config::StorageConfig;
use inspection::store::postgres::{connect_pool, ping, run_migrations};
use inspection::{
    InMemoryInspectionStore, InMemoryTransformerStore, InspectionStore,
    PostgresInspectionStore, PostgresTransformerStore, TransformerStore,
};
use server::shutdown::run_until_shutdown;
use server::{ConnectionStatus, HealthProbe, ShutdownController};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct StorageBackends {
    pub transformers: Arc<dyn TransformerStore>,
    pub inspections: Arc<dyn InspectionStore>,
    /// Connectivity check for `/health/detailed`
    pub probe: Option<Arc<dyn HealthProbe>>,
}

pub async fn build_storage(
    storage: &StorageConfig,
    shutdown: &ShutdownController,
) -> Result<StorageBackends> {
    if storage.is_memory() {
        let transformers = Arc::new(InMemoryTransformerStore::new());
        for transformer_no in &storage.seed_transformers {
            let transformer = transformers.insert(transformer_no.as_str());
            debug!(id = transformer.id, transformer_no = %transformer.transformer_no, "Seeded transformer");
        }
        info!(transformers = transformers.len(), "Using in-memory storage");

        return Ok(StorageBackends {
            transformers,
            inspections: Arc::new(InMemoryInspectionStore::new()),
            probe: None,
        });
    }

    let pg = storage
        .postgres
        .as_ref()
        .context("storage.postgres is required for the postgres backend")?;

    let pool = run_until_shutdown(shutdown.token(), connect_pool(pg))
        .await
        .context("Shutdown requested while connecting to the database")??;

    if storage.run_migrations {
        run_migrations(&pool).await?;
    }

    let transformers = PostgresTransformerStore::from_pool(pool.clone());
    for transformer_no in &storage.seed_transformers {
        let transformer = transformers
            .ensure(transformer_no)
            .await
            .with_context(|| format!("Failed to seed transformer {}", transformer_no))?;
        debug!(id = transformer.id, transformer_no = %transformer.transformer_no, "Seeded transformer");
    }

    let probe = PostgresProbe {
        address: format!("{}:{}", pg.host, pg.port),
        pool: pool.clone(),
    };

    Ok(StorageBackends {
        transformers: Arc::new(transformers),
        inspections: Arc::new(PostgresInspectionStore::from_pool(pool)),
        probe: Some(Arc::new(probe)),
    })
}

struct PostgresProbe {
    address: String,
    pool: PgPool,
}

#[async_trait]
impl HealthProbe for PostgresProbe {
    async fn check(&self) -> ConnectionStatus {
        let start = Instant::now();
        let result = ping(&self.pool).await;

        ConnectionStatus {
            service: "postgres".to_string(),
            address: self.address.clone(),
            connected: result.is_ok(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: result.err().map(|e| e.to_string()),
        }
    }
}
