//! PostgreSQL transformer and inspection stores
//!
//! Both stores share one connection pool. The schema lives in
//! `migrations/001_create_inspections.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use config::PostgresConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{InspectionError, InspectionResult};
use crate::store::traits::{InspectionStore, TransformerStore};
use crate::types::{Inspection, InspectionStatus, NewInspection, Transformer};

/// Open a connection pool from the storage configuration.
pub async fn connect_pool(config: &PostgresConfig) -> InspectionResult<PgPool> {
    let ssl_mode = PgSslMode::from_str(&config.ssl_mode)
        .map_err(|e| InspectionError::ConfigError(format!("Invalid ssl_mode '{}': {}", config.ssl_mode, e)))?;

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
        .ssl_mode(ssl_mode);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect_with(options)
        .await
        .map_err(|e| InspectionError::StorageError(format!("Failed to connect to database: {}", e)))?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to PostgreSQL"
    );

    Ok(pool)
}

/// Run the migration SQL to create tables.
pub async fn run_migrations(pool: &PgPool) -> InspectionResult<()> {
    let migration_sql = include_str!("../../../../migrations/001_create_inspections.sql");
    sqlx::raw_sql(migration_sql)
        .execute(pool)
        .await
        .map_err(|e| InspectionError::StorageError(format!("Migration failed: {}", e)))?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Round-trip a trivial query to check connectivity.
pub async fn ping(pool: &PgPool) -> InspectionResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Database row for a transformer.
#[derive(Debug, Clone, FromRow)]
pub struct TransformerRow {
    pub id: i64,
    pub transformer_no: String,
}

impl TransformerRow {
    pub fn to_domain(&self) -> Transformer {
        Transformer::new(self.id, self.transformer_no.clone())
    }
}

/// Database row for an inspection.
#[derive(Debug, Clone, FromRow)]
pub struct InspectionRow {
    pub id: i64,
    pub transformer_id: i64,
    pub inspected_at: DateTime<Utc>,
    pub maintenance_at: Option<DateTime<Utc>>,
    pub status: String,
    pub notes: Option<String>,
    pub starred: bool,
}

impl InspectionRow {
    /// Convert from database row to domain type.
    pub fn to_domain(&self) -> Inspection {
        let status = InspectionStatus::from_db_str(&self.status).unwrap_or_else(|| {
            warn!(id = self.id, status = %self.status, "Unknown stored status, using default");
            InspectionStatus::default()
        });

        Inspection {
            id: self.id,
            transformer_id: self.transformer_id,
            inspected_at: self.inspected_at,
            maintenance_at: self.maintenance_at,
            status,
            notes: self.notes.clone(),
            starred: self.starred,
        }
    }
}

/// PostgreSQL-backed transformer lookup.
#[derive(Debug, Clone)]
pub struct PostgresTransformerStore {
    pool: PgPool,
}

impl PostgresTransformerStore {
    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a transformer number if it is not present yet.
    pub async fn ensure(&self, transformer_no: &str) -> InspectionResult<Transformer> {
        let row = sqlx::query_as::<_, TransformerRow>(
            r#"
            INSERT INTO transformers (transformer_no) VALUES ($1)
            ON CONFLICT (transformer_no) DO UPDATE SET transformer_no = EXCLUDED.transformer_no
            RETURNING id, transformer_no
            "#,
        )
        .bind(transformer_no)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| InspectionError::StorageError(format!("Failed to ensure transformer: {}", e)))?;

        Ok(row.to_domain())
    }
}

#[async_trait]
impl TransformerStore for PostgresTransformerStore {
    #[instrument(skip(self))]
    async fn find_by_transformer_no(
        &self,
        transformer_no: &str,
    ) -> InspectionResult<Option<Transformer>> {
        let row = sqlx::query_as::<_, TransformerRow>(
            "SELECT id, transformer_no FROM transformers WHERE transformer_no = $1",
        )
        .bind(transformer_no)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InspectionError::StorageError(format!("Failed to get transformer: {}", e)))?;

        Ok(row.map(|r| r.to_domain()))
    }
}

/// PostgreSQL-backed inspection store.
#[derive(Debug, Clone)]
pub struct PostgresInspectionStore {
    pool: PgPool,
}

impl PostgresInspectionStore {
    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

const INSPECTION_COLUMNS: &str =
    "id, transformer_id, inspected_at, maintenance_at, status, notes, starred";

#[async_trait]
impl InspectionStore for PostgresInspectionStore {
    #[instrument(skip(self, inspection), fields(transformer_id = inspection.transformer_id))]
    async fn create(&self, inspection: NewInspection) -> InspectionResult<Inspection> {
        let query = format!(
            r#"
            INSERT INTO inspections (
                transformer_id, inspected_at, maintenance_at, status, notes, starred
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSPECTION_COLUMNS
        );

        let row = sqlx::query_as::<_, InspectionRow>(&query)
            .bind(inspection.transformer_id)
            .bind(inspection.inspected_at)
            .bind(inspection.maintenance_at)
            .bind(inspection.status.as_db_str())
            .bind(&inspection.notes)
            .bind(inspection.starred)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| InspectionError::StorageError(format!("Failed to create inspection: {}", e)))?;

        debug!(id = row.id, "Inserted inspection");
        Ok(row.to_domain())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> InspectionResult<Option<Inspection>> {
        let query = format!("SELECT {} FROM inspections WHERE id = $1", INSPECTION_COLUMNS);
        let row = sqlx::query_as::<_, InspectionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| InspectionError::StorageError(format!("Failed to get inspection: {}", e)))?;

        Ok(row.map(|r| r.to_domain()))
    }

    #[instrument(skip(self))]
    async fn list_by_transformer(&self, transformer_id: i64) -> InspectionResult<Vec<Inspection>> {
        let query = format!(
            "SELECT {} FROM inspections WHERE transformer_id = $1 ORDER BY inspected_at DESC",
            INSPECTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, InspectionRow>(&query)
            .bind(transformer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| InspectionError::StorageError(format!("Failed to list inspections: {}", e)))?;

        Ok(rows.iter().map(|r| r.to_domain()).collect())
    }

    #[instrument(skip(self, inspection), fields(id = inspection.id))]
    async fn update(&self, inspection: &Inspection) -> InspectionResult<Inspection> {
        let query = format!(
            r#"
            UPDATE inspections SET
                inspected_at = $1,
                maintenance_at = $2,
                status = $3,
                notes = $4,
                starred = $5
            WHERE id = $6
            RETURNING {}
            "#,
            INSPECTION_COLUMNS
        );

        let row = sqlx::query_as::<_, InspectionRow>(&query)
            .bind(inspection.inspected_at)
            .bind(inspection.maintenance_at)
            .bind(inspection.status.as_db_str())
            .bind(&inspection.notes)
            .bind(inspection.starred)
            .bind(inspection.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| InspectionError::StorageError(format!("Failed to update inspection: {}", e)))?;

        row.map(|r| r.to_domain())
            .ok_or(InspectionError::NotFound(inspection.id))
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: i64) -> InspectionResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inspections WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    InspectionError::StorageError(format!("Failed to check inspection: {}", e))
                })?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> InspectionResult<()> {
        let result = sqlx::query("DELETE FROM inspections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| InspectionError::StorageError(format!("Failed to delete inspection: {}", e)))?;

        debug!(id, rows = result.rows_affected(), "Deleted inspection");
        Ok(())
    }
}
