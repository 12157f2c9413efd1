use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    domain::{ClientId, ClientRecord},
    error::{StoreError, StoreResult},
    form::ClientFields,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use tracing::{info, warn};

use crate::{
    audit::{AuditAction, AuditDescription, AuditRecord},
    prepare_fields, Mutation, RecordStore,
};

const CLIENT_COLUMNS: &str = "id, name, email, phone, address, created_at";

/// Record store delegating to a SQLite database. Every mutation also writes an
/// audit row; a failed audit write is logged and never undoes the mutation.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        if !database_url.starts_with("sqlite:") {
            bail!("unsupported database url '{database_url}': expected a sqlite: url");
        }
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply client store migrations")?;
        info!(database_url, "sqlite record store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Most recent audit rows first.
    pub async fn audit_trail(&self, limit: u32) -> StoreResult<Vec<AuditRecord>> {
        let rows = sqlx::query(
            "SELECT id, table_name, action, detail, recorded_at
             FROM audit_changes
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(transport)?;

        rows.into_iter()
            .map(|r| {
                let raw_action = r.get::<String, _>(2);
                let action = AuditAction::parse(&raw_action).ok_or_else(|| {
                    StoreError::transport(format!("unknown audit action '{raw_action}'"))
                })?;
                Ok(AuditRecord {
                    id: r.get::<i64, _>(0),
                    description: AuditDescription {
                        table: r.get::<String, _>(1),
                        action,
                        detail: r.get::<String, _>(3),
                        recorded_at: r.get::<DateTime<Utc>, _>(4),
                    },
                })
            })
            .collect()
    }

    async fn record_audit(&self, audit: &AuditDescription) {
        let written = sqlx::query(
            "INSERT INTO audit_changes (table_name, action, detail, recorded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&audit.table)
        .bind(audit.action.as_str())
        .bind(&audit.detail)
        .bind(audit.recorded_at)
        .execute(&self.pool)
        .await;

        if let Err(err) = written {
            warn!(
                action = audit.action.as_str(),
                detail = %audit.detail,
                "failed to record audit change: {err}"
            );
        }
    }

    async fn fetch_client(&self, id: ClientId) -> StoreResult<Option<ClientRecord>> {
        let row = sqlx::query(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(transport)?;
        Ok(row.as_ref().map(client_from_row))
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<ClientRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(transport)?;
        Ok(rows.iter().map(client_from_row).collect())
    }

    async fn get(&self, id: ClientId) -> StoreResult<ClientRecord> {
        self.fetch_client(id).await?.ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, fields: ClientFields) -> StoreResult<Mutation<ClientRecord>> {
        let fields = prepare_fields(fields)?;
        let row = sqlx::query(&format!(
            "INSERT INTO clients (name, email, phone, address, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.phone.as_deref())
        .bind(fields.address.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(transport)?;

        let record = client_from_row(&row);
        let audit = AuditDescription::created(&record);
        self.record_audit(&audit).await;
        Ok(Mutation::new(record, audit))
    }

    async fn update(
        &self,
        id: ClientId,
        fields: ClientFields,
    ) -> StoreResult<Mutation<ClientRecord>> {
        let fields = prepare_fields(fields)?;
        let previous = self.fetch_client(id).await?.ok_or(StoreError::NotFound(id))?;

        let row = sqlx::query(&format!(
            "UPDATE clients
             SET name = ?, email = ?, phone = ?, address = ?
             WHERE id = ?
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(fields.phone.as_deref())
        .bind(fields.address.as_deref())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(transport)?;

        // The row can vanish between the read and the write.
        let current = row
            .as_ref()
            .map(client_from_row)
            .ok_or(StoreError::NotFound(id))?;
        let audit = AuditDescription::updated(&previous, &current);
        self.record_audit(&audit).await;
        Ok(Mutation::new(current, audit))
    }

    async fn delete(&self, id: ClientId) -> StoreResult<Mutation<ClientRecord>> {
        let row = sqlx::query(&format!(
            "DELETE FROM clients WHERE id = ? RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(transport)?;

        let removed = row
            .as_ref()
            .map(client_from_row)
            .ok_or(StoreError::NotFound(id))?;
        let audit = AuditDescription::deleted(&removed);
        self.record_audit(&audit).await;
        Ok(Mutation::new(removed, audit))
    }
}

fn client_from_row(r: &SqliteRow) -> ClientRecord {
    ClientRecord {
        id: ClientId(r.get::<i64, _>(0)),
        name: r.get::<String, _>(1),
        email: r.get::<String, _>(2),
        phone: r.get::<Option<String>, _>(3),
        address: r.get::<Option<String>, _>(4),
        created_at: r.get::<DateTime<Utc>, _>(5),
    }
}

fn transport(err: sqlx::Error) -> StoreError {
    StoreError::transport(err.to_string())
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}
