use crate::types::{Result, SourceConfig, SourceProvider, SourceType};
use async_trait::async_trait;
use sqlx::{PgPool, Pool, Postgres, Row};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Parse a JSON array of source configurations.
pub fn parse_sources_json(json: &str) -> Result<Vec<SourceConfig>> {
    Ok(serde_json::from_str(json)?)
}

/// Source lists held in memory, keyed by user.
#[derive(Default)]
pub struct MemorySourceStore {
    sources: RwLock<HashMap<Uuid, Vec<SourceConfig>>>,
}

impl MemorySourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(user_id: Uuid, sources: Vec<SourceConfig>) -> Self {
        let mut map = HashMap::new();
        map.insert(user_id, sources);
        Self {
            sources: RwLock::new(map),
        }
    }

    /// Load a JSON source list from disk and assign it to `user_id`.
    pub async fn load_json(path: impl AsRef<Path>, user_id: Uuid) -> Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let sources = parse_sources_json(&json)?;
        info!("Loaded {} sources from {}", sources.len(), path.display());
        Ok(Self::with_sources(user_id, sources))
    }

    pub async fn set_sources(&self, user_id: Uuid, sources: Vec<SourceConfig>) {
        self.sources.write().await.insert(user_id, sources);
    }
}

#[async_trait]
impl SourceProvider for MemorySourceStore {
    async fn sources_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<SourceConfig>> {
        let sources = self.sources.read().await;
        Ok(sources.get(&user_id).cloned().unwrap_or_default())
    }
}

/// Reads the `sources` table. Writes belong to the settings UI, not here.
pub struct PgSourceStore {
    db: Pool<Postgres>,
}

impl PgSourceStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = PgPool::connect(database_url).await?;
        Ok(Self { db })
    }

    pub fn from_pool(db: Pool<Postgres>) -> Self {
        Self { db }
    }

    pub async fn list_sources(&self, user_id: Uuid) -> Result<Vec<SourceConfig>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_type, source_url, source_name, priority, is_active
            FROM sources
            WHERE user_id = $1
            ORDER BY priority DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut sources = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_type: String = row.try_get("source_type")?;
            let source_type = match raw_type.parse::<SourceType>() {
                Ok(source_type) => source_type,
                Err(e) => {
                    warn!("Skipping source with unknown type {:?}: {}", raw_type, e);
                    continue;
                }
            };

            sources.push(SourceConfig {
                id: row.try_get("id")?,
                source_type,
                url: row.try_get("source_url")?,
                display_name: row.try_get("source_name")?,
                priority: row.try_get::<Option<i32>, _>("priority")?.unwrap_or(3),
                is_active: row.try_get::<Option<bool>, _>("is_active")?.unwrap_or(true),
            });
        }

        debug!("Loaded {} sources for user {}", sources.len(), user_id);
        Ok(sources)
    }
}

#[async_trait]
impl SourceProvider for PgSourceStore {
    async fn sources_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<SourceConfig>> {
        Ok(self.list_sources(user_id).await?)
    }
}
