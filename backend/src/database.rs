//! PostgreSQL shelter store.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, postgres::PgPoolOptions};

use crate::models::{Shelter, ShelterKind};
use crate::repository::{RepositoryError, ShelterFilter, ShelterRepository};

const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, FromRow)]
struct ShelterRow {
    id: String,
    name: String,
    description: Option<String>,
    kind: String,
    is_free: bool,
    capacity: Option<i32>,
    is_serviced: bool,
    accessibility: Vec<String>,
    amenities: Vec<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: Option<f64>,
}

impl TryFrom<ShelterRow> for Shelter {
    type Error = RepositoryError;

    fn try_from(row: ShelterRow) -> Result<Self, Self::Error> {
        let kind = match row.kind.as_str() {
            "hut" => ShelterKind::Hut,
            "shelter" => ShelterKind::Shelter,
            other => {
                return Err(RepositoryError::InvalidData(format!(
                    "shelter {} has unknown kind {other:?}",
                    row.id
                )));
            }
        };
        Ok(Shelter {
            id: row.id,
            name: row.name,
            description: row.description,
            kind,
            is_free: row.is_free,
            capacity: row.capacity.and_then(|c| u32::try_from(c).ok()),
            is_serviced: row.is_serviced,
            accessibility: row.accessibility,
            amenities: row.amenities,
            latitude: row.latitude,
            longitude: row.longitude,
            elevation: row.elevation,
        })
    }
}

fn kind_column(kind: ShelterKind) -> &'static str {
    match kind {
        ShelterKind::Hut => "hut",
        ShelterKind::Shelter => "shelter",
    }
}

/// `ILIKE` pattern matching `text` anywhere, with wildcards in `text` escaped.
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn into_shelters(rows: Vec<ShelterRow>) -> Result<Vec<Shelter>, RepositoryError> {
    rows.into_iter().map(Shelter::try_from).collect()
}

pub struct PgShelterRepository {
    pool: PgPool,
}

impl PgShelterRepository {
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool created");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `shelters` table and its indexes if missing.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        // raw_sql accepts several statements in one call
        let mut conn = self.pool.acquire().await?;
        let migration_sql = include_str!("../migrations/20250301_create_shelters.sql");
        sqlx::raw_sql(migration_sql).execute(&mut *conn).await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Inserts or replaces shelters by id, in a single transaction.
    pub async fn upsert_shelters(&self, shelters: &[Shelter]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for shelter in shelters {
            let capacity = shelter.capacity.and_then(|c| i32::try_from(c).ok());
            let result = sqlx::query(
                r#"
                INSERT INTO shelters (
                    id, name, description, kind, is_free, capacity, is_serviced,
                    accessibility, amenities, latitude, longitude, elevation
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    kind = EXCLUDED.kind,
                    is_free = EXCLUDED.is_free,
                    capacity = EXCLUDED.capacity,
                    is_serviced = EXCLUDED.is_serviced,
                    accessibility = EXCLUDED.accessibility,
                    amenities = EXCLUDED.amenities,
                    latitude = EXCLUDED.latitude,
                    longitude = EXCLUDED.longitude,
                    elevation = EXCLUDED.elevation
                "#,
            )
            .bind(&shelter.id)
            .bind(&shelter.name)
            .bind(&shelter.description)
            .bind(kind_column(shelter.kind))
            .bind(shelter.is_free)
            .bind(capacity)
            .bind(shelter.is_serviced)
            .bind(&shelter.accessibility)
            .bind(&shelter.amenities)
            .bind(shelter.latitude)
            .bind(shelter.longitude)
            .bind(shelter.elevation)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        tracing::info!("Upserted {} shelters", written);
        Ok(written)
    }
}

#[async_trait]
impl ShelterRepository for PgShelterRepository {
    async fn all_shelters(&self) -> Result<Vec<Shelter>, RepositoryError> {
        let rows = sqlx::query_as::<_, ShelterRow>("SELECT * FROM shelters ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        into_shelters(rows)
    }

    async fn find_shelters(
        &self,
        filter: &ShelterFilter,
    ) -> Result<Vec<Shelter>, RepositoryError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT * FROM shelters WHERE latitude IS NOT NULL AND longitude IS NOT NULL",
        );

        if let Some(text) = filter.text() {
            let pattern = contains_pattern(text);
            query
                .push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind_column(kind));
        }
        if let Some(is_free) = filter.is_free {
            query.push(" AND is_free = ").push_bind(is_free);
        }
        if let Some(min) = filter.min_capacity {
            query.push(" AND capacity >= ").push_bind(i64::from(min));
        }
        if let Some(is_serviced) = filter.is_serviced {
            query.push(" AND is_serviced = ").push_bind(is_serviced);
        }
        if !filter.accessibility.is_empty() {
            query
                .push(" AND accessibility @> ")
                .push_bind(filter.accessibility.clone());
        }
        if !filter.amenities.is_empty() {
            query
                .push(" AND amenities @> ")
                .push_bind(filter.amenities.clone());
        }
        query.push(" ORDER BY name ASC");

        let rows = query
            .build_query_as::<ShelterRow>()
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("shelter search matched {} rows", rows.len());
        into_shelters(rows)
    }

    async fn get_shelter(&self, id: &str) -> Result<Option<Shelter>, RepositoryError> {
        sqlx::query_as::<_, ShelterRow>("SELECT * FROM shelters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Shelter::try_from)
            .transpose()
    }
}
