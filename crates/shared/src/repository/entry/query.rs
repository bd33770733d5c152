use crate::{
    abstract_trait::EntryQueryRepositoryTrait, config::ConnectionPool,
    domain::requests::FindAllEntries, errors::RepositoryError, model::Entry as EntryModel,
};
use async_trait::async_trait;
use sqlx::FromRow;
use tracing::{error, info};

#[derive(FromRow)]
struct EntryListRow {
    #[sqlx(flatten)]
    entry: EntryModel,
    total_count: i64,
}

#[derive(Clone)]
pub struct EntryQueryRepository {
    db: ConnectionPool,
}

impl EntryQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryQueryRepositoryTrait for EntryQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllEntries,
    ) -> Result<(Vec<EntryModel>, i64), RepositoryError> {
        info!("🔍 Fetching entries with search: {:?}", req.search);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let search_pattern = if req.search.trim().is_empty() {
            None
        } else {
            Some(req.search.as_str())
        };

        let rows = sqlx::query_as::<_, EntryListRow>(
            r#"
            SELECT
                e.*,
                COUNT(*) OVER() AS total_count
            FROM entries e
            WHERE ($1::TEXT IS NULL
                OR e.customer_name ILIKE '%' || $1 || '%'
                OR e.customer_phone ILIKE '%' || $1 || '%'
                OR e.customer_email ILIKE '%' || $1 || '%')
            ORDER BY e.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch entries: {:?}", e);
            RepositoryError::from(e)
        })?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);

        let entries = rows.into_iter().map(|r| r.entry).collect();

        Ok((entries, total))
    }

    async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<EntryModel>, RepositoryError> {
        info!("🆔 Fetching entry: {}", public_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let entry = sqlx::query_as::<_, EntryModel>(
            r#"
            SELECT *
            FROM entries
            WHERE public_id = $1
            "#,
        )
        .bind(public_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(entry)
    }
}
