use crate::{
    abstract_trait::EntryCommandRepositoryTrait, config::ConnectionPool,
    domain::requests::NewEntry, errors::RepositoryError, model::Entry as EntryModel,
};
use async_trait::async_trait;

pub struct EntryCommandRepository {
    db: ConnectionPool,
}

impl EntryCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryCommandRepositoryTrait for EntryCommandRepository {
    async fn create(&self, row: &NewEntry) -> Result<EntryModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let entry = sqlx::query_as::<_, EntryModel>(
            r#"
            INSERT INTO entries (
                public_id,
                customer_name,
                customer_phone,
                customer_email,
                delivery_address,
                item_description,
                shoe_condition,
                shoe_service,
                waiver_signed,
                waiver_url,
                before_photos,
                assigned_to,
                needs_reglue,
                needs_paint,
                status,
                service_details,
                after_photos,
                billing,
                additional_billing,
                delivery_option,
                marked_as,
                created_at,
                updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21,
                CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
            )
            RETURNING *
            "#,
        )
        .bind(&row.public_id)
        .bind(&row.customer_name)
        .bind(&row.customer_phone)
        .bind(&row.customer_email)
        .bind(&row.delivery_address)
        .bind(&row.item_description)
        .bind(&row.shoe_condition)
        .bind(&row.shoe_service)
        .bind(row.waiver_signed)
        .bind(&row.waiver_url)
        .bind(&row.before_photos)
        .bind(&row.assigned_to)
        .bind(row.needs_reglue)
        .bind(row.needs_paint)
        .bind(&row.status)
        .bind(&row.service_details)
        .bind(&row.after_photos)
        .bind(row.billing)
        .bind(row.additional_billing)
        .bind(&row.delivery_option)
        .bind(&row.marked_as)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "public_id"))?;

        Ok(entry)
    }

    async fn update(&self, entry: &EntryModel) -> Result<EntryModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query_as::<_, EntryModel>(
            r#"
            UPDATE entries
            SET customer_name = $2,
                customer_phone = $3,
                customer_email = $4,
                delivery_address = $5,
                item_description = $6,
                shoe_condition = $7,
                shoe_service = $8,
                waiver_signed = $9,
                waiver_url = $10,
                before_photos = $11,
                assigned_to = $12,
                needs_reglue = $13,
                needs_paint = $14,
                status = $15,
                service_details = $16,
                after_photos = $17,
                billing = $18,
                additional_billing = $19,
                delivery_option = $20,
                marked_as = $21,
                updated_at = CURRENT_TIMESTAMP
            WHERE public_id = $1
            RETURNING *
            "#,
        )
        .bind(&entry.public_id)
        .bind(&entry.customer_name)
        .bind(&entry.customer_phone)
        .bind(&entry.customer_email)
        .bind(&entry.delivery_address)
        .bind(&entry.item_description)
        .bind(&entry.shoe_condition)
        .bind(&entry.shoe_service)
        .bind(entry.waiver_signed)
        .bind(&entry.waiver_url)
        .bind(&entry.before_photos)
        .bind(&entry.assigned_to)
        .bind(entry.needs_reglue)
        .bind(entry.needs_paint)
        .bind(&entry.status)
        .bind(&entry.service_details)
        .bind(&entry.after_photos)
        .bind(entry.billing)
        .bind(entry.additional_billing)
        .bind(&entry.delivery_option)
        .bind(&entry.marked_as)
        .fetch_optional(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        updated.ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, public_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            DELETE FROM entries
            WHERE public_id = $1
            "#,
        )
        .bind(public_id)
        .execute(&mut *conn)
        .await
        .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
