//! Collection repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{CollectionEntity, ProductEntity};
use crate::metrics::QueryTimer;

/// Column values for a new collection.
#[derive(Debug, Clone)]
pub struct NewCollection<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub is_active: bool,
}

/// Repository for collection-related database operations.
#[derive(Clone)]
pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    /// Creates a new CollectionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<CollectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_collections");
        let result = sqlx::query_as::<_, CollectionEntity>(
            r#"
            SELECT * FROM collections
            WHERE is_active = true
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn list_all(&self) -> Result<Vec<CollectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_collections");
        let result = sqlx::query_as::<_, CollectionEntity>(
            "SELECT * FROM collections ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CollectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_collection_by_id");
        let result = sqlx::query_as::<_, CollectionEntity>("SELECT * FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(result)
    }

    pub async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CollectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_collection_by_slug");
        let result = sqlx::query_as::<_, CollectionEntity>(
            "SELECT * FROM collections WHERE slug = $1 AND is_active = true",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    /// Active products of a collection, in membership order.
    pub async fn active_products(
        &self,
        collection_id: Uuid,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_collection_products");
        let result = sqlx::query_as::<_, ProductEntity>(
            r#"
            SELECT p.* FROM products p
            JOIN collection_products cp ON cp.product_id = p.id
            WHERE cp.collection_id = $1 AND p.is_active = true
            ORDER BY cp.position ASC, p.sort_order ASC
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn product_ids(&self, collection_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_collection_product_ids");
        let result: Result<Vec<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT product_id FROM collection_products
            WHERE collection_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await;
        timer
            .finish(result)
            .map(|rows| rows.into_iter().map(|(id,)| id).collect())
    }

    /// Inserts a collection and its initial membership atomically.
    pub async fn create(
        &self,
        collection: &NewCollection<'_>,
        product_ids: &[Uuid],
    ) -> Result<CollectionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_collection");
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, CollectionEntity>(
            r#"
            INSERT INTO collections (title, slug, description, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(collection.title)
        .bind(collection.slug)
        .bind(collection.description)
        .bind(collection.image_url)
        .bind(collection.is_active)
        .fetch_one(&mut *tx)
        .await?;

        insert_members(&mut tx, created.id, product_ids).await?;

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Partial update.
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        slug: Option<&str>,
        description: Option<&str>,
        image_url: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<CollectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_collection");
        let result = sqlx::query_as::<_, CollectionEntity>(
            r#"
            UPDATE collections SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(slug)
        .bind(description)
        .bind(image_url)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result)
    }

    pub async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<CollectionEntity>, sqlx::Error> {
        self.update(id, None, None, None, None, Some(is_active)).await
    }

    /// Hard delete. Membership rows cascade.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_collection");
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(result).map(|r| r.rows_affected() > 0)
    }

    /// Replaces the membership with `product_ids`, keeping their order.
    pub async fn replace_products(
        &self,
        collection_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("replace_collection_products");
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM collection_products WHERE collection_id = $1")
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;

        insert_members(&mut tx, collection_id, product_ids).await?;

        tx.commit().await?;
        timer.record();
        Ok(())
    }
}

async fn insert_members(
    tx: &mut Transaction<'_, Postgres>,
    collection_id: Uuid,
    product_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    if product_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO collection_products (collection_id, product_id, position)
        SELECT $1, ids.product_id, (ids.ord - 1)::int
        FROM UNNEST($2::uuid[]) WITH ORDINALITY AS ids(product_id, ord)
        ON CONFLICT (collection_id, product_id) DO NOTHING
        "#,
    )
    .bind(collection_id)
    .bind(product_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
