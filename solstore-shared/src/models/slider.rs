/// Homepage slider model and database operations
///
/// Hero slider entries shown on the public landing page. Every slider has
/// exactly one image; the call-to-action is optional and can point at an
/// external URL (`cta_link`) or an internal page name (`cta_internal_page`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// One homepage slider entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HomepageSlider {
    /// Unique slider ID (auto-increment)
    pub id: i64,

    /// Main headline (max 200 chars)
    pub title: String,

    /// Secondary text (max 300 chars, may be empty)
    pub subtitle: String,

    /// Brief description (max 1000 chars, may be empty)
    pub description: String,

    /// Reference to the stored slider image (always present)
    pub image_ref: String,

    /// Call-to-action button text (max 100 chars, may be empty)
    pub cta_text: String,

    /// Call-to-action external URL (max 500 chars, may be empty)
    pub cta_link: String,

    /// Call-to-action internal page name (e.g. "products")
    pub cta_internal_page: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new slider
#[derive(Debug, Clone)]
pub struct CreateSlider {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_ref: String,
    pub cta_text: String,
    pub cta_link: String,
    pub cta_internal_page: String,
}

/// Input for updating an existing slider
///
/// Text fields are always rewritten by the admin form; the image is only
/// replaced when a new upload was supplied.
#[derive(Debug, Clone)]
pub struct UpdateSlider {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_ref: Option<String>,
    pub cta_text: String,
    pub cta_link: String,
    pub cta_internal_page: String,
}

impl HomepageSlider {
    /// Creates a new slider
    pub async fn create(pool: &PgPool, data: CreateSlider) -> Result<Self, sqlx::Error> {
        let slider = sqlx::query_as::<_, HomepageSlider>(
            r#"
            INSERT INTO homepage_sliders
                (title, subtitle, description, image_ref, cta_text, cta_link,
                 cta_internal_page)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, subtitle, description, image_ref, cta_text,
                      cta_link, cta_internal_page, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.subtitle)
        .bind(data.description)
        .bind(data.image_ref)
        .bind(data.cta_text)
        .bind(data.cta_link)
        .bind(data.cta_internal_page)
        .fetch_one(pool)
        .await?;

        Ok(slider)
    }

    /// Finds a slider by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let slider = sqlx::query_as::<_, HomepageSlider>(
            r#"
            SELECT id, title, subtitle, description, image_ref, cta_text,
                   cta_link, cta_internal_page, created_at, updated_at
            FROM homepage_sliders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(slider)
    }

    /// Updates an existing slider
    ///
    /// When `data.image_ref` is None the stored image reference is kept.
    ///
    /// # Returns
    ///
    /// The updated slider if found, None if no such record exists
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateSlider,
    ) -> Result<Option<Self>, sqlx::Error> {
        let slider = sqlx::query_as::<_, HomepageSlider>(
            r#"
            UPDATE homepage_sliders
            SET title = $2,
                subtitle = $3,
                description = $4,
                image_ref = COALESCE($5, image_ref),
                cta_text = $6,
                cta_link = $7,
                cta_internal_page = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, subtitle, description, image_ref, cta_text,
                      cta_link, cta_internal_page, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.subtitle)
        .bind(data.description)
        .bind(data.image_ref)
        .bind(data.cta_text)
        .bind(data.cta_link)
        .bind(data.cta_internal_page)
        .fetch_optional(pool)
        .await?;

        Ok(slider)
    }

    /// Deletes a slider by ID
    ///
    /// # Returns
    ///
    /// True if the slider was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM homepage_sliders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists sliders for the admin page, most recently updated first
    pub async fn list_admin(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sliders = sqlx::query_as::<_, HomepageSlider>(
            r#"
            SELECT id, title, subtitle, description, image_ref, cta_text,
                   cta_link, cta_internal_page, created_at, updated_at
            FROM homepage_sliders
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(sliders)
    }

    /// Lists sliders for the public landing page, newest first
    pub async fn list_public(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sliders = sqlx::query_as::<_, HomepageSlider>(
            r#"
            SELECT id, title, subtitle, description, image_ref, cta_text,
                   cta_link, cta_internal_page, created_at, updated_at
            FROM homepage_sliders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(sliders)
    }
}
