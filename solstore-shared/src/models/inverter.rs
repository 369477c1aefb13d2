/// Inverter model and database operations
///
/// Solar inverter products listed on the storefront and managed from the
/// admin area. The optional `image_ref` points at a file held by the image
/// store; releasing it on delete or replacement is the caller's job, not
/// the model's.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE inverters (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     brand VARCHAR(100) NOT NULL,
///     model VARCHAR(100) NOT NULL,
///     power_capacity_kw DOUBLE PRECISION NOT NULL,
///     input_voltage VARCHAR(50) NOT NULL,
///     output_voltage VARCHAR(50) NOT NULL,
///     price NUMERIC(10, 2) NOT NULL,
///     image_ref VARCHAR(512),
///     description TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Inverter model representing one product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inverter {
    /// Unique inverter ID (auto-increment)
    pub id: i64,

    /// Product name
    pub name: String,

    /// Manufacturer brand
    pub brand: String,

    /// Model designation (free text)
    pub model: String,

    /// Rated power capacity in kilowatts
    pub power_capacity_kw: f64,

    /// Input voltage specification (free text, e.g. "48V DC")
    pub input_voltage: String,

    /// Output voltage specification (free text, e.g. "230V AC")
    pub output_voltage: String,

    /// Price, fixed-point with two decimal places
    pub price: Decimal,

    /// Reference to the stored product image, if any
    pub image_ref: Option<String>,

    /// Free-text product description
    pub description: String,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new inverter
#[derive(Debug, Clone)]
pub struct CreateInverter {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub power_capacity_kw: f64,
    pub input_voltage: String,
    pub output_voltage: String,
    pub price: Decimal,
    pub image_ref: Option<String>,
    pub description: String,
}

/// Input for updating an existing inverter
///
/// All fields are optional. Only `Some` fields are written; omitted fields
/// retain their previous value.
#[derive(Debug, Clone, Default)]
pub struct UpdateInverter {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub power_capacity_kw: Option<f64>,
    pub input_voltage: Option<String>,
    pub output_voltage: Option<String>,
    pub price: Option<Decimal>,
    pub image_ref: Option<Option<String>>,
    pub description: Option<String>,
}

impl Inverter {
    /// Creates a new inverter
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn create(pool: &PgPool, data: CreateInverter) -> Result<Self, sqlx::Error> {
        let inverter = sqlx::query_as::<_, Inverter>(
            r#"
            INSERT INTO inverters
                (name, brand, model, power_capacity_kw, input_voltage,
                 output_voltage, price, image_ref, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, brand, model, power_capacity_kw, input_voltage,
                      output_voltage, price, image_ref, description,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.brand)
        .bind(data.model)
        .bind(data.power_capacity_kw)
        .bind(data.input_voltage)
        .bind(data.output_voltage)
        .bind(data.price)
        .bind(data.image_ref)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(inverter)
    }

    /// Finds an inverter by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let inverter = sqlx::query_as::<_, Inverter>(
            r#"
            SELECT id, name, brand, model, power_capacity_kw, input_voltage,
                   output_voltage, price, image_ref, description,
                   created_at, updated_at
            FROM inverters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(inverter)
    }

    /// Updates an existing inverter
    ///
    /// Only `Some` fields in `data` are written; the `updated_at` timestamp
    /// is always bumped. Pass `image_ref: Some(None)` to clear the image
    /// reference.
    ///
    /// # Returns
    ///
    /// The updated inverter if found, None if no such record exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateInverter,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build a dynamic update statement from the supplied fields
        let mut query = String::from("UPDATE inverters SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.brand.is_some() {
            bind_count += 1;
            query.push_str(&format!(", brand = ${}", bind_count));
        }
        if data.model.is_some() {
            bind_count += 1;
            query.push_str(&format!(", model = ${}", bind_count));
        }
        if data.power_capacity_kw.is_some() {
            bind_count += 1;
            query.push_str(&format!(", power_capacity_kw = ${}", bind_count));
        }
        if data.input_voltage.is_some() {
            bind_count += 1;
            query.push_str(&format!(", input_voltage = ${}", bind_count));
        }
        if data.output_voltage.is_some() {
            bind_count += 1;
            query.push_str(&format!(", output_voltage = ${}", bind_count));
        }
        if data.price.is_some() {
            bind_count += 1;
            query.push_str(&format!(", price = ${}", bind_count));
        }
        if data.image_ref.is_some() {
            bind_count += 1;
            query.push_str(&format!(", image_ref = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, brand, model, power_capacity_kw, \
             input_voltage, output_voltage, price, image_ref, description, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Inverter>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(brand) = data.brand {
            q = q.bind(brand);
        }
        if let Some(model) = data.model {
            q = q.bind(model);
        }
        if let Some(power) = data.power_capacity_kw {
            q = q.bind(power);
        }
        if let Some(input_voltage) = data.input_voltage {
            q = q.bind(input_voltage);
        }
        if let Some(output_voltage) = data.output_voltage {
            q = q.bind(output_voltage);
        }
        if let Some(price) = data.price {
            q = q.bind(price);
        }
        if let Some(image_ref) = data.image_ref {
            q = q.bind(image_ref);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }

        let inverter = q.fetch_optional(pool).await?;

        Ok(inverter)
    }

    /// Deletes an inverter by ID
    ///
    /// The associated image, if any, is NOT removed here; callers release
    /// it through the image store after the row is gone.
    ///
    /// # Returns
    ///
    /// True if the inverter was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inverters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all inverters, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let inverters = sqlx::query_as::<_, Inverter>(
            r#"
            SELECT id, name, brand, model, power_capacity_kw, input_voltage,
                   output_voltage, price, image_ref, description,
                   created_at, updated_at
            FROM inverters
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(inverters)
    }

    /// Counts all inverters
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inverters")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
