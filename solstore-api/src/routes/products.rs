/// Inverter administration
///
/// One page, one POST endpoint. The submission's identifying fields pick
/// the action: `delete_id` deletes, `id` updates, neither creates. Create
/// failures re-render the page with the collected field errors; update and
/// delete failures flash a message and redirect back, which matches how
/// the admin form is used.
///
/// Image handling rule: record changes are never rolled back because a
/// file couldn't be removed. Freeing a replaced or orphaned image is
/// best-effort and only ever logged.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

use solstore_shared::models::inverter::{CreateInverter, Inverter, UpdateInverter};
use solstore_shared::session::{Flash, FlashLevel, Session};
use solstore_shared::storage::release_best_effort;

use crate::app::AppState;
use crate::error::{AppResult, FieldError};
use crate::forms::{CrudAction, FormSubmission};

/// Image store category for product images
const IMAGE_CATEGORY: &str = "inverters";

/// Fields the create form must fill in
const REQUIRED_FIELDS: &[&str] = &[
    "name",
    "brand",
    "model",
    "power_capacity_kw",
    "input_voltage",
    "output_voltage",
    "price",
    "description",
];

/// Products page payload
#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub inverters: Vec<Inverter>,
    pub messages: Vec<Flash>,
}

/// GET /products/ - admin product list
pub async fn page(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    let inverters = Inverter::list(&state.db).await?;
    let page = ProductsPage {
        inverters,
        messages: session.take_messages(),
    };

    let response = Json(page).into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}

/// POST /products/ - create, update, or delete an inverter
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> AppResult<Response> {
    let form = FormSubmission::from_multipart(multipart).await?;

    match CrudAction::from_form(&form)? {
        CrudAction::Create => create(&state, session, form).await,
        CrudAction::Update(id) => update(&state, session, form, id).await,
        CrudAction::Delete(id) => delete(&state, session, id).await,
    }
}

async fn create(
    state: &AppState,
    mut session: Session,
    form: FormSubmission,
) -> AppResult<Response> {
    let secret = state.session_secret.expose();

    let mut data = match validate_create(&form) {
        Ok(data) => data,
        Err(errors) => {
            // Re-render the page with the collected errors; nothing written
            let inverters = Inverter::list(&state.db).await?;
            let messages = errors
                .into_iter()
                .map(|e| Flash {
                    level: FlashLevel::Error,
                    text: e.message,
                })
                .collect();
            let page = ProductsPage {
                inverters,
                messages,
            };
            let response = (StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response();
            return Ok(session.apply(secret, response));
        }
    };

    if let Some(image) = &form.image {
        let image_ref = state
            .images
            .save(IMAGE_CATEGORY, &image.filename, &image.bytes)
            .await?;
        data.image_ref = Some(image_ref);
    }

    let inverter = Inverter::create(&state.db, data).await?;
    info!(inverter_id = inverter.id, name = %inverter.name, "Inverter created");

    session.flash(FlashLevel::Success, "Inverter created successfully!");
    Ok(session.apply(secret, Redirect::to("/products/").into_response()))
}

async fn update(
    state: &AppState,
    mut session: Session,
    form: FormSubmission,
    id: i64,
) -> AppResult<Response> {
    let secret = state.session_secret.expose();
    let back = Redirect::to("/products/");

    let Some(existing) = Inverter::find_by_id(&state.db, id).await? else {
        session.flash(FlashLevel::Error, "Inverter not found.");
        return Ok(session.apply(secret, back.into_response()));
    };

    let mut data = match validate_update(&form) {
        Ok(data) => data,
        Err(errors) => {
            for e in errors {
                session.flash(FlashLevel::Error, e.message);
            }
            return Ok(session.apply(secret, back.into_response()));
        }
    };

    if let Some(image) = &form.image {
        // Replacing the image frees the old file first; a failed removal
        // must not block the record update
        if let Some(old_ref) = &existing.image_ref {
            release_best_effort(state.images.as_ref(), old_ref).await;
        }
        let image_ref = state
            .images
            .save(IMAGE_CATEGORY, &image.filename, &image.bytes)
            .await?;
        data.image_ref = Some(Some(image_ref));
    }

    match Inverter::update(&state.db, id, data).await? {
        Some(inverter) => {
            info!(inverter_id = inverter.id, "Inverter updated");
            session.flash(FlashLevel::Success, "Inverter updated successfully!");
        }
        None => {
            session.flash(FlashLevel::Error, "Inverter not found.");
        }
    }

    Ok(session.apply(secret, back.into_response()))
}

async fn delete(state: &AppState, mut session: Session, id: i64) -> AppResult<Response> {
    let secret = state.session_secret.expose();
    let back = Redirect::to("/products/");

    let Some(existing) = Inverter::find_by_id(&state.db, id).await? else {
        session.flash(FlashLevel::Error, "Inverter not found.");
        return Ok(session.apply(secret, back.into_response()));
    };

    if let Some(image_ref) = &existing.image_ref {
        release_best_effort(state.images.as_ref(), image_ref).await;
    }

    Inverter::delete(&state.db, id).await?;
    info!(inverter_id = id, "Inverter deleted");

    session.flash(FlashLevel::Success, "Inverter deleted successfully!");
    Ok(session.apply(secret, back.into_response()))
}

/// Human-readable label for a form field name
fn field_label(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_power(raw: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        Ok(_) => {
            errors.push(FieldError::new(
                "power_capacity_kw",
                "Power Capacity Kw must be a positive number.",
            ));
            None
        }
        Err(_) => {
            errors.push(FieldError::new(
                "power_capacity_kw",
                "Power Capacity Kw must be a number.",
            ));
            None
        }
    }
}

fn parse_price(raw: &str, errors: &mut Vec<FieldError>) -> Option<Decimal> {
    match Decimal::from_str(raw) {
        Ok(value) if value >= Decimal::ZERO => Some(value),
        Ok(_) => {
            errors.push(FieldError::new("price", "Price must not be negative."));
            None
        }
        Err(_) => {
            errors.push(FieldError::new("price", "Price must be a number."));
            None
        }
    }
}

/// Validates a create submission, collecting every failure
fn validate_create(form: &FormSubmission) -> Result<CreateInverter, Vec<FieldError>> {
    let mut errors = Vec::new();

    for &field in REQUIRED_FIELDS {
        if !form.has(field) {
            errors.push(FieldError::new(
                field,
                format!("{} is required.", field_label(field)),
            ));
        }
    }

    let power = form
        .value("power_capacity_kw")
        .and_then(|raw| parse_power(raw, &mut errors));
    let price = form
        .value("price")
        .and_then(|raw| parse_price(raw, &mut errors));

    if let Some(image) = &form.image {
        if image.too_large() {
            errors.push(FieldError::new(
                "image",
                "Image file size must be less than 5MB.",
            ));
        }
    }

    match (power, price) {
        (Some(power_capacity_kw), Some(price)) if errors.is_empty() => Ok(CreateInverter {
            name: form.value("name").unwrap_or_default().to_string(),
            brand: form.value("brand").unwrap_or_default().to_string(),
            model: form.value("model").unwrap_or_default().to_string(),
            power_capacity_kw,
            input_voltage: form.value("input_voltage").unwrap_or_default().to_string(),
            output_voltage: form.value("output_voltage").unwrap_or_default().to_string(),
            price,
            image_ref: None,
            description: form.value("description").unwrap_or_default().to_string(),
        }),
        _ => Err(errors),
    }
}

/// Validates an update submission; omitted fields stay unchanged
fn validate_update(form: &FormSubmission) -> Result<UpdateInverter, Vec<FieldError>> {
    let mut errors = Vec::new();

    let power = form
        .value("power_capacity_kw")
        .and_then(|raw| parse_power(raw, &mut errors));
    let price = form
        .value("price")
        .and_then(|raw| parse_price(raw, &mut errors));

    if let Some(image) = &form.image {
        if image.too_large() {
            errors.push(FieldError::new(
                "image",
                "Image file size must be less than 5MB.",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(UpdateInverter {
        name: form.value("name").map(String::from),
        brand: form.value("brand").map(String::from),
        model: form.value("model").map(String::from),
        power_capacity_kw: power,
        input_voltage: form.value("input_voltage").map(String::from),
        output_voltage: form.value("output_voltage").map(String::from),
        price,
        image_ref: None,
        description: form.value("description").map(String::from),
    })
}
