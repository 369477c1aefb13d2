/// Homepage slider administration
///
/// Same dispatch shape as the products page: `delete_id` deletes, `id`
/// updates, neither creates. Slider text fields are always rewritten on
/// update; the image is only replaced when a new file was uploaded, and a
/// replaced or orphaned image file is freed best-effort.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use solstore_shared::models::slider::{CreateSlider, HomepageSlider, UpdateSlider};
use solstore_shared::session::{Flash, FlashLevel, Session};
use solstore_shared::storage::release_best_effort;

use crate::app::AppState;
use crate::error::{AppResult, FieldError};
use crate::forms::{CrudAction, FormSubmission};

/// Image store category for slider images
const IMAGE_CATEGORY: &str = "slider";

/// Slider page payload
#[derive(Debug, Serialize)]
pub struct SliderPage {
    pub sliders: Vec<HomepageSlider>,
    pub messages: Vec<Flash>,
}

/// Validated slider text fields
#[derive(Debug)]
struct SliderFields {
    title: String,
    subtitle: String,
    description: String,
    cta_text: String,
    cta_link: String,
    cta_internal_page: String,
}

/// GET /slider/ - admin slider list, most recently updated first
pub async fn page(State(state): State<AppState>, mut session: Session) -> AppResult<Response> {
    let sliders = HomepageSlider::list_admin(&state.db).await?;
    let page = SliderPage {
        sliders,
        messages: session.take_messages(),
    };

    let response = Json(page).into_response();
    Ok(session.apply(state.session_secret.expose(), response))
}

/// POST /slider/ - create, update, or delete a slider
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

    let fields = match validate_slider(&form, true) {
        Ok(fields) => fields,
        Err(errors) => {
            let sliders = HomepageSlider::list_admin(&state.db).await?;
            let messages = errors
                .into_iter()
                .map(|e| Flash {
                    level: FlashLevel::Error,
                    text: e.message,
                })
                .collect();
            let page = SliderPage { sliders, messages };
            let response = (StatusCode::UNPROCESSABLE_ENTITY, Json(page)).into_response();
            return Ok(session.apply(secret, response));
        }
    };

    // Validation guarantees an image is present on create
    let Some(image) = &form.image else {
        session.flash(FlashLevel::Error, "Main image is required.");
        return Ok(session.apply(secret, Redirect::to("/slider/").into_response()));
    };

    let image_ref = state
        .images
        .save(IMAGE_CATEGORY, &image.filename, &image.bytes)
        .await?;

    let slider = HomepageSlider::create(
        &state.db,
        CreateSlider {
            title: fields.title,
            subtitle: fields.subtitle,
            description: fields.description,
            image_ref,
            cta_text: fields.cta_text,
            cta_link: fields.cta_link,
            cta_internal_page: fields.cta_internal_page,
        },
    )
    .await?;

    info!(slider_id = slider.id, title = %slider.title, "Slider created");
    session.flash(
        FlashLevel::Success,
        format!("Slider \"{}\" has been created successfully.", slider.title),
    );
    Ok(session.apply(secret, Redirect::to("/slider/").into_response()))
}

async fn update(
    state: &AppState,
    mut session: Session,
    form: FormSubmission,
    id: i64,
) -> AppResult<Response> {
    let secret = state.session_secret.expose();
    let back = Redirect::to("/slider/");

    let Some(existing) = HomepageSlider::find_by_id(&state.db, id).await? else {
        session.flash(FlashLevel::Error, "Slider not found.");
        return Ok(session.apply(secret, back.into_response()));
    };

    let fields = match validate_slider(&form, false) {
        Ok(fields) => fields,
        Err(errors) => {
            for e in errors {
                session.flash(FlashLevel::Error, e.message);
            }
            return Ok(session.apply(secret, back.into_response()));
        }
    };

    let mut image_ref = None;
    if let Some(image) = &form.image {
        release_best_effort(state.images.as_ref(), &existing.image_ref).await;
        image_ref = Some(
            state
                .images
                .save(IMAGE_CATEGORY, &image.filename, &image.bytes)
                .await?,
        );
    }

    let data = UpdateSlider {
        title: fields.title,
        subtitle: fields.subtitle,
        description: fields.description,
        image_ref,
        cta_text: fields.cta_text,
        cta_link: fields.cta_link,
        cta_internal_page: fields.cta_internal_page,
    };

    match HomepageSlider::update(&state.db, id, data).await? {
        Some(slider) => {
            info!(slider_id = slider.id, "Slider updated");
            session.flash(
                FlashLevel::Success,
                format!("Slider \"{}\" has been updated successfully.", slider.title),
            );
        }
        None => {
            session.flash(FlashLevel::Error, "Slider not found.");
        }
    }

    Ok(session.apply(secret, back.into_response()))
}

async fn delete(state: &AppState, mut session: Session, id: i64) -> AppResult<Response> {
    let secret = state.session_secret.expose();
    let back = Redirect::to("/slider/");

    let Some(existing) = HomepageSlider::find_by_id(&state.db, id).await? else {
        session.flash(FlashLevel::Error, "Slider not found.");
        return Ok(session.apply(secret, back.into_response()));
    };

    release_best_effort(state.images.as_ref(), &existing.image_ref).await;
    HomepageSlider::delete(&state.db, id).await?;
    info!(slider_id = id, "Slider deleted");

    session.flash(
        FlashLevel::Success,
        format!("Slider \"{}\" has been deleted successfully.", existing.title),
    );
    Ok(session.apply(secret, back.into_response()))
}

/// Validates slider fields, collecting every failure
///
/// Optional text fields default to empty; only the title is mandatory.
/// The image is mandatory on create only.
fn validate_slider(
    form: &FormSubmission,
    image_required: bool,
) -> Result<SliderFields, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = form.value("title").unwrap_or_default().to_string();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Title is required."));
    } else if title.chars().count() > 200 {
        errors.push(FieldError::new(
            "title",
            "Title must be less than 200 characters.",
        ));
    }

    let subtitle = form.value("subtitle").unwrap_or_default().to_string();
    if subtitle.chars().count() > 300 {
        errors.push(FieldError::new(
            "subtitle",
            "Subtitle must be less than 300 characters.",
        ));
    }

    let description = form.value("description").unwrap_or_default().to_string();
    if description.chars().count() > 1000 {
        errors.push(FieldError::new(
            "description",
            "Description must be less than 1000 characters.",
        ));
    }

    let cta_text = form.value("cta_text").unwrap_or_default().to_string();
    if cta_text.chars().count() > 100 {
        errors.push(FieldError::new(
            "cta_text",
            "Button text must be less than 100 characters.",
        ));
    }

    let cta_link = form.value("cta_link").unwrap_or_default().to_string();
    if cta_link.chars().count() > 500 {
        errors.push(FieldError::new(
            "cta_link",
            "Button link must be less than 500 characters.",
        ));
    }

    let cta_internal_page = form
        .value("cta_internal_page")
        .unwrap_or_default()
        .to_string();

    match &form.image {
        Some(image) => {
            if image.too_large() {
                errors.push(FieldError::new(
                    "image",
                    "Image file size must be less than 5MB.",
                ));
            }
            if !image.has_allowed_type() {
                errors.push(FieldError::new(
                    "image",
                    "Image must be JPEG, PNG, WEBP, or GIF format.",
                ));
            }
        }
        None if image_required => {
            errors.push(FieldError::new("image", "Main image is required."));
        }
        None => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SliderFields {
        title,
        subtitle,
        description,
        cta_text,
        cta_link,
        cta_internal_page,
    })
}
