/// Multipart form handling for the admin CRUD pages
///
/// The product and slider forms arrive as `multipart/form-data` (text
/// fields plus an optional image upload). This module reads the whole
/// submission once at the boundary into a [`FormSubmission`], and decides
/// the intended CRUD action from the identifying fields — a `delete_id`
/// takes precedence over an `id`, which takes precedence over treating the
/// submission as a create. Handlers then dispatch on the tagged
/// [`CrudAction`] instead of re-checking key presence.

use crate::error::AppError;
use axum::extract::Multipart;
use std::collections::HashMap;

/// Maximum accepted image upload size: 5 MB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted for slider images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// An uploaded image file
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Original filename as submitted by the client
    pub filename: String,

    /// Declared content type, if any
    pub content_type: Option<String>,

    /// Raw file bytes
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Whether the upload exceeds the size limit
    pub fn too_large(&self) -> bool {
        self.bytes.len() > MAX_IMAGE_BYTES
    }

    /// Whether the declared content type is an accepted image format
    ///
    /// A missing content type is accepted; only an explicit non-image
    /// declaration is rejected.
    pub fn has_allowed_type(&self) -> bool {
        match &self.content_type {
            Some(ct) => ALLOWED_IMAGE_TYPES.contains(&ct.as_str()),
            None => true,
        }
    }
}

/// A parsed multipart submission: text fields plus an optional image
#[derive(Debug, Default)]
pub struct FormSubmission {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl FormSubmission {
    /// Reads an entire multipart body
    ///
    /// The field named `image` is treated as a file upload; an empty file
    /// input (no filename, no bytes) counts as "no image supplied".
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the multipart stream is malformed
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormSubmission::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.image = Some(UploadedImage {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Builds a submission from in-memory parts (for tests)
    pub fn from_parts(
        fields: impl IntoIterator<Item = (String, String)>,
        image: Option<UploadedImage>,
    ) -> Self {
        FormSubmission {
            fields: fields.into_iter().collect(),
            image,
        }
    }

    /// Returns a field's trimmed value, treating empty as absent
    ///
    /// Matches form semantics where an untouched input submits `""`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether a field was supplied with a non-empty value
    pub fn has(&self, name: &str) -> bool {
        self.value(name).is_some()
    }
}

/// The intent of an admin CRUD submission, decided once at the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    Create,
    Update(i64),
    Delete(i64),
}

impl CrudAction {
    /// Classifies a submission
    ///
    /// `delete_id` takes precedence over `id` when both are present.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if an identifying field is present
    /// but not a valid numeric id
    pub fn from_form(form: &FormSubmission) -> Result<Self, AppError> {
        if let Some(raw) = form.value("delete_id") {
            let id = raw
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest("Invalid delete ID.".to_string()))?;
            return Ok(CrudAction::Delete(id));
        }

        if let Some(raw) = form.value("id") {
            let id = raw
                .parse::<i64>()
                .map_err(|_| AppError::BadRequest("Invalid ID.".to_string()))?;
            return Ok(CrudAction::Update(id));
        }

        Ok(CrudAction::Create)
    }
}
