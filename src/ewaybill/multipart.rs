//! Multipart parsing for the generate form.
//!
//! The form carries two files (`register`, `items`) and two scalar fields
//! (`vehicle_no`, `distance_km`). Presence and value checks happen in the
//! handler so their messages match what the operator expects to see.

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;

use crate::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::Utf8Error(_) => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&error.to_string()))
            }
            _ => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&error.to_string())),
        }
    }
}

/// Raw generate form. Files stay as bytes; scalar fields stay as text until
/// the handler validates them.
#[derive(Debug, Default)]
pub struct GenerateForm {
    pub register: Option<Vec<u8>>,
    pub items: Option<Vec<u8>>,
    pub vehicle_no: String,
    pub distance_km: String,
}

impl GenerateForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartParseError> {
        let mut form = GenerateForm::default();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let name = field
                .content_disposition()
                .and_then(|cd| cd.get_name())
                .ok_or_else(|| {
                    MultipartParseError::FieldError("Field name not found".to_string())
                })?
                .to_string();

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                buffer.extend_from_slice(&data);
            }

            match name.as_str() {
                "register" => form.register = Some(buffer),
                "items" => form.items = Some(buffer),
                "vehicle_no" => form.vehicle_no = text_field(buffer)?,
                "distance_km" => form.distance_km = text_field(buffer)?,
                _ => {}
            }
        }

        Ok(form)
    }
}

fn text_field(buffer: Vec<u8>) -> Result<String, MultipartParseError> {
    String::from_utf8(buffer).map_err(|e| MultipartParseError::Utf8Error(e.to_string()))
}
