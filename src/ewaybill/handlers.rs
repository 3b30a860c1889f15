//! HTTP surface of the waybill generator.

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::multipart::GenerateForm;
use super::tabular::Sheet;
use super::transform::{EwayBillTransformer, TransformError, REGISTER_SHEET};
use crate::auth::middleware::validate_request_token;
use crate::processing_log::LogStore;
use crate::state::AppState;
use crate::ErrorResponse;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Generate an E-Way Bill workbook from an uploaded Import Job Register and
/// Item Report.
///
/// Responds with the XLSX body; the filename travels in
/// `Content-Disposition` and the affected job numbers in `X-Ewaybill-Jobs`.
#[utoipa::path(
    context_path = "/api",
    tag = "E-Way Bill",
    post,
    path = "/ewaybill/generate",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Generated workbook", body = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Invalid input or failed validation", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Workbook assembly failed", body = ErrorResponse)
    )
)]
pub async fn generate_ewaybill(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    let form = match GenerateForm::from_multipart(payload).await {
        Ok(form) => form,
        Err(e) => return e.into(),
    };

    // Same gate the upload form applies: both files, a vehicle number, and
    // a positive distance.
    let Some(register_bytes) = form.register else {
        return bad_request("Please upload the Import Job Register (Excel) file.");
    };
    let Some(items_bytes) = form.items else {
        return bad_request("Please upload the Item Report (CSV) file.");
    };
    let vehicle_no = form.vehicle_no.trim().to_string();
    if vehicle_no.is_empty() {
        return bad_request("Please enter the Vehicle Number.");
    }
    let distance_km: f64 = form.distance_km.trim().parse().unwrap_or(0.0);
    if distance_km <= 0.0 {
        return bad_request("Please enter a valid Approximate Distance (km) greater than 0.");
    }

    let register = match Sheet::from_xlsx_bytes(&register_bytes, REGISTER_SHEET) {
        Ok(sheet) => sheet,
        Err(e) => {
            return bad_request(&format!("Could not read the Import Job Register: {}", e));
        }
    };
    let items = match Sheet::from_csv_bytes(&items_bytes) {
        Ok(sheet) => sheet,
        Err(e) => return bad_request(&format!("Could not read the Item Report: {}", e)),
    };

    let transformer = EwayBillTransformer::new(&state.gstin);
    let generated = match transformer.transform(&register, &items, &vehicle_no, distance_km) {
        Ok(generated) => generated,
        Err(e @ TransformError::Workbook(_)) => {
            log::error!("Workbook assembly failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&e.to_string()));
        }
        Err(e) => return bad_request(&e.to_string()),
    };

    {
        let mut store = state.log_store.lock();
        if let Err(e) = store.append(&generated.log_entries) {
            // The workbook is still delivered; the audit trail is best
            // effort within a batch.
            log::error!("Failed to append processing log: {}", e);
        }
    }

    log::info!(
        "Generated {} for jobs [{}]",
        generated.filename,
        generated.job_numbers.join(", ")
    );

    HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                sanitize_filename::sanitize(&generated.filename)
            ),
        ))
        .insert_header(("X-Ewaybill-Jobs", generated.job_numbers.join(",")))
        .body(generated.workbook)
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::bad_request(message))
}
