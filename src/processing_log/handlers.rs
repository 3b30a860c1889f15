//! Date-filtered log download.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::NaiveDate;

use super::{entries_to_csv, LogStore};
use crate::auth::middleware::validate_request_token;
use crate::state::AppState;
use crate::ErrorResponse;

/// Download the processing log for one day as CSV.
///
/// A day with no entries downloads as a header-only file; that is a valid
/// outcome, not an error.
#[utoipa::path(
    context_path = "/api",
    tag = "Processing Log",
    get,
    path = "/ewaybill/log/{date}",
    security(("bearer_auth" = [])),
    params(
        ("date" = String, Path, description = "Log date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Filtered log", body = Vec<u8>, content_type = "text/csv"),
        (status = 400, description = "Malformed date", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Log store unreadable", body = ErrorResponse)
    )
)]
pub async fn download_log(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = validate_request_token(&req) {
        return e.error_response();
    }

    let raw_date = path.into_inner();
    let date = match NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
                "'{}' is not a valid log date; expected YYYY-MM-DD",
                raw_date
            )));
        }
    };

    let entries = match state.log_store.lock().query_by_date(date) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Failed to read processing log: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Could not read the processing log"));
        }
    };

    let body = match entries_to_csv(&entries) {
        Ok(body) => body,
        Err(e) => {
            log::error!("Failed to render processing log: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Could not render the processing log"));
        }
    };

    HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"Ewaybill_Log_{}.csv\"", date),
        ))
        .body(body)
}
