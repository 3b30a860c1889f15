use actix_web::{web, HttpResponse, Responder};
use bcrypt::verify;

use super::jwt::{generate_access_token, get_access_token_expiry};
use super::model::{LoginRequest, TokenResponse};
use crate::state::AppState;
use crate::ErrorResponse;

/// Login endpoint
#[utoipa::path(
    context_path = "/api",
    tag = "Authentication",
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> impl Responder {
    let username_ok = body.username == state.admin_username;
    let password_ok = verify(&body.password, &state.admin_password_hash).unwrap_or(false);
    if !username_ok || !password_ok {
        return HttpResponse::Unauthorized().json(ErrorResponse::new(
            "Unauthorized",
            "Invalid credentials!",
        ));
    }

    let access_token = match generate_access_token(&body.username) {
        Ok(token) => token,
        Err(e) => {
            log::error!("Failed to generate access token: {:?}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to generate token"));
        }
    };

    HttpResponse::Ok().json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: get_access_token_expiry(),
    })
}

/// Configure auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}
