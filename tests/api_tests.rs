//! Endpoint tests: login gate, bearer enforcement, and the full
//! upload-to-download flow.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use ewaybill_server::auth::jwt::generate_access_token;
use ewaybill_server::config::AppConfig;
use ewaybill_server::{auth, ewaybill, processing_log, AppState};

const ADMIN_USERNAME: &str = "Admin";
const ADMIN_PASSWORD: &str = "Geeta@2025";
const BOUNDARY: &str = "----ewaybill-test-boundary";

fn test_state(dir: &TempDir) -> web::Data<AppState> {
    let config = AppConfig {
        admin_username: ADMIN_USERNAME.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        log_path: dir.path().join("Ewaybill_Processing_Log.csv"),
    };
    web::Data::new(AppState::new(config).expect("app state"))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state.clone()).service(
                web::scope("/api")
                    .configure(auth::handlers::config)
                    .service(
                        web::resource("/ewaybill/generate")
                            .route(web::post().to(ewaybill::handlers::generate_ewaybill)),
                    )
                    .service(
                        web::resource("/ewaybill/log/{date}")
                            .route(web::get().to(processing_log::handlers::download_log)),
                    ),
            ),
        )
        .await
    };
}

/// Minimal single-job register workbook.
fn register_xlsx() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let headers = [
        "Job No",
        "BE No",
        "BE Date",
        "Supplier/Exporter",
        "Importer",
        "Importer Address",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    let row = [
        "J1",
        "BE1",
        "14-03-2025",
        "Globex GmbH",
        "Acme",
        "Acme, 12 Road, Ahmedabad, Gujarat, 380001",
    ];
    for (col, value) in row.iter().enumerate() {
        worksheet.write_string(1, col as u16, *value).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

fn item_csv() -> Vec<u8> {
    b"Job No,BE No,Assessable Value (INR),SWS Duty Amt,BCD Foregone,\
Total Basic Duty (INR),IGST,IGST Rate,Product Desc,CTH,Quantity,Unit\n\
J1,BE1,\"1,000\",10,5,50,207,18,Widget,8501,10,PCS\n"
        .to_vec()
}

/// Hand-rolled multipart body: (field name, optional filename, content).
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn generate_request(token: &str, parts: &[(&str, Option<&str>, &[u8])]) -> actix_web::test::TestRequest {
    test::TestRequest::post()
        .uri("/api/ewaybill/generate")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(parts))
}

fn full_form() -> Vec<(&'static str, Option<&'static str>, Vec<u8>)> {
    vec![
        ("register", Some("register.xlsx"), register_xlsx()),
        ("items", Some("items.csv"), item_csv()),
        ("vehicle_no", None, b"GJ01AB1234".to_vec()),
        ("distance_km", None, b"50".to_vec()),
    ]
}

fn borrow_form<'a>(form: &'a [(&'a str, Option<&'a str>, Vec<u8>)]) -> Vec<(&'a str, Option<&'a str>, &'a [u8])> {
    form.iter()
        .map(|(name, filename, content)| (*name, *filename, content.as_slice()))
        .collect()
}

#[actix_web::test]
async fn test_login_issues_bearer_token() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "username": ADMIN_USERNAME,
            "password": ADMIN_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_login_rejects_wrong_password() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(serde_json::json!({
            "username": ADMIN_USERNAME,
            "password": "wrong",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_generate_requires_bearer_token() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);

    let form = full_form();
    let req = test::TestRequest::post()
        .uri("/api/ewaybill/generate")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(&borrow_form(&form)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_generate_rejects_zero_distance() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let mut form = full_form();
    form[3].2 = b"0".to_vec();
    let resp =
        test::call_service(&app, generate_request(&token, &borrow_form(&form)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Approximate Distance"));
}

#[actix_web::test]
async fn test_generate_rejects_missing_register_file() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let mut form = full_form();
    form.remove(0);
    let resp =
        test::call_service(&app, generate_request(&token, &borrow_form(&form)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Import Job Register"));
}

#[actix_web::test]
async fn test_generate_surfaces_transform_errors_verbatim() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let mut form = full_form();
    // Reference a job the register does not carry.
    form[1].2 = b"Job No,BE No,Assessable Value (INR),SWS Duty Amt,BCD Foregone,\
Total Basic Duty (INR),IGST,IGST Rate,Product Desc,CTH,Quantity,Unit\n\
J9,BE1,100,0,0,0,0,5,Widget,8501,1,PCS\n"
        .to_vec();
    let resp =
        test::call_service(&app, generate_request(&token, &borrow_form(&form)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing Job Numbers: J9");
}

#[actix_web::test]
async fn test_generate_and_download_log_round_trip() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let form = full_form();
    let resp =
        test::call_service(&app, generate_request(&token, &borrow_form(&form)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let jobs = resp
        .headers()
        .get("X-Ewaybill-Jobs")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(jobs, "J1");

    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("EWB_BE1_"));

    let workbook = test::read_body(resp).await;
    assert!(!workbook.is_empty());

    // The batch should now be visible in today's log download.
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let req = test::TestRequest::get()
        .uri(&format!("/api/ewaybill/log/{}", today))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("Job No,BE No,Vehicle No,Processed Date"));
    assert!(text.contains("J1,BE1,GJ01AB1234,"));
}

#[actix_web::test]
async fn test_log_download_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/ewaybill/log/07-08-2026")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_log_download_for_quiet_day_is_header_only() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir);
    let app = test_app!(state);
    let token = generate_access_token(ADMIN_USERNAME).unwrap();

    let req = test::TestRequest::get()
        .uri("/api/ewaybill/log/1999-01-01")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert_eq!(text.trim_end(), "Job No,BE No,Vehicle No,Processed Date");
}
