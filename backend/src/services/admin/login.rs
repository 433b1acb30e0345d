use actix_web::{web, HttpResponse, Responder};
use common::requests::{LoginRequest, LoginResponse};
use log::{info, warn};

use super::AdminSessions;

pub const LOGIN_DISABLED: &str = "Admin login is not configured.";
pub const BAD_CREDENTIALS: &str = "Incorrect credentials.";

/// `POST /api/admin/login`
///
/// # Returns
/// - `200 OK` with a fresh token.
/// - `401 Unauthorized` for wrong credentials.
/// - `503 Service Unavailable` when no admin password is configured.
pub async fn process(sessions: web::Data<AdminSessions>, payload: web::Json<LoginRequest>) -> impl Responder {
    if !sessions.login_enabled() {
        return HttpResponse::ServiceUnavailable().json(failure(LOGIN_DISABLED));
    }
    info!("Admin login attempt for {}", payload.email.trim());
    if !sessions.credentials_match(&payload.email, &payload.password) {
        warn!("Rejected admin login for {}", payload.email.trim());
        return HttpResponse::Unauthorized().json(failure(BAD_CREDENTIALS));
    }

    let token = sessions.issue().await;
    HttpResponse::Ok().json(LoginResponse {
        success: true,
        token: Some(token),
        message: None,
    })
}

fn failure(message: &str) -> LoginResponse {
    LoginResponse {
        success: false,
        token: None,
        message: Some(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    async fn login(sessions: AdminSessions, email: &str, password: &str) -> (StatusCode, LoginResponse) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(sessions))
                .service(configure_routes()),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(LoginRequest {
                email: email.into(),
                password: password.into(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn valid_credentials_issue_a_token() {
        let sessions = AdminSessions::new("admin@example.com", Some("pw".into()));
        let (status, body) = login(sessions.clone(), "admin@example.com ", " pw").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        let token = body.token.unwrap();
        assert!(sessions.is_valid(&token).await);
    }

    #[actix_web::test]
    async fn wrong_password_is_unauthorized() {
        let sessions = AdminSessions::new("admin@example.com", Some("pw".into()));
        let (status, body) = login(sessions, "admin@example.com", "nope").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.message.as_deref(), Some(BAD_CREDENTIALS));
        assert_eq!(body.token, None);
    }

    #[actix_web::test]
    async fn unconfigured_login_is_unavailable() {
        let sessions = AdminSessions::new("admin@example.com", None);
        let (status, body) = login(sessions, "admin@example.com", "").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.message.as_deref(), Some(LOGIN_DISABLED));
    }
}
