use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::ListResponse;

use super::store::SubmissionStore;
use crate::services::admin::{require_admin, AdminSessions};

/// `GET /api/submissions` (admin): every stored application, newest first.
pub async fn process(
    req: HttpRequest,
    sessions: web::Data<AdminSessions>,
    store: web::Data<SubmissionStore>,
) -> impl Responder {
    if let Err(resp) = require_admin(&req, &sessions).await {
        return resp;
    }
    match store.list() {
        Ok(submissions) => {
            log::info!("Listing {} submissions", submissions.len());
            HttpResponse::Ok().json(ListResponse {
                success: true,
                submissions,
                message: None,
            })
        }
        Err(e) => {
            log::error!("Could not list submissions: {}", e);
            HttpResponse::ServiceUnavailable().json(ListResponse {
                success: false,
                submissions: Vec::new(),
                message: Some(e.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use super::super::testing::fixture;
    use super::*;
    use actix_web::{http::header, http::StatusCode, test, App};
    use common::model::membership::MembershipForm;

    #[actix_web::test]
    async fn admin_sees_all_records() {
        let fx = fixture().await;
        let form = MembershipForm {
            first_name: "Asha".into(),
            ..Default::default()
        };
        fx.store.save(&form, None).unwrap();
        fx.store.save(&form, None).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fx.store.clone()))
                .app_data(web::Data::new(fx.sessions.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/submissions")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", fx.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ListResponse = test::read_body_json(resp).await;
        assert!(body.success);
        let ids: Vec<_> = body.submissions.iter().map(|s| s.display_id()).collect();
        assert_eq!(ids, vec!["HKF-0002", "HKF-0001"]);
    }

    #[actix_web::test]
    async fn anonymous_callers_are_turned_away() {
        let fx = fixture().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fx.store.clone()))
                .app_data(web::Data::new(fx.sessions.clone()))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/submissions").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
