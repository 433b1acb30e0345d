use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::submission::Submission;
use common::requests::DocumentRequest;

use super::store::SubmissionStore;
use crate::services::admin::{require_admin, AdminSessions};
use crate::services::documents::render::{pdf_response, render_blocking};
use crate::services::documents::DocumentEngine;

/// `GET /api/submissions/{id}/pdf` (admin): reconstructs the printable
/// application of a stored record.
pub async fn process(
    req: HttpRequest,
    id: web::Path<i64>,
    sessions: web::Data<AdminSessions>,
    store: web::Data<SubmissionStore>,
    engine: web::Data<DocumentEngine>,
) -> impl Responder {
    if let Err(resp) = require_admin(&req, &sessions).await {
        return resp;
    }
    let id = id.into_inner();
    let submission = match store.get(id) {
        Ok(Some(submission)) => submission,
        Ok(None) => return HttpResponse::NotFound().body(format!("Submission {} not found", id)),
        Err(e) => return HttpResponse::ServiceUnavailable().body(e.to_string()),
    };

    let file_name = file_name(&submission);
    let request = DocumentRequest {
        form: submission.form,
        signature_data_url: submission.signature,
        hkf_id: submission.hkf_id,
    };
    match render_blocking(engine.get_ref().clone(), request).await {
        Ok(document) => pdf_response(document.bytes, &file_name),
        Err(e) => {
            log::error!("PDF reconstruction of submission {} failed: {}", id, e);
            HttpResponse::ServiceUnavailable().body(format!("PDF reconstruction failed: {}", e))
        }
    }
}

/// `HKF_<membership number>.pdf`, or the row id for legacy records.
fn file_name(submission: &Submission) -> String {
    match submission.hkf_id.as_deref() {
        Some(id) if !id.is_empty() => format!("HKF_{}.pdf", id),
        _ => format!("HKF_{}.pdf", submission.id),
    }
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use super::super::testing::fixture;
    use super::*;
    use crate::services::documents::testing::StubRasterizer;
    use actix_web::{http::header, http::StatusCode, test, App};
    use common::model::membership::MembershipForm;
    use std::sync::Arc;

    #[actix_web::test]
    async fn stored_record_is_reconstructed() {
        let fx = fixture().await;
        fx.store.save(&MembershipForm::default(), None).unwrap();
        let engine = DocumentEngine::new(Arc::new(StubRasterizer::new(300, 300)));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(fx.store.clone()))
                .app_data(web::Data::new(fx.sessions.clone()))
                .app_data(web::Data::new(engine))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/submissions/1/pdf")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", fx.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(disposition.as_deref(), Some("attachment; filename=\"HKF_HKF-0001.pdf\""));

        let req = test::TestRequest::get()
            .uri("/api/submissions/7/pdf")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", fx.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn legacy_records_use_the_row_id() {
        let submission = Submission {
            id: 12,
            hkf_id: None,
            form: MembershipForm::default(),
            signature: None,
            status: Default::default(),
            comments: None,
            created_at: None,
        };
        assert_eq!(file_name(&submission), "HKF_12.pdf");
    }
}
