use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use common::error::SessionError;
use common::requests::DocumentRequest;
use common::validation::validate_form;

use super::error::DocumentError;
use super::{DocumentEngine, RenderedDocument};

/// `POST /api/documents/render`
///
/// # Returns
/// - `200 OK` with the PDF bytes.
/// - `400 Bad Request` when the record does not pass validation.
/// - `503 Service Unavailable` when rasterization or serialization fails.
pub async fn process(engine: web::Data<DocumentEngine>, payload: web::Json<DocumentRequest>) -> impl Responder {
    let request = payload.into_inner();
    let errors = validate_form(&request.form, Local::now().date_naive());
    if !errors.is_empty() {
        let fields: Vec<&str> = errors.keys().map(|f| f.as_str()).collect();
        log::warn!("Refusing to render an invalid record ({})", fields.join(", "));
        return HttpResponse::BadRequest().body(format!(
            "{} Invalid fields: {}",
            SessionError::Validation,
            fields.join(", ")
        ));
    }
    let file_name = format!(
        "HKF_Membership_{}.pdf",
        request.hkf_id.as_deref().unwrap_or("Application")
    );
    match render_blocking(engine.get_ref().clone(), request).await {
        Ok(document) => pdf_response(document.bytes, &file_name),
        Err(e) => {
            log::error!("Document reconstruction failed: {}", e);
            HttpResponse::ServiceUnavailable().body(format!("PDF generation failed: {}", e))
        }
    }
}

/// Runs the CPU-heavy reconstruction off the async workers.
pub async fn render_blocking(
    engine: DocumentEngine,
    request: DocumentRequest,
) -> Result<RenderedDocument, DocumentError> {
    let today = Local::now().date_naive();
    tokio::task::spawn_blocking(move || engine.reconstruct(&request, today))
        .await
        .map_err(|e| DocumentError::Task(e.to_string()))?
}

pub fn pdf_response(bytes: Vec<u8>, file_name: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes)
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use super::super::testing::StubRasterizer;
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use common::model::membership::{Gender, MembershipForm, SepaGender};
    use std::sync::Arc;

    fn body() -> DocumentRequest {
        DocumentRequest {
            form: MembershipForm {
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                dob: "1990-04-02".into(),
                gender: Gender::Female,
                address: "Hauptstr. 1".into(),
                postal_code: "20095".into(),
                city: "Hamburg".into(),
                phone: "040123456".into(),
                email: "asha@example.com".into(),
                entry_date: "2026-01-01".into(),
                sepa_gender: SepaGender::Female,
                sepa_first_name: "Asha".into(),
                sepa_last_name: "Rao".into(),
                sepa_address: "Hauptstr. 1".into(),
                sepa_postal_code: "20095".into(),
                sepa_city: "Hamburg".into(),
                iban: "DE29 1234 5678 9012 3456 78".into(),
                sepa_entry_date: "2026-01-01".into(),
                ..Default::default()
            },
            signature_data_url: None,
            hkf_id: Some("HKF-0007".into()),
        }
    }

    #[actix_web::test]
    async fn renders_pdf_attachment() {
        let engine = DocumentEngine::new(Arc::new(StubRasterizer::new(400, 400)));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(engine))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/documents/render")
            .set_json(body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        assert_eq!(
            disposition.as_deref(),
            Some("attachment; filename=\"HKF_Membership_HKF-0007.pdf\"")
        );
        let bytes = test::read_body(resp).await;
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn failure_is_service_unavailable() {
        let mut stub = StubRasterizer::new(400, 400);
        stub.fail = true;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DocumentEngine::new(Arc::new(stub))))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/documents/render")
            .set_json(body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn oversized_records_are_refused_before_rendering() {
        let stub = Arc::new(StubRasterizer::new(400, 400));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(DocumentEngine::new(stub.clone())))
                .service(configure_routes()),
        )
        .await;

        let mut request = body();
        request.form.address = "ab ".repeat(350_000);
        let req = test::TestRequest::post()
            .uri("/api/documents/render")
            .set_json(request)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let message = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&message).contains("address"));
        assert!(stub.seen.lock().unwrap().is_empty());
    }
}
