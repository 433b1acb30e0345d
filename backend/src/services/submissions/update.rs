use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::{UpdateResponse, UpdateStatusRequest};

use super::store::SubmissionStore;
use crate::services::admin::{require_admin, AdminSessions};

/// `POST /api/submissions/update` (admin): stores a review decision and the
/// internal comment.
///
/// # Returns
/// - `200 OK` on success.
/// - `404 Not Found` when the id does not exist.
/// - `503 Service Unavailable` on a database error.
pub async fn process(
    req: HttpRequest,
    sessions: web::Data<AdminSessions>,
    store: web::Data<SubmissionStore>,
    payload: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    if let Err(resp) = require_admin(&req, &sessions).await {
        return resp;
    }
    let update = payload.into_inner();
    match store.update_status(update.id, update.status, update.comments.trim()) {
        Ok(true) => {
            log::info!("Submission {} marked {}", update.id, update.status);
            HttpResponse::Ok().json(UpdateResponse {
                success: true,
                message: None,
            })
        }
        Ok(false) => HttpResponse::NotFound().json(UpdateResponse {
            success: false,
            message: Some(format!("Submission {} not found.", update.id)),
        }),
        Err(e) => {
            log::error!("Could not update submission {}: {}", update.id, e);
            HttpResponse::ServiceUnavailable().json(UpdateResponse {
                success: false,
                message: Some(e.to_string()),
            })
        }
    }
}
