use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::requests::UpdateResponse;

use super::{require_admin, AdminSessions};

/// `POST /api/admin/logout`: revokes the bearer token of the caller.
pub async fn process(req: HttpRequest, sessions: web::Data<AdminSessions>) -> impl Responder {
    let token = match require_admin(&req, &sessions).await {
        Ok(token) => token,
        Err(resp) => return resp,
    };
    sessions.revoke(&token).await;
    log::info!("Admin session closed");
    HttpResponse::Ok().json(UpdateResponse {
        success: true,
        message: None,
    })
}
