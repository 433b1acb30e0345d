//! `POST /api/submissions/save`
//!
//! The browser has already validated the record; the backend checks it again
//! before storing anything, because the endpoint is public.

use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use common::error::SessionError;
use common::requests::{SaveResponse, SaveSubmissionRequest};
use common::validation::validate_form;
use log::{error, info, warn};

use super::store::SubmissionStore;

/// # Returns
/// - `200 OK` with the issued membership number.
/// - `400 Bad Request` when the record is invalid or unsigned.
/// - `503 Service Unavailable` when the database write fails.
pub async fn process(store: web::Data<SubmissionStore>, payload: web::Json<SaveSubmissionRequest>) -> impl Responder {
    let request = payload.into_inner();
    match save_submission(&store, &request) {
        Ok(hkf_id) => HttpResponse::Ok().json(SaveResponse {
            success: true,
            hkf_id: Some(hkf_id),
            message: None,
        }),
        Err(SaveFailure::Rejected(message)) => {
            warn!("Rejected submission: {}", message);
            HttpResponse::BadRequest().json(failure(message))
        }
        Err(SaveFailure::Store(message)) => {
            error!("Could not store submission: {}", message);
            HttpResponse::ServiceUnavailable().json(failure(message))
        }
    }
}

#[derive(Debug, PartialEq)]
enum SaveFailure {
    Rejected(String),
    Store(String),
}

fn save_submission(store: &SubmissionStore, request: &SaveSubmissionRequest) -> Result<String, SaveFailure> {
    let form = request.form.normalized();
    let errors = validate_form(&form, Local::now().date_naive());
    if !errors.is_empty() {
        let fields: Vec<&str> = errors.keys().map(|f| f.as_str()).collect();
        return Err(SaveFailure::Rejected(format!(
            "{} Invalid fields: {}",
            SessionError::Validation,
            fields.join(", ")
        )));
    }

    let signature = request
        .signature_data_url
        .as_deref()
        .filter(|s| s.starts_with("data:image/"))
        .ok_or_else(|| SaveFailure::Rejected(SessionError::SignatureMissing.to_string()))?;

    let hkf_id = store
        .save(&form, Some(signature))
        .map_err(|e| SaveFailure::Store(format!("Could not save application: {}", e)))?;
    info!("Stored application {} for {} {}", hkf_id, form.first_name, form.last_name);
    Ok(hkf_id)
}

fn failure(message: String) -> SaveResponse {
    SaveResponse {
        success: false,
        hkf_id: None,
        message: Some(message),
    }
}
