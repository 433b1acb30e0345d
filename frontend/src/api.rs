//! HTTP side of the collaborator traits, talking to the backend on the same
//! origin.

use common::client::{DocumentRenderer, SubmissionClient};
use common::error::SessionError;
use common::model::submission::{Submission, SubmissionStatus};
use common::requests::{
    DocumentRequest, ListResponse, LoginRequest, LoginResponse, SaveResponse, SaveSubmissionRequest,
    UpdateResponse, UpdateStatusRequest,
};
use gloo_net::http::{Request, RequestBuilder, Response};

const SAVE_URL: &str = "/api/submissions/save";
const LIST_URL: &str = "/api/submissions";
const UPDATE_URL: &str = "/api/submissions/update";
const RENDER_URL: &str = "/api/documents/render";
const LOGIN_URL: &str = "/api/admin/login";
const LOGOUT_URL: &str = "/api/admin/logout";

/// Backend client. Admin calls carry the session token as a bearer header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HttpClient {
    token: Option<String>,
}

impl HttpClient {
    pub fn public() -> Self {
        Self { token: None }
    }

    pub fn admin(token: String) -> Self {
        Self { token: Some(token) }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// PDF of a stored record.
    pub async fn submission_pdf(&self, id: i64) -> Result<Vec<u8>, String> {
        let response = self
            .authorize(Request::get(&format!("/api/submissions/{}/pdf", id)))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        pdf_bytes(response).await
    }

    pub async fn logout(&self) {
        let request = self.authorize(Request::post(LOGOUT_URL));
        if let Err(e) = request.send().await {
            gloo_console::warn!(format!("Logout request failed: {}", e));
        }
    }
}

/// Exchanges credentials for an admin token. `Err` carries the notice to show.
pub async fn login(email: &str, password: &str) -> Result<String, String> {
    let body = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let response = Request::post(LOGIN_URL)
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|_| SessionError::CONNECTION_FAILED.to_string())?;
    let answer: LoginResponse = response
        .json()
        .await
        .map_err(|_| SessionError::CONNECTION_FAILED.to_string())?;
    match answer.token {
        Some(token) if answer.success => Ok(token),
        _ => Err(answer.message.unwrap_or_else(|| "Incorrect credentials.".to_string())),
    }
}

async fn pdf_bytes(response: Response) -> Result<Vec<u8>, String> {
    if !response.ok() {
        let detail = response.text().await.unwrap_or_default();
        return Err(if detail.is_empty() {
            format!("HTTP {}", response.status())
        } else {
            detail
        });
    }
    response.binary().await.map_err(|e| e.to_string())
}

/// A transport failure or an unreadable answer carries no server message.
fn unreachable_server(e: gloo_net::Error) -> SessionError {
    gloo_console::error!(format!("Request failed: {}", e));
    SessionError::persistence(None)
}

impl SubmissionClient for HttpClient {
    async fn save(&self, request: &SaveSubmissionRequest) -> Result<Option<String>, SessionError> {
        let response = self
            .authorize(Request::post(SAVE_URL))
            .json(request)
            .map_err(unreachable_server)?
            .send()
            .await
            .map_err(unreachable_server)?;
        let answer: SaveResponse = response.json().await.map_err(unreachable_server)?;
        if !response.ok() || !answer.success {
            return Err(SessionError::persistence(answer.message));
        }
        Ok(answer.hkf_id)
    }

    async fn list(&self) -> Result<Vec<Submission>, SessionError> {
        let response = self
            .authorize(Request::get(LIST_URL))
            .send()
            .await
            .map_err(unreachable_server)?;
        let answer: ListResponse = response.json().await.map_err(unreachable_server)?;
        if !response.ok() || !answer.success {
            return Err(SessionError::persistence(answer.message));
        }
        Ok(answer.submissions)
    }

    async fn update(&self, id: i64, status: SubmissionStatus, comments: &str) -> Result<(), SessionError> {
        let body = UpdateStatusRequest {
            id,
            status,
            comments: comments.to_string(),
        };
        let response = self
            .authorize(Request::post(UPDATE_URL))
            .json(&body)
            .map_err(unreachable_server)?
            .send()
            .await
            .map_err(unreachable_server)?;
        let answer: UpdateResponse = response.json().await.map_err(unreachable_server)?;
        if !response.ok() || !answer.success {
            return Err(SessionError::persistence(answer.message));
        }
        Ok(())
    }
}

impl DocumentRenderer for HttpClient {
    async fn render(&self, request: &DocumentRequest) -> Result<Vec<u8>, SessionError> {
        let response = Request::post(RENDER_URL)
            .json(request)
            .map_err(|e| SessionError::Render(e.to_string()))?
            .send()
            .await
            .map_err(|e| SessionError::Render(e.to_string()))?;
        pdf_bytes(response).await.map_err(SessionError::Render)
    }
}
