//! Update function for the admin dashboard.

use common::client::SubmissionClient;
use yew::platform::spawn_local;
use yew::prelude::*;

use super::helpers::pdf_file_name;
use super::messages::Msg;
use super::state::AdminComponent;
use crate::api::{self, HttpClient};
use crate::browser;

pub fn update(component: &mut AdminComponent, ctx: &Context<AdminComponent>, msg: Msg) -> bool {
    match msg {
        Msg::EmailChanged(value) => {
            component.email = value;
            false
        }
        Msg::PasswordChanged(value) => {
            component.password = value;
            false
        }
        Msg::Login => {
            if component.logging_in {
                return false;
            }
            component.logging_in = true;
            component.login_error = None;
            let (email, password) = (component.email.clone(), component.password.clone());
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = api::login(&email, &password).await;
                link.send_message(Msg::LoginFinished(result));
            });
            true
        }
        Msg::LoginFinished(result) => {
            component.logging_in = false;
            match result {
                Ok(token) => {
                    component.token = Some(token);
                    component.password.clear();
                    ctx.link().send_message(Msg::Refresh);
                }
                Err(message) => component.login_error = Some(message),
            }
            true
        }
        Msg::Logout => {
            if let Some(token) = component.token.take() {
                spawn_local(async move { HttpClient::admin(token).logout().await });
            }
            *component = AdminComponent::default();
            browser::set_hash("#/");
            true
        }

        Msg::Refresh => {
            let Some(token) = component.token.clone() else {
                return false;
            };
            component.loading = true;
            component.load_error = None;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = HttpClient::admin(token).list().await;
                link.send_message(Msg::Loaded(result));
            });
            true
        }
        Msg::Loaded(result) => {
            component.loading = false;
            match result {
                Ok(submissions) => {
                    gloo_console::log!(format!("Loaded {} submissions", submissions.len()));
                    component.submissions = submissions;
                }
                Err(e) => component.load_error = Some(e.to_string()),
            }
            true
        }
        Msg::SelectTab(filter) => {
            component.filter = filter;
            true
        }

        Msg::OpenReview(id) => {
            component.selected = Some(id);
            component.comment = component
                .selected_submission()
                .and_then(|s| s.comments.clone())
                .unwrap_or_default();
            true
        }
        Msg::CloseReview => {
            if component.updating {
                return false;
            }
            component.selected = None;
            component.comment.clear();
            true
        }
        Msg::CommentChanged(value) => {
            component.comment = value;
            false
        }
        Msg::SetStatus(status) => {
            let (Some(token), Some(id)) = (component.token.clone(), component.selected) else {
                return false;
            };
            if component.updating {
                return false;
            }
            component.updating = true;
            let comment = component.comment.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = HttpClient::admin(token).update(id, status, &comment).await;
                link.send_message(Msg::StatusUpdated(result));
            });
            true
        }
        Msg::StatusUpdated(result) => {
            component.updating = false;
            match result {
                Ok(()) => {
                    component.selected = None;
                    component.comment.clear();
                    ctx.link().send_message(Msg::Refresh);
                }
                Err(e) => browser::alert(&format!("Update failed: {}", e)),
            }
            true
        }

        Msg::DownloadPdf => {
            let (Some(token), Some(submission)) = (component.token.clone(), component.selected_submission()) else {
                return false;
            };
            if component.downloading {
                return false;
            }
            let id = submission.id;
            let file_name = pdf_file_name(submission);
            component.downloading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                let result = HttpClient::admin(token).submission_pdf(id).await;
                link.send_message(Msg::PdfFetched { file_name, result });
            });
            true
        }
        Msg::PdfFetched { file_name, result } => {
            component.downloading = false;
            let outcome = result.and_then(|bytes| browser::download_bytes(&file_name, &bytes, "application/pdf"));
            if let Err(e) = outcome {
                gloo_console::error!(format!("PDF download failed: {}", e));
                browser::alert(&format!("Could not download PDF: {}", e));
            }
            true
        }
    }
}
