//! Update function for the membership form.
//!
//! Synchronous messages map one-to-one onto `FormSession` calls. The export
//! flow is split into `begin_*` calls here and `*Finished` messages sent back
//! by the spawned request, so the session is never borrowed across an await.

use common::client::{DocumentRenderer, SubmissionClient};
use common::error::SessionError;
use common::session::{Outcome, PopupAction};
use gloo_file::futures::read_as_bytes;
use gloo_timers::future::TimeoutFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::api::HttpClient;
use crate::browser;

use super::messages::Msg;
use super::state::MembershipComponent;

const STATUS_TIMEOUT_MS: u32 = 3_000;
const GENERATING: &str = "Generating PDF...";

pub fn update(component: &mut MembershipComponent, ctx: &Context<MembershipComponent>, msg: Msg) -> bool {
    match msg {
        Msg::FieldChanged(field, value) => {
            if let Err(e) = component.session.change_field(field, &value) {
                gloo_console::error!(e.to_string());
            }
            true
        }
        Msg::FieldBlurred(field) => {
            component.touched.insert(field);
            component.session.blur_field(field);
            true
        }
        Msg::PointerDown(at) => {
            component.session.pointer_down(at);
            false
        }
        Msg::PointerMove(to) => {
            if !component.session.signature().surface().is_drawing() {
                return false;
            }
            component.session.pointer_move(to);
            component.refresh_surface_preview();
            true
        }
        Msg::PointerUp => {
            if !component.session.signature().surface().is_drawing() {
                return false;
            }
            component.session.pointer_up();
            true
        }
        Msg::SetSignatureMode(mode) => {
            component.session.set_signature_mode(mode);
            true
        }
        Msg::SignatureFileChosen(file) => {
            let file = gloo_file::File::from(file);
            let content_type = file.raw_mime_type();
            let link = ctx.link().clone();
            spawn_local(async move {
                match read_as_bytes(&file).await {
                    Ok(bytes) => link.send_message(Msg::SignatureFileLoaded { content_type, bytes }),
                    Err(e) => gloo_console::error!(format!("Could not read signature file: {}", e)),
                }
            });
            false
        }
        Msg::SignatureFileLoaded { content_type, bytes } => {
            if let Err(e) = component.session.upload_signature(&content_type, bytes) {
                browser::alert(&e.to_string());
            }
            true
        }
        Msg::ClearSignature => {
            component.session.clear_signature();
            component.refresh_surface_preview();
            true
        }

        Msg::Generate => {
            generate(component, ctx);
            true
        }
        Msg::ExportFinished(job, result) => {
            clear_status(component);
            match component.session.finish_export(&job, result) {
                Ok(Outcome::Applied) => {}
                Ok(Outcome::Stale) => gloo_console::log!("Discarded a document for an outdated form"),
                Err(e) => {
                    gloo_console::error!(e.to_string());
                    browser::alert(&e.to_string());
                }
            }
            true
        }
        Msg::Popup(action) => {
            continue_popup(component, ctx, action);
            true
        }
        Msg::SaveFinished(job, result, action) => {
            match component.session.finish_save(&job, result) {
                Ok(Outcome::Applied) => continue_popup(component, ctx, action),
                Ok(Outcome::Stale) => gloo_console::log!("Form changed while saving; not continuing"),
                Err(e) => browser::alert(&format!("Could not save application: {}", e)),
            }
            true
        }
        Msg::ReexportFinished(job, result, action) => {
            match component.session.finish_export(&job, result) {
                Ok(Outcome::Applied) => continue_popup(component, ctx, action),
                Ok(Outcome::Stale) => gloo_console::log!("Form changed while rendering; not continuing"),
                Err(e) => browser::alert(&e.to_string()),
            }
            true
        }
        Msg::ClosePopup => {
            component.session.close_popup();
            true
        }
        Msg::ClearStatus(serial) => {
            if serial == component.status_serial {
                component.status_message = None;
                true
            } else {
                false
            }
        }
    }
}

fn generate(component: &mut MembershipComponent, ctx: &Context<MembershipComponent>) {
    let job = match component.session.begin_export() {
        Ok(job) => job,
        Err(SessionError::Validation) => {
            show_status(component, ctx, &SessionError::Validation.to_string(), true);
            return;
        }
        Err(SessionError::Busy) => return,
        Err(e) => {
            browser::alert(&e.to_string());
            return;
        }
    };

    show_status(component, ctx, GENERATING, false);
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = HttpClient::public().render(&job.request).await;
        link.send_message(Msg::ExportFinished(job, result));
    });
}

/// Advances a popup action by one asynchronous step, or completes it when
/// nothing is left to save or re-render.
fn continue_popup(component: &mut MembershipComponent, ctx: &Context<MembershipComponent>, action: PopupAction) {
    let session = &mut component.session;
    let link = ctx.link().clone();

    if session.needs_save() {
        match session.begin_save() {
            Ok(job) => spawn_local(async move {
                let result = HttpClient::public().save(&job.request).await;
                link.send_message(Msg::SaveFinished(job, result, action));
            }),
            Err(SessionError::Busy) => {}
            Err(e) => browser::alert(&e.to_string()),
        }
        return;
    }

    if session.needs_reexport() {
        match session.begin_reexport() {
            Ok(job) => spawn_local(async move {
                let result = HttpClient::public().render(&job.request).await;
                link.send_message(Msg::ReexportFinished(job, result, action));
            }),
            Err(SessionError::Busy) => {}
            Err(e) => browser::alert(&e.to_string()),
        }
        return;
    }

    match action {
        PopupAction::Download => match session.mark_downloaded() {
            Ok(artifact) => {
                if let Err(e) = browser::download_bytes(&artifact.file_name, &artifact.bytes, "application/pdf") {
                    browser::alert(&format!("Download failed: {}", e));
                }
            }
            Err(e) => browser::alert(&e.to_string()),
        },
        PopupAction::Email => match session.email_draft() {
            Ok(draft) => browser::navigate(&draft.mailto_url(browser::encode_uri_component)),
            Err(e) => browser::alert(&e.to_string()),
        },
    }
}

fn show_status(component: &mut MembershipComponent, ctx: &Context<MembershipComponent>, message: &str, expires: bool) {
    component.status_serial = component.status_serial.wrapping_add(1);
    component.status_message = Some(message.to_string());
    if expires {
        let serial = component.status_serial;
        let link = ctx.link().clone();
        spawn_local(async move {
            TimeoutFuture::new(STATUS_TIMEOUT_MS).await;
            link.send_message(Msg::ClearStatus(serial));
        });
    }
}

fn clear_status(component: &mut MembershipComponent) {
    component.status_serial = component.status_serial.wrapping_add(1);
    component.status_message = None;
}
