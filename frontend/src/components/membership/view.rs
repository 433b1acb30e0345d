//! View rendering for the membership form.
//!
//! The page is a single card: personal details, the SEPA mandate, the
//! signature box, the membership terms and the generate button. After a
//! successful render the success sheet offers download and email.

use chrono::Datelike;
use common::model::membership::{FieldId, Gender, SepaGender, StudentAnswer};
use common::session::{PopupAction, ORGANISATION_EMAIL};
use common::signature::{SignatureMode, SURFACE_HEIGHT, SURFACE_WIDTH};
use common::terms;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{event_file, event_value, field_classes, mouse_point, touch_point};
use super::messages::Msg;
use super::state::MembershipComponent;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

const ORGANISATION: &str = "Hamburg Kannada Freunde e.V.";
const ORGANISATION_ADDRESS: &str = "Emmi-Ruben-Weg 17B, 21147 Hamburg";
const MANDATE_TEXT: &str = "Hiermit ermächtige ich den Hamburg Kannada Freunde e.V., den Mitgliedsbeitrag von meinem unten angegebenen Konto per Lastschrift einzuziehen.";

pub fn view(component: &MembershipComponent, ctx: &Context<MembershipComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div class="page">
            <div class="form-card">
                { build_header() }
                { build_personal_section(component, link) }
                { build_sepa_section(component, link) }
                { build_signature_section(component, link) }
                { build_terms() }
                { build_actions(component, link) }
                { build_footer(component) }
            </div>
            { build_success_sheet(component, link) }
        </div>
    }
}

fn build_header() -> Html {
    html! {
        <header class="form-header">
            <h1>{ "Hamburg Kannada Freunde e.V" }</h1>
            <p class="form-subtitle">{ "EINTRITTSFORMULAR / Membership Form" }</p>
        </header>
    }
}

fn build_personal_section(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let student_enabled = component.session.student_question_enabled();
    html! {
        <section class="form-section">
            <h3>{ "Personal Details (Bitte in Druckbuchstaben ausfüllen)" }</h3>
            { text_field(component, link, FieldId::FirstName, "First Name (Vorname)", "text", None) }
            { text_field(component, link, FieldId::LastName, "Last Name (Nachname)", "text", None) }
            { text_field(component, link, FieldId::Dob, "Date of Birth (Geburtsdatum)", "date", None) }
            <div class="radio-row">
                {
                    radio_group(
                        component,
                        link,
                        FieldId::Gender,
                        "Gender (Geschlecht)",
                        &[Gender::Male, Gender::Female].map(|g| (g.as_str(), g.label())),
                        true,
                        false,
                    )
                }
                {
                    radio_group(
                        component,
                        link,
                        FieldId::IsKannadaShaaleStudent,
                        "Enrolled in Kannada Shaale?",
                        &[StudentAnswer::Yes, StudentAnswer::No].map(|a| (a.as_str(), a.label())),
                        student_enabled,
                        !student_enabled,
                    )
                }
            </div>
            { text_field(component, link, FieldId::Address, "Address (Adresse)", "text", None) }
            <div class="field-pair">
                { text_field(component, link, FieldId::PostalCode, "Postal Code", "text", None) }
                { text_field(component, link, FieldId::City, "City (Ort)", "text", None) }
            </div>
            { text_field(component, link, FieldId::Phone, "Phone (Tel./Handy)", "tel", None) }
            { text_field(component, link, FieldId::Email, "E-Mail", "email", None) }
        </section>
    }
}

fn build_sepa_section(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let salutations = [
        SepaGender::Male,
        SepaGender::Female,
        SepaGender::Diverse,
        SepaGender::None,
        SepaGender::Institution,
    ]
    .map(|g| (g.as_str(), g.label()));
    html! {
        <section class="form-section sepa">
            <h3 class="centered">{ "SEPA Direct Debit Mandate" }</h3>
            <p class="mandate-text">{ MANDATE_TEXT }</p>
            { radio_group(component, link, FieldId::SepaGender, "Gender", &salutations, true, false) }
            { text_field(component, link, FieldId::SepaFirstName, "First Name (Vorname)", "text", None) }
            { text_field(component, link, FieldId::SepaLastName, "Last Name (Nachname)", "text", None) }
            { text_field(component, link, FieldId::SepaAddress, "Address (Adresse)", "text", None) }
            <div class="field-pair">
                { text_field(component, link, FieldId::SepaPostalCode, "Postal Code", "text", None) }
                { text_field(component, link, FieldId::SepaCity, "City (Ort)", "text", None) }
            </div>
            { text_field(component, link, FieldId::Iban, "IBAN", "text", Some("DE00 0000 0000 0000 0000 00")) }
        </section>
    }
}

/// Labelled input row with its error line.
fn text_field(
    component: &MembershipComponent,
    link: &Scope<MembershipComponent>,
    field: FieldId,
    label: &'static str,
    input_type: &'static str,
    placeholder: Option<&'static str>,
) -> Html {
    let name = field.as_str();
    html! {
        <div class="form-field">
            <div class="field-row">
                <label for={name}>
                    { label }
                    if field.is_required() { <span class="required">{ "*" }</span> }
                </label>
                <input
                    id={name}
                    name={name}
                    type={input_type}
                    class={field_classes(component, field)}
                    placeholder={placeholder.unwrap_or(label)}
                    value={component.session.form().value(field).to_string()}
                    oninput={link.callback(move |e: InputEvent| Msg::FieldChanged(field, event_value(&e)))}
                    onblur={link.callback(move |_: FocusEvent| Msg::FieldBlurred(field))}
                />
            </div>
            { error_line(component, field) }
        </div>
    }
}

/// Radio group for an enumerated field. Choosing an option validates the
/// field right away.
fn radio_group(
    component: &MembershipComponent,
    link: &Scope<MembershipComponent>,
    field: FieldId,
    label: &'static str,
    options: &[(&'static str, &'static str)],
    required: bool,
    disabled: bool,
) -> Html {
    let selected = component.session.form().value(field);
    html! {
        <div class={classes!("form-field", "radio-group", disabled.then_some("disabled"))}>
            <span class="group-label">
                { label }
                if required { <span class="required">{ "*" }</span> }
            </span>
            <div class="radio-options">
                { for options.iter().map(|&(value, text)| html! {
                    <label class="radio-option">
                        <input
                            type="radio"
                            name={field.as_str()}
                            value={value}
                            checked={selected == value}
                            disabled={disabled}
                            onchange={link.batch_callback(move |_: Event| vec![
                                Msg::FieldChanged(field, value.to_string()),
                                Msg::FieldBlurred(field),
                            ])}
                        />
                        <span>{ text }</span>
                    </label>
                }) }
            </div>
            { error_line(component, field) }
        </div>
    }
}

fn error_line(component: &MembershipComponent, field: FieldId) -> Html {
    match component.session.error(field) {
        Some(message) => html! { <p class="field-error">{ message }</p> },
        None => html! {},
    }
}

fn build_signature_section(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let pad = component.session.signature();
    let mode = pad.mode();
    let tab = |target: SignatureMode, text: &'static str| {
        html! {
            <button
                type="button"
                class={classes!("tab-btn", (mode == target).then_some("active"))}
                onclick={link.callback(move |_| Msg::SetSignatureMode(target))}
            >
                { text }
            </button>
        }
    };

    html! {
        <section class="form-section signature">
            <h3>{ "Signature (Unterschrift)" }<span class="required">{ "*" }</span></h3>
            <div class="signature-layout">
                <div class="entry-date">
                    <label>{ "Entry Date:" }</label>
                    <div class="entry-date-box">{ component.session.form().entry_date.clone() }</div>
                </div>
                <div class="signature-box">
                    <div class="tab-bar">
                        { tab(SignatureMode::Draw, "Draw") }
                        { tab(SignatureMode::Upload, "Upload") }
                    </div>
                    {
                        match mode {
                            SignatureMode::Draw => build_draw_pane(component, link),
                            SignatureMode::Upload => build_upload_pane(component, link),
                        }
                    }
                    <button type="button" class="link-btn" onclick={link.callback(|_| Msg::ClearSignature)}>
                        { "Clear" }
                    </button>
                </div>
            </div>
        </section>
    }
}

fn build_draw_pane(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let on_down = link.batch_callback(|e: MouseEvent| mouse_point(&e).map(Msg::PointerDown));
    let on_move = link.batch_callback(|e: MouseEvent| mouse_point(&e).map(Msg::PointerMove));
    let on_touch_start = link.batch_callback(|e: TouchEvent| touch_point(&e).map(Msg::PointerDown));
    let on_touch_move = link.batch_callback(|e: TouchEvent| touch_point(&e).map(Msg::PointerMove));

    html! {
        <div
            class="signature-surface"
            onmousedown={on_down}
            onmousemove={on_move}
            onmouseup={link.callback(|_: MouseEvent| Msg::PointerUp)}
            onmouseleave={link.callback(|_: MouseEvent| Msg::PointerUp)}
            ontouchstart={on_touch_start}
            ontouchmove={on_touch_move}
            ontouchend={link.callback(|_: TouchEvent| Msg::PointerUp)}
        >
            if let Some(src) = component.surface_preview.clone() {
                <img
                    src={src}
                    alt=""
                    draggable="false"
                    width={SURFACE_WIDTH.to_string()}
                    height={SURFACE_HEIGHT.to_string()}
                />
            }
        </div>
    }
}

fn build_upload_pane(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let on_change = link.batch_callback(|e: Event| event_file(&e).map(Msg::SignatureFileChosen));
    html! {
        <div class="signature-upload">
            <input
                id="signature-upload"
                type="file"
                accept="image/*"
                class="hidden"
                ref={component.file_input_ref.clone()}
                onchange={on_change}
            />
            <label for="signature-upload" class="file-label">{ "Choose an image" }</label>
            if let Some(image) = component.session.signature().uploaded() {
                <img class="uploaded-signature" src={image.data_url()} alt="Signature" />
            }
        </div>
    }
}

fn build_terms() -> Html {
    html! {
        <section class="terms">
            <h3>{ terms::TITLE }</h3>
            { for terms::CLAUSES.iter().map(|clause| html! {
                <div class="clause">
                    <p><strong>{ clause.heading() }</strong>{ " " }{ clause.text }</p>
                    if !clause.bullets.is_empty() {
                        <ul>
                            { for clause.bullets.iter().map(|b| html! { <li>{ *b }</li> }) }
                        </ul>
                    }
                </div>
            }) }
            <h4>{ terms::CONTRIBUTIONS_TITLE }</h4>
            <p>{ terms::CONTRIBUTIONS }</p>
        </section>
    }
}

fn build_actions(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let session = &component.session;
    let label = if session.is_processing() {
        component.status_message.clone().unwrap_or_else(|| "Processing...".to_string())
    } else {
        "Generate Membership Application".to_string()
    };
    html! {
        <div class="form-actions">
            <button
                type="button"
                class="primary-btn"
                disabled={!session.can_export()}
                onclick={link.callback(|_| Msg::Generate)}
            >
                { label }
            </button>
            if !session.is_processing() {
                if let Some(message) = component.status_message.clone() {
                    <p class="status-line">{ message }</p>
                }
            }
        </div>
    }
}

fn build_footer(component: &MembershipComponent) -> Html {
    let year = component.session.today().year();
    html! {
        <footer class="form-footer">
            <h4>{ "Contact" }</h4>
            <p>{ ORGANISATION }</p>
            <p>{ ORGANISATION_ADDRESS }</p>
            <p><a href={format!("mailto:{}", ORGANISATION_EMAIL)}>{ ORGANISATION_EMAIL }</a></p>
            <p class="copyright">{ format!("© {} {} All rights reserved.", year, ORGANISATION) }</p>
        </footer>
    }
}

fn build_success_sheet(component: &MembershipComponent, link: &Scope<MembershipComponent>) -> Html {
    let session = &component.session;
    let busy = session.is_busy();
    let download_label = if session.is_saving_backend() {
        "Saving..."
    } else if session.is_processing() {
        "Preparing PDF..."
    } else {
        "1. Save & Download PDF"
    };
    let on_close = (!busy).then(|| link.callback(|_: ()| Msg::ClosePopup));

    html! {
        <YwMaterialTopSheet open={session.popup_visible()} on_close={on_close}>
            <div class="success-sheet">
                <h3>{ "Form Generated!" }</h3>
                <p>{ "You must download and email the signed PDF to complete your membership." }</p>
                if let Some(id) = session.hkf_id() {
                    <p class="membership-number">{ format!("Membership number: {}", id) }</p>
                }
                <div class="sheet-actions">
                    <button
                        type="button"
                        class="primary-btn"
                        disabled={busy}
                        onclick={link.callback(|_| Msg::Popup(PopupAction::Download))}
                    >
                        { download_label }
                    </button>
                    <button
                        type="button"
                        class="secondary-btn"
                        disabled={busy || !session.email_enabled()}
                        onclick={link.callback(|_| Msg::Popup(PopupAction::Email))}
                    >
                        { "2. Send Email to HKF Team" }
                    </button>
                    <button
                        type="button"
                        class="link-btn"
                        disabled={busy}
                        onclick={link.callback(|_| Msg::ClosePopup)}
                    >
                        { "Close" }
                    </button>
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
