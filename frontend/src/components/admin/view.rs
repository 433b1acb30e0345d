//! View rendering for the admin dashboard.

use common::model::submission::{StatusFilter, Submission, SubmissionStats, SubmissionStatus};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::location;
use super::messages::Msg;
use super::state::AdminComponent;
use crate::tops_sheet::yw_material_top_sheet::YwMaterialTopSheet;

pub fn view(component: &AdminComponent, ctx: &Context<AdminComponent>) -> Html {
    let link = ctx.link();
    if component.token.is_none() {
        return build_login(component, link);
    }
    let stats = SubmissionStats::collect(&component.submissions);
    html! {
        <div class="admin-page">
            <header class="admin-header">
                <h1>{ "HKF Admin Dashboard" }</h1>
                <div class="admin-header-actions">
                    <button
                        class="secondary-btn"
                        disabled={component.loading}
                        onclick={link.callback(|_| Msg::Refresh)}
                    >
                        { "Refresh Data" }
                    </button>
                    <button class="link-btn" onclick={link.callback(|_| Msg::Logout)}>{ "Log Out" }</button>
                </div>
            </header>
            { build_stats(&stats) }
            { build_growth(&stats) }
            { build_records(component, link) }
            { build_review_sheet(component, link) }
        </div>
    }
}

fn input_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn build_login(component: &AdminComponent, link: &Scope<AdminComponent>) -> Html {
    let on_submit = link.callback(|e: SubmitEvent| {
        e.prevent_default();
        Msg::Login
    });
    html! {
        <div class="admin-login">
            <form class="login-card" onsubmit={on_submit}>
                <h2>{ "Admin Panel" }</h2>
                <input
                    type="email"
                    class="form-input"
                    placeholder="Email"
                    required=true
                    value={component.email.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::EmailChanged(input_value(e)))}
                />
                <input
                    type="password"
                    class="form-input"
                    placeholder="Password"
                    required=true
                    value={component.password.clone()}
                    oninput={link.callback(|e: InputEvent| Msg::PasswordChanged(input_value(e)))}
                />
                if let Some(error) = component.login_error.clone() {
                    <p class="field-error">{ error }</p>
                }
                <button type="submit" class="primary-btn" disabled={component.logging_in}>
                    { "Enter Dashboard" }
                </button>
                <a class="back-link" href="#/">{ "Back to Public Form" }</a>
            </form>
        </div>
    }
}

fn build_stats(stats: &SubmissionStats) -> Html {
    let card = |label: &'static str, value: usize, class: &'static str| {
        html! {
            <div class={classes!("stat-card", class)}>
                <span class="stat-label">{ label }</span>
                <span class="stat-value">{ value.to_string() }</span>
            </div>
        }
    };
    html! {
        <div class="stats-grid">
            { card("Total Records", stats.total, "total") }
            { card("Pending / New", stats.pending, "pending") }
            { card("Approved", stats.approved, "approved") }
            { card("Rejected", stats.rejected, "rejected") }
        </div>
    }
}

fn build_growth(stats: &SubmissionStats) -> Html {
    html! {
        <section class="growth-card">
            <h3>{ "Yearly Application Growth" }</h3>
            <div class="growth-bars">
                { for stats.by_year.iter().map(|(year, count)| html! {
                    <div class="growth-bar">
                        <div class="bar-track">
                            <div class="bar-fill" style={format!("height: {}%;", stats.year_share(year))}>
                                <span class="bar-count">{ count.to_string() }</span>
                            </div>
                        </div>
                        <span class="bar-year">{ year.clone() }</span>
                    </div>
                }) }
            </div>
        </section>
    }
}

fn build_records(component: &AdminComponent, link: &Scope<AdminComponent>) -> Html {
    let rows = component.filter.apply(&component.submissions);
    html! {
        <section class="records-card">
            <div class="tab-bar">
                { for StatusFilter::TABS.iter().map(|&filter| html! {
                    <button
                        class={classes!("tab-btn", (component.filter == filter).then_some("active"))}
                        onclick={link.callback(move |_| Msg::SelectTab(filter))}
                    >
                        { filter.label() }
                    </button>
                }) }
            </div>
            if let Some(error) = component.load_error.clone() {
                <p class="field-error">{ error }</p>
            }
            if component.loading {
                <p class="table-note">{ "Fetching records..." }</p>
            } else if rows.is_empty() {
                <p class="table-note">{ "No records found for this category." }</p>
            } else {
                <table class="records-table">
                    <thead>
                        <tr>
                            <th>{ "HKF-ID" }</th>
                            <th>{ "Applicant" }</th>
                            <th>{ "Status" }</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.into_iter().map(|s| build_row(s, link)) }
                    </tbody>
                </table>
            }
        </section>
    }
}

fn build_row(submission: &Submission, link: &Scope<AdminComponent>) -> Html {
    let id = submission.id;
    html! {
        <tr>
            <td class="mono">{ submission.display_id() }</td>
            <td>
                <div class="applicant-name">
                    { format!("{} {}", submission.form.first_name, submission.form.last_name) }
                </div>
                <div class="applicant-email">{ submission.form.email.clone() }</div>
            </td>
            <td>{ status_badge(submission.status) }</td>
            <td>
                <button class="link-btn" onclick={link.callback(move |_| Msg::OpenReview(id))}>
                    { "Review" }
                </button>
            </td>
        </tr>
    }
}

fn status_badge(status: SubmissionStatus) -> Html {
    html! { <span class={classes!("badge", status.as_str())}>{ status.badge() }</span> }
}

fn build_review_sheet(component: &AdminComponent, link: &Scope<AdminComponent>) -> Html {
    let Some(submission) = component.selected_submission() else {
        return html! {};
    };
    let form = &submission.form;
    let busy = component.updating;
    let on_comment = link.callback(|e: InputEvent| {
        Msg::CommentChanged(e.target_unchecked_into::<web_sys::HtmlTextAreaElement>().value())
    });

    html! {
        <YwMaterialTopSheet open=true wide=true on_close={link.callback(|_: ()| Msg::CloseReview)}>
            <div class="review-sheet">
                <div class="review-header">
                    <div>
                        <h3>{ format!("{} {}", form.first_name, form.last_name) }</h3>
                        <span class="mono">{ submission.display_id() }</span>
                    </div>
                    { status_badge(submission.status) }
                </div>

                <div class="review-grid">
                    <div class="review-block">
                        <h4>{ "Personal Particulars" }</h4>
                        <dl>
                            <dt>{ "DOB" }</dt><dd>{ form.dob.clone() }</dd>
                            <dt>{ "Gender" }</dt><dd>{ form.gender.label() }</dd>
                            <dt>{ "Location" }</dt><dd>{ location(submission) }</dd>
                            <dt>{ "Contact" }</dt><dd>{ format!("{} / {}", form.phone, form.email) }</dd>
                        </dl>
                    </div>
                    <div class="review-block">
                        <h4>{ "Financial Context (IBAN)" }</h4>
                        <p class="mono">{ form.iban.clone() }</p>
                        <p>{ form.holder_name() }</p>
                    </div>
                    <div class="review-block">
                        <h4>{ "Stored Signature" }</h4>
                        {
                            match submission.signature.clone() {
                                Some(src) if !src.is_empty() => html! {
                                    <img class="stored-signature" src={src} alt="Signature" />
                                },
                                _ => html! { <p class="table-note">{ "No signature record" }</p> },
                            }
                        }
                    </div>
                </div>

                <div class="review-block">
                    <h4>{ "Internal Processing" }</h4>
                    <textarea
                        class="form-input"
                        rows="4"
                        placeholder="Administrative notes for this member..."
                        value={component.comment.clone()}
                        oninput={on_comment}
                    />
                </div>

                <div class="sheet-actions">
                    <button
                        class="secondary-btn"
                        disabled={component.downloading}
                        onclick={link.callback(|_| Msg::DownloadPdf)}
                    >
                        { if component.downloading { "Preparing..." } else { "Download PDF" } }
                    </button>
                    if submission.status != SubmissionStatus::Rejected {
                        <button
                            class="danger-btn"
                            disabled={busy}
                            onclick={link.callback(|_| Msg::SetStatus(SubmissionStatus::Rejected))}
                        >
                            { "Reject" }
                        </button>
                    }
                    if submission.status != SubmissionStatus::Approved {
                        <button
                            class="primary-btn"
                            disabled={busy}
                            onclick={link.callback(|_| Msg::SetStatus(SubmissionStatus::Approved))}
                        >
                            { "Approve Member" }
                        </button>
                    }
                </div>
            </div>
        </YwMaterialTopSheet>
    }
}
