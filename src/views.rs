//! Server-rendered HTML pages. All user-supplied text goes through
//! `html_escape` before it reaches the markup.

use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::utils::validation::{DATE_FORMAT, LeaveForm, ValidationErrors};
use actix_web::http::StatusCode;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;
use strum::IntoEnumIterator;

const APP_NAME: &str = "LeaveTrack-Pro";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .4rem; text-align: left; }
.flash { background: #e6f4ea; padding: .5rem; }
.errors { background: #fdecea; padding: .5rem; }
.field-error { display: block; color: #b02a37; }
.status-approved { color: #1e7e34; } .status-rejected { color: #b02a37; }
form.inline { display: inline; }
label { display: block; margin-top: .6rem; }
"#;

/// Which form is being rendered; decides action URL, heading and whether
/// the status selector appears.
#[derive(Debug, Clone, Copy)]
pub enum FormKind {
    Add,
    Edit(i64),
}

fn layout(title: &str, flashes: &[String], body: &str) -> String {
    let mut notices = String::new();
    for flash in flashes {
        let _ = write!(
            notices,
            r#"<p class="flash">{}</p>"#,
            text(flash)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - {APP_NAME}</title>
<style>{STYLE}</style>
</head>
<body>
<header><h1><a href="/">{APP_NAME}</a></h1></header>
{notices}
<main>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    )
}

fn csrf_field(csrf: &str) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        attr(csrf)
    )
}

fn delete_button(id: i64, csrf: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="/delete/{id}" onsubmit="return confirm('Delete this leave request?');">{}<button type="submit">Delete</button></form>"#,
        csrf_field(csrf)
    )
}

fn status_badge(status: LeaveStatus) -> String {
    format!(
        r#"<span class="status-{}">{}</span>"#,
        status,
        status.label()
    )
}

pub fn index(leaves: &[LeaveRequest], flashes: &[String], csrf: &str) -> String {
    let mut body = String::from(r#"<p><a href="/add">Apply for leave</a></p>"#);

    if leaves.is_empty() {
        body.push_str("<p>No leave requests yet.</p>");
        return layout("Leave requests", flashes, &body);
    }

    body.push_str(
        "<table><thead><tr><th>#</th><th>Employee</th><th>Type</th><th>From</th><th>To</th>\
         <th>Days</th><th>Status</th><th></th></tr></thead><tbody>",
    );
    for leave in leaves {
        let _ = write!(
            body,
            r#"<tr><td>{id}</td><td>{name}</td><td>{kind}</td><td>{start}</td><td>{end}</td><td>{days}</td><td>{status}</td><td><a href="/view/{id}">View</a> <a href="/edit/{id}">Edit</a> {delete}</td></tr>"#,
            id = leave.id,
            name = text(&leave.employee_name),
            kind = leave.leave_type.label(),
            start = leave.start_date.format(DATE_FORMAT),
            end = leave.end_date.format(DATE_FORMAT),
            days = leave.days(),
            status = status_badge(leave.status),
            delete = delete_button(leave.id, csrf),
        );
    }
    body.push_str("</tbody></table>");

    layout("Leave requests", flashes, &body)
}

pub fn detail(leave: &LeaveRequest, csrf: &str) -> String {
    let body = format!(
        r#"<h2>Leave request #{id}</h2>
<dl>
<dt>Employee</dt><dd>{name}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Type</dt><dd>{kind}</dd>
<dt>From</dt><dd>{start}</dd>
<dt>To</dt><dd>{end}</dd>
<dt>Days</dt><dd>{days}</dd>
<dt>Reason</dt><dd>{reason}</dd>
<dt>Status</dt><dd>{status}</dd>
<dt>Submitted</dt><dd>{created}</dd>
</dl>
<p><a href="/edit/{id}">Edit</a> {delete} <a href="/">Back</a></p>"#,
        id = leave.id,
        name = text(&leave.employee_name),
        email = text(&leave.email),
        kind = leave.leave_type.label(),
        start = leave.start_date.format(DATE_FORMAT),
        end = leave.end_date.format(DATE_FORMAT),
        days = leave.days(),
        reason = text(&leave.reason),
        status = status_badge(leave.status),
        created = leave.created_at.format("%Y-%m-%d %H:%M UTC"),
        delete = delete_button(leave.id, csrf),
    );

    layout(&format!("Leave #{}", leave.id), &[], &body)
}

pub fn leave_form(kind: FormKind, form: &LeaveForm, errors: &ValidationErrors, csrf: &str) -> String {
    let (heading, action, submit) = match kind {
        FormKind::Add => ("Apply for leave".to_string(), "/add".to_string(), "Submit"),
        FormKind::Edit(id) => (format!("Edit leave request #{id}"), format!("/edit/{id}"), "Save"),
    };

    let mut body = format!("<h2>{}</h2>", text(&heading));

    if !errors.is_empty() {
        let _ = write!(
            body,
            r#"<p class="errors">Please correct the {} problem(s) below.</p>"#,
            errors.len()
        );
    }

    let _ = write!(
        body,
        r#"<form method="post" action="{action}">
{csrf}
<label>Employee name <input type="text" name="employee_name" value="{name}"{name_invalid} required></label>{name_errors}
<label>Email <input type="email" name="email" value="{email}"{email_invalid} required></label>{email_errors}
<label>Leave type <select name="leave_type"{type_invalid} required>{types}</select></label>{type_errors}
<label>Start date <input type="date" name="start_date" value="{start}"{start_invalid} required></label>{start_errors}
<label>End date <input type="date" name="end_date" value="{end}"{end_invalid} required></label>{end_errors}
<label>Reason <textarea name="reason"{reason_invalid} required>{reason}</textarea></label>{reason_errors}
"#,
        action = attr(&action),
        csrf = csrf_field(csrf),
        name = attr(&form.employee_name),
        name_invalid = invalid_attr(errors, "employee_name"),
        name_errors = field_errors(errors, "employee_name"),
        email = attr(&form.email),
        email_invalid = invalid_attr(errors, "email"),
        email_errors = field_errors(errors, "email"),
        types = leave_type_options(&form.leave_type),
        type_invalid = invalid_attr(errors, "leave_type"),
        type_errors = field_errors(errors, "leave_type"),
        start = attr(&form.start_date),
        start_invalid = invalid_attr(errors, "start_date"),
        start_errors = field_errors(errors, "start_date"),
        end = attr(&form.end_date),
        end_invalid = invalid_attr(errors, "end_date"),
        end_errors = field_errors(errors, "end_date"),
        reason = text(&form.reason),
        reason_invalid = invalid_attr(errors, "reason"),
        reason_errors = field_errors(errors, "reason"),
    );

    if let FormKind::Edit(_) = kind {
        let _ = write!(
            body,
            r#"<label>Status <select name="status"{}>{}</select></label>{}
"#,
            invalid_attr(errors, "status"),
            status_options(&form.status),
            field_errors(errors, "status")
        );
    }

    let _ = write!(
        body,
        r#"<p><button type="submit">{submit}</button> <a href="/">Cancel</a></p>
</form>"#
    );

    layout(&heading, &[], &body)
}

fn invalid_attr(errors: &ValidationErrors, field: &str) -> &'static str {
    if errors.has(field) {
        r#" aria-invalid="true""#
    } else {
        ""
    }
}

/// Messages rendered directly under the offending input.
fn field_errors(errors: &ValidationErrors, field: &str) -> String {
    let mut out = String::new();
    for message in errors.messages_for(field) {
        let _ = write!(out, r#"<span class="field-error">{}</span>"#, text(message));
    }
    out
}

fn leave_type_options(selected: &str) -> String {
    let mut out = String::from(r#"<option value="">Select...</option>"#);
    for t in LeaveType::iter() {
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            t,
            selected_attr(t.as_ref(), selected),
            t.label()
        );
    }
    out
}

fn status_options(selected: &str) -> String {
    let mut out = String::new();
    for s in LeaveStatus::iter() {
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            s,
            selected_attr(s.as_ref(), selected),
            s.label()
        );
    }
    out
}

fn selected_attr(value: &str, selected: &str) -> &'static str {
    if value.eq_ignore_ascii_case(selected.trim()) {
        " selected"
    } else {
        ""
    }
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h2>{} {}</h2><p>{}</p><p><a href="/">Back to the list</a></p>"#,
        status.as_u16(),
        status.canonical_reason().unwrap_or(""),
        text(message)
    );
    layout(status.canonical_reason().unwrap_or("Error"), &[], &body)
}
