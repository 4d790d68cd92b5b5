use crate::error::AppError;
use crate::model::leave_request::LeaveRequest;
use crate::utils::validation::{FormMode, LeaveForm, ValidationErrors, validate};
use crate::utils::{csrf, flash};
use crate::views::{self, FormKind};
use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use utoipa::ToSchema;

/// Body of the delete button form.
#[derive(Deserialize, ToSchema)]
pub struct DeleteForm {
    #[serde(default)]
    pub csrf_token: String,
}

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn render_form(
    kind: FormKind,
    status: StatusCode,
    form: &LeaveForm,
    errors: &ValidationErrors,
    session: &Session,
) -> Result<HttpResponse, AppError> {
    let token = csrf::token(session)?;
    Ok(html(status, views::leave_form(kind, form, errors, &token)))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "All leave requests, newest first", content_type = "text/html", body = String),
        (status = 500, description = "Datastore failure")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<SqlitePool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let leaves = LeaveRequest::list(pool.get_ref()).await?;
    let flashes = flash::take(&session)?;
    let token = csrf::token(&session)?;

    debug!(count = leaves.len(), "Rendering leave list");
    Ok(html(StatusCode::OK, views::index(&leaves, &flashes, &token)))
}

/* =========================
Add leave request
========================= */
#[utoipa::path(
    get,
    path = "/add",
    responses(
        (status = 200, description = "Empty leave application form", content_type = "text/html", body = String)
    ),
    tag = "Leave"
)]
pub async fn add_form(session: Session) -> Result<HttpResponse, AppError> {
    render_form(
        FormKind::Add,
        StatusCode::OK,
        &LeaveForm::default(),
        &ValidationErrors::default(),
        &session,
    )
}

#[utoipa::path(
    post,
    path = "/add",
    request_body(
        content = LeaveForm,
        description = "Leave application form",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Created; redirects to the list"),
        (status = 403, description = "Missing or invalid CSRF token"),
        (status = 422, description = "Form re-rendered with validation messages", content_type = "text/html", body = String)
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    pool: web::Data<SqlitePool>,
    session: Session,
    form: web::Form<LeaveForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;

    let new_leave = match validate(&form, FormMode::Create) {
        Ok(leave) => leave,
        Err(errors) => {
            debug!(?errors, "Leave application rejected");
            return render_form(
                FormKind::Add,
                StatusCode::UNPROCESSABLE_ENTITY,
                &form,
                &errors,
                &session,
            );
        }
    };

    let leave_id = LeaveRequest::create(pool.get_ref(), &new_leave).await?;
    info!(leave_id, "Leave request submitted");

    flash::push(&session, "Leave request submitted!")?;
    Ok(redirect_home())
}

/* =========================
View leave request
========================= */
#[utoipa::path(
    get,
    path = "/view/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to show")
    ),
    responses(
        (status = 200, description = "Leave request details", content_type = "text/html", body = String),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn view_leave(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let leave = LeaveRequest::get(pool.get_ref(), path.into_inner()).await?;
    let token = csrf::token(&session)?;

    Ok(html(StatusCode::OK, views::detail(&leave, &token)))
}

/* =========================
Edit leave request
========================= */
#[utoipa::path(
    get,
    path = "/edit/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to edit")
    ),
    responses(
        (status = 200, description = "Edit form prefilled with the stored values", content_type = "text/html", body = String),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn edit_form(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let leave = LeaveRequest::get(pool.get_ref(), path.into_inner()).await?;

    render_form(
        FormKind::Edit(leave.id),
        StatusCode::OK,
        &LeaveForm::from(&leave),
        &ValidationErrors::default(),
        &session,
    )
}

/// Also how a manager approves or rejects: the edit form carries the status.
#[utoipa::path(
    post,
    path = "/edit/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to update")
    ),
    request_body(
        content = LeaveForm,
        description = "Edited leave fields including status",
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Updated; redirects to the list"),
        (status = 403, description = "Missing or invalid CSRF token"),
        (status = 404, description = "Leave request not found"),
        (status = 422, description = "Form re-rendered with validation messages", content_type = "text/html", body = String)
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<LeaveForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;

    let leave_id = path.into_inner();
    // unknown ids are a 404 even when the form is also invalid
    LeaveRequest::get(pool.get_ref(), leave_id).await?;

    let fields = match validate(&form, FormMode::Update) {
        Ok(fields) => fields,
        Err(errors) => {
            debug!(leave_id, ?errors, "Leave update rejected");
            return render_form(
                FormKind::Edit(leave_id),
                StatusCode::UNPROCESSABLE_ENTITY,
                &form,
                &errors,
                &session,
            );
        }
    };

    let updated = LeaveRequest::update(pool.get_ref(), leave_id, &fields).await?;
    info!(leave_id, status = %updated.status, "Leave request updated");

    flash::push(&session, "Leave updated!")?;
    Ok(redirect_home())
}

/* =========================
Delete leave request
========================= */
#[utoipa::path(
    post,
    path = "/delete/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to delete")
    ),
    request_body(
        content = DeleteForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Deleted; redirects to the list"),
        (status = 403, description = "Missing or invalid CSRF token"),
        (status = 404, description = "Leave request not found")
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    pool: web::Data<SqlitePool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<DeleteForm>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;

    let leave_id = path.into_inner();
    LeaveRequest::delete(pool.get_ref(), leave_id).await?;
    info!(leave_id, "Leave request deleted");

    flash::push(&session, "Leave deleted!")?;
    Ok(redirect_home())
}
