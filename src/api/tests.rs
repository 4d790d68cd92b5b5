//! End-to-end tests of the leave pages: session cookie, CSRF token and
//! in-memory SQLite wired exactly as in production.

use crate::{
    config::Config,
    db::memory_pool,
    model::leave_request::{LeaveRequest, LeaveStatus, LeaveType},
    routes::{self, SESSION_COOKIE},
};
use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web::Data};
use sqlx::SqlitePool;
use std::net::SocketAddr;

const PEER: &str = "127.0.0.1:40000";

/// Minimal browser: replays the session cookie and remembers updates.
#[derive(Default)]
struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    async fn send<S>(&mut self, app: &S, req: TestRequest) -> ServiceResponse
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let peer: SocketAddr = PEER.parse().unwrap();
        let mut req = req.peer_addr(peer);
        if let Some(cookie) = self.cookie.clone() {
            req = req.cookie(cookie);
        }

        let resp = actix_test::call_service(app, req.to_request()).await;
        if let Some(cookie) = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
        {
            self.cookie = Some(cookie.into_owned());
        }
        resp
    }

    async fn get<S>(&mut self, app: &S, uri: &str) -> (StatusCode, String)
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let resp = self.send(app, TestRequest::get().uri(uri)).await;
        let status = resp.status();
        let body = actix_test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn post<S>(&mut self, app: &S, uri: &str, form: &[(&str, &str)]) -> ServiceResponse
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        self.send(app, TestRequest::post().uri(uri).set_form(form))
            .await
    }

    /// Loads the add form and scrapes the hidden CSRF field.
    async fn csrf_token<S>(&mut self, app: &S) -> String
    where
        S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let (status, body) = self.get(app, "/add").await;
        assert_eq!(status, StatusCode::OK);

        let marker = r#"name="csrf_token" value=""#;
        let start = body.find(marker).expect("csrf field") + marker.len();
        let len = body[start..].find('"').expect("closing quote");
        body[start..start + len].to_string()
    }
}

fn test_app(
    pool: SqlitePool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app_with(pool, Config::for_tests())
}

fn test_app_with(
    pool: SqlitePool,
    config: Config,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(Data::new(pool))
        .configure(move |cfg| routes::configure(cfg, &config))
}

fn leave_form<'a>(csrf: &'a str, name: &'a str, start: &'a str, end: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("csrf_token", csrf),
        ("employee_name", name),
        ("email", "someone@company.com"),
        ("leave_type", "sick"),
        ("start_date", start),
        ("end_date", end),
        ("reason", "Doctor ordered bed rest"),
    ]
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn valid_submission_is_stored_and_listed_once_flashed() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    let resp = browser
        .post(&app, "/add", &leave_form(&csrf, "Alice Smith", "2026-02-02", "2026-02-04"))
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let stored = LeaveRequest::list(&pool).await.unwrap();
    assert_eq!(stored.len(), 1);
    let leave = &stored[0];
    assert_eq!(leave.employee_name, "Alice Smith");
    assert_eq!(leave.email, "someone@company.com");
    assert_eq!(leave.leave_type, LeaveType::Sick);
    assert_eq!(leave.start_date.to_string(), "2026-02-02");
    assert_eq!(leave.end_date.to_string(), "2026-02-04");
    assert_eq!(leave.reason, "Doctor ordered bed rest");
    assert_eq!(leave.status, LeaveStatus::Pending);

    let (status, body) = browser.get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Alice Smith"));
    assert!(body.contains("Leave request submitted!"));

    let (_, body) = browser.get(&app, "/").await;
    assert!(!body.contains("Leave request submitted!"), "flash shown twice");

    let (status, body) = browser.get(&app, &format!("/view/{}", leave.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Doctor ordered bed rest"));
}

#[actix_web::test]
async fn start_after_end_is_rejected_without_writing() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    let resp = browser
        .post(&app, "/add", &leave_form(&csrf, "Bob Jones", "2026-02-10", "2026-02-04"))
        .await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = String::from_utf8(actix_test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("End date cannot be before start date"));
    assert!(body.contains(r#"value="Bob Jones""#), "input not kept");

    assert!(LeaveRequest::list(&pool).await.unwrap().is_empty());
}

#[actix_web::test]
async fn post_without_csrf_token_is_forbidden() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    // session exists, token omitted
    browser.csrf_token(&app).await;
    let resp = browser
        .post(&app, "/add", &leave_form("", "Carol White", "2026-02-02", "2026-02-03"))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // token from another session
    let mut other = Browser::default();
    let foreign = other.csrf_token(&app).await;
    let resp = browser
        .post(&app, "/add", &leave_form(&foreign, "Carol White", "2026-02-02", "2026-02-03"))
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    assert!(LeaveRequest::list(&pool).await.unwrap().is_empty());
}

#[actix_web::test]
async fn editing_unknown_id_is_not_found_and_changes_nothing() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    browser
        .post(&app, "/add", &leave_form(&csrf, "Dan Brown", "2026-03-01", "2026-03-01"))
        .await;
    let before = LeaveRequest::list(&pool).await.unwrap();

    let (status, _) = browser.get(&app, "/edit/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut form = leave_form(&csrf, "Someone Else", "2026-03-01", "2026-03-02");
    form.push(("status", "approved"));
    let resp = browser.post(&app, "/edit/999", &form).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(LeaveRequest::list(&pool).await.unwrap(), before);
}

#[actix_web::test]
async fn edit_updates_fields_and_status() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    browser
        .post(&app, "/add", &leave_form(&csrf, "Eve Adams", "2026-04-01", "2026-04-03"))
        .await;
    let id = LeaveRequest::list(&pool).await.unwrap()[0].id;

    let (status, body) = browser.get(&app, &format!("/edit/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="Eve Adams""#));

    let mut form = leave_form(&csrf, "Eve Adams", "2026-04-01", "2026-04-05");
    form.push(("status", "approved"));
    let resp = browser.post(&app, &format!("/edit/{id}"), &form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let leave = LeaveRequest::get(&pool, id).await.unwrap();
    assert_eq!(leave.status, LeaveStatus::Approved);
    assert_eq!(leave.end_date.to_string(), "2026-04-05");

    let (_, body) = browser.get(&app, "/").await;
    assert!(body.contains("Leave updated!"));
}

#[actix_web::test]
async fn invalid_edit_is_rerendered_and_record_kept() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    browser
        .post(&app, "/add", &leave_form(&csrf, "Fay Green", "2026-04-01", "2026-04-03"))
        .await;
    let original = LeaveRequest::list(&pool).await.unwrap().remove(0);

    let mut form = leave_form(&csrf, "Fay Green", "2026-04-09", "2026-04-03");
    form.push(("status", "archived"));
    let resp = browser.post(&app, &format!("/edit/{}", original.id), &form).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(LeaveRequest::get(&pool, original.id).await.unwrap(), original);
}

#[actix_web::test]
async fn deleted_record_is_no_longer_found() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    browser
        .post(&app, "/add", &leave_form(&csrf, "Gus Hill", "2026-05-01", "2026-05-02"))
        .await;
    let id = LeaveRequest::list(&pool).await.unwrap()[0].id;

    let resp = browser
        .post(&app, &format!("/delete/{id}"), &[("csrf_token", csrf.as_str())])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let (status, _) = browser.get(&app, &format!("/view/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let resp = browser
        .post(&app, &format!("/delete/{id}"), &[("csrf_token", csrf.as_str())])
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn listing_after_n_creates_shows_exactly_n() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    let names = ["Hana Ito", "Ian Kerr", "Jon Lee"];
    for name in names {
        let resp = browser
            .post(&app, "/add", &leave_form(&csrf, name, "2026-06-01", "2026-06-02"))
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let (_, body) = browser.get(&app, "/").await;
    assert_eq!(body.matches(r#"href="/view/"#).count(), names.len());
    for name in names {
        assert!(body.contains(name));
    }

    let stored = LeaveRequest::list(&pool).await.unwrap();
    assert_eq!(stored.len(), names.len());
    for leave in &stored {
        assert!(names.contains(&leave.employee_name.as_str()));
        assert_eq!(leave.leave_type, LeaveType::Sick);
    }
}

#[actix_web::test]
async fn non_numeric_id_is_not_found() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    for uri in ["/view/abc", "/edit/abc", "/edit/1.5"] {
        let (status, _) = browser.get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");
    }

    // a valid token, so only the path can be at fault
    let csrf = browser.csrf_token(&app).await;
    let mut form = leave_form(&csrf, "Kim Moss", "2026-07-01", "2026-07-02");
    form.push(("status", "approved"));
    let resp = browser.post(&app, "/edit/abc", &form).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = browser
        .post(&app, "/delete/abc", &[("csrf_token", csrf.as_str())])
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert!(LeaveRequest::list(&pool).await.unwrap().is_empty());
}

#[actix_web::test]
async fn edit_and_delete_need_the_session_token() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();

    let csrf = browser.csrf_token(&app).await;
    browser
        .post(&app, "/add", &leave_form(&csrf, "Lea Nash", "2026-08-03", "2026-08-04"))
        .await;
    let original = LeaveRequest::list(&pool).await.unwrap().remove(0);
    let edit_uri = format!("/edit/{}", original.id);
    let delete_uri = format!("/delete/{}", original.id);

    let mut other = Browser::default();
    let foreign = other.csrf_token(&app).await;

    for token in ["", foreign.as_str()] {
        let mut form = leave_form(token, "Lea Nash", "2026-08-03", "2026-08-09");
        form.push(("status", "approved"));
        let resp = browser.post(&app, &edit_uri, &form).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "edit with {token:?}");

        let resp = browser.post(&app, &delete_uri, &[("csrf_token", token)]).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "delete with {token:?}");
    }

    // missing field entirely
    let no_fields: [(&str, &str); 0] = [];
    let resp = browser.post(&app, &delete_uri, &no_fields).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    assert_eq!(LeaveRequest::get(&pool, original.id).await.unwrap(), original);
}

#[actix_web::test]
async fn limiter_throttles_leave_pages_but_not_health() {
    let pool = memory_pool().await;
    let config = Config {
        rate_per_min: 1,
        ..Config::for_tests()
    };
    let app = actix_test::init_service(test_app_with(pool.clone(), config)).await;
    let mut browser = Browser::default();

    let (status, _) = browser.get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = browser.get(&app, "/").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    let (status, _) = browser.get(&app, "/add").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..5 {
        let (status, _) = browser.get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[actix_web::test]
async fn health_is_ok_even_with_datastore_closed() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    pool.close().await;

    let req = TestRequest::get().uri("/health").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );

    let body: serde_json::Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn datastore_failure_is_a_generic_500() {
    let pool = memory_pool().await;
    let app = actix_test::init_service(test_app(pool.clone())).await;
    let mut browser = Browser::default();
    pool.close().await;

    let (status, body) = browser.get(&app, "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Something went wrong"));
}
