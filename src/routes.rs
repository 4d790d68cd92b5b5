use crate::{
    api::{health, leave_request},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::SameSite;
use actix_web::web;

pub const SESSION_COOKIE: &str = "leavetrack_session";

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / u64::from(requests_per_min);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

fn build_session(config: &Config) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), config.session_key())
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_path("/".to_string())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Liveness stays outside the limiter and the session
    cfg.service(web::resource("/health").route(web::get().to(health::health)));

    cfg.service(
        web::scope("")
            .wrap(build_session(config))
            .wrap(build_limiter(config.rate_per_min))
            // /
            .service(web::resource("/").route(web::get().to(leave_request::leave_list)))
            // /add
            .service(
                web::resource("/add")
                    .route(web::get().to(leave_request::add_form))
                    .route(web::post().to(leave_request::create_leave)),
            )
            // /view/{leave_id}
            .service(
                web::resource("/view/{leave_id}").route(web::get().to(leave_request::view_leave)),
            )
            // /edit/{leave_id}
            .service(
                web::resource("/edit/{leave_id}")
                    .route(web::get().to(leave_request::edit_form))
                    .route(web::post().to(leave_request::update_leave)),
            )
            // /delete/{leave_id}
            .service(
                web::resource("/delete/{leave_id}")
                    .route(web::post().to(leave_request::delete_leave)),
            ),
    );
}
