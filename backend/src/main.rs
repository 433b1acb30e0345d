mod config;
mod services;

use crate::config::Config;
use crate::services::admin::AdminSessions;
use crate::services::documents::DocumentEngine;
use crate::services::submissions::store::SubmissionStore;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use env_logger::Env;
use include_dir::{include_dir, Dir};
use log::{info, warn};
use mime_guess::from_path;
use std::thread;
use std::time::Duration;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let file_path = if path.is_empty() { "index.html" } else { path };

    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => match STATIC_DIR.get_file("index.html") {
            Some(index) => HttpResponse::Ok()
                .content_type("text/html; charset=utf-8")
                .body(index.contents().to_vec()),
            None => HttpResponse::NotFound().body("Not Found"),
        },
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::from_env();
    let url = config.url();

    let store = SubmissionStore::open(&config.db_path).map_err(std::io::Error::other)?;
    info!("Submissions stored in {}", store.path().display());

    let engine = DocumentEngine::from_fonts_dir(&config.fonts_dir);
    let sessions = AdminSessions::new(config.admin_email.clone(), config.admin_password.clone());
    if !sessions.login_enabled() {
        warn!("HKF_ADMIN_PASSWORD is not set; the admin dashboard is disabled");
    }

    if config.open_browser {
        let browser_url = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&browser_url);
        });
    }

    info!("Server running at {}", url);

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(engine.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .service(services::submissions::configure_routes())
            .service(services::admin::configure_routes())
            .service(services::documents::configure_routes())
            .default_service(web::route().to(serve_embedded))
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
