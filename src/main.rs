mod classifier;
mod config;
mod error;
mod handlers;
mod models;
mod preprocess;
mod staging;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;

use crate::classifier::OnnxClassifier;
use crate::config::Settings;
use crate::handlers::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // No model, no server.
    let classifier = OnnxClassifier::load(&settings.model_path).map_err(|e| {
        log::error!("Failed to load model: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let upload_dir = staging::prepare_upload_dir(settings.upload_dir.clone())?;
    log::info!("Staging uploads in {}", upload_dir.display());

    let state = web::Data::new(AppState {
        classifier: Arc::new(classifier),
        upload_dir,
    });

    log::info!("Server running at http://{}:{}", settings.host, settings.port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    });
    if let Some(workers) = settings.workers {
        server = server.workers(workers);
    }

    server
        .bind((settings.host.clone(), settings.port))?
        .run()
        .await
}
