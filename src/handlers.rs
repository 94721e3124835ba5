use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Result};
use futures_util::StreamExt;
use serde_json::json;

use crate::classifier::{classify_file, Classifier};
use crate::error::PredictError;
use crate::models::{Prediction, BLOOD_GROUPS};
use crate::staging::StagedUpload;

const INDEX_HTML: &str = include_str!("../static/index.html");
const SCALAR_HTML: &str = include_str!("../static/scalar.html");

/// Name of the multipart field carrying the fingerprint image.
const FILE_FIELD: &str = "file";

pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub upload_dir: PathBuf,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/scalar").route(web::get().to(api_reference)))
        .service(web::resource("/openapi.json").route(web::get().to(openapi)));
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

pub async fn api_reference() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(SCALAR_HTML)
}

pub async fn openapi() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Blood Group Prediction API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Upload page",
                    "responses": { "200": { "description": "HTML upload form" } }
                }
            },
            "/predict": {
                "post": {
                    "summary": "Predict the blood group of a fingerprint image",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "multipart/form-data": {
                                "schema": {
                                    "type": "object",
                                    "required": [FILE_FIELD],
                                    "properties": {
                                        FILE_FIELD: { "type": "string", "format": "binary" }
                                    }
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Predicted blood group",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "predicted_blood_type": { "type": "string", "enum": BLOOD_GROUPS },
                                            "confidence": { "type": "number" }
                                        }
                                    }
                                }
                            }
                        },
                        "500": {
                            "description": "The image could not be processed",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": { "message": { "type": "string" } }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }))
}

pub async fn predict(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, PredictError> {
    match predict_upload(state, payload).await {
        Ok(prediction) => {
            log::info!(
                "Predicted blood group: {} ({:.4})",
                prediction.predicted_blood_type,
                prediction.confidence
            );
            Ok(HttpResponse::Ok().json(prediction))
        }
        Err(e) => {
            log::error!("Error during prediction: {}", e);
            Err(e)
        }
    }
}

async fn predict_upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<Prediction, PredictError> {
    let staged = stage_upload(&state.upload_dir, &mut payload).await?;
    log::debug!(
        "Staged {:?} at {}",
        staged.declared_name().unwrap_or("<unnamed>"),
        staged.path().display()
    );

    let classifier = Arc::clone(&state.classifier);
    web::block(move || -> Result<Prediction, PredictError> {
        let result = classify_file(classifier.as_ref(), staged.path());
        let removed = staged.close();
        let prediction = result?;
        removed?;
        Ok(prediction)
    })
    .await?
}

/// Writes the first `file` field to a fresh staging file, draining every other field.
async fn stage_upload(dir: &Path, payload: &mut Multipart) -> Result<StagedUpload, PredictError> {
    let mut staged: Option<StagedUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let disposition = field.content_disposition();
        let wanted = staged.is_none() && disposition.get_name() == Some(FILE_FIELD);

        if !wanted {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let declared_name = disposition.get_filename().map(str::to_owned);
        let dir = dir.to_path_buf();
        let mut upload =
            web::block(move || StagedUpload::create_in(&dir, declared_name)).await??;

        while let Some(chunk) = field.next().await {
            let data = chunk?;
            upload = web::block(move || upload.write_chunk(&data).map(|_| upload)).await??;
        }
        upload = web::block(move || upload.finish().map(|_| upload)).await??;

        staged = Some(upload);
    }

    staged.ok_or(PredictError::MissingFile)
}
