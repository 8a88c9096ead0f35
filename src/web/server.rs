use std::{
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    extract::{
        multipart::MultipartRejection,
        DefaultBodyLimit,
        Multipart,
        State,
    },
    http::StatusCode,
    response::{
        Html,
        IntoResponse,
        Response,
    },
    routing::{
        get,
        post,
    },
    Json,
    Router,
};
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;

use super::{
    page,
    types::UploadResponse,
};
use crate::{
    core::{
        pipeline,
        WordflashError,
    },
    settings::Settings,
};

const FILE_FIELD: &str = "file";

pub struct AppState {
    upload_dir: PathBuf,
    page: String,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            upload_dir: settings.upload_dir.clone(),
            page: page::render(settings.reveal_interval_ms),
        }
    }
}

pub fn router(settings: &Settings) -> Router {
    let state = Arc::new(AppState::new(settings));

    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.max_upload_bytes))
        .with_state(state)
}

/// Binds `listener` and serves until the process is stopped.
pub async fn serve_on(listener: TcpListener, settings: &Settings) -> Result<(), WordflashError> {
    let addr: SocketAddr = listener.local_addr()?;
    log::info!("[Server] Flashcards available at http://{}/", addr);
    log::info!("[Server] Uploads are stored in {:?}", settings.upload_dir);

    axum::serve(listener, router(settings)).await?;
    Ok(())
}

pub async fn serve(settings: &Settings) -> Result<(), WordflashError> {
    let listener = TcpListener::bind(settings.bind_addr()).await.map_err(|e| {
        WordflashError::Custom(format!("Failed to bind to {}: {}", settings.bind_addr(), e))
    })?;
    serve_on(listener, settings).await
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(mut multipart) = multipart else {
        return Json(UploadResponse::from(WordflashError::MissingFile)).into_response();
    };

    let (filename, contents) = loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Json(UploadResponse::from(WordflashError::MissingFile)).into_response();
            }
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return (e.status(), e.body_text()).into_response();
            }
            Err(e) => {
                log::debug!("[Upload] Malformed multipart body: {}", e);
                return Json(UploadResponse::from(WordflashError::MissingFile)).into_response();
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // A part without a filename is a plain form value, not a file
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        match field.bytes().await {
            Ok(bytes) => break (filename, bytes),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return (e.status(), e.body_text()).into_response();
            }
            Err(e) => {
                let error = WordflashError::Parse(e.body_text());
                return Json(UploadResponse::from(error)).into_response();
            }
        }
    };

    if filename.is_empty() {
        return Json(UploadResponse::from(WordflashError::EmptyFilename)).into_response();
    }

    let upload_dir = state.upload_dir.clone();
    let result = tokio::task::spawn_blocking(move || {
        pipeline::process_upload(&upload_dir, &filename, &contents)
    })
    .await
    .map_err(|e| WordflashError::Custom(format!("Upload task failed: {}", e)))
    .and_then(|result| result);

    let response = match result {
        Ok(deck) => UploadResponse::from(&deck),
        Err(e) => {
            log::debug!("[Upload] Rejected: {}", e);
            UploadResponse::from(e)
        }
    };

    Json(response).into_response()
}
