//! Multipart image upload. Each file part is streamed straight to disk;
//! thumbnails are generated once every original has been written.

use crate::{errors::AppError, models::upload::StoredImage, state::AppState};
use axum::{
    Json,
    extract::{Multipart, State},
};
use futures::StreamExt;
use serde::Serialize;
use std::io;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<StoredImage>,
}

/// POST `/products/upload`
///
/// Accepts any number of file parts; parts without a filename are ignored.
/// Empty files are skipped and do not appear in the response. Originals and
/// thumbnails are on disk when this returns 200.
pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut stored = Vec::new();
    let mut received = 0usize;

    while let Some(field) = multipart.next_field().await? {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        received += 1;

        let chunks = field.map(|chunk| chunk.map_err(io::Error::other));
        if let Some(image) = state.uploads.store_original(&filename, chunks).await? {
            stored.push(image);
        }
    }

    state.uploads.generate_thumbnails(&stored).await?;
    info!("stored {} of {} uploaded files", stored.len(), received);

    Ok(Json(UploadResponse { files: stored }))
}
