/**
 * Upload Routes
 * Featured-image uploads into the blog-images bucket
 */
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::Session;
use crate::blog::editor::upload_featured_image;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::image::{self, ImageFile};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

/// Pull the first file part out of a multipart body.
pub async fn read_image(multipart: &mut Multipart) -> Result<ImageFile, AppError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(AppError::Validation("No file provided".to_string())),
            Err(e) => {
                tracing::error!("Multipart error: {}", e);
                return Err(AppError::Validation("Invalid multipart data".to_string()));
            }
        };

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read upload: {}", e);
            AppError::Validation("Failed to read file".to_string())
        })?;

        return Ok(ImageFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
}

/// POST /api/admin/uploads - Store an image and return its public URL
pub async fn upload_image(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_image(&mut multipart).await?;
    let mime_type = image::validate(&file)?;
    let url = upload_featured_image(state.storage.as_ref(), &session, &file).await?;

    tracing::info!(url = %url, size = file.bytes.len(), "Image uploaded");

    Ok(Json(UploadResponse {
        filename: url.rsplit('/').next().unwrap_or_default().to_string(),
        url,
        size: file.bytes.len(),
        mime_type: mime_type.to_string(),
    }))
}
