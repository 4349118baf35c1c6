use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::photos::dtos::UploadImageDto;
use crate::features::photos::models::Photo;
use crate::features::photos::services::PhotoService;
use crate::shared::types::ApiResponse;

/// Save a caller-supplied photo record
///
/// The record is persisted exactly as submitted; the caller controls all
/// fields, including the id.
#[utoipa::path(
    post,
    path = "/photo",
    tag = "photos",
    request_body = Photo,
    responses(
        (status = 201, description = "Record saved", body = ApiResponse<Photo>),
        (status = 400, description = "Malformed JSON body")
    )
)]
pub async fn create_photo(
    State(service): State<Arc<PhotoService>>,
    Json(photo): Json<Photo>,
) -> Result<(StatusCode, Json<ApiResponse<Photo>>), AppError> {
    let saved = service.create(photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(saved), None)),
    ))
}

/// Fetch a photo record by id
#[utoipa::path(
    get,
    path = "/photo/{id}",
    tag = "photos",
    params(("id" = String, Path, description = "Photo id")),
    responses(
        (status = 200, description = "The photo record", body = Photo),
        (status = 404, description = "No record with this id")
    )
)]
pub async fn get_photo(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<String>,
) -> Result<Json<Photo>, AppError> {
    let photo = service
        .get_photo(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No photo with id '{}'", id)))?;

    Ok(Json(photo))
}

/// Upload an image
///
/// Accepts multipart/form-data with a `file` field, stores the bytes,
/// optionally runs label detection, and returns the persisted record.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "photos",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Multipart form with the image under the `file` field",
    ),
    responses(
        (status = 200, description = "Image uploaded", body = Photo),
        (status = 400, description = "Missing file field or malformed multipart data"),
        (status = 502, description = "A backing service failed")
    )
)]
pub async fn upload_image(
    State(service): State<Arc<PhotoService>>,
    mut multipart: Multipart,
) -> Result<Json<Photo>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                file_data = Some(data.to_vec());
                content_type = Some(ct);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let content_type =
        content_type.ok_or_else(|| AppError::BadRequest("Content type is required".to_string()))?;

    let photo = service.upload(file_data, &content_type).await?;

    Ok(Json(photo))
}

/// Serve the stored image bytes for an id
#[utoipa::path(
    get,
    path = "/image/{id}",
    tag = "photos",
    params(("id" = String, Path, description = "Photo id")),
    responses(
        (status = 200, description = "The image bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 404, description = "No image with this id")
    )
)]
pub async fn get_image(
    State(service): State<Arc<PhotoService>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match service.fetch_image(&id).await? {
        Some(object) => Ok((
            [(header::CONTENT_TYPE, object.content_type)],
            object.data,
        )
            .into_response()),
        // Absent id is the one explicitly handled error: 404, empty body
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}
