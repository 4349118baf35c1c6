use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::photos::dtos::MAX_UPLOAD_SIZE;
use crate::features::photos::handlers::{create_photo, get_image, get_photo, upload_image};
use crate::features::photos::services::PhotoService;

/// Create routes for the photos feature
pub fn routes(photo_service: Arc<PhotoService>) -> Router {
    Router::new()
        .route("/photo", post(create_photo))
        .route("/photo/{id}", get(get_photo))
        .route(
            "/upload",
            // Allow body size up to MAX_UPLOAD_SIZE + buffer for multipart overhead
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 1024 * 1024)),
        )
        .route("/image/{id}", get(get_image))
        .with_state(photo_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::photos::models::Photo;
    use crate::modules::vision::LabelDetector;
    use crate::shared::test_helpers::{
        FixedLabelDetector, InMemoryPhotoRepository, InMemoryStorage,
    };
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn test_server(labels: Option<Arc<dyn LabelDetector>>) -> TestServer {
        let service = Arc::new(PhotoService::new(
            Arc::new(InMemoryPhotoRepository::default()),
            Arc::new(InMemoryStorage::default()),
            labels,
        ));
        TestServer::new(routes(service)).unwrap()
    }

    fn upload_form(bytes: Vec<u8>, content_type: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(bytes)
                .file_name("photo.png")
                .mime_type(content_type),
        )
    }

    #[tokio::test]
    async fn test_upload_then_retrieve_same_bytes() {
        let server = test_server(None);
        let bytes = b"0123456789".to_vec();

        let response = server
            .post("/upload")
            .multipart(upload_form(bytes.clone(), "image/png"))
            .await;
        response.assert_status_ok();

        let photo: Photo = response.json();
        assert!(!photo.id.is_empty());
        assert_eq!(photo.uri, format!("/images/{}", photo.id));

        let image = server.get(&format!("/image/{}", photo.id)).await;
        image.assert_status_ok();
        assert_eq!(image.as_bytes().as_ref(), bytes.as_slice());
        assert_eq!(
            image.headers().get("content-type").unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_get_unknown_image_is_404_with_empty_body() {
        let server = test_server(None);

        let response = server.get("/image/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.as_bytes().is_empty());
    }

    #[tokio::test]
    async fn test_upload_with_labels_returns_ranked_label() {
        let detector = FixedLabelDetector::new(vec![
            ("water", 0.55),
            ("sky", 0.97),
            ("cloud", 0.81),
        ]);
        let server = test_server(Some(Arc::new(detector)));

        let response = server
            .post("/upload")
            .multipart(upload_form(vec![1, 2, 3, 4], "image/jpeg"))
            .await;
        response.assert_status_ok();

        let photo: Photo = response.json();
        assert_eq!(photo.label.as_deref(), Some("sky cloud water"));
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_bad_request() {
        let server = test_server(None);
        let form = MultipartForm::new().add_text("note", "no file here");

        let response = server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_then_fetch_round_trips_record() {
        let server = test_server(None);
        let photo = Photo {
            id: "client-chosen".to_string(),
            uri: "/images/client-chosen".to_string(),
            label: Some("cat whiskers".to_string()),
        };

        let created = server.post("/photo").json(&photo).await;
        created.assert_status(StatusCode::CREATED);

        let fetched = server.get("/photo/client-chosen").await;
        fetched.assert_status_ok();
        assert_eq!(fetched.json::<Photo>(), photo);
    }

    #[tokio::test]
    async fn test_fetch_unknown_photo_record_is_404() {
        let server = test_server(None);

        let response = server.get("/photo/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
