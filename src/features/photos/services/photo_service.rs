use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::models::Photo;
use crate::features::photos::repository::PhotoRepository;
use crate::modules::storage::{ObjectStorage, StoredObject};
use crate::modules::vision::{self, LabelDetector};

/// Key prefix for image objects in the bucket
const IMAGE_KEY_PREFIX: &str = "images";

/// Orchestrates the photo collaborators: object storage for the bytes, an
/// optional label detector, and the metadata repository.
pub struct PhotoService {
    repository: Arc<dyn PhotoRepository>,
    storage: Arc<dyn ObjectStorage>,
    labels: Option<Arc<dyn LabelDetector>>,
}

impl PhotoService {
    pub fn new(
        repository: Arc<dyn PhotoRepository>,
        storage: Arc<dyn ObjectStorage>,
        labels: Option<Arc<dyn LabelDetector>>,
    ) -> Self {
        Self {
            repository,
            storage,
            labels,
        }
    }

    fn object_key(id: &str) -> String {
        format!("{}/{}", IMAGE_KEY_PREFIX, id)
    }

    /// Upload one image: store the bytes, optionally detect labels, and
    /// persist the metadata record.
    ///
    /// The object write completes before anything else runs. A failure in a
    /// later step leaves the stored object behind; there is no compensating
    /// delete. Label detection failures propagate.
    pub async fn upload(&self, data: Vec<u8>, content_type: &str) -> Result<Photo> {
        let id = Uuid::new_v4().to_string();
        let key = Self::object_key(&id);

        self.storage.put(&key, &data, content_type).await?;
        debug!("Image stored: key={}, size={}", key, data.len());

        let label = match &self.labels {
            Some(detector) => {
                let annotations = detector.detect_labels(&data).await?;
                Some(vision::join_top_labels(annotations))
            }
            None => None,
        };

        let photo = Photo {
            uri: format!("/images/{}", id),
            id,
            label,
        };

        let saved = self.repository.save(photo).await?;
        info!("Photo uploaded: id={}, key={}", saved.id, key);

        Ok(saved)
    }

    /// Fetch the stored image bytes for an id, or `None` when no object
    /// exists under that id.
    pub async fn fetch_image(&self, id: &str) -> Result<Option<StoredObject>> {
        let key = Self::object_key(id);

        if !self.storage.exists(&key).await? {
            debug!("Image not found: key={}", key);
            return Ok(None);
        }

        let object = self.storage.get(&key).await?;
        Ok(Some(object))
    }

    /// Persist a caller-supplied record verbatim (upsert by id).
    pub async fn create(&self, photo: Photo) -> Result<Photo> {
        let saved = self.repository.save(photo).await?;
        info!("Photo record saved: id={}", saved.id);
        Ok(saved)
    }

    /// Look up a metadata record by id.
    pub async fn get_photo(&self, id: &str) -> Result<Option<Photo>> {
        self.repository.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::modules::vision::LabelAnnotation;
    use crate::shared::test_helpers::{
        FixedLabelDetector, InMemoryPhotoRepository, InMemoryStorage,
    };
    use async_trait::async_trait;

    fn service(labels: Option<Arc<dyn LabelDetector>>) -> PhotoService {
        PhotoService::new(
            Arc::new(InMemoryPhotoRepository::default()),
            Arc::new(InMemoryStorage::default()),
            labels,
        )
    }

    struct FailingLabelDetector;

    #[async_trait]
    impl LabelDetector for FailingLabelDetector {
        async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<LabelAnnotation>> {
            Err(AppError::ExternalService("label service down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_upload_round_trips_bytes() {
        let svc = service(None);
        let bytes = b"0123456789".to_vec();

        let photo = svc.upload(bytes.clone(), "image/png").await.unwrap();
        let object = svc.fetch_image(&photo.id).await.unwrap().unwrap();

        assert_eq!(object.data, bytes);
        assert_eq!(object.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_upload_derives_uri_from_id() {
        let svc = service(None);

        let photo = svc.upload(vec![1, 2, 3], "image/jpeg").await.unwrap();

        assert!(!photo.id.is_empty());
        assert_eq!(photo.uri, format!("/images/{}", photo.id));
    }

    #[tokio::test]
    async fn test_repeated_uploads_get_distinct_ids() {
        let svc = service(None);
        let mut ids = std::collections::HashSet::new();

        for _ in 0..50 {
            let photo = svc.upload(vec![0u8; 4], "image/png").await.unwrap();
            assert!(ids.insert(photo.id));
        }
    }

    #[tokio::test]
    async fn test_upload_without_detector_has_no_label() {
        let svc = service(None);

        let photo = svc.upload(vec![7; 16], "image/png").await.unwrap();

        assert_eq!(photo.label, None);
    }

    #[tokio::test]
    async fn test_upload_with_detector_joins_ranked_labels() {
        let detector = FixedLabelDetector::new(vec![
            ("tree", 0.42),
            ("sky", 0.97),
            ("cloud", 0.81),
        ]);
        let svc = service(Some(Arc::new(detector)));

        let photo = svc.upload(vec![9; 16], "image/png").await.unwrap();

        assert_eq!(photo.label.as_deref(), Some("sky cloud tree"));
    }

    #[tokio::test]
    async fn test_upload_label_capped_at_ten_tokens() {
        let annotations: Vec<(&str, f32)> = vec![
            ("a", 0.99),
            ("b", 0.95),
            ("c", 0.91),
            ("d", 0.88),
            ("e", 0.80),
            ("f", 0.75),
            ("g", 0.66),
            ("h", 0.61),
            ("i", 0.55),
            ("j", 0.50),
            ("k", 0.45),
            ("l", 0.40),
        ];
        let svc = service(Some(Arc::new(FixedLabelDetector::new(annotations))));

        let photo = svc.upload(vec![3; 8], "image/png").await.unwrap();

        let label = photo.label.unwrap();
        assert_eq!(label.split(' ').count(), 10);
        assert_eq!(label, "a b c d e f g h i j");
    }

    #[tokio::test]
    async fn test_upload_label_failure_propagates() {
        let svc = service(Some(Arc::new(FailingLabelDetector)));

        let result = svc.upload(vec![5; 8], "image/png").await;

        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_fetch_image_unknown_id_is_none() {
        let svc = service(None);

        let object = svc.fetch_image("does-not-exist").await.unwrap();

        assert!(object.is_none());
    }

    #[tokio::test]
    async fn test_create_persists_record_verbatim() {
        let svc = service(None);
        let photo = Photo {
            id: "custom-id".to_string(),
            uri: "/somewhere/else".to_string(),
            label: Some("hand written".to_string()),
        };

        let saved = svc.create(photo.clone()).await.unwrap();
        assert_eq!(saved, photo);

        let fetched = svc.get_photo("custom-id").await.unwrap().unwrap();
        assert_eq!(fetched, photo);
    }

    #[tokio::test]
    async fn test_create_overwrites_existing_id() {
        let svc = service(None);
        let first = Photo {
            id: "dup".to_string(),
            uri: "/images/dup".to_string(),
            label: None,
        };
        let second = Photo {
            label: Some("updated".to_string()),
            ..first.clone()
        };

        svc.create(first).await.unwrap();
        svc.create(second.clone()).await.unwrap();

        let fetched = svc.get_photo("dup").await.unwrap().unwrap();
        assert_eq!(fetched, second);
    }
}
