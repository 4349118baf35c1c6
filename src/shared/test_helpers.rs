#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::photos::models::Photo;
#[cfg(test)]
use crate::features::photos::repository::PhotoRepository;
#[cfg(test)]
use crate::modules::storage::{ObjectStorage, StoredObject};
#[cfg(test)]
use crate::modules::vision::{LabelAnnotation, LabelDetector};

/// In-memory stand-in for the object storage bucket
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
}

#[cfg(test)]
#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::ExternalService(format!("No object under '{}'", key)))
    }
}

/// In-memory stand-in for the photo metadata store
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryPhotoRepository {
    photos: Mutex<HashMap<String, Photo>>,
}

#[cfg(test)]
#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn save(&self, photo: Photo) -> Result<Photo> {
        self.photos
            .lock()
            .unwrap()
            .insert(photo.id.clone(), photo.clone());
        Ok(photo)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Photo>> {
        Ok(self.photos.lock().unwrap().get(id).cloned())
    }
}

/// Label detector returning a fixed set of annotations
#[cfg(test)]
pub struct FixedLabelDetector {
    annotations: Vec<LabelAnnotation>,
}

#[cfg(test)]
impl FixedLabelDetector {
    pub fn new(annotations: Vec<(&str, f32)>) -> Self {
        Self {
            annotations: annotations
                .into_iter()
                .map(|(description, score)| LabelAnnotation {
                    description: description.to_string(),
                    score,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LabelDetector for FixedLabelDetector {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<LabelAnnotation>> {
        Ok(self.annotations.clone())
    }
}
