use utoipa::{Modify, OpenApi};

use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};
use crate::features::photos::models::Photo;
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        photos_handlers::create_photo,
        photos_handlers::get_photo,
        photos_handlers::upload_image,
        photos_handlers::get_image,
    ),
    components(schemas(Photo, photos_dtos::UploadImageDto, ApiResponse<Photo>)),
    tags(
        (name = "photos", description = "Photo upload, metadata, and retrieval endpoints")
    )
)]
pub struct ApiDoc;

pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
