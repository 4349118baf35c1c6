mod photo_dto;

pub use photo_dto::{UploadImageDto, MAX_UPLOAD_SIZE};
