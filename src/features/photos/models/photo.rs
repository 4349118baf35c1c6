use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Metadata record for one uploaded image
///
/// `id` is assigned once at creation and never changes; `uri` is the
/// public-facing path derived from it. `label` is present only when label
/// detection ran at upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Photo {
    /// Unique identifier, primary key
    pub id: String,
    /// Public-facing relative path to the stored image
    pub uri: String,
    /// Space-joined ranked label descriptions
    #[serde(default)]
    pub label: Option<String>,
}
