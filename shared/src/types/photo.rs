use serde::{Deserialize, Serialize};

use crate::types::tag::Tag;

/// Most tags the backend accepts on a single upload.
pub const MAX_UPLOAD_TAGS: usize = 5;

// ---------------------------------------------------------------------------
// Photo records
// ---------------------------------------------------------------------------

/// A photo as returned by `/api/photos/*`.
///
/// Every field except `id` is optional on the wire; absent values decode to
/// their empty form so renderers can degrade to blank output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Average vote, `None` until the photo received at least one rating.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Response of the transform endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedPhoto {
    pub transformed_url: String,
}

/// One vote on a photo, as listed for moderators by
/// `GET /api/photos/{id}/rating`. `id` is the photo, `like_id` the vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub like_id: i64,
    pub like_value: u8,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

/// A shareable link to a transformed photo and its QR code image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoTransfer {
    pub id: i64,
    #[serde(default)]
    pub image: String,
    pub link_url: String,
    #[serde(default)]
    pub link_qr: Option<String>,
    pub photo_id: i64,
}

// ---------------------------------------------------------------------------
// Search / listing queries
// ---------------------------------------------------------------------------

/// Filters for `GET /api/photos/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoSearch {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub keyword: Option<String>,
    pub tag_id: Option<i64>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
}

impl PhotoSearch {
    /// URL-encoded query string, without the leading `?`. Unset filters are
    /// left out so the server applies its own defaults.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        if let Some(keyword) = self.keyword.as_deref().filter(|k| !k.is_empty()) {
            query.append_pair("keyword", keyword);
        }
        if let Some(tag_id) = self.tag_id {
            query.append_pair("tag_id", &tag_id.to_string());
        }
        if let Some(min) = self.min_rating {
            query.append_pair("min_rating", &min.to_string());
        }
        if let Some(max) = self.max_rating {
            query.append_pair("max_rating", &max.to_string());
        }
        query.finish()
    }
}

/// Parameters for `GET /api/photos/{id}/transform`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub width: u32,
    pub height: u32,
    pub crop: String,
    pub angle: i32,
    pub effect: Option<String>,
    pub quality: Option<u32>,
    pub format: Option<String>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            crop: "fill".to_string(),
            angle: 0,
            effect: None,
            quality: None,
            format: None,
        }
    }
}

impl TransformOptions {
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("width", &self.width.to_string())
            .append_pair("height", &self.height.to_string())
            .append_pair("crop", &self.crop)
            .append_pair("angle", &self.angle.to_string());
        if let Some(effect) = &self.effect {
            query.append_pair("effect", effect);
        }
        if let Some(quality) = self.quality {
            query.append_pair("quality", &quality.to_string());
        }
        if let Some(format) = &self.format {
            query.append_pair("format", format);
        }
        query.finish()
    }
}

// ---------------------------------------------------------------------------
// Upload form
// ---------------------------------------------------------------------------

/// Fields of the photo upload form.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub description: String,
    pub tags: Vec<String>,
    pub file_name: String,
    pub content_type: String,
    pub file: Vec<u8>,
}

impl PhotoUpload {
    /// Split a comma separated tag field into trimmed, non-empty names.
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The `tags` multipart field: names joined with commas, as the backend
    /// splits them on `,`.
    pub fn tags_field(&self) -> String {
        self.tags.join(",")
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        if self.file.is_empty() {
            return Err(UploadError::MissingFile);
        }
        if self.tags.len() > MAX_UPLOAD_TAGS {
            return Err(UploadError::TooManyTags(self.tags.len()));
        }
        Ok(())
    }
}

/// Client-side upload form errors.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadError {
    MissingFile,
    TooManyTags(usize),
    Rejected(String),
}

impl UploadError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::TooManyTags(_) => "TOO_MANY_TAGS",
            Self::Rejected(_) => "REJECTED",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::MissingFile => "Please choose a file to upload".to_string(),
            Self::TooManyTags(_) => format!("You can add up to {} tags.", MAX_UPLOAD_TAGS),
            Self::Rejected(detail) => detail.clone(),
        }
    }
}
