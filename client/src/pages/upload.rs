use std::path::Path;

use shared::types::{AvatarUpload, PhotoUpload, UploadError};
use tracing::{info, warn};

use super::{FormOutcome, PageContext, PageState, guard_state, page_view, settle_form};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::navigation::Location;
use crate::render::FormMessage;
use crate::transport::Transport;
use crate::view::Node;

/// Photo upload form (guarded).
pub struct UploadPage<T: Transport> {
    ctx: PageContext,
    api: Option<ApiClient<T>>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
}

impl<T: Transport> UploadPage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        let api = ctx.authenticate(transport);
        let state = match guard_state(&api) {
            PageState::Loading => PageState::Idle,
            other => other,
        };
        Self {
            state,
            banner: ctx.banner(),
            message: None,
            ctx,
            api,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn view(&self) -> Node {
        page_view("upload", self.banner.as_ref(), self.message.as_ref(), &[])
    }

    pub async fn submit(&mut self, upload: &PhotoUpload) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.try_upload(upload).await;
        let result = settle_form(&mut self.state, result);
        if let Ok(FormOutcome::Message(message)) = &result {
            self.message = Some(message.clone());
        }
        result
    }

    async fn try_upload(&self, upload: &PhotoUpload) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        if let Err(e) = upload.validate() {
            warn!("Upload form invalid: {}", e.to_code());
            return Ok(FormOutcome::Message(FormMessage::error(e.to_message())));
        }

        match api.upload_photo(upload).await? {
            Fetched::Ok(photo) => {
                info!("Uploaded photo {}", photo.id);
                let home = Location::new(&self.ctx.config.pages.home);
                Ok(FormOutcome::Navigated(self.ctx.navigate(home)))
            }
            Fetched::Failure { message, .. } => {
                let error = UploadError::Rejected(
                    message.unwrap_or_else(|| "Upload failed".to_string()),
                );
                warn!("Upload refused: {}", error.to_code());
                Ok(FormOutcome::Message(FormMessage::error(error.to_message())))
            }
            Fetched::Unauthorized => Ok(FormOutcome::Navigated(self.ctx.login_page())),
        }
    }
}

/// Build an upload from a file on disk. `tags` is the comma separated form
/// field.
pub async fn read_upload(
    path: &Path,
    description: &str,
    tags: &str,
) -> Result<PhotoUpload, ClientError> {
    let (file_name, file) = read_file(path).await?;
    Ok(PhotoUpload {
        description: description.to_string(),
        tags: PhotoUpload::parse_tags(tags),
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        file,
    })
}

/// Build an avatar upload from an image on disk.
pub async fn read_avatar(path: &Path) -> Result<AvatarUpload, ClientError> {
    let (file_name, file) = read_file(path).await?;
    Ok(AvatarUpload {
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        file,
    })
}

async fn read_file(path: &Path) -> Result<(String, Vec<u8>), ClientError> {
    let file = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok((file_name, file))
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
