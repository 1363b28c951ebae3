use shared::types::{AvatarUpload, User};
use tracing::{info, warn};

use super::{FormOutcome, PageContext, PageState, guard_state, page_view, settle_form, settle_load};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::render::{FormMessage, photo_grid, user_card};
use crate::transport::Transport;
use crate::view::{Container, Node};

/// Profile page. Shows `?username=`, else `?id=`, else the current user,
/// followed by that user's photos.
pub struct UserPage<T: Transport> {
    ctx: PageContext,
    api: Option<ApiClient<T>>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
    user: Option<User>,
    profile: Container,
    photos: Container,
}

impl<T: Transport> UserPage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        let api = ctx.authenticate(transport);
        Self {
            state: guard_state(&api),
            banner: ctx.banner(),
            message: None,
            user: None,
            profile: Container::new("profile"),
            photos: Container::new("photos"),
            ctx,
            api,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn view(&self) -> Node {
        page_view(
            "user",
            self.banner.as_ref(),
            self.message.as_ref(),
            &[&self.profile, &self.photos],
        )
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        if self.api.is_none() {
            return Ok(());
        }
        let result = self.fetch_profile().await;
        settle_load(&mut self.state, result)
    }

    async fn fetch_profile(&mut self) -> Result<PageState, ClientError> {
        let Some(api) = &self.api else {
            return Ok(PageState::Redirected);
        };

        let own = self.ctx.location.param("username").is_none()
            && self.ctx.param::<i64>("id").is_none();
        let fetched = if let Some(username) = self.ctx.location.param("username") {
            api.user_by_username(username).await?
        } else if let Some(user_id) = self.ctx.param::<i64>("id") {
            api.user_by_id(user_id).await?
        } else {
            api.current_user().await?
        };
        let user = match fetched {
            Fetched::Ok(user) => user,
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            Fetched::Failure { .. } => return Ok(PageState::Idle),
        };

        let limit = self.ctx.config.api.photo_list_limit;
        let photos = if own {
            api.my_photos(limit, 0).await?
        } else {
            api.user_photos(user.id, limit, 0).await?
        };
        let photos = match photos {
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            fetched => fetched.ok().unwrap_or_default(),
        };

        info!("Profile of {} with {} photos", user.username, photos.len());
        self.profile.replace([user_card(&user)]);
        self.photos
            .replace(photo_grid(&photos, &self.ctx.config.pages.photo));
        self.user = Some(user);
        Ok(PageState::Rendered)
    }

    /// Replace the current user's avatar. The profile card is re-rendered
    /// when it shows that user.
    pub async fn update_avatar(&mut self, avatar: &AvatarUpload) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.upload_avatar(avatar).await;
        let result = settle_form(&mut self.state, result);
        if let Ok(FormOutcome::Message(message)) = &result {
            self.message = Some(message.clone());
        }
        result
    }

    async fn upload_avatar(&mut self, avatar: &AvatarUpload) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        if let Err(e) = avatar.validate() {
            warn!("Avatar form invalid: {}", e.to_code());
            return Ok(FormOutcome::Message(FormMessage::error(e.to_message())));
        }

        match api.update_avatar(avatar).await? {
            Fetched::Ok(updated) => {
                info!("Avatar of {} updated", updated.username);
                if self.user.as_ref().is_none_or(|u| u.id == updated.id) {
                    self.profile.replace([user_card(&updated)]);
                    self.user = Some(updated);
                }
                Ok(FormOutcome::Message(FormMessage::success("Avatar updated.")))
            }
            other => Ok(self.ctx.refused(other, "Could not update avatar.")),
        }
    }
}
