use shared::types::{Comment, NewComment, Photo, Rating, Tag, TransformOptions, User};
use tracing::{info, warn};

use super::home::author_of;
use super::{
    FormOutcome, PageContext, PageState, guard_state, page_view, settle_form, settle_load,
};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::navigation::Location;
use crate::render::{FormMessage, comment_list, photo_detail, share_link, vote_list};
use crate::transport::Transport;
use crate::view::{Container, Node};

pub const COMMENT_ADDED_MESSAGE: &str = "Comment added successfully.";
pub const PHOTO_DELETED_MESSAGE: &str = "Photo deleted.";
pub const MODERATORS_ONLY_MESSAGE: &str = "Only moderators and admins can do that.";

/// Detail page of one photo (`/templates/photo.html?id={id}`): the photo,
/// its author and tags, the comment thread and the rating, comment and
/// moderation forms.
pub struct PhotoPage<T: Transport> {
    ctx: PageContext,
    api: Option<ApiClient<T>>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
    photo_id: Option<i64>,
    photo: Option<Photo>,
    author: Option<User>,
    tags: Vec<Tag>,
    comments: Vec<Comment>,
    votes: Vec<Rating>,
    detail: Container,
    thread: Container,
    ratings: Container,
    share: Container,
}

impl<T: Transport> PhotoPage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        let api = ctx.authenticate(transport);
        Self {
            state: guard_state(&api),
            banner: ctx.banner(),
            message: None,
            photo_id: ctx.param("id"),
            photo: None,
            author: None,
            tags: Vec::new(),
            comments: Vec::new(),
            votes: Vec::new(),
            detail: Container::new("photo"),
            thread: Container::new("comments"),
            ratings: Container::new("ratings"),
            share: Container::new("share"),
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

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Individual votes, once a moderator has listed them.
    pub fn votes(&self) -> &[Rating] {
        &self.votes
    }

    pub fn view(&self) -> Node {
        page_view(
            "photo",
            self.banner.as_ref(),
            self.message.as_ref(),
            &[&self.detail, &self.thread, &self.ratings, &self.share],
        )
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        if self.api.is_none() {
            return Ok(());
        }
        let Some(photo_id) = self.photo_id else {
            warn!("Photo page opened without an id");
            self.state = PageState::Idle;
            return Ok(());
        };
        let result = self.fetch_all(photo_id).await;
        settle_load(&mut self.state, result)
    }

    async fn fetch_all(&mut self, photo_id: i64) -> Result<PageState, ClientError> {
        let Some(api) = &self.api else {
            return Ok(PageState::Redirected);
        };

        let photo = match api.photo(photo_id).await? {
            Fetched::Ok(photo) => photo,
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            Fetched::Failure { .. } => return Ok(PageState::Idle),
        };
        let author = match author_of(api, &photo).await? {
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            fetched => fetched.ok().flatten(),
        };
        let tags = match api.photo_tags(photo_id).await? {
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            fetched => fetched.ok().unwrap_or_else(|| photo.tags.clone()),
        };
        let comments = match api.comments_for_photo(photo_id).await? {
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            fetched => fetched.ok().unwrap_or_default(),
        };

        info!("Photo {} loaded with {} comments", photo_id, comments.len());
        self.photo = Some(photo);
        self.author = author;
        self.tags = tags;
        self.comments = comments;
        self.render_detail();
        self.render_comments();
        Ok(PageState::Rendered)
    }

    fn render_detail(&mut self) {
        if let Some(photo) = &self.photo {
            self.detail
                .replace([photo_detail(photo, self.author.as_ref(), &self.tags)]);
        }
    }

    fn render_comments(&mut self) {
        self.thread.replace([comment_list(&self.comments)]);
    }

    fn render_votes(&mut self) {
        self.ratings.replace([vote_list(&self.votes)]);
    }

    /// Refetch the photo after its votes changed.
    async fn reload_photo(&mut self, photo_id: i64) -> Result<Option<FormOutcome>, ClientError> {
        let Some(api) = &self.api else {
            return Ok(Some(FormOutcome::Navigated(self.ctx.login_page())));
        };
        match api.photo(photo_id).await? {
            Fetched::Ok(photo) => {
                self.photo = Some(photo);
                self.render_detail();
            }
            Fetched::Unauthorized => return Ok(Some(FormOutcome::Navigated(self.ctx.login_page()))),
            Fetched::Failure { .. } => warn!("Photo {} could not be reloaded", photo_id),
        }
        Ok(None)
    }

    /// `Ok(None)` when the current user is an admin or moderator, otherwise
    /// the outcome to show instead of sending the request.
    async fn require_moderator(&self) -> Result<Option<FormOutcome>, ClientError> {
        let Some(api) = &self.api else {
            return Ok(Some(FormOutcome::Navigated(self.ctx.login_page())));
        };
        match api.current_user().await? {
            Fetched::Ok(user) if user.is_moderator() => Ok(None),
            Fetched::Ok(user) => {
                warn!("{} ({}) is not a moderator", user.username, user.role);
                Ok(Some(FormOutcome::Message(FormMessage::error(
                    MODERATORS_ONLY_MESSAGE,
                ))))
            }
            other => Ok(Some(self.ctx.refused(other, "Could not load your profile."))),
        }
    }

    fn finish(
        &mut self,
        result: Result<FormOutcome, ClientError>,
    ) -> Result<FormOutcome, ClientError> {
        let result = settle_form(&mut self.state, result);
        if let Ok(FormOutcome::Message(message)) = &result {
            self.message = Some(message.clone());
        }
        result
    }

    // -----------------------------------------------------------------------
    // Forms
    // -----------------------------------------------------------------------

    /// Post a comment as the current user and append it to the thread.
    pub async fn submit_comment(&mut self, text: &str) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.post_comment(text).await;
        self.finish(result)
    }

    async fn post_comment(&mut self, text: &str) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        let Some(photo_id) = self.photo_id else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        if text.trim().is_empty() {
            return Ok(FormOutcome::Message(FormMessage::error(
                "Comment cannot be empty.",
            )));
        }

        let me = match api.current_user().await? {
            Fetched::Ok(user) => user,
            other => return Ok(self.ctx.refused(other, "Could not load your profile.")),
        };
        let comment = NewComment {
            text: text.to_string(),
            photo_id,
        };
        match api.post_comment(me.id, &comment).await? {
            Fetched::Ok(created) => {
                info!("Comment {} added to photo {}", created.id, photo_id);
                self.comments.push(created);
                self.render_comments();
                Ok(FormOutcome::Message(FormMessage::success(
                    COMMENT_ADDED_MESSAGE,
                )))
            }
            other => Ok(self.ctx.refused(other, "Could not add comment.")),
        }
    }

    /// Rate the photo; on success the detail view is re-rendered with the
    /// new average. Self-ratings and out-of-range values are refused by the
    /// server and its message is shown.
    pub async fn rate(&mut self, value: u8) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.submit_rating(value).await;
        self.finish(result)
    }

    async fn submit_rating(&mut self, value: u8) -> Result<FormOutcome, ClientError> {
        let (Some(api), Some(photo_id)) = (&self.api, self.photo_id) else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        match api.rate_photo(photo_id, value).await? {
            Fetched::Ok(()) => {}
            other => return Ok(self.ctx.refused(other, "Could not submit rating.")),
        }
        if let Some(outcome) = self.reload_photo(photo_id).await? {
            return Ok(outcome);
        }
        Ok(FormOutcome::Message(FormMessage::success("Rating submitted.")))
    }

    /// Replace the text of one of the current user's comments.
    pub async fn edit_comment(
        &mut self,
        comment_id: i64,
        text: &str,
    ) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.put_comment(comment_id, text).await;
        self.finish(result)
    }

    async fn put_comment(&mut self, comment_id: i64, text: &str) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        let me = match api.current_user().await? {
            Fetched::Ok(user) => user,
            other => return Ok(self.ctx.refused(other, "Could not load your profile.")),
        };
        match api.edit_comment(comment_id, me.id, text).await? {
            Fetched::Ok(updated) => {
                if let Some(slot) = self.comments.iter_mut().find(|c| c.id == updated.id) {
                    *slot = updated;
                }
                self.render_comments();
                Ok(FormOutcome::Message(FormMessage::success("Comment updated.")))
            }
            other => Ok(self.ctx.refused(other, "Could not update comment.")),
        }
    }

    /// Remove a comment. Admins and moderators only; for anyone else no
    /// request is sent.
    pub async fn delete_comment(&mut self, comment_id: i64) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.remove_comment(comment_id).await;
        self.finish(result)
    }

    async fn remove_comment(&mut self, comment_id: i64) -> Result<FormOutcome, ClientError> {
        if let Some(outcome) = self.require_moderator().await? {
            return Ok(outcome);
        }
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        match api.delete_comment(comment_id).await? {
            Fetched::Ok(()) => {
                self.comments.retain(|c| c.id != comment_id);
                self.render_comments();
                Ok(FormOutcome::Message(FormMessage::success("Comment deleted.")))
            }
            other => Ok(self.ctx.refused(other, "Could not delete comment.")),
        }
    }

    pub async fn update_description(&mut self, description: &str) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.put_description(description).await;
        self.finish(result)
    }

    async fn put_description(&mut self, description: &str) -> Result<FormOutcome, ClientError> {
        let (Some(api), Some(photo_id)) = (&self.api, self.photo_id) else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        match api.update_description(photo_id, description).await? {
            Fetched::Ok(photo) => {
                self.photo = Some(photo);
                self.render_detail();
                Ok(FormOutcome::Message(FormMessage::success("Description updated.")))
            }
            other => Ok(self.ctx.refused(other, "Could not update description.")),
        }
    }

    /// Delete the photo and return to the list.
    pub async fn delete_photo(&mut self) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.remove_photo().await;
        self.finish(result)
    }

    async fn remove_photo(&mut self) -> Result<FormOutcome, ClientError> {
        let (Some(api), Some(photo_id)) = (&self.api, self.photo_id) else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        match api.delete_photo(photo_id).await? {
            Fetched::Ok(()) => {
                info!("Photo {} deleted", photo_id);
                let home = Location::new(&self.ctx.config.pages.home)
                    .with_message(PHOTO_DELETED_MESSAGE);
                Ok(FormOutcome::Navigated(self.ctx.navigate(home)))
            }
            other => Ok(self.ctx.refused(other, "Could not delete photo.")),
        }
    }

    /// Ask the server for a transformed copy and show its URL.
    pub async fn transform(&mut self, options: &TransformOptions) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.request_transform(options).await;
        self.finish(result)
    }

    async fn request_transform(
        &mut self,
        options: &TransformOptions,
    ) -> Result<FormOutcome, ClientError> {
        let (Some(api), Some(photo_id)) = (&self.api, self.photo_id) else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        match api.transform_photo(photo_id, options).await? {
            Fetched::Ok(transformed) => Ok(FormOutcome::Message(FormMessage::success(format!(
                "Transformed image: {}",
                transformed.transformed_url
            )))),
            other => Ok(self.ctx.refused(other, "Could not transform photo.")),
        }
    }

    // -----------------------------------------------------------------------
    // Moderation
    // -----------------------------------------------------------------------

    /// List every vote on the photo.
    pub async fn view_ratings(&mut self) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.fetch_votes().await;
        self.finish(result)
    }

    async fn fetch_votes(&mut self) -> Result<FormOutcome, ClientError> {
        if let Some(outcome) = self.require_moderator().await? {
            return Ok(outcome);
        }
        let (Some(api), Some(photo_id)) = (&self.api, self.photo_id) else {
            return Ok(FormOutcome::Message(FormMessage::error("No photo selected.")));
        };
        match api.photo_ratings(photo_id).await? {
            Fetched::Ok(votes) => {
                let count = votes.len();
                self.votes = votes;
                self.render_votes();
                Ok(FormOutcome::Message(FormMessage::success(format!(
                    "{} ratings.",
                    count
                ))))
            }
            other => Ok(self.ctx.refused(other, "Could not load ratings.")),
        }
    }

    /// Remove one vote and show the new average.
    pub async fn delete_rating(&mut self, like_id: i64) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.remove_vote(like_id).await;
        self.finish(result)
    }

    async fn remove_vote(&mut self, like_id: i64) -> Result<FormOutcome, ClientError> {
        if let Some(outcome) = self.require_moderator().await? {
            return Ok(outcome);
        }
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        match api.delete_rating(like_id).await? {
            Fetched::Ok(()) => {}
            other => return Ok(self.ctx.refused(other, "Could not delete rating.")),
        }
        info!("Rating {} deleted", like_id);
        self.votes.retain(|v| v.like_id != like_id);
        self.render_votes();
        if let Some(photo_id) = self.photo_id {
            if let Some(outcome) = self.reload_photo(photo_id).await? {
                return Ok(outcome);
            }
        }
        Ok(FormOutcome::Message(FormMessage::success("Rating deleted.")))
    }

    /// Public link and QR code for a transformed copy of this photo.
    pub async fn share(&mut self, transfer_id: i64) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.request_qr_code(transfer_id).await;
        self.finish(result)
    }

    async fn request_qr_code(&mut self, transfer_id: i64) -> Result<FormOutcome, ClientError> {
        if let Some(outcome) = self.require_moderator().await? {
            return Ok(outcome);
        }
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        match api.create_qr_code(transfer_id).await? {
            Fetched::Ok(transfer) => {
                self.share.replace([share_link(&transfer)]);
                Ok(FormOutcome::Message(FormMessage::success(format!(
                    "Share link: {}",
                    transfer.link_url
                ))))
            }
            other => Ok(self.ctx.refused(other, "Could not create QR code.")),
        }
    }
}
