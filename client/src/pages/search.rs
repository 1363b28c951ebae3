use shared::types::{Photo, PhotoSearch, Tag};
use tracing::info;

use super::{FormOutcome, PageContext, PageState, guard_state, page_view, settle_form, settle_load};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::render::{FormMessage, photo_grid, tag_list};
use crate::transport::Transport;
use crate::view::{Container, Node};

/// Search results for the query parameters `keyword`, `tag_id`,
/// `min_rating`, `max_rating`, `limit` and `offset`, plus the tag cloud.
pub struct SearchPage<T: Transport> {
    ctx: PageContext,
    api: Option<ApiClient<T>>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
    known_tags: Vec<Tag>,
    results: Container,
    tags: Container,
}

impl<T: Transport> SearchPage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        let api = ctx.authenticate(transport);
        Self {
            state: guard_state(&api),
            banner: ctx.banner(),
            message: None,
            known_tags: Vec::new(),
            results: Container::new("results"),
            tags: Container::new("tags"),
            ctx,
            api,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn results(&self) -> &Container {
        &self.results
    }

    pub fn tags(&self) -> &Container {
        &self.tags
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn view(&self) -> Node {
        page_view(
            "search",
            self.banner.as_ref(),
            self.message.as_ref(),
            &[&self.tags, &self.results],
        )
    }

    /// The search parameters read from the location.
    pub fn query(&self) -> PhotoSearch {
        PhotoSearch {
            limit: self.ctx.param("limit"),
            offset: self.ctx.param("offset"),
            keyword: self
                .ctx
                .location
                .param("keyword")
                .filter(|k| !k.trim().is_empty())
                .map(str::to_string),
            tag_id: self.ctx.param("tag_id"),
            min_rating: self.ctx.param("min_rating"),
            max_rating: self.ctx.param("max_rating"),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        if self.api.is_none() {
            return Ok(());
        }
        let result = self.fetch_results().await;
        settle_load(&mut self.state, result)
    }

    /// Only the tag cloud.
    pub async fn load_tags(&mut self) -> Result<(), ClientError> {
        if self.api.is_none() {
            return Ok(());
        }
        let result = self.fetch_tags().await;
        settle_load(&mut self.state, result)
    }

    async fn fetch_results(&mut self) -> Result<PageState, ClientError> {
        let state = self.fetch_tags().await?;
        if state == PageState::Redirected {
            return Ok(state);
        }
        let search = self.query();
        let Some(api) = &self.api else {
            return Ok(PageState::Redirected);
        };
        let photos: Vec<Photo> = match api.search_photos(&search).await? {
            Fetched::Ok(photos) => photos,
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            Fetched::Failure { .. } => return Ok(PageState::Idle),
        };
        info!("Search returned {} photos", photos.len());
        self.results
            .replace(photo_grid(&photos, &self.ctx.config.pages.photo));
        Ok(PageState::Rendered)
    }

    async fn fetch_tags(&mut self) -> Result<PageState, ClientError> {
        let Some(api) = &self.api else {
            return Ok(PageState::Redirected);
        };
        let tags: Vec<Tag> = match api.all_tags().await? {
            Fetched::Ok(tags) => tags,
            Fetched::Unauthorized => return Ok(PageState::Redirected),
            Fetched::Failure { .. } => return Ok(PageState::Idle),
        };
        self.known_tags = tags;
        self.render_tags();
        Ok(PageState::Rendered)
    }

    fn render_tags(&mut self) {
        self.tags.replace([tag_list(&self.known_tags)]);
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

    /// Create a tag, or get the existing one, and add it to the cloud.
    pub async fn create_tag(&mut self, name: &str) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.post_tag(name).await;
        self.finish(result)
    }

    async fn post_tag(&mut self, name: &str) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        let name = name.trim();
        if name.is_empty() {
            return Ok(FormOutcome::Message(FormMessage::error(
                "Tag name cannot be empty.",
            )));
        }
        match api.create_tag(name).await? {
            Fetched::Ok(tag) => {
                let message = format!("Tag #{} saved.", tag.name);
                if !self.known_tags.contains(&tag) {
                    self.known_tags.push(tag);
                }
                self.render_tags();
                Ok(FormOutcome::Message(FormMessage::success(message)))
            }
            other => Ok(self.ctx.refused(other, "Could not save tag.")),
        }
    }

    pub async fn delete_tag(&mut self, name: &str) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.remove_tag(name).await;
        self.finish(result)
    }

    async fn remove_tag(&mut self, name: &str) -> Result<FormOutcome, ClientError> {
        let Some(api) = &self.api else {
            return Ok(FormOutcome::Navigated(self.ctx.login_page()));
        };
        match api.delete_tag(name).await? {
            Fetched::Ok(()) => {
                info!("Tag {} deleted", name);
                self.known_tags.retain(|t| t.name != name);
                self.render_tags();
                Ok(FormOutcome::Message(FormMessage::success(format!(
                    "Tag #{} deleted.",
                    name
                ))))
            }
            other => Ok(self.ctx.refused(other, "Could not delete tag.")),
        }
    }
}
