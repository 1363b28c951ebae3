use shared::types::{Photo, User};
use tracing::{debug, info};

use super::{PageContext, PageState, guard_state, page_view, settle_load};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::render::photo_card;
use crate::transport::Transport;
use crate::view::{Container, Node};

/// Photo list of every user (`/templates/images.html`).
pub struct HomePage<T: Transport> {
    ctx: PageContext,
    api: Option<ApiClient<T>>,
    state: PageState,
    banner: Option<Node>,
    photos: Container,
}

impl<T: Transport> HomePage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        let api = ctx.authenticate(transport);
        Self {
            state: guard_state(&api),
            banner: ctx.banner(),
            photos: Container::new("photos"),
            ctx,
            api,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn photos(&self) -> &Container {
        &self.photos
    }

    pub fn view(&self) -> Node {
        page_view("home", self.banner.as_ref(), None, &[&self.photos])
    }

    /// Fetch the list, then author and tags of each photo in list order.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let Some(api) = &self.api else {
            return Ok(());
        };
        let limit = self.ctx.config.api.photo_list_limit;
        let offset = self.ctx.param::<u32>("offset").unwrap_or(0);

        let result = load_cards(api, limit, offset, &self.ctx.config.pages.photo).await;
        let result = result.map(|cards| match cards {
            Fetched::Ok(cards) => {
                info!("Rendering {} photos", cards.len());
                self.photos.replace(cards);
                PageState::Rendered
            }
            Fetched::Unauthorized => PageState::Redirected,
            Fetched::Failure { .. } => PageState::Idle,
        });
        settle_load(&mut self.state, result)
    }
}

async fn load_cards<T: Transport>(
    api: &ApiClient<T>,
    limit: u32,
    offset: u32,
    photo_page: &str,
) -> Result<Fetched<Vec<Node>>, ClientError> {
    let photos = match api.photo_list(limit, offset).await? {
        Fetched::Ok(photos) => photos,
        other => return Ok(other.map(|_| Vec::new())),
    };

    let mut cards = Vec::with_capacity(photos.len());
    for photo in &photos {
        let author = match author_of(api, photo).await? {
            Fetched::Unauthorized => return Ok(Fetched::Unauthorized),
            fetched => fetched.ok().flatten(),
        };
        let tags = match api.photo_tags(photo.id).await? {
            Fetched::Unauthorized => return Ok(Fetched::Unauthorized),
            fetched => fetched.ok().unwrap_or_else(|| photo.tags.clone()),
        };
        cards.push(photo_card(photo, author.as_ref(), &tags, photo_page));
    }
    Ok(Fetched::Ok(cards))
}

/// The photo's author; `Ok(None)` for a photo without an owner.
pub(crate) async fn author_of<T: Transport>(
    api: &ApiClient<T>,
    photo: &Photo,
) -> Result<Fetched<Option<User>>, ClientError> {
    match photo.user_id {
        Some(user_id) => Ok(api.user_by_id(user_id).await?.map(Some)),
        None => {
            debug!("Photo {} has no owner", photo.id);
            Ok(Fetched::Ok(None))
        }
    }
}
