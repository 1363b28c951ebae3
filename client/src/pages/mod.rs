//! Page controllers.
//!
//! A page is opened with a [`PageContext`], runs the session guard (except
//! login, signup and logout), loads its resources one request at a time and
//! keeps the rendered view in named [`Container`]s.

pub mod home;
pub mod login;
pub mod logout;
pub mod photo;
pub mod search;
pub mod signup;
pub mod upload;
pub mod user;

use std::sync::Arc;

use shared::types::AppConfig;
use tracing::{error, info};

use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::navigation::{Location, Navigator};
use crate::render::{FormMessage, form_message, message_banner};
use crate::session::{Session, SessionStore};
use crate::transport::Transport;
use crate::view::{Container, Element, Node};

pub use home::HomePage;
pub use login::{LoginPage, refresh_session};
pub use logout::logout;
pub use photo::PhotoPage;
pub use search::SearchPage;
pub use signup::SignupPage;
pub use upload::{UploadPage, read_avatar, read_upload};
pub use user::UserPage;

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageState {
    /// Before the session guard has run.
    #[default]
    Unauthenticated,
    Loading,
    Rendered,
    /// Loaded, nothing shown for a failed request, or waiting on a form.
    Idle,
    Submitting,
    Redirected,
    Error(String),
}

/// What a form handler did.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Navigated(Location),
    Message(FormMessage),
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Everything a page needs from its surroundings. Nothing else is shared
/// between pages.
#[derive(Clone)]
pub struct PageContext {
    pub config: AppConfig,
    pub store: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
    pub location: Location,
}

impl PageContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        location: Location,
    ) -> Self {
        Self {
            config,
            store,
            navigator,
            location,
        }
    }

    /// Navigate and hand back the destination.
    pub fn navigate(&self, to: Location) -> Location {
        self.navigator.navigate(to.clone());
        to
    }

    pub fn login_page(&self) -> Location {
        Location::new(&self.config.pages.login)
    }

    /// A client without a session, for login and signup.
    pub fn client<T: Transport>(&self, transport: T) -> ApiClient<T> {
        ApiClient::new(transport, self.navigator.clone(), &self.config.pages.login)
    }

    /// Session guard. With no stored access token the user is sent to the
    /// login page and `None` is returned before any request is made.
    pub fn authenticate<T: Transport>(&self, transport: T) -> Option<ApiClient<T>> {
        match Session::load(self.store.as_ref()) {
            Some(session) => Some(self.client(transport).with_session(session)),
            None => {
                info!("No session stored, redirecting to login");
                self.navigate(self.login_page());
                None
            }
        }
    }

    /// Banner for the `message` query parameter, if present.
    pub fn banner(&self) -> Option<Node> {
        self.location.message().map(message_banner)
    }

    /// The form outcome for a request that did not succeed. A 401 has
    /// already redirected to login; anything else shows the server's text.
    pub fn refused<R>(&self, fetched: Fetched<R>, fallback: &str) -> FormOutcome {
        match fetched {
            Fetched::Unauthorized => FormOutcome::Navigated(self.login_page()),
            Fetched::Failure { message, .. } => FormOutcome::Message(FormMessage::error(
                message.unwrap_or_else(|| fallback.to_string()),
            )),
            Fetched::Ok(_) => FormOutcome::Message(FormMessage::error(fallback)),
        }
    }

    /// Typed query parameter; anything unparsable counts as absent.
    pub fn param<N: std::str::FromStr>(&self, key: &str) -> Option<N> {
        self.location.param(key).and_then(|v| v.trim().parse().ok())
    }
}

/// State after a guarded page has been opened.
pub(crate) fn guard_state<T: Transport>(api: &Option<ApiClient<T>>) -> PageState {
    if api.is_some() {
        PageState::Loading
    } else {
        PageState::Redirected
    }
}

/// Record the result of a load on the page state.
pub(crate) fn settle_load(
    state: &mut PageState,
    result: Result<PageState, ClientError>,
) -> Result<(), ClientError> {
    match result {
        Ok(next) => {
            *state = next;
            Ok(())
        }
        Err(e) => {
            error!("Page load failed: {}", e);
            *state = PageState::Error(e.to_string());
            Err(e)
        }
    }
}

/// Record the result of a form submission on the page state.
pub(crate) fn settle_form(
    state: &mut PageState,
    result: Result<FormOutcome, ClientError>,
) -> Result<FormOutcome, ClientError> {
    match &result {
        Ok(FormOutcome::Navigated(_)) => *state = PageState::Redirected,
        Ok(FormOutcome::Message(_)) => *state = PageState::Idle,
        Err(e) => {
            error!("Form submission failed: {}", e);
            *state = PageState::Error(e.to_string());
        }
    }
    result
}

/// Whole-page view: the banner, an optional form message and each container.
pub(crate) fn page_view(
    page: &str,
    banner: Option<&Node>,
    message: Option<&FormMessage>,
    containers: &[&Container],
) -> Node {
    let mut root = Element::new("main").class(page);
    if let Some(banner) = banner {
        root = root.child(banner.clone());
    }
    if let Some(message) = message {
        root = root.child(form_message(message));
    }
    root.children(containers.iter().map(|c| c.to_node())).into()
}
