use shared::types::{LoginData, LoginError};
use tracing::{info, warn};

use super::{FormOutcome, PageContext, PageState, page_view, settle_form};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::navigation::Location;
use crate::render::FormMessage;
use crate::session::Session;
use crate::transport::Transport;
use crate::view::Node;

/// Login form. Not guarded; the banner shows e.g. the signup confirmation.
pub struct LoginPage<T: Transport> {
    ctx: PageContext,
    api: ApiClient<T>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
}

impl<T: Transport> LoginPage<T> {
    pub fn open(ctx: PageContext, transport: T) -> Self {
        Self {
            api: ctx.client(transport),
            state: PageState::Idle,
            banner: ctx.banner(),
            message: None,
            ctx,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn view(&self) -> Node {
        page_view("login", self.banner.as_ref(), self.message.as_ref(), &[])
    }

    /// On success both tokens are stored and the user lands on the home
    /// page; a refusal stays here with the server's message.
    pub async fn submit(&mut self, data: &LoginData) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.try_login(data).await;
        let result = settle_form(&mut self.state, result);
        if let Ok(FormOutcome::Message(message)) = &result {
            self.message = Some(message.clone());
        }
        result
    }

    async fn try_login(&self, data: &LoginData) -> Result<FormOutcome, ClientError> {
        if let Err(e) = data.validate() {
            warn!("Login form invalid: {}", e.to_code());
            return Ok(FormOutcome::Message(FormMessage::error(e.to_message())));
        }

        match self.api.login(data).await? {
            Fetched::Ok(tokens) => {
                Session::save(self.ctx.store.as_ref(), &tokens)?;
                info!("Logged in as {}", data.username);
                let home = Location::new(&self.ctx.config.pages.home);
                Ok(FormOutcome::Navigated(self.ctx.navigate(home)))
            }
            Fetched::Failure { status, message } => {
                let error = match message {
                    Some(detail) => LoginError::Rejected(detail),
                    None => LoginError::InternalError,
                };
                warn!("Login refused with {} ({})", status.as_u16(), error.to_code());
                Ok(FormOutcome::Message(FormMessage::error(error.to_message())))
            }
            Fetched::Unauthorized => Ok(FormOutcome::Navigated(self.ctx.login_page())),
        }
    }
}

/// Trade the stored refresh token for a new token pair. Returns whether a
/// new session was stored.
pub async fn refresh_session<T: Transport>(
    ctx: &PageContext,
    transport: T,
) -> Result<bool, ClientError> {
    let Some(refresh_token) =
        Session::load(ctx.store.as_ref()).and_then(|s| s.refresh_token().map(str::to_string))
    else {
        info!("No refresh token stored, redirecting to login");
        ctx.navigate(ctx.login_page());
        return Ok(false);
    };

    match ctx.client(transport).refresh_tokens(&refresh_token).await? {
        Fetched::Ok(tokens) => {
            Session::save(ctx.store.as_ref(), &tokens)?;
            Ok(true)
        }
        Fetched::Unauthorized => Ok(false),
        Fetched::Failure { status, .. } => {
            warn!("Token refresh failed with {}", status.as_u16());
            Ok(false)
        }
    }
}
