use http::StatusCode;
use shared::types::{RegistrationData, RegistrationError, SIGNUP_SUCCESS_MESSAGE};
use tracing::{info, warn};

use super::{FormOutcome, PageContext, PageState, page_view, settle_form};
use crate::api::{ApiClient, Fetched};
use crate::error::ClientError;
use crate::navigation::Location;
use crate::render::FormMessage;
use crate::transport::Transport;
use crate::view::Node;

/// Signup form. Not guarded.
pub struct SignupPage<T: Transport> {
    ctx: PageContext,
    api: ApiClient<T>,
    state: PageState,
    banner: Option<Node>,
    message: Option<FormMessage>,
}

impl<T: Transport> SignupPage<T> {
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
        page_view("signup", self.banner.as_ref(), self.message.as_ref(), &[])
    }

    /// 201 goes to the login page with the activation notice, 409 back to
    /// the signup page with the conflict notice. Anything else stays here.
    pub async fn submit(&mut self, data: &RegistrationData) -> Result<FormOutcome, ClientError> {
        self.state = PageState::Submitting;
        let result = self.try_signup(data).await;
        let result = settle_form(&mut self.state, result);
        if let Ok(FormOutcome::Message(message)) = &result {
            self.message = Some(message.clone());
        }
        result
    }

    async fn try_signup(&self, data: &RegistrationData) -> Result<FormOutcome, ClientError> {
        if let Err(e) = data.validate() {
            warn!("Signup form invalid: {}", e.to_code());
            return Ok(FormOutcome::Message(FormMessage::error(e.to_message())));
        }

        let pages = &self.ctx.config.pages;
        match self.api.signup(data).await? {
            Fetched::Ok(user) => {
                info!("Registered {} (id {})", user.username, user.id);
                let login = Location::new(&pages.login).with_message(SIGNUP_SUCCESS_MESSAGE);
                Ok(FormOutcome::Navigated(self.ctx.navigate(login)))
            }
            Fetched::Failure { status, .. } if status == StatusCode::CONFLICT => {
                let error = RegistrationError::AccountExists;
                warn!("Signup for {} refused: {}", data.username, error.to_code());
                let signup = Location::new(&pages.signup).with_message(&error.to_message());
                Ok(FormOutcome::Navigated(self.ctx.navigate(signup)))
            }
            Fetched::Failure { status, message } => {
                let error = RegistrationError::Rejected(
                    message.unwrap_or_else(|| "Registration failed".to_string()),
                );
                warn!("Signup refused with {} ({})", status.as_u16(), error.to_code());
                Ok(FormOutcome::Message(FormMessage::error(error.to_message())))
            }
            Fetched::Unauthorized => Ok(FormOutcome::Navigated(self.ctx.login_page())),
        }
    }
}
