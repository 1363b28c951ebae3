use tracing::{error, info, warn};

use super::PageContext;
use crate::api::Fetched;
use crate::navigation::Location;
use crate::session::Session;
use crate::transport::Transport;

/// Tell the server, then forget the session whatever it answered and go to
/// the login page. Returns where the user ended up.
pub async fn logout<T: Transport>(ctx: &PageContext, transport: T) -> Location {
    let mut api = ctx.client(transport);
    if let Some(session) = Session::load(ctx.store.as_ref()) {
        api.set_session(session);
    }

    let redirected = match api.logout().await {
        Ok(Fetched::Ok(())) => {
            info!("Logged out");
            false
        }
        Ok(Fetched::Unauthorized) => true,
        Ok(Fetched::Failure { status, .. }) => {
            warn!("Logout answered {}", status.as_u16());
            false
        }
        Err(e) => {
            error!("Logout request failed: {}", e);
            false
        }
    };

    if let Err(e) = Session::clear(ctx.store.as_ref()) {
        error!("Failed to clear session: {}", e);
    }

    let login = ctx.login_page();
    if redirected {
        login
    } else {
        ctx.navigate(login)
    }
}
