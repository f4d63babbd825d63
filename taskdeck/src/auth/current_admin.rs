//! Request extractor for the authenticated administrator.

use crate::{
    AppState,
    api::models::admins::CurrentAdmin,
    auth::session,
    errors::{Error, Result},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

/// Extract an administrator from the JWT session cookie if present and valid.
///
/// Returns:
/// - None: no session cookie present
/// - Some(Ok(admin)): valid JWT found and verified
/// - Some(Err(error)): cookie header present but unreadable
#[instrument(skip(parts, config))]
fn try_jwt_session_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentAdmin>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::BadRequest {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name == cookie_name {
                match session::verify_session_token(value, config) {
                    Ok(admin) => return Some(Ok(admin)),
                    Err(_) => {
                        // Expired or stale tokens are expected; keep scanning
                        // in case another cookie carries a valid session.
                        continue;
                    }
                }
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        match try_jwt_session_auth(parts, &state.config) {
            Some(Ok(admin)) => {
                trace!("Found JWT session authenticated admin: {}", admin.account_id);
                Ok(admin)
            }
            Some(Err(e)) => Err(e),
            None => {
                trace!("No session credentials found in request");
                Err(Error::Unauthenticated { message: None })
            }
        }
    }
}
