use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::Authorization;
use headers::authorization::Basic;

use crate::error::RosterError;
use crate::router::RosterState;
use crate::service::password::verify_password;

/// Authenticated username extracted from an `Authorization: Basic` header.
///
/// Rejects with 401 when the header is absent, the username was never
/// registered, or the salted hash of the supplied password does not match
/// the stored one. Store failures during lookup propagate as-is.
#[derive(Debug, Clone)]
pub struct RequireBasicAuth(pub String);

impl FromRequestParts<RosterState> for RequireBasicAuth {
    type Rejection = RosterError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RosterState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(basic)) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| RosterError::Unauthorized)?;

        if !state.credentials.has_username(basic.username()).await? {
            return Err(RosterError::Unauthorized);
        }

        let Some(auth) = state
            .credentials
            .get_authentication_data(basic.username())
            .await?
        else {
            return Err(RosterError::Unauthorized);
        };

        if !verify_password(basic.password(), &auth.password_hash, &auth.password_salt) {
            return Err(RosterError::Unauthorized);
        }

        Ok(Self(basic.username().to_string()))
    }
}
