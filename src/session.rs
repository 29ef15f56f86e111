//! Authenticated session facade.
//!
//! [`Freebox`] owns the HTTP client and the permissions granted at login.
//! It is the single entry point for every resource accessor: the generic
//! CRUD operations in [`crate::resource`] are methods on it, and each
//! endpoint-family module exposes named wrappers taking `&Freebox`.
//!
//! The session token lives inside the owned [`FbxClient`] — an explicit
//! session object rather than process-wide header state, so independent
//! sessions are safe by construction. There is no refresh: a failed login is
//! fatal, and a session lasts for the lifetime of the value.

use crate::auth::{open_session, request_challenge, Permissions};
use crate::client::FbxClient;
use crate::credentials::{AppAuth, AppInfo};
use crate::error::{FbxError, Result};

/// An authenticated connection to one Freebox.
#[derive(Debug)]
pub struct Freebox {
    pub(crate) client: FbxClient,
    permissions: Permissions,
}

impl Freebox {
    /// Performs the challenge-response handshake and returns a live session.
    ///
    /// Steps, in order, with no retry at any point:
    /// 1. Fetch the challenge for `auth.track_id`.
    /// 2. Derive `hex(HMAC-SHA1(app_token, challenge))`.
    /// 3. Exchange `{app_id, password}` (app token in the auth header) for
    ///    a session token and the granted permissions.
    /// 4. Store the token on the client; it authenticates every later call.
    ///
    /// # Errors
    ///
    /// - `FbxError::Auth` — either handshake step was refused; carries the
    ///   server error code. The session exchange is not attempted when the
    ///   challenge fetch fails.
    /// - Transport/parse errors pass through unwrapped.
    pub async fn login(mut client: FbxClient, info: &AppInfo, auth: &AppAuth) -> Result<Self> {
        let track = request_challenge(&client, auth.track_id).await?;
        let challenge = track.challenge.ok_or_else(|| FbxError::Auth {
            code: "missing_challenge".to_string(),
        })?;

        let session = open_session(&client, &info.app_id, &auth.app_token, &challenge).await?;
        client.set_session_token(session.session_token);
        tracing::info!(app_id = %info.app_id, "freebox session opened");

        Ok(Freebox {
            client,
            permissions: session.permissions,
        })
    }

    /// The capability flags granted to this app at login.
    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    /// Builds a session without a handshake. Test seam: lets the wiremock
    /// suites exercise resource accessors against an already-"authenticated"
    /// client with chosen permissions.
    #[doc(hidden)]
    pub fn with_parts(client: FbxClient, permissions: Permissions) -> Self {
        Freebox { client, permissions }
    }
}
