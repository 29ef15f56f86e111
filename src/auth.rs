//! Challenge-response authentication and app registration.
//!
//! Two flows live here:
//!
//! 1. **Session handshake** (every process start): fetch a challenge keyed
//!    by the stored `track_id`, derive a one-time password with
//!    HMAC-SHA1(app_token, challenge), and exchange it for a session token
//!    plus the set of [`Permissions`] granted to the app. Orchestrated by
//!    [`crate::session::Freebox::login`].
//! 2. **Registration** (one-time pairing): submit the app identity, persist
//!    the issued `app_token`/`track_id`, then poll the authorization status
//!    at a fixed interval while the user presses the approval button on the
//!    router's front panel.
//!
//! Neither flow retries beyond the fixed-count authorization poll, and a
//! handshake failure is fatal — no degraded mode exists.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::path::Path;
use std::time::Duration;

use crate::client::FbxClient;
use crate::credentials::{AppAuth, AppInfo};
use crate::error::{FbxError, Result};

type HmacSha1 = Hmac<Sha1>;

// ── Session password ─────────────────────────────────────────────────────

/// Derives the session password: `hex(HMAC-SHA1(key = app_token, msg = challenge))`.
///
/// Deterministic — identical inputs always produce the identical digest, so
/// a replayed challenge yields a replayed password (the router issues a
/// fresh challenge per handshake to prevent exactly that).
pub fn session_password(app_token: &str, challenge: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(app_token.as_bytes())
        .expect("HMAC-SHA1 accepts keys of any length");
    mac.update(challenge.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// ── Permissions ──────────────────────────────────────────────────────────

/// Capabilities an app can be granted. Each gates one resource family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Recorded-TV management.
    Pvr,
    /// File explorer and LAN browsing.
    Explorer,
    /// Call log access.
    Calls,
    /// Contact book access.
    Contacts,
    /// Live TV control.
    Tv,
    /// Parental-control settings.
    Parental,
    /// Router settings (DHCP, port forwarding, LCD, reboot).
    Settings,
    /// Download manager access.
    Downloader,
}

/// The fixed set of capability flags granted at login.
///
/// Populated from the `permissions` map in the session response. Every flag
/// defaults to `false`; permission names the router sends that are not in
/// this record are ignored. The gate these flags drive is client-side
/// policy only — the router enforces its own checks regardless.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Permissions {
    /// Recorded-TV management.
    #[serde(default)]
    pub pvr: bool,
    /// File explorer and LAN browsing.
    #[serde(default)]
    pub explorer: bool,
    /// Call log access.
    #[serde(default)]
    pub calls: bool,
    /// Contact book access.
    #[serde(default)]
    pub contacts: bool,
    /// Live TV control.
    #[serde(default)]
    pub tv: bool,
    /// Parental-control settings.
    #[serde(default)]
    pub parental: bool,
    /// Router settings (DHCP, port forwarding, LCD, reboot).
    #[serde(default)]
    pub settings: bool,
    /// Download manager access.
    #[serde(default)]
    pub downloader: bool,
}

impl Permissions {
    /// Whether the given capability was granted.
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::Pvr => self.pvr,
            Capability::Explorer => self.explorer,
            Capability::Calls => self.calls,
            Capability::Contacts => self.contacts,
            Capability::Tv => self.tv,
            Capability::Parental => self.parental,
            Capability::Settings => self.settings,
            Capability::Downloader => self.downloader,
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

/// Authorization progress reported by `login/authorize/{track_id}`.
///
/// `Unknown` is the catch-all for status strings this crate does not
/// recognize, so a new router firmware value cannot break deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// Waiting for the user to press the approval button.
    Pending,
    /// The user approved the app.
    Granted,
    /// The user rejected the app.
    Denied,
    /// The router gave up waiting for the user.
    Timeout,
    /// Catch-all for unrecognized status strings.
    #[serde(other)]
    Unknown,
}

/// Result payload of `GET login/authorize/{track_id}`.
///
/// The same endpoint serves two consumers: the session handshake reads
/// `challenge`, the registration poll reads `status`. Both fields are
/// lenient because each consumer only needs its own.
#[derive(Debug, Deserialize)]
pub struct AuthorizationTrack {
    /// Authorization progress for this `track_id`.
    #[serde(default = "TrackStatus::unknown")]
    pub status: TrackStatus,
    /// Server-issued nonce for deriving the session password. Absent on
    /// pure status polls from older firmwares.
    #[serde(default)]
    pub challenge: Option<String>,
}

impl TrackStatus {
    fn unknown() -> Self {
        TrackStatus::Unknown
    }
}

/// Result payload of `POST login/authorize/` (registration).
#[derive(Debug, Deserialize)]
struct AuthorizeResult {
    app_token: String,
    track_id: u64,
}

/// Body of `POST login/session/`.
#[derive(Serialize)]
struct SessionRequest<'a> {
    app_id: &'a str,
    password: &'a str,
}

/// Result payload of `POST login/session/`.
#[derive(Debug, Deserialize)]
pub struct SessionResult {
    /// Token to present as `X-Fbx-App-Auth` on every later call.
    pub session_token: String,
    /// Capability flags granted to this app.
    #[serde(default)]
    pub permissions: Permissions,
}

// ── Handshake steps ──────────────────────────────────────────────────────

/// Fetches the login challenge for the stored `track_id`.
///
/// # Errors
///
/// - `FbxError::Auth` — the router reported failure; carries the server
///   error code. The caller must not proceed to the session exchange.
/// - `FbxError::Network` / `FbxError::Http` / `FbxError::Parse` — transport
///   and shape failures, passed through.
pub async fn request_challenge(client: &FbxClient, track_id: u64) -> Result<AuthorizationTrack> {
    let path = format!("login/authorize/{track_id}");
    let resp = client.get::<AuthorizationTrack>(&path).await?;
    if !resp.success {
        return Err(FbxError::Auth { code: resp.error_code() });
    }
    resp.into_result().map_err(auth_failure)
}

/// Exchanges `{app_id, password}` for a session token and permissions.
///
/// The app token rides along as the `X-Fbx-App-Auth` header — the only call
/// that authenticates with the app token rather than a session token.
///
/// # Errors
///
/// - `FbxError::Auth` — the router rejected the exchange (bad password,
///   revoked app token); carries the server error code.
pub async fn open_session(
    client: &FbxClient,
    app_id: &str,
    app_token: &str,
    challenge: &str,
) -> Result<SessionResult> {
    let password = session_password(app_token, challenge);
    let body = SessionRequest {
        app_id,
        password: &password,
    };
    let resp = client
        .post_with_token::<_, SessionResult>("login/session/", &body, app_token)
        .await?;
    if !resp.success {
        return Err(FbxError::Auth { code: resp.error_code() });
    }
    resp.into_result().map_err(auth_failure)
}

/// Reclassifies a success-envelope-without-payload as a handshake failure.
/// A session response with no result is indistinguishable from a rejected
/// login as far as the caller is concerned.
fn auth_failure(err: FbxError) -> FbxError {
    match err {
        FbxError::Api { code, .. } => FbxError::Auth { code },
        other => other,
    }
}

// ── Registration ─────────────────────────────────────────────────────────

/// Pacing of the authorization-status poll during registration.
///
/// Defaults match the router's pairing UX: the user has to walk to the
/// Freebox and press the approval button, so 20 polls at 2-second intervals
/// (40 seconds total) is the window they get. No backoff — the interval is
/// fixed by design.
#[derive(Debug, Clone)]
pub struct RegistrationPoll {
    /// Delay between consecutive status polls.
    pub interval: Duration,
    /// Maximum number of polls before giving up.
    pub attempts: u32,
}

impl Default for RegistrationPoll {
    fn default() -> Self {
        RegistrationPoll {
            interval: Duration::from_secs(2),
            attempts: 20,
        }
    }
}

/// Outcome of a registration attempt.
///
/// Denial and timeout are deliberately not distinguished as errors: both
/// surface as the final [`TrackStatus`] observed by the poll, and the
/// issued credentials are returned (and persisted) either way so a pending
/// authorization can be re-polled later.
#[derive(Debug)]
pub struct Registration {
    /// Secret app token issued by the router.
    pub app_token: String,
    /// Identifier correlating this registration with its approval status.
    pub track_id: u64,
    /// The last authorization status observed before polling stopped.
    pub status: TrackStatus,
}

impl Registration {
    /// Whether the user approved the app before polling stopped.
    pub fn granted(&self) -> bool {
        self.status == TrackStatus::Granted
    }
}

/// Registers the app with the router and waits for user approval.
///
/// 1. Submits the app identity; the router answers with a provisional
///    `app_token` and a `track_id`, which are persisted to `auth_path`
///    immediately — before polling — so an interrupted pairing keeps its
///    credentials.
/// 2. Polls `login/authorize/{track_id}` at the configured fixed interval
///    until the status reaches `granted` or the attempts run out. A poll
///    whose envelope reports failure leaves the last observed status in
///    place rather than aborting the pairing window.
///
/// # Errors
///
/// - `FbxError::Auth` — the router refused the registration itself.
/// - `FbxError::Io` — persisting the credential document failed.
/// - Transport errors during the initial registration call pass through.
///   The poll result is never an error: inspect [`Registration::status`].
pub async fn register(
    client: &FbxClient,
    app_info: &AppInfo,
    auth_path: impl AsRef<Path>,
    poll: &RegistrationPoll,
) -> Result<Registration> {
    let resp = client
        .post::<_, AuthorizeResult>("login/authorize/", app_info)
        .await?;
    if !resp.success {
        return Err(FbxError::Auth { code: resp.error_code() });
    }
    let issued = resp.into_result().map_err(auth_failure)?;

    AppAuth {
        app_token: issued.app_token.clone(),
        track_id: issued.track_id,
    }
    .save(&auth_path)?;
    tracing::info!(
        track_id = issued.track_id,
        "app registered, waiting for approval on the router front panel"
    );

    let path = format!("login/authorize/{}", issued.track_id);
    let mut status = TrackStatus::Pending;
    for attempt in 1..=poll.attempts {
        let resp = client.get::<AuthorizationTrack>(&path).await?;
        // Each poll is judged on its own success flag; a failed poll keeps
        // the previous status instead of ending the pairing window.
        if resp.success {
            if let Some(track) = resp.result {
                status = track.status;
            }
        }
        tracing::debug!(attempt, ?status, "authorization poll");

        if status == TrackStatus::Granted {
            break;
        }
        if attempt < poll.attempts {
            tokio::time::sleep(poll.interval).await;
        }
    }

    if status == TrackStatus::Granted {
        tracing::info!(track_id = issued.track_id, "app authorization granted");
    } else {
        tracing::warn!(track_id = issued.track_id, ?status, "app authorization not granted");
    }

    Ok(Registration {
        app_token: issued.app_token,
        track_id: issued.track_id,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Password derivation ──────────────────────────────────────────

    #[test]
    fn session_password_matches_rfc2202_vector() {
        // RFC 2202 test case 2 for HMAC-SHA1.
        let digest = session_password("Jefe", "what do ya want for nothing?");
        assert_eq!(digest, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }

    #[test]
    fn session_password_is_deterministic() {
        let a = session_password("dyNYgfK0Ya6FWGqq", "ks1oByrf3NN1Ij2cxEbignQTC067wIs8");
        let b = session_password("dyNYgfK0Ya6FWGqq", "ks1oByrf3NN1Ij2cxEbignQTC067wIs8");
        assert_eq!(a, b, "identical inputs must produce identical digests");
        assert_eq!(a.len(), 40, "hex-encoded SHA-1 digest is 40 chars");
    }

    #[test]
    fn session_password_varies_with_challenge() {
        let a = session_password("token", "challenge-one");
        let b = session_password("token", "challenge-two");
        assert_ne!(a, b);
    }

    // ── Permissions ──────────────────────────────────────────────────

    #[test]
    fn permissions_deserialize_from_session_response_map() {
        let json = r#"{
            "settings": true,
            "contacts": true,
            "calls": false,
            "explorer": true
        }"#;
        let perms: Permissions = serde_json::from_str(json).unwrap();
        assert!(perms.settings);
        assert!(perms.contacts);
        assert!(!perms.calls);
        assert!(perms.explorer);
        // Absent names default to false.
        assert!(!perms.pvr);
        assert!(!perms.tv);
        assert!(!perms.parental);
        assert!(!perms.downloader);
    }

    #[test]
    fn permissions_ignore_unknown_names() {
        // A firmware update may introduce permission names this record
        // does not model; they must not break deserialization.
        let json = r#"{"contacts": true, "home_automation": true, "vpn": false}"#;
        let perms: Permissions = serde_json::from_str(json).unwrap();
        assert!(perms.contacts);
    }

    #[test]
    fn permissions_default_to_all_denied() {
        let perms = Permissions::default();
        for capability in [
            Capability::Pvr,
            Capability::Explorer,
            Capability::Calls,
            Capability::Contacts,
            Capability::Tv,
            Capability::Parental,
            Capability::Settings,
            Capability::Downloader,
        ] {
            assert!(!perms.allows(capability), "{capability:?} should default to denied");
        }
    }

    #[test]
    fn allows_maps_each_capability_to_its_flag() {
        let perms = Permissions {
            calls: true,
            settings: true,
            ..Permissions::default()
        };
        assert!(perms.allows(Capability::Calls));
        assert!(perms.allows(Capability::Settings));
        assert!(!perms.allows(Capability::Contacts));
        assert!(!perms.allows(Capability::Explorer));
    }

    // ── Wire shapes ──────────────────────────────────────────────────

    #[test]
    fn track_status_deserializes_known_values() {
        for (text, expected) in [
            (r#""pending""#, TrackStatus::Pending),
            (r#""granted""#, TrackStatus::Granted),
            (r#""denied""#, TrackStatus::Denied),
            (r#""timeout""#, TrackStatus::Timeout),
        ] {
            let status: TrackStatus = serde_json::from_str(text).unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn track_status_maps_unrecognized_values_to_unknown() {
        let status: TrackStatus = serde_json::from_str(r#""some_new_state""#).unwrap();
        assert_eq!(status, TrackStatus::Unknown);
    }

    #[test]
    fn authorization_track_parses_status_poll_without_challenge() {
        let track: AuthorizationTrack =
            serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
        assert_eq!(track.status, TrackStatus::Pending);
        assert!(track.challenge.is_none());
    }

    #[test]
    fn authorization_track_parses_challenge_response() {
        let track: AuthorizationTrack = serde_json::from_str(
            r#"{"status": "granted", "challenge": "ks1oByrf3NN1Ij2cxEbignQTC067wIs8"}"#,
        )
        .unwrap();
        assert_eq!(track.status, TrackStatus::Granted);
        assert_eq!(track.challenge.as_deref(), Some("ks1oByrf3NN1Ij2cxEbignQTC067wIs8"));
    }

    #[test]
    fn session_request_serializes_expected_fields() {
        let body = SessionRequest {
            app_id: "org.example.leases",
            password: "deadbeef",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["app_id"], "org.example.leases");
        assert_eq!(json["password"], "deadbeef");
    }

    #[test]
    fn session_result_defaults_missing_permissions() {
        // Older firmwares can omit the permissions map entirely.
        let result: SessionResult =
            serde_json::from_str(r#"{"session_token": "tok"}"#).unwrap();
        assert_eq!(result.session_token, "tok");
        assert!(!result.permissions.contacts);
    }

    // ── Poll pacing ──────────────────────────────────────────────────

    #[test]
    fn registration_poll_default_is_twenty_polls_every_two_seconds() {
        let poll = RegistrationPoll::default();
        assert_eq!(poll.interval, Duration::from_secs(2));
        assert_eq!(poll.attempts, 20);
    }

    #[test]
    fn registration_granted_helper() {
        let reg = Registration {
            app_token: "tok".to_string(),
            track_id: 7,
            status: TrackStatus::Granted,
        };
        assert!(reg.granted());

        let reg = Registration {
            status: TrackStatus::Pending,
            ..reg
        };
        assert!(!reg.granted());
    }
}
