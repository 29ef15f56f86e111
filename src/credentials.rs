//! On-disk credential documents for app registration and login.
//!
//! Two separate JSON files, mirroring the split the Freebox pairing flow
//! imposes:
//! - [`AppInfo`] — the app's identity, written by hand once and submitted
//!   when registering the app with the router.
//! - [`AppAuth`] — the `app_token` + `track_id` issued by the router at
//!   registration time, written by [`crate::auth::register`] and read back
//!   at every session start.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// App identity submitted to the router when requesting authorization.
///
/// All four fields are shown on the Freebox front-panel display while the
/// user decides whether to approve the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// Stable identifier for the app, e.g. `"org.example.leases"`.
    pub app_id: String,
    /// Display name shown on the router's LCD during pairing.
    pub app_name: String,
    /// App version string.
    pub app_version: String,
    /// Name of the device the app runs on, shown during pairing.
    pub device_name: String,
}

/// Authorization material issued by the router at registration time.
///
/// Immutable once granted; the `app_token` is the HMAC key for every session
/// handshake and the `track_id` correlates the registration with its polled
/// approval status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppAuth {
    /// Secret token issued to this app. HMAC key for session passwords.
    pub app_token: String,
    /// Identifier for polling the authorization status.
    pub track_id: u64,
}

impl AppInfo {
    /// Reads the app-identity document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl AppAuth {
    /// Reads the app-authorization document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the app-authorization document to disk.
    ///
    /// Called by the registration flow as soon as the router issues the
    /// token, before authorization polling starts, so an interrupted
    /// registration can still be resumed by polling later.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
