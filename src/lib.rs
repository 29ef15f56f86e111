//! Async Rust client library for the Freebox local HTTP management API.
//!
//! Provides the one-time app pairing flow, the challenge-response session
//! handshake (HMAC-SHA1 over a server-issued challenge), and typed
//! accessors for the router's management resources: contacts, call log,
//! LAN hosts, DHCP leases, port forwarding, box information and LCD
//! settings. Resource access is gated client-side by the permissions the
//! user granted the app at pairing time.
//!
//! # Modules
//!
//! - [`auth`] — challenge-response handshake, permissions, app registration.
//! - [`client`] — HTTP transport and the `{success, result}` envelope.
//! - [`credentials`] — the two on-disk credential documents.
//! - [`error`] — typed error hierarchy (`FbxError`).
//! - [`resource`] — generic CRUD accessor shared by every resource kind.
//! - [`session`] — the [`Freebox`](session::Freebox) session facade.
//! - [`contacts`], [`calls`], [`lan`], [`dhcp`], [`fw`], [`system`],
//!   [`lcd`] — per-family wire types and accessors.
//!
//! # Quick Start
//!
//! ```ignore
//! use freebox_client::client::FbxClient;
//! use freebox_client::credentials::{AppAuth, AppInfo};
//! use freebox_client::dhcp::list_static_leases;
//! use freebox_client::resource::PageQuery;
//! use freebox_client::session::Freebox;
//!
//! let info = AppInfo::load("app_infos.json")?;
//! let auth = AppAuth::load("app_auth.json")?;
//! let client = FbxClient::new("https://mafreebox.freebox.fr/api/v5", false);
//! let fbx = Freebox::login(client, &info, &auth).await?;
//!
//! for lease in list_static_leases(&fbx, &PageQuery::all()).await? {
//!     println!("{} -> {} ({})", lease.mac, lease.ip, lease.host.vendor_name);
//! }
//! ```
//!
//! First-time pairing instead goes through [`auth::register`], which asks
//! the user to press the approval button on the router's front panel.

#![warn(missing_docs)]

pub mod auth;
pub mod calls;
pub mod client;
pub mod contacts;
pub mod credentials;
pub mod dhcp;
pub mod error;
pub mod fw;
pub mod lan;
pub mod lcd;
pub mod resource;
pub mod session;
pub mod system;

pub use client::FbxClient;
pub use error::{FbxError, Result};
pub use session::Freebox;
