//! LAN browsing: interfaces and the hosts seen behind them.
//!
//! The router's host records are sparse — which fields are present depends
//! on how the host was discovered and how long ago it was last seen. The
//! wire shape is therefore [`RawLanHost`] (everything optional) and the
//! public shape is [`LanHost`], built by explicit per-field
//! parse-with-defaults: absent strings become `""`, absent booleans become
//! `false`, and the two Unix timestamps become `None` when absent or out of
//! range. This is deliberate best-effort policy — a half-known host is
//! still a host.
//!
//! Gated by the `explorer` capability.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::Capability;
use crate::error::Result;
use crate::resource::{PageQuery, Resource};
use crate::session::Freebox;

// ── Wire types ─────────────────────────────────────────────────────────

/// A LAN interface exposed by the browser endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanInterface {
    /// Interface name, e.g. `"pub"` or `"wifiguest"`.
    #[serde(default)]
    pub name: String,
    /// Number of hosts currently known behind this interface.
    #[serde(default)]
    pub host_count: u32,
}

impl Resource for LanInterface {
    const PATH: &'static str = "lan/browser/interfaces";
    const KIND: &'static str = "lan interface";
    const PERMISSION: Option<Capability> = Some(Capability::Explorer);
}

/// A LAN host exactly as the router reports it: every field optional.
///
/// Used as the nested `host` sub-object of DHCP lease records too.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLanHost {
    /// Router-assigned host id.
    #[serde(default)]
    pub id: Option<String>,
    /// Best-known display name.
    #[serde(default)]
    pub primary_name: Option<String>,
    /// Device category guessed by the router.
    #[serde(default)]
    pub host_type: Option<String>,
    /// Whether `primary_name` was set by the user.
    #[serde(default)]
    pub primary_name_manual: Option<bool>,
    /// NIC vendor from the MAC OUI.
    #[serde(default)]
    pub vendor_name: Option<String>,
    /// Whether the host entry survives reboots.
    #[serde(default)]
    pub persistent: Option<bool>,
    /// Whether the host currently answers probes.
    #[serde(default)]
    pub reachable: Option<bool>,
    /// Whether the host has active connections.
    #[serde(default)]
    pub active: Option<bool>,
    /// Interface the host sits behind.
    #[serde(default)]
    pub interface: Option<String>,
    /// Unix timestamp of the last traffic from this host.
    #[serde(default)]
    pub last_activity: Option<i64>,
    /// Unix timestamp of the last successful reachability probe.
    #[serde(default)]
    pub last_time_reachable: Option<i64>,
}

// ── Normalized type ────────────────────────────────────────────────────

/// A LAN host after normalization. Fields the router omitted hold their
/// documented defaults instead of `Option` noise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanHost {
    /// Router-assigned host id (e.g. `"ether-00:24:d4:7e:00:4c"`). Default `""`.
    pub id: String,
    /// Best-known display name. Default `""`.
    pub primary_name: String,
    /// Device category guessed by the router. Default `""`.
    pub host_type: String,
    /// Whether `primary_name` was set by the user. Default `false`.
    pub primary_name_manual: bool,
    /// NIC vendor from the MAC OUI. Default `""`.
    pub vendor_name: String,
    /// Whether the host entry survives reboots. Default `false`.
    pub persistent: bool,
    /// Whether the host currently answers probes. Default `false`.
    pub reachable: bool,
    /// Whether the host has active connections. Default `false`.
    pub active: bool,
    /// Interface the host sits behind. Default `""`.
    pub interface: String,
    /// Time of the last traffic from this host, when known.
    pub last_activity: Option<DateTime<Utc>>,
    /// Time of the last successful reachability probe, when known.
    pub last_time_reachable: Option<DateTime<Utc>>,
}

impl LanHost {
    /// Builds the normalized record, field by field, applying documented
    /// defaults for anything the router omitted. Timestamps outside
    /// chrono's representable range are treated as absent.
    pub fn from_raw(raw: RawLanHost) -> Self {
        LanHost {
            id: raw.id.unwrap_or_default(),
            primary_name: raw.primary_name.unwrap_or_default(),
            host_type: raw.host_type.unwrap_or_default(),
            primary_name_manual: raw.primary_name_manual.unwrap_or_default(),
            vendor_name: raw.vendor_name.unwrap_or_default(),
            persistent: raw.persistent.unwrap_or_default(),
            reachable: raw.reachable.unwrap_or_default(),
            active: raw.active.unwrap_or_default(),
            interface: raw.interface.unwrap_or_default(),
            last_activity: raw.last_activity.and_then(|ts| DateTime::from_timestamp(ts, 0)),
            last_time_reachable: raw
                .last_time_reachable
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        }
    }
}

// ── Accessors ──────────────────────────────────────────────────────────

/// Lists the LAN interfaces known to the browser. Returns an empty vector,
/// with zero network calls, when the session lacks `explorer`.
pub async fn list_interfaces(fbx: &Freebox) -> Result<Vec<LanInterface>> {
    fbx.list(&PageQuery::all()).await
}

/// Lists the hosts behind one interface (`"pub"` is the main LAN),
/// normalized. Returns an empty vector, with zero network calls, when the
/// session lacks `explorer`.
pub async fn list_lan_hosts(fbx: &Freebox, interface: &str) -> Result<Vec<LanHost>> {
    if !fbx.permissions().allows(Capability::Explorer) {
        tracing::debug!("permission gate: returning empty lan host list");
        return Ok(Vec::new());
    }
    let path = format!("lan/browser/{interface}/");
    let resp = fbx.client.get::<Vec<RawLanHost>>(&path).await?;
    let raw = resp.into_result_or_default()?;
    Ok(raw.into_iter().map(LanHost::from_raw).collect())
}
