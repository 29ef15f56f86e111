//! DHCP lease records, static and dynamic.
//!
//! Both lease kinds embed the same sparse `host` sub-object the LAN browser
//! uses; the accessors here normalize it into [`LanHost`] after every fetch
//! (see [`crate::lan`] for the per-field default policy). A static lease's
//! identifier is its MAC address; dynamic leases are addressed by MAC too.
//!
//! Gated by the `settings` capability.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;
use crate::error::Result;
use crate::lan::{LanHost, RawLanHost};
use crate::resource::{PageQuery, Resource};
use crate::session::Freebox;

// ── Wire types ─────────────────────────────────────────────────────────

/// A manually configured DHCP address reservation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaticLease {
    /// Lease identifier (the MAC address).
    #[serde(default)]
    pub id: String,
    /// Reserved MAC address.
    #[serde(default)]
    pub mac: String,
    /// Reserved IPv4 address.
    #[serde(default)]
    pub ip: String,
    /// Hostname the router associates with the lease.
    #[serde(default)]
    pub hostname: String,
    /// Free-form comment set at creation time.
    #[serde(default)]
    pub comment: String,

    #[serde(default, rename = "host")]
    raw_host: Option<RawLanHost>,
    /// The lease's host record, normalized. Populated by the accessors.
    #[serde(skip)]
    pub host: LanHost,
}

impl Resource for StaticLease {
    const PATH: &'static str = "dhcp/static_lease";
    const KIND: &'static str = "static lease";
    const PERMISSION: Option<Capability> = Some(Capability::Settings);
}

/// A server-assigned DHCP lease.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DynamicLease {
    /// Client MAC address (also the lease identifier).
    #[serde(default)]
    pub mac: String,
    /// Assigned IPv4 address.
    #[serde(default)]
    pub ip: String,
    /// Hostname announced by the client.
    #[serde(default)]
    pub hostname: String,
    /// Seconds until the lease expires.
    #[serde(default)]
    pub lease_remaining: i64,
    /// Unix timestamp of the initial assignment.
    #[serde(default)]
    pub assign_time: Option<i64>,
    /// Unix timestamp of the last renewal.
    #[serde(default)]
    pub refresh_time: Option<i64>,
    /// Whether a static reservation also exists for this MAC.
    #[serde(default)]
    pub is_static: bool,

    #[serde(default, rename = "host")]
    raw_host: Option<RawLanHost>,
    /// The lease's host record, normalized. Populated by the accessors.
    #[serde(skip)]
    pub host: LanHost,
}

impl Resource for DynamicLease {
    const PATH: &'static str = "dhcp/dynamic_lease";
    const KIND: &'static str = "dynamic lease";
    const PERMISSION: Option<Capability> = Some(Capability::Settings);
}

impl StaticLease {
    fn normalize(&mut self) {
        self.host = LanHost::from_raw(self.raw_host.take().unwrap_or_default());
    }
}

impl DynamicLease {
    fn normalize(&mut self) {
        self.host = LanHost::from_raw(self.raw_host.take().unwrap_or_default());
    }
}

/// Create/update body for a static lease.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StaticLeasePayload {
    /// MAC address to reserve for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// IPv4 address to reserve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ── Accessors ──────────────────────────────────────────────────────────

/// Lists static leases with their host records normalized. Returns an
/// empty vector, with zero network calls, when the session lacks
/// `settings`.
pub async fn list_static_leases(fbx: &Freebox, query: &PageQuery) -> Result<Vec<StaticLease>> {
    let mut leases: Vec<StaticLease> = fbx.list(query).await?;
    for lease in &mut leases {
        lease.normalize();
    }
    Ok(leases)
}

/// Fetches one static lease by MAC.
pub async fn get_static_lease(fbx: &Freebox, mac: &str) -> Result<StaticLease> {
    let mut lease: StaticLease = fbx.get(mac).await?;
    lease.normalize();
    Ok(lease)
}

/// Creates a static lease; returns the server-assigned form.
pub async fn create_static_lease(fbx: &Freebox, data: &StaticLeasePayload) -> Result<StaticLease> {
    let mut lease: StaticLease = fbx.create(data).await?;
    lease.normalize();
    Ok(lease)
}

/// Updates a static lease.
pub async fn update_static_lease(
    fbx: &Freebox,
    mac: &str,
    data: &StaticLeasePayload,
) -> Result<StaticLease> {
    let mut lease: StaticLease = fbx.update(mac, data).await?;
    lease.normalize();
    Ok(lease)
}

/// Deletes a static lease. True iff the router reported success.
pub async fn delete_static_lease(fbx: &Freebox, mac: &str) -> Result<bool> {
    fbx.delete::<StaticLease>(mac).await
}

/// Lists dynamic leases with their host records normalized. Returns an
/// empty vector, with zero network calls, when the session lacks
/// `settings`.
pub async fn list_dynamic_leases(fbx: &Freebox, query: &PageQuery) -> Result<Vec<DynamicLease>> {
    let mut leases: Vec<DynamicLease> = fbx.list(query).await?;
    for lease in &mut leases {
        lease.normalize();
    }
    Ok(leases)
}

/// Fetches one dynamic lease by MAC.
pub async fn get_dynamic_lease(fbx: &Freebox, mac: &str) -> Result<DynamicLease> {
    let mut lease: DynamicLease = fbx.get(mac).await?;
    lease.normalize();
    Ok(lease)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_lease_normalizes_nested_host() {
        let json = r#"{
            "id": "00:24:d4:7e:00:4c",
            "mac": "00:24:d4:7e:00:4c",
            "ip": "192.168.1.42",
            "hostname": "nas",
            "comment": "storage box",
            "host": {
                "primary_name": "nas",
                "vendor_name": "Synology",
                "reachable": true,
                "last_activity": 1360666509
            }
        }"#;
        let mut lease: StaticLease = serde_json::from_str(json).unwrap();
        lease.normalize();
        assert_eq!(lease.mac, "00:24:d4:7e:00:4c");
        assert_eq!(lease.host.vendor_name, "Synology");
        assert!(lease.host.reachable);
        assert_eq!(lease.host.last_activity.unwrap().timestamp(), 1360666509);
    }

    #[test]
    fn static_lease_without_host_normalizes_to_defaults() {
        // The router omits `host` entirely for leases whose device has
        // never been seen. vendor_name must come back as the documented
        // default (empty string), not an error.
        let json = r#"{"id": "00:04:04:04:04:04", "mac": "00:04:04:04:04:04", "ip": "192.168.0.123"}"#;
        let mut lease: StaticLease = serde_json::from_str(json).unwrap();
        lease.normalize();
        assert_eq!(lease.host.vendor_name, "");
        assert_eq!(lease.host, LanHost::default());
    }

    #[test]
    fn dynamic_lease_deserializes_and_normalizes() {
        let json = r#"{
            "mac": "52:54:00:12:34:56",
            "ip": "192.168.1.143",
            "hostname": "laptop",
            "lease_remaining": 3600,
            "assign_time": 1360666000,
            "refresh_time": 1360666400,
            "is_static": false,
            "host": {"primary_name": "laptop", "active": true, "last_time_reachable": 1360666450}
        }"#;
        let mut lease: DynamicLease = serde_json::from_str(json).unwrap();
        lease.normalize();
        assert_eq!(lease.lease_remaining, 3600);
        assert!(!lease.is_static);
        assert!(lease.host.active);
        assert_eq!(lease.host.last_time_reachable.unwrap().timestamp(), 1360666450);
    }

    #[test]
    fn static_lease_payload_for_creation() {
        let payload = StaticLeasePayload {
            mac: Some("00:04:04:04:04:04".to_string()),
            ip: Some("192.168.0.123".to_string()),
            comment: Some("test".to_string()),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["mac"], "00:04:04:04:04:04");
        assert_eq!(json["ip"], "192.168.0.123");
        assert_eq!(json["comment"], "test");
    }
}
