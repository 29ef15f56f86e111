//! Port-forwarding (firewall redirection) rules.
//!
//! Plain CRUD over `fw/redir/`, gated by the `settings` capability. No
//! post-fetch normalization is needed — the records are flat.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;
use crate::error::Result;
use crate::resource::{PageQuery, Resource};
use crate::session::Freebox;

/// A port-forwarding rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FwRedirect {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Whether the rule is active.
    #[serde(default)]
    pub enabled: bool,
    /// Protocol: `tcp` or `udp`.
    #[serde(default)]
    pub ip_proto: String,
    /// First WAN port of the forwarded range.
    #[serde(default)]
    pub wan_port_start: u16,
    /// Last WAN port of the forwarded range.
    #[serde(default)]
    pub wan_port_end: u16,
    /// Target LAN address.
    #[serde(default)]
    pub lan_ip: String,
    /// Target LAN port.
    #[serde(default)]
    pub lan_port: u16,
    /// Source restriction, `0.0.0.0` for any.
    #[serde(default)]
    pub src_ip: String,
    /// Hostname of the target, when the router resolved one.
    #[serde(default)]
    pub hostname: String,
    /// Free-form comment.
    #[serde(default)]
    pub comment: String,
}

impl Resource for FwRedirect {
    const PATH: &'static str = "fw/redir";
    const KIND: &'static str = "port forward";
    const PERMISSION: Option<Capability> = Some(Capability::Settings);
}

/// Create/update body for a port-forwarding rule.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FwRedirectPayload {
    /// Whether the rule is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Protocol: `tcp` or `udp`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_proto: Option<String>,
    /// First WAN port of the forwarded range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wan_port_start: Option<u16>,
    /// Last WAN port of the forwarded range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wan_port_end: Option<u16>,
    /// Target LAN address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lan_ip: Option<String>,
    /// Target LAN port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lan_port: Option<u16>,
    /// Source restriction, `0.0.0.0` for any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_ip: Option<String>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Lists port-forwarding rules. Returns an empty vector, with zero network
/// calls, when the session lacks `settings`.
pub async fn list_redirects(fbx: &Freebox, query: &PageQuery) -> Result<Vec<FwRedirect>> {
    fbx.list(query).await
}

/// Fetches one rule by id.
pub async fn get_redirect(fbx: &Freebox, redirect_id: u32) -> Result<FwRedirect> {
    fbx.get(redirect_id).await
}

/// Creates a rule; returns the server-assigned form including its id.
pub async fn create_redirect(fbx: &Freebox, data: &FwRedirectPayload) -> Result<FwRedirect> {
    fbx.create(data).await
}

/// Updates a rule.
pub async fn update_redirect(
    fbx: &Freebox,
    redirect_id: u32,
    data: &FwRedirectPayload,
) -> Result<FwRedirect> {
    fbx.update(redirect_id, data).await
}

/// Deletes a rule. True iff the router reported success.
pub async fn delete_redirect(fbx: &Freebox, redirect_id: u32) -> Result<bool> {
    fbx.delete::<FwRedirect>(redirect_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_deserializes_full_rule() {
        let json = r#"{
            "id": 4,
            "enabled": true,
            "ip_proto": "tcp",
            "wan_port_start": 8080,
            "wan_port_end": 8080,
            "lan_ip": "192.168.1.42",
            "lan_port": 80,
            "src_ip": "0.0.0.0",
            "hostname": "nas",
            "comment": "web ui"
        }"#;
        let rule: FwRedirect = serde_json::from_str(json).unwrap();
        assert_eq!(rule.id, 4);
        assert!(rule.enabled);
        assert_eq!(rule.ip_proto, "tcp");
        assert_eq!(rule.wan_port_start, 8080);
        assert_eq!(rule.lan_port, 80);
    }

    #[test]
    fn payload_serializes_only_set_fields() {
        let payload = FwRedirectPayload {
            enabled: Some(false),
            ..FwRedirectPayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"enabled": false}));
    }
}
