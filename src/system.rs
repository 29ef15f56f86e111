//! Box information and system control.
//!
//! `GET system/` returns one flat record about the router itself;
//! [`get_box_info`] converts the numeric uptime into a `Duration` and sets
//! the `loaded` marker, passing every other field through unchanged. The
//! record is read-only and ungated — any authenticated session may read it.
//! Rebooting, by contrast, is gated by `settings`.

use serde::Deserialize;
use std::time::Duration;

use crate::auth::Capability;
use crate::error::Result;
use crate::session::Freebox;

/// Facts the router reports about itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoxInfo {
    /// Human-readable uptime, as formatted by the router.
    #[serde(default)]
    pub uptime: String,
    /// Uptime in seconds, as reported on the wire. See
    /// [`BoxInfo::uptime_duration`].
    #[serde(default)]
    pub uptime_val: u64,
    /// Firmware version string.
    #[serde(default)]
    pub firmware_version: String,
    /// Hardware board name.
    #[serde(default)]
    pub board_name: String,
    /// Router MAC address.
    #[serde(default)]
    pub mac: String,
    /// Router serial number.
    #[serde(default)]
    pub serial: String,
    /// Whether the box has authenticated against the operator network.
    #[serde(default)]
    pub box_authenticated: bool,
    /// Internal disk status, e.g. `"active"`.
    #[serde(default)]
    pub disk_status: String,
    /// Fan speed in RPM.
    #[serde(default)]
    pub fan_rpm: u32,
    /// CPU (b core) temperature, °C.
    #[serde(default)]
    pub temp_cpub: i32,
    /// CPU (m core) temperature, °C.
    #[serde(default)]
    pub temp_cpum: i32,
    /// Switch temperature, °C.
    #[serde(default)]
    pub temp_sw: i32,

    /// True once the record was populated from a successful fetch.
    #[serde(skip)]
    pub loaded: bool,
}

impl BoxInfo {
    /// The router's uptime as a `Duration`.
    pub fn uptime_duration(&self) -> Duration {
        Duration::from_secs(self.uptime_val)
    }
}

/// Fetches the box information record.
pub async fn get_box_info(fbx: &Freebox) -> Result<BoxInfo> {
    let resp = fbx.client.get::<BoxInfo>("system/").await?;
    let mut info = resp.into_result()?;
    info.loaded = true;
    Ok(info)
}

/// Asks the router to reboot. True iff the router reported success.
/// Returns `false`, with zero network calls, when the session lacks
/// `settings`.
pub async fn reboot(fbx: &Freebox) -> Result<bool> {
    if !fbx.permissions().allows(Capability::Settings) {
        tracing::debug!("permission gate: skipping reboot");
        return Ok(false);
    }
    let resp = fbx.client.post::<_, serde_json::Value>("system/reboot/", &()).await?;
    Ok(resp.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_info_deserializes_system_record() {
        let json = r#"{
            "uptime": "2 jours 13 heures 43 minutes 25 secondes",
            "uptime_val": 222205,
            "firmware_version": "3.2.2",
            "board_name": "fbxgw2r",
            "mac": "68:A3:78:00:00:00",
            "serial": "742210300000000",
            "box_authenticated": true,
            "disk_status": "active",
            "fan_rpm": 2130,
            "temp_cpub": 50,
            "temp_cpum": 52,
            "temp_sw": 46
        }"#;
        let info: BoxInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.uptime_val, 222205);
        assert_eq!(info.firmware_version, "3.2.2");
        assert_eq!(info.fan_rpm, 2130);
        assert!(info.box_authenticated);
        assert!(!info.loaded, "loaded is a client-side marker, never wire data");
    }

    #[test]
    fn uptime_converts_to_duration() {
        let info = BoxInfo {
            uptime_val: 222205,
            ..BoxInfo::default()
        };
        assert_eq!(info.uptime_duration(), Duration::from_secs(222205));
    }
}
