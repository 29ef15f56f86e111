//! Front-panel LCD configuration.
//!
//! Get/update only — the LCD has no collection semantics. Gated by the
//! `settings` capability; a gated call returns the default configuration
//! without touching the network, like every other gated accessor.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;
use crate::error::Result;
use crate::session::Freebox;

/// LCD panel settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LcdConfig {
    /// Backlight brightness, percent.
    #[serde(default)]
    pub brightness: u32,
    /// Display rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub orientation: u32,
    /// Whether the rotation is user-forced rather than auto-detected.
    #[serde(default)]
    pub orientation_forced: bool,
}

/// Update body for the LCD settings. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LcdConfigUpdate {
    /// New backlight brightness, percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u32>,
    /// New display rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u32>,
    /// Whether the rotation is user-forced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation_forced: Option<bool>,
}

/// Fetches the LCD configuration.
pub async fn get_lcd_config(fbx: &Freebox) -> Result<LcdConfig> {
    if !fbx.permissions().allows(Capability::Settings) {
        tracing::debug!("permission gate: returning default lcd config");
        return Ok(LcdConfig::default());
    }
    let resp = fbx.client.get::<LcdConfig>("lcd/config/").await?;
    resp.into_result()
}

/// Updates the LCD configuration; returns the applied settings.
pub async fn update_lcd_config(fbx: &Freebox, update: &LcdConfigUpdate) -> Result<LcdConfig> {
    if !fbx.permissions().allows(Capability::Settings) {
        tracing::debug!("permission gate: skipping lcd update");
        return Ok(LcdConfig::default());
    }
    let resp = fbx.client.put::<_, LcdConfig>("lcd/config/", update).await?;
    resp.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes() {
        let config: LcdConfig = serde_json::from_str(
            r#"{"brightness": 50, "orientation": 90, "orientation_forced": false}"#,
        )
        .unwrap();
        assert_eq!(config.brightness, 50);
        assert_eq!(config.orientation, 90);
        assert!(!config.orientation_forced);
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = LcdConfigUpdate {
            brightness: Some(100),
            ..LcdConfigUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"brightness": 100}));
    }
}
