//! Call log access and call-kind normalization.
//!
//! The router reports a call's direction/outcome as a single `type` string
//! (`"missed"`, `"accepted"`, `"outgoing"`). [`Call::derive_flags`] expands
//! that tag into three mutually exclusive booleans after fetch, which is
//! what the accessors in this module return. An unrecognized tag leaves all
//! three flags unset — new firmware values degrade to "no flag" rather than
//! failing.
//!
//! Gated by the `calls` capability.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;
use crate::error::Result;
use crate::resource::{PageQuery, Resource};
use crate::session::Freebox;

/// One entry in the call log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Call {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Raw call kind tag: `missed`, `accepted` or `outgoing`.
    #[serde(default, rename = "type")]
    pub call_type: String,
    /// Remote party's number.
    #[serde(default)]
    pub number: String,
    /// Remote party's name when the contact book matched the number.
    #[serde(default)]
    pub name: String,
    /// Unix timestamp of the call.
    #[serde(default)]
    pub datetime: i64,
    /// Call duration in seconds.
    #[serde(default)]
    pub duration: u32,
    /// Whether the entry is unread in the router UI.
    #[serde(default)]
    pub new: bool,
    /// Matching contact id, when the number resolved to a contact.
    #[serde(default)]
    pub contact_id: Option<u32>,

    /// Incoming call that was not picked up. Derived from `call_type`.
    #[serde(skip)]
    pub missed: bool,
    /// Incoming call that was picked up. Derived from `call_type`.
    #[serde(skip)]
    pub accepted: bool,
    /// Call placed from this line. Derived from `call_type`.
    #[serde(skip)]
    pub outgoing: bool,
}

impl Call {
    /// Expands the `type` tag into the three direction flags.
    ///
    /// The flags are mutually exclusive; an unrecognized tag leaves all
    /// three false.
    pub fn derive_flags(&mut self) {
        match self.call_type.as_str() {
            "missed" => {
                self.missed = true;
                self.accepted = false;
                self.outgoing = false;
            }
            "accepted" => {
                self.missed = false;
                self.accepted = true;
                self.outgoing = false;
            }
            "outgoing" => {
                self.missed = false;
                self.accepted = false;
                self.outgoing = true;
            }
            _ => {}
        }
    }
}

impl Resource for Call {
    const PATH: &'static str = "call/log";
    const KIND: &'static str = "call";
    const PERMISSION: Option<Capability> = Some(Capability::Calls);
}

/// Update body for a call-log entry. The only mutable field is the unread
/// marker.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallUpdate {
    /// New unread state; `Some(false)` marks the entry read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<bool>,
}

/// Lists call-log entries with the direction flags derived. Returns an
/// empty vector, with zero network calls, when the session lacks the
/// `calls` capability.
pub async fn list_calls(fbx: &Freebox, query: &PageQuery) -> Result<Vec<Call>> {
    let mut calls: Vec<Call> = fbx.list(query).await?;
    for call in &mut calls {
        call.derive_flags();
    }
    Ok(calls)
}

/// Fetches one call-log entry by id, with the direction flags derived.
pub async fn get_call(fbx: &Freebox, call_id: u32) -> Result<Call> {
    let mut call: Call = fbx.get(call_id).await?;
    call.derive_flags();
    Ok(call)
}

/// Updates a call-log entry (e.g. marks it read).
pub async fn update_call(fbx: &Freebox, call_id: u32, data: &CallUpdate) -> Result<Call> {
    let mut call: Call = fbx.update(call_id, data).await?;
    call.derive_flags();
    Ok(call)
}

/// Deletes a call-log entry. True iff the router reported success.
pub async fn delete_call(fbx: &Freebox, call_id: u32) -> Result<bool> {
    fbx.delete::<Call>(call_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_with_type(tag: &str) -> Call {
        let mut call: Call = serde_json::from_str(&format!(
            r#"{{"id": 1, "type": "{tag}", "number": "0102030405", "datetime": 1360666509, "duration": 25}}"#
        ))
        .unwrap();
        call.derive_flags();
        call
    }

    #[test]
    fn missed_tag_sets_only_missed() {
        let call = call_with_type("missed");
        assert!(call.missed);
        assert!(!call.accepted);
        assert!(!call.outgoing);
    }

    #[test]
    fn accepted_tag_sets_only_accepted() {
        let call = call_with_type("accepted");
        assert!(!call.missed);
        assert!(call.accepted);
        assert!(!call.outgoing);
    }

    #[test]
    fn outgoing_tag_sets_only_outgoing() {
        let call = call_with_type("outgoing");
        assert!(!call.missed);
        assert!(!call.accepted);
        assert!(call.outgoing);
    }

    #[test]
    fn unrecognized_tag_leaves_all_flags_unset() {
        let call = call_with_type("voicemail");
        assert!(!call.missed);
        assert!(!call.accepted);
        assert!(!call.outgoing);
    }

    #[test]
    fn flags_never_serialize_back_to_the_wire() {
        // The flags are client-side derivations; only `new` is mutable
        // through the update payload.
        let update = CallUpdate { new: Some(false) };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"new": false}));
    }

    #[test]
    fn call_deserializes_with_contact_match() {
        let json = r#"{
            "id": 69,
            "type": "missed",
            "number": "0102030405",
            "name": "Sandy Kilo",
            "datetime": 1360666509,
            "duration": 12,
            "new": true,
            "contact_id": 3
        }"#;
        let call: Call = serde_json::from_str(json).unwrap();
        assert_eq!(call.contact_id, Some(3));
        assert!(call.new);
        assert_eq!(call.name, "Sandy Kilo");
    }
}
