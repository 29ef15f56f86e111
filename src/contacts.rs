//! Contact book access: contacts, groups, and the per-contact sub-resources
//! (phone numbers, postal addresses, emails, URLs).
//!
//! Every kind here is gated by the `contacts` capability. Item ids are
//! server-assigned integers. The sub-resources are flat records pointing
//! back at their contact via `contact_id` — the router does not enforce
//! referential integrity client-side and neither does this crate.

use serde::{Deserialize, Serialize};

use crate::auth::Capability;
use crate::error::Result;
use crate::resource::{PageQuery, Resource};
use crate::session::Freebox;

// ── Wire types ─────────────────────────────────────────────────────────

/// An entry in the router's contact book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contact {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Display name, usually "first last".
    #[serde(default)]
    pub display_name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Company name.
    #[serde(default)]
    pub company: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// URL of the contact photo, when one was uploaded.
    #[serde(default)]
    pub photo_url: String,
    /// Birthday as reported by the router (ISO date string).
    #[serde(default)]
    pub birthday: String,
    /// Unix timestamp of the last modification.
    #[serde(default)]
    pub last_update: Option<i64>,
}

impl Resource for Contact {
    const PATH: &'static str = "contact";
    const KIND: &'static str = "contact";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

/// A contact group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactGroup {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Group display name.
    #[serde(default)]
    pub name: String,
    /// Number of contacts in the group.
    #[serde(default)]
    pub nb_contact: u32,
}

impl Resource for ContactGroup {
    const PATH: &'static str = "group";
    const KIND: &'static str = "group";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

/// A phone number attached to a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Number {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Owning contact.
    #[serde(default)]
    pub contact_id: u32,
    /// The phone number itself.
    #[serde(default)]
    pub number: String,
    /// Number kind: `fixed`, `mobile`, `work`, `fax`, `other`.
    #[serde(default, rename = "type")]
    pub number_type: String,
    /// Whether this is the contact's default number.
    #[serde(default)]
    pub is_default: bool,
    /// Whether this number belongs to the Freebox owner.
    #[serde(default)]
    pub is_own: bool,
}

impl Resource for Number {
    const PATH: &'static str = "number";
    const KIND: &'static str = "number";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

/// A postal address attached to a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Owning contact.
    #[serde(default)]
    pub contact_id: u32,
    /// Address kind: `home`, `work`, `other`.
    #[serde(default, rename = "type")]
    pub address_type: String,
    /// Street, first line.
    #[serde(default)]
    pub street: String,
    /// Street, second line.
    #[serde(default)]
    pub street2: String,
    /// City.
    #[serde(default)]
    pub city: String,
    /// Postal code.
    #[serde(default)]
    pub zipcode: String,
    /// Country.
    #[serde(default)]
    pub country: String,
}

impl Resource for Address {
    const PATH: &'static str = "address";
    const KIND: &'static str = "address";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

/// An email address attached to a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Email {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Owning contact.
    #[serde(default)]
    pub contact_id: u32,
    /// The address itself.
    #[serde(default)]
    pub email: String,
    /// Email kind: `home`, `work`, `other`.
    #[serde(default, rename = "type")]
    pub email_type: String,
}

impl Resource for Email {
    const PATH: &'static str = "email";
    const KIND: &'static str = "email";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

/// A web URL attached to a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Url {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: u32,
    /// Owning contact.
    #[serde(default)]
    pub contact_id: u32,
    /// The URL itself.
    #[serde(default)]
    pub url: String,
    /// URL kind: `profile`, `blog`, `site`, `other`.
    #[serde(default, rename = "type")]
    pub url_type: String,
}

impl Resource for Url {
    const PATH: &'static str = "url";
    const KIND: &'static str = "url";
    const PERMISSION: Option<Capability> = Some(Capability::Contacts);
}

// ── Request payloads ───────────────────────────────────────────────────

/// Create/update body for a contact. Every field is optional; on update,
/// omitted fields are left unchanged by the router.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactPayload {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// New notes text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// New birthday (ISO date string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Create/update body for a phone number.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NumberPayload {
    /// Contact to attach to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u32>,
    /// The phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Number kind: `fixed`, `mobile`, `work`, `fax`, `other`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub number_type: Option<String>,
    /// Whether this becomes the contact's default number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Create/update body for a postal address.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddressPayload {
    /// Contact to attach to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u32>,
    /// Address kind: `home`, `work`, `other`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    /// Street, first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    /// Country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Create/update body for an email address.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmailPayload {
    /// Contact to attach to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u32>,
    /// The email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Email kind: `home`, `work`, `other`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
}

/// Create/update body for a URL.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UrlPayload {
    /// Contact to attach to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<u32>,
    /// The URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// URL kind: `profile`, `blog`, `site`, `other`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub url_type: Option<String>,
}

/// Create/update body for a group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupPayload {
    /// New group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ── Accessors ──────────────────────────────────────────────────────────

/// Lists contacts within the given window (`PageQuery::all()` for the
/// whole book). Returns an empty vector, with zero network calls, when the
/// session lacks the `contacts` capability.
pub async fn list_contacts(fbx: &Freebox, query: &PageQuery) -> Result<Vec<Contact>> {
    fbx.list(query).await
}

/// Fetches one contact by id.
pub async fn get_contact(fbx: &Freebox, contact_id: u32) -> Result<Contact> {
    fbx.get(contact_id).await
}

/// Creates a contact; returns the server-assigned form including its id.
pub async fn create_contact(fbx: &Freebox, data: &ContactPayload) -> Result<Contact> {
    fbx.create(data).await
}

/// Updates a contact's fields.
pub async fn update_contact(fbx: &Freebox, contact_id: u32, data: &ContactPayload) -> Result<Contact> {
    fbx.update(contact_id, data).await
}

/// Deletes a contact. True iff the router reported success.
pub async fn delete_contact(fbx: &Freebox, contact_id: u32) -> Result<bool> {
    fbx.delete::<Contact>(contact_id).await
}

/// Lists all contact groups.
pub async fn list_groups(fbx: &Freebox) -> Result<Vec<ContactGroup>> {
    fbx.list(&PageQuery::all()).await
}

/// Fetches one group by id.
pub async fn get_group(fbx: &Freebox, group_id: u32) -> Result<ContactGroup> {
    fbx.get(group_id).await
}

/// Creates a group.
pub async fn create_group(fbx: &Freebox, data: &GroupPayload) -> Result<ContactGroup> {
    fbx.create(data).await
}

/// Updates a group.
pub async fn update_group(fbx: &Freebox, group_id: u32, data: &GroupPayload) -> Result<ContactGroup> {
    fbx.update(group_id, data).await
}

/// Deletes a group.
pub async fn delete_group(fbx: &Freebox, group_id: u32) -> Result<bool> {
    fbx.delete::<ContactGroup>(group_id).await
}

/// Fetches one phone number by id.
pub async fn get_number(fbx: &Freebox, number_id: u32) -> Result<Number> {
    fbx.get(number_id).await
}

/// Attaches a phone number to a contact.
pub async fn create_number(fbx: &Freebox, data: &NumberPayload) -> Result<Number> {
    fbx.create(data).await
}

/// Updates a phone number.
pub async fn update_number(fbx: &Freebox, number_id: u32, data: &NumberPayload) -> Result<Number> {
    fbx.update(number_id, data).await
}

/// Deletes a phone number.
pub async fn delete_number(fbx: &Freebox, number_id: u32) -> Result<bool> {
    fbx.delete::<Number>(number_id).await
}

/// Fetches one postal address by id.
pub async fn get_address(fbx: &Freebox, address_id: u32) -> Result<Address> {
    fbx.get(address_id).await
}

/// Attaches a postal address to a contact.
pub async fn create_address(fbx: &Freebox, data: &AddressPayload) -> Result<Address> {
    fbx.create(data).await
}

/// Updates a postal address.
pub async fn update_address(fbx: &Freebox, address_id: u32, data: &AddressPayload) -> Result<Address> {
    fbx.update(address_id, data).await
}

/// Deletes a postal address.
pub async fn delete_address(fbx: &Freebox, address_id: u32) -> Result<bool> {
    fbx.delete::<Address>(address_id).await
}

/// Fetches one email address by id.
pub async fn get_email(fbx: &Freebox, email_id: u32) -> Result<Email> {
    fbx.get(email_id).await
}

/// Attaches an email address to a contact.
pub async fn create_email(fbx: &Freebox, data: &EmailPayload) -> Result<Email> {
    fbx.create(data).await
}

/// Updates an email address.
pub async fn update_email(fbx: &Freebox, email_id: u32, data: &EmailPayload) -> Result<Email> {
    fbx.update(email_id, data).await
}

/// Deletes an email address.
pub async fn delete_email(fbx: &Freebox, email_id: u32) -> Result<bool> {
    fbx.delete::<Email>(email_id).await
}

/// Fetches one URL by id.
pub async fn get_url(fbx: &Freebox, url_id: u32) -> Result<Url> {
    fbx.get(url_id).await
}

/// Attaches a URL to a contact.
pub async fn create_url(fbx: &Freebox, data: &UrlPayload) -> Result<Url> {
    fbx.create(data).await
}

/// Updates a URL.
pub async fn update_url(fbx: &Freebox, url_id: u32, data: &UrlPayload) -> Result<Url> {
    fbx.update(url_id, data).await
}

/// Deletes a URL.
pub async fn delete_url(fbx: &Freebox, url_id: u32) -> Result<bool> {
    fbx.delete::<Url>(url_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_deserializes_full_record() {
        let json = r#"{
            "id": 3,
            "display_name": "Sandy Kilo",
            "first_name": "Sandy",
            "last_name": "Kilo",
            "company": "Example SARL",
            "notes": "",
            "photo_url": "",
            "birthday": "1984-03-19",
            "last_update": 1360666509
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert_eq!(contact.id, 3);
        assert_eq!(contact.display_name, "Sandy Kilo");
        assert_eq!(contact.birthday, "1984-03-19");
        assert_eq!(contact.last_update, Some(1360666509));
    }

    #[test]
    fn contact_deserializes_sparse_record() {
        let contact: Contact = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(contact.id, 9);
        assert!(contact.display_name.is_empty());
        assert!(contact.last_update.is_none());
    }

    #[test]
    fn number_maps_type_field() {
        let json = r#"{"id": 5, "contact_id": 3, "number": "0123456789", "type": "mobile", "is_default": true}"#;
        let number: Number = serde_json::from_str(json).unwrap();
        assert_eq!(number.number_type, "mobile");
        assert!(number.is_default);
        assert!(!number.is_own);
    }

    #[test]
    fn contact_payload_omits_unset_fields() {
        let payload = ContactPayload {
            display_name: Some("Sandy Kilo".to_string()),
            ..ContactPayload::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["display_name"], "Sandy Kilo");
        assert!(
            json.get("first_name").is_none(),
            "unset fields must be omitted so the router leaves them unchanged"
        );
    }

    #[test]
    fn number_payload_serializes_type_under_wire_name() {
        let payload = NumberPayload {
            contact_id: Some(3),
            number: Some("0600000000".to_string()),
            number_type: Some("mobile".to_string()),
            is_default: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "mobile");
        assert!(json.get("number_type").is_none());
        assert!(json.get("is_default").is_none());
    }
}
