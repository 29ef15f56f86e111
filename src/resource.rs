//! Generic CRUD accessor shared by every resource kind.
//!
//! Every management resource on the router (contacts, call log, DHCP
//! leases, port forwards, ...) speaks the same convention:
//!
//! - `GET    {path}/`        — list, with `start`/`limit`/`page` paging
//! - `GET    {path}/{id}`    — fetch one item
//! - `POST   {path}/`        — create, returns the server-assigned form
//! - `PUT    {path}/{id}`    — update
//! - `DELETE {path}/{id}`    — delete, success flag only
//!
//! A resource kind supplies its URL path, display name, and gating
//! capability through the [`Resource`] trait; the five operations are
//! implemented once, as methods on [`Freebox`].
//!
//! The permission gate is client-side policy: when the session lacks the
//! kind's capability, each operation returns an empty/default value without
//! touching the network. It must not be mistaken for a security boundary —
//! the router enforces its own permissions regardless.

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

use crate::auth::Capability;
use crate::error::{FbxError, Result};
use crate::session::Freebox;

/// Page size used internally when a caller asks for the full collection
/// (`limit = -1`). The router caps per-request windows, so "unlimited" is
/// implemented by walking pages of this size until one comes back short.
const PAGE_CHUNK: u32 = 100;

/// A resource kind addressable through the generic accessor.
///
/// Implementations are data-only: a URL path, a display name for error
/// messages, and the capability that gates access. `Default` supplies the
/// empty value handed back when the permission gate short-circuits.
pub trait Resource: DeserializeOwned + Default {
    /// URL path relative to the API root, without the trailing slash
    /// (e.g. `"contact"`, `"call/log"`, `"dhcp/static_lease"`).
    const PATH: &'static str;
    /// Human-readable kind name used in `NotFound` errors.
    const KIND: &'static str;
    /// Capability gating this kind, or `None` for ungated resources.
    const PERMISSION: Option<Capability>;
}

/// List-window parameters: `{start, limit, page}`.
///
/// `limit = -1` (the default) means the entire collection: the accessor
/// exhausts every page rather than truncating at the first.
#[derive(Debug, Clone)]
pub struct PageQuery {
    /// Index of the first item to return.
    pub start: u32,
    /// Window size, or `-1` for the full collection.
    pub limit: i32,
    /// Page number, starting at 1.
    pub page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery {
            start: 0,
            limit: -1,
            page: 1,
        }
    }
}

impl PageQuery {
    /// The full collection (same as `Default`).
    pub fn all() -> Self {
        PageQuery::default()
    }

    /// A single explicit window.
    pub fn window(start: u32, limit: i32, page: u32) -> Self {
        PageQuery { start, limit, page }
    }

    fn params(start: u32, limit: i32, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("start", start.to_string()),
            ("limit", limit.to_string()),
            ("page", page.to_string()),
        ]
    }
}

fn item_path<R: Resource>(id: &impl Display) -> String {
    format!("{}/{id}", R::PATH)
}

fn list_path<R: Resource>() -> String {
    format!("{}/", R::PATH)
}

fn not_found<R: Resource>(id: &impl Display) -> FbxError {
    FbxError::NotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

/// Maps the two server-side "no such id" signals (HTTP 404, envelope code
/// `noent`) onto `FbxError::NotFound` for item-level operations.
fn map_missing<R: Resource>(err: FbxError, id: &impl Display) -> FbxError {
    match err {
        FbxError::Http {
            status: StatusCode::NOT_FOUND,
            ..
        } => not_found::<R>(id),
        FbxError::Api { ref code, .. } if code == "noent" => not_found::<R>(id),
        other => other,
    }
}

impl Freebox {
    /// Whether the session may touch resource kind `R`.
    fn permitted<R: Resource>(&self) -> bool {
        R::PERMISSION.map_or(true, |capability| self.permissions().allows(capability))
    }

    /// Lists items of kind `R` within the given window.
    ///
    /// With `limit = -1` the accessor walks consecutive pages of
    /// [`PAGE_CHUNK`] items until a short page, so the caller gets the whole
    /// collection regardless of the router's per-request window cap.
    ///
    /// Without the gating capability, returns an empty vector and performs
    /// zero network calls.
    pub async fn list<R: Resource>(&self, query: &PageQuery) -> Result<Vec<R>> {
        if !self.permitted::<R>() {
            tracing::debug!(kind = R::KIND, "permission gate: returning empty list");
            return Ok(Vec::new());
        }

        let path = list_path::<R>();
        if query.limit >= 0 {
            let params = PageQuery::params(query.start, query.limit, query.page);
            let resp = self.client.get_with_query::<Vec<R>>(&path, &params).await?;
            return resp.into_result_or_default();
        }

        // limit = -1: exhaust the collection page by page.
        let mut items = Vec::new();
        let mut start = query.start;
        let mut page = query.page;
        loop {
            let params = PageQuery::params(start, PAGE_CHUNK as i32, page);
            let resp = self.client.get_with_query::<Vec<R>>(&path, &params).await?;
            let batch = resp.into_result_or_default()?;
            let fetched = batch.len();
            items.extend(batch);
            if fetched < PAGE_CHUNK as usize {
                break;
            }
            start += PAGE_CHUNK;
            page += 1;
        }
        Ok(items)
    }

    /// Fetches one item of kind `R` by id.
    ///
    /// # Errors
    ///
    /// - `FbxError::NotFound` — the router reported no such id (HTTP 404 or
    ///   the `noent` envelope code).
    /// - `FbxError::Api` — any other server-reported failure.
    ///
    /// Without the gating capability, returns `R::default()` and performs
    /// zero network calls.
    pub async fn get<R: Resource>(&self, id: impl Display) -> Result<R> {
        if !self.permitted::<R>() {
            tracing::debug!(kind = R::KIND, "permission gate: returning default item");
            return Ok(R::default());
        }

        let path = item_path::<R>(&id);
        let resp = self
            .client
            .get::<R>(&path)
            .await
            .map_err(|e| map_missing::<R>(e, &id))?;
        if !resp.success && resp.error_code.as_deref() == Some("noent") {
            return Err(not_found::<R>(&id));
        }
        resp.into_result()
    }

    /// Creates an item of kind `R`; returns the server-assigned form,
    /// including the new identifier.
    ///
    /// Without the gating capability, returns `R::default()` and performs
    /// zero network calls.
    pub async fn create<R: Resource, B>(&self, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
    {
        if !self.permitted::<R>() {
            tracing::debug!(kind = R::KIND, "permission gate: skipping create");
            return Ok(R::default());
        }

        let resp = self.client.post::<B, R>(&list_path::<R>(), body).await?;
        resp.into_result()
    }

    /// Updates the item with the given id; the body may be a partial or a
    /// full field set. Returns the updated server-side form.
    ///
    /// # Errors
    ///
    /// Same `NotFound` mapping as [`Freebox::get`].
    pub async fn update<R: Resource, B>(&self, id: impl Display, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
    {
        if !self.permitted::<R>() {
            tracing::debug!(kind = R::KIND, "permission gate: skipping update");
            return Ok(R::default());
        }

        let path = item_path::<R>(&id);
        let resp = self
            .client
            .put::<B, R>(&path, body)
            .await
            .map_err(|e| map_missing::<R>(e, &id))?;
        if !resp.success && resp.error_code.as_deref() == Some("noent") {
            return Err(not_found::<R>(&id));
        }
        resp.into_result()
    }

    /// Deletes the item with the given id. Returns `true` iff the router
    /// reported success; a failure envelope yields `Ok(false)` rather than
    /// an error.
    ///
    /// Without the gating capability, returns `false` and performs zero
    /// network calls.
    pub async fn delete<R: Resource>(&self, id: impl Display) -> Result<bool> {
        if !self.permitted::<R>() {
            tracing::debug!(kind = R::KIND, "permission gate: skipping delete");
            return Ok(false);
        }

        let path = item_path::<R>(&id);
        let resp = self
            .client
            .delete::<serde_json::Value>(&path)
            .await
            .map_err(|e| map_missing::<R>(e, &id))?;
        Ok(resp.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_asks_for_everything() {
        let q = PageQuery::default();
        assert_eq!(q.start, 0);
        assert_eq!(q.limit, -1);
        assert_eq!(q.page, 1);
    }

    #[test]
    fn window_query_carries_explicit_values() {
        let q = PageQuery::window(40, 20, 3);
        assert_eq!(q.start, 40);
        assert_eq!(q.limit, 20);
        assert_eq!(q.page, 3);
    }

    #[test]
    fn params_render_as_strings() {
        let params = PageQuery::params(0, -1, 1);
        assert_eq!(
            params,
            vec![
                ("start", "0".to_string()),
                ("limit", "-1".to_string()),
                ("page", "1".to_string()),
            ]
        );
    }
}
