//! REST client for the playbook server, plus save sequencing.
//!
//! `PlaybookClient` wraps one `reqwest::Client` and maps every endpoint of
//! the folders/plays API to a typed async method. Non-2xx responses become
//! `RemoteError::Status` carrying the server's message when it sent one.
//!
//! `SaveTracker` keeps at most one save in flight. A new save is refused
//! until the previous one completes or fails, and only the in-flight
//! ticket may move the "last saved" marker, so a late response can never
//! roll the indicator back.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::doc::Element;

/// Header carrying the acting user's id.
pub const USER_HEADER: &str = "x-user-id";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("a save is already in progress")]
    SaveInFlight,
}

impl RemoteError {
    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: String,
    /// Present on listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub canvas: Vec<Element>,
    pub created_at: String,
    pub updated_at: String,
    /// Present on the recent-plays listing only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlay<'a> {
    pub name: &'a str,
    pub folder_id: Uuid,
    pub canvas: &'a [Element],
}

/// Partial play update; absent fields are left unchanged by the server.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<&'a [Element]>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
struct NewFolder<'a> {
    name: &'a str,
}

/// Build a `Status` error from a failed response body.
fn status_error(status: StatusCode, body: &str) -> RemoteError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("request failed").to_owned(),
        Err(_) => body.trim().to_owned(),
    };
    RemoteError::Status { status: status.as_u16(), message }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed client for the folders/plays REST API.
#[derive(Debug, Clone)]
pub struct PlaybookClient {
    http: reqwest::Client,
    base_url: String,
    user_id: Option<Uuid>,
}

impl PlaybookClient {
    /// Create a client for a server at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidBaseUrl` unless the URL is absolute http(s).
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let has_host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if !has_host {
            return Err(RemoteError::InvalidBaseUrl(base_url.to_owned()));
        }
        Ok(Self { http: reqwest::Client::new(), base_url: trimmed.to_owned(), user_id: None })
    }

    /// Act as `user_id` instead of the server's default user.
    #[must_use]
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.user_id {
            Some(user_id) => builder.header(USER_HEADER, user_id.to_string()),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, RemoteError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(status_error(status, &body));
        }
        Ok(resp.json::<T>().await?)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), RemoteError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(status_error(status, &body));
        }
        Ok(())
    }

    /// `GET /api/folders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn list_folders(&self) -> Result<Vec<Folder>, RemoteError> {
        Self::send_json(self.request(Method::GET, "/api/folders")).await
    }

    /// `POST /api/folders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the name is rejected.
    pub async fn create_folder(&self, name: &str) -> Result<Folder, RemoteError> {
        Self::send_json(self.request(Method::POST, "/api/folders").json(&NewFolder { name })).await
    }

    /// `DELETE /api/folders/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the folder does not exist.
    pub async fn delete_folder(&self, id: Uuid) -> Result<(), RemoteError> {
        Self::send_empty(self.request(Method::DELETE, &format!("/api/folders/{id}"))).await
    }

    /// `GET /api/plays/recent`. `None` uses the server default.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn recent_plays(&self, limit: Option<u32>) -> Result<Vec<Play>, RemoteError> {
        let path = match limit {
            Some(n) => format!("/api/plays/recent?limit={n}"),
            None => "/api/plays/recent".to_owned(),
        };
        Self::send_json(self.request(Method::GET, &path)).await
    }

    /// `GET /api/folders/:folderId/plays`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the folder does not exist.
    pub async fn folder_plays(&self, folder_id: Uuid) -> Result<Vec<Play>, RemoteError> {
        Self::send_json(self.request(Method::GET, &format!("/api/folders/{folder_id}/plays"))).await
    }

    /// `GET /api/plays/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the play does not exist.
    pub async fn get_play(&self, id: Uuid) -> Result<Play, RemoteError> {
        Self::send_json(self.request(Method::GET, &format!("/api/plays/{id}"))).await
    }

    /// `POST /api/plays`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the play is rejected.
    pub async fn create_play(&self, play: &NewPlay<'_>) -> Result<Play, RemoteError> {
        Self::send_json(self.request(Method::POST, "/api/plays").json(play)).await
    }

    /// `PUT /api/plays/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the update is rejected.
    pub async fn update_play(&self, id: Uuid, update: &PlayUpdate<'_>) -> Result<Play, RemoteError> {
        Self::send_json(self.request(Method::PUT, &format!("/api/plays/{id}")).json(update)).await
    }

    /// `DELETE /api/plays/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the play does not exist.
    pub async fn delete_play(&self, id: Uuid) -> Result<(), RemoteError> {
        Self::send_empty(self.request(Method::DELETE, &format!("/api/plays/{id}"))).await
    }
}

// =============================================================================
// SAVE SEQUENCING
// =============================================================================

/// Proof that a save was admitted by [`SaveTracker::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket(u64);

/// Tracks the editing session's remote play and its save state.
#[derive(Debug, Clone, Default)]
pub struct SaveTracker {
    next_ticket: u64,
    in_flight: Option<SaveTicket>,
    play_id: Option<Uuid>,
    last_saved_at: Option<String>,
}

impl SaveTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an already persisted play (opened from the server).
    #[must_use]
    pub fn for_play(play: &Play) -> Self {
        Self { play_id: Some(play.id), last_saved_at: Some(play.updated_at.clone()), ..Self::default() }
    }

    /// Admit a new save.
    ///
    /// # Errors
    ///
    /// Returns `SaveInFlight` while a previous save has not finished.
    pub fn begin(&mut self) -> Result<SaveTicket, RemoteError> {
        if self.in_flight.is_some() {
            return Err(RemoteError::SaveInFlight);
        }
        self.next_ticket += 1;
        let ticket = SaveTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Record a successful save. Returns whether the "last saved" marker
    /// moved: a ticket that is not in flight changes nothing, and a response
    /// older than the current marker only frees the slot.
    pub fn complete(&mut self, ticket: SaveTicket, play: &Play) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.play_id = Some(play.id);
        if !is_not_older(&play.updated_at, self.last_saved_at.as_deref()) {
            return false;
        }
        self.last_saved_at = Some(play.updated_at.clone());
        true
    }

    /// Record a failed save, freeing the slot for a retry.
    pub fn fail(&mut self, ticket: SaveTicket) {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Server id of the play, once it has been created.
    #[must_use]
    pub fn play_id(&self) -> Option<Uuid> {
        self.play_id
    }

    /// `updatedAt` of the most recent successful save.
    #[must_use]
    pub fn last_saved_at(&self) -> Option<&str> {
        self.last_saved_at.as_deref()
    }
}

/// Unparseable timestamps are treated as newer.
fn is_not_older(candidate: &str, current: Option<&str>) -> bool {
    let Some(current) = current else {
        return true;
    };
    match (OffsetDateTime::parse(candidate, &Rfc3339), OffsetDateTime::parse(current, &Rfc3339)) {
        (Ok(candidate), Ok(current)) => candidate >= current,
        _ => true,
    }
}

/// Send one save: `POST /api/plays` when `play_id` is `None`, otherwise a
/// full `PUT /api/plays/:id`.
///
/// Holds no tracker borrow, so hosts that share a `SaveTracker` (for
/// example behind `Rc<RefCell<_>>`) can `begin` before the call and
/// `complete`/`fail` after it without keeping the borrow across the await.
///
/// # Errors
///
/// Returns an error if the request fails or the server rejects the play.
pub async fn send_save(
    client: &PlaybookClient,
    play_id: Option<Uuid>,
    folder_id: Uuid,
    name: &str,
    elements: &[Element],
) -> Result<Play, RemoteError> {
    match play_id {
        Some(id) => {
            let update = PlayUpdate { name: Some(name), folder_id: Some(folder_id), canvas: Some(elements) };
            client.update_play(id, &update).await
        }
        None => client.create_play(&NewPlay { name, folder_id, canvas: elements }).await,
    }
}

/// Frees the tracker slot if the save future is dropped before it settles.
struct PendingSave<'a> {
    tracker: &'a mut SaveTracker,
    ticket: SaveTicket,
    settled: bool,
}

impl PendingSave<'_> {
    fn settle(mut self, result: &Result<Play, RemoteError>) {
        self.settled = true;
        match result {
            Ok(play) => {
                self.tracker.complete(self.ticket, play);
            }
            Err(e) => {
                log::warn!("play save failed: {e}");
                self.tracker.fail(self.ticket);
            }
        }
    }
}

impl Drop for PendingSave<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("play save abandoned before the server answered");
            self.tracker.fail(self.ticket);
        }
    }
}

/// Save the play: create it on first save, update it afterwards.
///
/// Dropping the returned future before it resolves releases the tracker,
/// so a timed-out save never blocks the next one.
///
/// # Errors
///
/// Returns `SaveInFlight` if another save is running, otherwise any request error.
pub async fn save_remote(
    client: &PlaybookClient,
    tracker: &mut SaveTracker,
    folder_id: Uuid,
    name: &str,
    elements: &[Element],
) -> Result<Play, RemoteError> {
    let ticket = tracker.begin()?;
    let play_id = tracker.play_id();
    let pending = PendingSave { tracker, ticket, settled: false };
    let result = send_save(client, play_id, folder_id, name, elements).await;
    pending.settle(&result);
    result
}
