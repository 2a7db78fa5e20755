//! Caller-owned Graph session state
//!
//! Holds the two values the SharePoint pipeline learns at runtime: the bearer
//! token and the id of the site's drive. Operations take the session by
//! `&mut`, so sharing one across tasks requires an explicit lock on the
//! caller's side.

use core_auth::AccessToken;

use crate::types::DriveId;

/// Cached token and drive id for one Graph consumer.
#[derive(Debug, Clone, Default)]
pub struct GraphSession {
    token: Option<AccessToken>,
    drive_id: Option<DriveId>,
}

impl GraphSession {
    /// Empty session: the first request acquires a token, the first listing
    /// learns the drive id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with a known token
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Session seeded with a known drive id
    pub fn with_drive_id(mut self, drive_id: DriveId) -> Self {
        self.drive_id = Some(drive_id);
        self
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: AccessToken) {
        self.token = Some(token);
    }

    /// Drop the cached token; the next request acquires a new one.
    pub fn invalidate_token(&mut self) {
        self.token = None;
    }

    pub fn drive_id(&self) -> Option<&DriveId> {
        self.drive_id.as_ref()
    }

    /// Cache the drive id unless one is already known.
    ///
    /// Returns the id now cached.
    pub fn remember_drive_id(&mut self, drive_id: DriveId) -> &DriveId {
        self.drive_id.get_or_insert(drive_id)
    }

    /// Drop the cached drive id; the next resolution lists the site again.
    pub fn invalidate_drive(&mut self) {
        self.drive_id = None;
    }
}
