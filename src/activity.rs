// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared activity feed persisted as a JSON file.
//!
//! Each control action taken from the dashboard can be recorded with the
//! visitor's name and a short message. The file keeps the newest
//! [`ActivityLog::MAX_STORED`] entries; readers see the newest
//! [`ActivityLog::MAX_RECENT`] without client metadata.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::{ParseError, Result, ValueError};
use crate::protocol::{Clock, SystemClock};

/// A stored activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    /// Creation time in milliseconds, as a string.
    pub id: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    /// Visitor name.
    pub name: String,
    /// Free-form message, possibly empty.
    pub message: String,
    /// What was done, e.g. `"turned on"`.
    pub action: String,
    /// Display name of the affected device.
    pub device_name: String,
    /// Client address, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Client user agent, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// An activity entry with client metadata removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicActivity {
    /// Entry id.
    pub id: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    /// Visitor name.
    pub name: String,
    /// Free-form message.
    pub message: String,
    /// What was done.
    pub action: String,
    /// Display name of the affected device.
    pub device_name: String,
}

impl From<ActivityItem> for PublicActivity {
    fn from(item: ActivityItem) -> Self {
        Self {
            id: item.id,
            timestamp: item.timestamp,
            name: item.name,
            message: item.message,
            action: item.action,
            device_name: item.device_name,
        }
    }
}

/// Input for [`ActivityLog::record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    /// Visitor name; blank becomes `"Anonymous"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form message.
    #[serde(default)]
    pub message: Option<String>,
    /// What was done. Required.
    pub action: String,
    /// Display name of the affected device. Required.
    pub device_name: String,
    /// Client address.
    #[serde(default)]
    pub ip: Option<String>,
    /// Client user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl NewActivity {
    /// Creates an entry with the required fields.
    #[must_use]
    pub fn new(action: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            device_name: device_name.into(),
            ..Self::default()
        }
    }

    /// Sets the visitor name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets client metadata.
    #[must_use]
    pub fn with_client(mut self, ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Append-only activity feed backed by `activity.json`.
///
/// # Examples
///
/// ```no_run
/// use lightbridge_lib::activity::{ActivityLog, NewActivity};
///
/// # async fn example() -> lightbridge_lib::Result<()> {
/// let log = ActivityLog::open("data").await?;
/// log.record(NewActivity::new("turned on", "Desk Lamp").with_name("Sam")).await?;
///
/// for entry in log.recent().await? {
///     println!("{} {} {}", entry.name, entry.action, entry.device_name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ActivityLog {
    path: PathBuf,
    file_lock: RwLock<()>,
    clock: Arc<dyn Clock>,
}

impl ActivityLog {
    /// File name inside the data directory.
    pub const FILE_NAME: &'static str = "activity.json";

    /// Entries kept on disk.
    pub const MAX_STORED: usize = 100;

    /// Entries returned by [`recent`](Self::recent).
    pub const MAX_RECENT: usize = 50;

    /// Opens the log in `dir`, creating the directory and an empty file if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the directory or file cannot be created.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_clock(dir, Arc::new(SystemClock)).await
    }

    /// Like [`open`](Self::open) with an explicit time source.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the directory or file cannot be created.
    pub async fn open_with_clock(dir: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let path = dir.join(Self::FILE_NAME);
        if !fs::try_exists(&path).await? {
            fs::write(&path, "[]").await?;
            tracing::debug!(path = %path.display(), "Created activity log");
        }

        Ok(Self {
            path,
            file_lock: RwLock::new(()),
            clock,
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends an entry and trims the file to the newest entries.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::MissingField` if `action` or `device_name` is
    /// blank, and storage or parse errors for the file.
    pub async fn record(&self, entry: NewActivity) -> Result<ActivityItem> {
        if entry.action.trim().is_empty() {
            return Err(ValueError::MissingField("action").into());
        }
        if entry.device_name.trim().is_empty() {
            return Err(ValueError::MissingField("deviceName").into());
        }

        let now = self.clock.now_millis();
        let item = ActivityItem {
            id: now.to_string(),
            timestamp: now,
            name: entry
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            message: entry.message.unwrap_or_default(),
            action: entry.action,
            device_name: entry.device_name,
            ip: entry.ip,
            user_agent: entry.user_agent,
        };

        let _guard = self.file_lock.write().await;
        let mut items = self.load().await?;
        items.push(item.clone());
        if items.len() > Self::MAX_STORED {
            items.drain(..items.len() - Self::MAX_STORED);
        }

        let json = serde_json::to_string_pretty(&items).map_err(ParseError::Json)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).await?;
        fs::rename(&staging, &self.path).await?;

        tracing::debug!(action = %item.action, device = %item.device_name, "Recorded activity");
        Ok(item)
    }

    /// Returns the newest entries first, without client metadata.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be read or holds invalid JSON.
    pub async fn recent(&self) -> Result<Vec<PublicActivity>> {
        let items = {
            let _guard = self.file_lock.read().await;
            self.load().await?
        };
        Ok(items
            .into_iter()
            .rev()
            .take(Self::MAX_RECENT)
            .map(PublicActivity::from)
            .collect())
    }

    async fn load(&self) -> Result<Vec<ActivityItem>> {
        let text = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&text)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
    }
}
