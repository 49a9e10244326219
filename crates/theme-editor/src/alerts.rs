//! Dismissible, auto-expiring alerts
//!
//! Save and delete outcomes that the user should see but that do not fail
//! the call (e.g. a remote save that was rejected after the local save
//! succeeded) are pushed here. Each alert records which theme it is about,
//! so an alert from an earlier save can still be told apart after the user
//! has moved on to another theme.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Default lifetime of an alert
pub const DEFAULT_ALERT_TTL_SECS: i64 = 10;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Informational
    Info,
    /// Operation succeeded
    Success,
    /// Partial failure
    Warning,
    /// Operation failed
    Error,
}

/// A user-facing alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Identifier used to dismiss the alert
    pub id: u64,
    /// Severity
    pub level: AlertLevel,
    /// Message text
    pub message: String,
    /// Theme the alert is about
    pub theme: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time after which the alert is no longer shown
    pub expires_at: DateTime<Utc>,
}

impl Alert {
    /// Whether the alert has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Shared alert list
#[derive(Debug)]
pub struct AlertCenter {
    alerts: Mutex<Vec<Alert>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl Default for AlertCenter {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_ALERT_TTL_SECS))
    }
}

impl AlertCenter {
    /// Create an alert center whose alerts live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self { alerts: Mutex::new(Vec::new()), next_id: AtomicU64::new(1), ttl }
    }

    /// Create an alert center whose alerts live for `secs` seconds
    pub fn with_ttl_secs(secs: i64) -> Self {
        Self::new(Duration::seconds(secs))
    }

    /// Push an alert created now
    pub fn push(&self, level: AlertLevel, message: impl Into<String>, theme: Option<&str>) -> u64 {
        self.push_at(Utc::now(), level, message, theme)
    }

    /// Push an alert created at `now`
    pub fn push_at(
        &self,
        now: DateTime<Utc>,
        level: AlertLevel,
        message: impl Into<String>,
        theme: Option<&str>,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let alert = Alert {
            id,
            level,
            message: message.into(),
            theme: theme.map(str::to_string),
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.alerts.lock().push(alert);
        id
    }

    /// Remove an alert. Returns whether it existed
    pub fn dismiss(&self, id: u64) -> bool {
        let mut alerts = self.alerts.lock();
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        alerts.len() != before
    }

    /// Alerts still visible at `now`, oldest first
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Alert> {
        self.alerts.lock().iter().filter(|a| !a.is_expired(now)).cloned().collect()
    }

    /// Alerts still visible now
    pub fn current(&self) -> Vec<Alert> {
        self.active(Utc::now())
    }

    /// Drop expired alerts. Returns how many were removed
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut alerts = self.alerts.lock();
        let before = alerts.len();
        alerts.retain(|a| !a.is_expired(now));
        before - alerts.len()
    }
}
