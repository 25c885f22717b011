//! Telegram identity resolution
//!
//! A submission can carry at most one identity signal. Sources, highest
//! confidence first:
//! 1. user id exposed by the Mini-App runtime (`initDataUnsafe.user.id`)
//! 2. Login Widget auth result (arrives asynchronously through [`AuthMailbox`])
//! 3. raw `initData` blob, when the runtime exposes no user object
//! 4. nothing
//!
//! Resolution happens at submit time, never at page load, because the
//! Login Widget callback may fire at any point before the submit.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use super::telegram_auth;

/// Auth object passed by the Telegram Login Widget to its `data-onauth` callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginWidgetAuth {
    pub id: i64,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_date: i64,
    pub hash: String,
}

impl LoginWidgetAuth {
    /// `key=value` lines of every present field except `hash`, sorted by key
    pub fn data_check_string(&self) -> String {
        let mut pairs = vec![
            format!("auth_date={}", self.auth_date),
            format!("first_name={}", self.first_name),
            format!("id={}", self.id),
        ];
        let optional = [
            ("last_name", &self.last_name),
            ("photo_url", &self.photo_url),
            ("username", &self.username),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push(format!("{}={}", key, value));
            }
        }
        pairs.sort();
        pairs.join("\n")
    }
}

/// The identity attached to one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    None,
    WebAppUserId(i64),
    LoginWidgetAuth(LoginWidgetAuth),
    InitDataBlob(String),
}

impl Identity {
    pub fn is_none(&self) -> bool {
        matches!(self, Identity::None)
    }

    /// Short source label for logs and the diagnostic trace
    pub fn source(&self) -> &'static str {
        match self {
            Identity::None => "none",
            Identity::WebAppUserId(_) => "webapp_user",
            Identity::LoginWidgetAuth(_) => "login_widget",
            Identity::InitDataBlob(_) => "init_data",
        }
    }
}

/// The surrounding Mini-App runtime (`window.Telegram.WebApp`), consumed read-only
pub trait HostBridge: Send + Sync {
    /// Signals the runtime that the page is ready to be shown
    fn ready(&self) {}

    /// Asks the runtime to expand the viewport to full height
    fn expand(&self) {}

    /// `initDataUnsafe.user.id`, when the runtime exposes a user object
    fn user_id(&self) -> Option<i64>;

    /// Raw `initData` query string, when running inside the runtime
    fn init_data(&self) -> Option<String>;
}

/// A host bridge backed by values captured once (from the runtime, env or CLI)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSnapshot {
    pub user_id: Option<i64>,
    pub init_data: Option<String>,
}

impl HostSnapshot {
    /// Not launched inside the Mini-App runtime
    pub fn absent() -> Self {
        Self::default()
    }

    /// Builds the snapshot from a raw initData string the way the runtime
    /// does: the `user` parameter becomes the structured user object.
    pub fn from_init_data(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Self::absent();
        }
        let user_id = telegram_auth::extract_user_id(&raw).ok();
        Self {
            user_id,
            init_data: Some(raw),
        }
    }
}

impl HostBridge for HostSnapshot {
    fn ready(&self) {
        log::debug!("Host bridge ready (in runtime: {})", self.init_data.is_some());
    }

    fn expand(&self) {
        log::debug!("Host bridge expand requested");
    }

    fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }
}

/// Single-slot mailbox for the Login Widget callback.
///
/// The external bridge writes whenever the user authenticates (a later auth
/// overwrites an earlier one); the resolver reads the latest value at submit
/// time. Clones share the same slot.
#[derive(Debug, Clone)]
pub struct AuthMailbox {
    slot: Arc<watch::Sender<Option<LoginWidgetAuth>>>,
}

impl Default for AuthMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthMailbox {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    /// Stores an auth result, replacing any previous one
    pub fn deliver(&self, auth: LoginWidgetAuth) {
        log::info!("🔐 Login Widget auth received for user {}", auth.id);
        self.slot.send_replace(Some(auth));
    }

    /// The most recent auth result, if any
    pub fn latest(&self) -> Option<LoginWidgetAuth> {
        self.slot.borrow().clone()
    }
}

/// Picks the best identity signal available right now
#[derive(Clone)]
pub struct IdentityResolver {
    host: Arc<dyn HostBridge>,
    mailbox: AuthMailbox,
}

impl IdentityResolver {
    pub fn new(host: Arc<dyn HostBridge>, mailbox: AuthMailbox) -> Self {
        Self { host, mailbox }
    }

    pub fn mailbox(&self) -> &AuthMailbox {
        &self.mailbox
    }

    /// First non-empty source wins
    pub fn resolve(&self) -> Identity {
        if let Some(id) = self.host.user_id() {
            log::debug!("Identity resolved from webapp user: {}", id);
            return Identity::WebAppUserId(id);
        }
        if let Some(auth) = self.mailbox.latest() {
            log::debug!("Identity resolved from Login Widget: {}", auth.id);
            return Identity::LoginWidgetAuth(auth);
        }
        if let Some(blob) = self.host.init_data().filter(|d| !d.trim().is_empty()) {
            log::debug!("Identity resolved from raw initData ({} bytes)", blob.len());
            return Identity::InitDataBlob(blob);
        }
        log::info!("No Telegram identity available, submitting contact fields only");
        Identity::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn widget_auth(id: i64) -> LoginWidgetAuth {
        LoginWidgetAuth {
            id,
            first_name: "Anna".to_string(),
            last_name: None,
            username: Some("anna".to_string()),
            photo_url: None,
            auth_date: 1_700_000_000,
            hash: "deadbeef".to_string(),
        }
    }

    fn resolver(host: HostSnapshot, mailbox: &AuthMailbox) -> IdentityResolver {
        IdentityResolver::new(Arc::new(host), mailbox.clone())
    }

    #[test]
    fn test_webapp_user_wins_over_everything() {
        let mailbox = AuthMailbox::new();
        mailbox.deliver(widget_auth(7));
        let host = HostSnapshot {
            user_id: Some(42),
            init_data: Some("query_id=abc".to_string()),
        };

        assert_eq!(resolver(host, &mailbox).resolve(), Identity::WebAppUserId(42));
    }

    #[test]
    fn test_widget_wins_over_blob() {
        let mailbox = AuthMailbox::new();
        let host = HostSnapshot {
            user_id: None,
            init_data: Some("query_id=abc".to_string()),
        };
        let resolver = resolver(host, &mailbox);

        assert_eq!(resolver.resolve(), Identity::InitDataBlob("query_id=abc".to_string()));

        // Auth arriving after construction is seen by the next resolve
        mailbox.deliver(widget_auth(7));
        assert_eq!(resolver.resolve(), Identity::LoginWidgetAuth(widget_auth(7)));
    }

    #[test]
    fn test_later_auth_overwrites_earlier() {
        let mailbox = AuthMailbox::new();
        mailbox.deliver(widget_auth(1));
        mailbox.deliver(widget_auth(2));
        assert_eq!(mailbox.latest().map(|a| a.id), Some(2));
    }

    #[test]
    fn test_nothing_available() {
        let mailbox = AuthMailbox::new();
        let host = HostSnapshot {
            user_id: None,
            init_data: Some("   ".to_string()),
        };
        assert!(resolver(host, &mailbox).resolve().is_none());
    }

    #[test]
    fn test_snapshot_from_init_data() {
        let raw = "query_id=AAE&user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Test%22%7D&auth_date=1&hash=ab";
        let host = HostSnapshot::from_init_data(raw);
        assert_eq!(host.user_id, Some(42));
        assert_eq!(host.init_data.as_deref(), Some(raw));

        let host = HostSnapshot::from_init_data("query_id=AAE&auth_date=1&hash=ab");
        assert_eq!(host.user_id, None);
        assert!(host.init_data.is_some());

        assert_eq!(HostSnapshot::from_init_data(""), HostSnapshot::absent());
    }

    #[test]
    fn test_data_check_string_sorted_without_hash() {
        let auth = widget_auth(99);
        assert_eq!(
            auth.data_check_string(),
            "auth_date=1700000000\nfirst_name=Anna\nid=99\nusername=anna"
        );
    }

    #[test]
    fn test_widget_auth_json_shape() {
        let json = r#"{"id":5,"first_name":"Ivan","auth_date":1700000000,"hash":"ff"}"#;
        let auth: LoginWidgetAuth = serde_json::from_str(json).unwrap();
        assert_eq!(auth.id, 5);
        assert_eq!(auth.last_name, None);

        let back = serde_json::to_value(&auth).unwrap();
        assert_eq!(back, serde_json::json!({"id":5,"first_name":"Ivan","auth_date":1700000000,"hash":"ff"}));
    }

    #[tokio::test]
    async fn test_delivery_from_another_task_is_seen() {
        let mailbox = AuthMailbox::new();
        let callback = mailbox.clone();
        tokio::spawn(async move { callback.deliver(widget_auth(3)) }).await.unwrap();
        assert_eq!(mailbox.latest().map(|a| a.id), Some(3));
    }
}
