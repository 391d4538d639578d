//! Notification domain entity
//!
//! A notification is identified by a registered type name (e.g.
//! "RegistrationEmailNotification"); its delivery channel is a tagged kind.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored notification definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NotificationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery channel and its channel-specific settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationKind {
    Email {
        from: Option<String>,
        to: Option<String>,
        #[serde(default)]
        cc: Vec<String>,
        #[serde(default)]
        bcc: Vec<String>,
    },
    Sms {
        number: Option<String>,
    },
}

impl NotificationKind {
    pub fn email() -> Self {
        NotificationKind::Email {
            from: None,
            to: None,
            cc: Vec::new(),
            bcc: Vec::new(),
        }
    }

    pub fn sms() -> Self {
        NotificationKind::Sms { number: None }
    }

    /// Channel name without settings
    pub fn channel(&self) -> &'static str {
        match self {
            NotificationKind::Email { .. } => "email",
            NotificationKind::Sms { .. } => "sms",
        }
    }
}

/// Owner of a tenant-specific notification override
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantIdentity {
    pub id: String,
    pub tenant_type: String,
}

/// Localized message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub language_code: String,
    pub subject: Option<String>,
    pub body: String,
}

/// A notification definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// None until the definition has been stored
    pub id: Option<NotificationId>,
    pub notification_type: String,
    #[serde(flatten)]
    pub kind: NotificationKind,
    pub is_active: bool,
    pub tenant: Option<TenantIdentity>,
    pub templates: Vec<NotificationTemplate>,
}

impl Notification {
    /// A fresh, active definition of the given type
    pub fn new(notification_type: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: None,
            notification_type: notification_type.into(),
            kind,
            is_active: true,
            tenant: None,
            templates: Vec::new(),
        }
    }

    /// Overlay a stored definition on top of this registered default
    ///
    /// Channel settings are only taken from `stored` when it uses the same channel.
    pub fn merge_stored(&mut self, stored: Notification) {
        self.id = stored.id;
        self.is_active = stored.is_active;
        self.tenant = stored.tenant;
        if stored.kind.channel() == self.kind.channel() {
            self.kind = stored.kind;
        }
        if !stored.templates.is_empty() {
            self.templates = stored.templates;
        }
    }

    pub fn template(&self, language_code: &str) -> Option<&NotificationTemplate> {
        self.templates
            .iter()
            .find(|t| t.language_code.eq_ignore_ascii_case(language_code))
    }
}
