//! In-app notification model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{NotificationType, ReadFilter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(rename = "type", default = "default_type")]
    pub kind: NotificationType,
    pub title: String,
    #[serde(default)]
    pub message: String,
    /// Usually `{claim_id, item_id}`; kept raw since old rows hold plain strings
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub read_at: Option<NaiveDateTime>,
}

fn default_type() -> NotificationType {
    NotificationType::Info
}

impl Notification {
    fn metadata_id(&self, key: &str) -> Option<i64> {
        self.metadata.as_ref()?.get(key)?.as_i64()
    }

    pub fn claim_id(&self) -> Option<i64> {
        self.metadata_id("claim_id")
    }

    pub fn item_id(&self) -> Option<i64> {
        self.metadata_id("item_id")
    }

    /// "Claim #12 • Item #4", only when a claim is referenced
    pub fn meta_line(&self) -> Option<String> {
        let claim_id = self.claim_id()?;
        Some(match self.item_id() {
            Some(item_id) => format!("Claim #{} • Item #{}", claim_id, item_id),
            None => format!("Claim #{}", claim_id),
        })
    }
}

/// Filters for `GET /api/notifications`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    pub status: ReadFilter,
    pub limit: u32,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            status: ReadFilter::Unread,
            limit: 10,
        }
    }
}

impl NotificationQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("status".to_string(), self.status.as_str().to_string()),
            ("limit".to_string(), self.limit.clamp(1, 100).to_string()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListResponse {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_line_reads_structured_metadata_only() {
        let n: Notification = serde_json::from_str(
            r#"{"notification_id": 1, "type": "success", "title": "Claim approved",
                "metadata": {"claim_id": 12, "item_id": 4}, "created_at": "2024-03-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(n.meta_line().as_deref(), Some("Claim #12 • Item #4"));

        let legacy: Notification = serde_json::from_str(
            r#"{"notification_id": 2, "type": "mystery", "title": "Hi", "metadata": "free text"}"#,
        )
        .unwrap();
        assert_eq!(legacy.kind, NotificationType::Info);
        assert_eq!(legacy.meta_line(), None);
    }

    #[test]
    fn unknown_type_decodes_as_info() {
        let n: Notification = serde_json::from_str(
            r#"{"notification_id": 3, "type": "something_new", "title": "New kind"}"#,
        )
        .unwrap();
        assert_eq!(n.kind, NotificationType::Info);

        let danger: Notification = serde_json::from_str(
            r#"{"notification_id": 4, "type": "danger", "title": "Rejected"}"#,
        )
        .unwrap();
        assert_eq!(danger.kind, NotificationType::Danger);
    }

    #[test]
    fn limit_is_clamped() {
        let q = NotificationQuery {
            status: ReadFilter::All,
            limit: 500,
        };
        assert!(q.to_query_pairs().contains(&("limit".into(), "100".into())));
    }
}
