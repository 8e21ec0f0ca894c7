//! Staff audit trail entries

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::page::PageInfo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub log_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    pub action_type: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// Visual weight of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Info,
}

impl ActivityLogEntry {
    pub fn severity(&self) -> Severity {
        let action = self.action_type.as_str();
        if action.contains("approved") || action.contains("picked_up") {
            Severity::Success
        } else if action.contains("rejected") || action.contains("deleted") {
            Severity::Danger
        } else if action.contains("updated") || action.contains("changed") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.action_type.as_str() {
            "item_added" => "📦",
            "item_updated" | "profile_updated" => "✏️",
            "item_deleted" => "🗑️",
            "claim_created" => "📋",
            "claim_approved" => "✅",
            "claim_rejected" => "❌",
            "claim_picked_up" => "🎉",
            "user_registered" => "👤",
            "user_login" => "🔓",
            "password_changed" => "🔐",
            _ => "•",
        }
    }
}

/// Filters for `GET /api/activity-log`; dates are `YYYY-MM-DD`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLogFilters {
    pub user_id: Option<i64>,
    pub action_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ActivityLogFilters {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id".to_string(), user_id.to_string()));
        }
        let optional = [
            ("action_type", &self.action_type),
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        pairs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityLogResponse {
    #[serde(default)]
    pub logs: Vec<ActivityLogEntry>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl ActivityLogResponse {
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.page.max(1),
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }
}
