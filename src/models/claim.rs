//! Claim model and the claim status state machine

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

// ---------------------------------------------------------------------------
// ClaimStatus
// ---------------------------------------------------------------------------

/// Claim review status
///
/// ```text
/// pending  -> approved | rejected
/// approved -> rejected | picked_up
/// rejected -> approved
/// picked_up (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    PickedUp,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::PickedUp,
    ];

    /// Transition table
    pub fn allowed_transitions(&self) -> &'static [ClaimStatus] {
        match self {
            ClaimStatus::Pending => &[ClaimStatus::Approved, ClaimStatus::Rejected],
            ClaimStatus::Approved => &[ClaimStatus::Rejected, ClaimStatus::PickedUp],
            ClaimStatus::Rejected => &[ClaimStatus::Approved],
            ClaimStatus::PickedUp => &[],
        }
    }

    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_final(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::PickedUp => "picked_up",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "⏳",
            ClaimStatus::Approved => "✓",
            ClaimStatus::Rejected => "✗",
            ClaimStatus::PickedUp => "📦",
        }
    }

    /// Label of the button that moves a claim into this status
    pub fn action_label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Reopen",
            ClaimStatus::Approved => "Approve",
            ClaimStatus::Rejected => "Reject",
            ClaimStatus::PickedUp => "Mark as Picked Up",
        }
    }

    pub fn confirm_title(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "Approve Claim",
            ClaimStatus::Rejected => "Reject Claim",
            ClaimStatus::PickedUp => "Confirm Pickup",
            ClaimStatus::Pending => "Confirm Action",
        }
    }

    pub fn confirm_message(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "Are you sure you want to approve this claim? The claimant will be notified that their claim has been approved.",
            ClaimStatus::Rejected => "Are you sure you want to reject this claim? The claimant will be notified that their claim has been rejected.",
            ClaimStatus::PickedUp => "Are you sure the item has been picked up? This will mark the item as claimed and close the claim.",
            ClaimStatus::Pending => "Are you sure you want to update this claim?",
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            ClaimStatus::PickedUp => "Claim marked as picked up successfully!".to_string(),
            other => format!("Claim {} successfully!", other.as_str()),
        }
    }
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ClaimStatus::Pending => "Pending Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::PickedUp => "Picked Up",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status. Must be one of: pending, approved, rejected, picked_up (got {})",
                    s
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// Claim as returned by the claim endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: i64,
    pub item_id: i64,
    #[serde(default)]
    pub claimant_user_id: Option<i64>,
    #[serde(default)]
    pub claimant_name: Option<String>,
    #[serde(default)]
    pub claimant_email: Option<String>,
    #[serde(default)]
    pub claimant_phone: Option<String>,
    #[serde(default)]
    pub verification_text: String,
    pub status: ClaimStatus,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub staff_notes: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub processed_by_staff_id: Option<i64>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub item_description: Option<String>,
    #[serde(default)]
    pub item_category: Option<String>,
    #[serde(default)]
    pub item_pickup_location: Option<String>,
    #[serde(default)]
    pub item_image_url: Option<String>,
}

impl Claim {
    /// Display title for the claimed item
    pub fn item_title(&self) -> String {
        [&self.item_name, &self.item_category, &self.item_description]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("Item #{}", self.item_id))
    }

    /// Case-insensitive match used by the claim boards
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            &self.item_category,
            &self.item_description,
            &self.claimant_name,
            &self.claimant_email,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
            || self.claim_id.to_string().contains(&query)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Claim submission request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewClaim {
    pub item_id: i64,
    #[validate(custom(function = "validate_verification_text"))]
    pub verification_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

pub const MIN_VERIFICATION_LEN: usize = 10;

fn validate_verification_text(text: &str) -> Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("required")
            .with_message("Please provide verification details".into()));
    }
    if trimmed.chars().count() < MIN_VERIFICATION_LEN {
        return Err(ValidationError::new("length")
            .with_message("Verification details must be at least 10 characters".into()));
    }
    Ok(())
}

/// Staff status update (`PATCH /api/claims/:id`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimUpdate {
    pub status: ClaimStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_notes: Option<String>,
}

/// Filters for `GET /api/claims`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimQuery {
    pub status: Option<ClaimStatus>,
    pub item_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl ClaimQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(item_id) = self.item_id {
            pairs.push(("item_id".to_string(), item_id.to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("user_id".to_string(), user_id.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimListResponse {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimEnvelope {
    pub claim: Claim,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimMutationResponse {
    #[serde(default)]
    pub message: String,
    /// Present on creation
    #[serde(default)]
    pub claim: Option<Claim>,
    /// Present on status updates
    #[serde(default)]
    pub new_status: Option<ClaimStatus>,
    #[serde(default)]
    pub item_updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn transition_table_is_exhaustive() {
        use ClaimStatus::*;
        let expected: [(ClaimStatus, &[ClaimStatus]); 4] = [
            (Pending, &[Approved, Rejected]),
            (Approved, &[Rejected, PickedUp]),
            (Rejected, &[Approved]),
            (PickedUp, &[]),
        ];
        for (from, allowed) in expected {
            let allowed: HashSet<_> = allowed.iter().copied().collect();
            for to in ClaimStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn only_picked_up_is_final_and_only_approved_reaches_it() {
        for status in ClaimStatus::ALL {
            assert_eq!(status.is_final(), status == ClaimStatus::PickedUp);
            assert_eq!(
                status.can_transition_to(ClaimStatus::PickedUp),
                status == ClaimStatus::Approved
            );
        }
    }

    #[test]
    fn status_wire_format_is_snake_case() {
        assert_eq!(serde_json::to_string(&ClaimStatus::PickedUp).unwrap(), "\"picked_up\"");
        assert_eq!("picked_up".parse::<ClaimStatus>().unwrap(), ClaimStatus::PickedUp);
        assert!("closed".parse::<ClaimStatus>().is_err());
    }

    #[test]
    fn verification_text_rules() {
        let claim = |text: &str| NewClaim {
            item_id: 1,
            verification_text: text.to_string(),
            phone: None,
        };
        assert!(claim("   ").validate().is_err());
        assert!(claim("123456789").validate().is_err());
        assert!(claim("  123456789  ").validate().is_err());
        assert!(claim("1234567890").validate().is_ok());
    }

    #[test]
    fn empty_staff_notes_deserialize_as_none() {
        let claim: Claim = serde_json::from_str(
            r#"{"claim_id": 7, "item_id": 3, "status": "pending", "staff_notes": "", "verification_text": "blue case"}"#,
        )
        .unwrap();
        assert_eq!(claim.staff_notes, None);
        assert_eq!(claim.item_title(), "Item #3");
        assert!(claim.matches_search("7"));
        assert!(!claim.matches_search("wallet"));
    }
}
