//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Cards,
    Keys,
    Bags,
    Books,
    Bottles,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Electronics,
        Category::Clothing,
        Category::Cards,
        Category::Keys,
        Category::Bags,
        Category::Books,
        Category::Bottles,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Cards => "cards",
            Category::Keys => "keys",
            Category::Bags => "bags",
            Category::Books => "books",
            Category::Bottles => "bottles",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing",
            Category::Cards => "Cards/IDs",
            Category::Keys => "Keys",
            Category::Bags => "Bags",
            Category::Books => "Books",
            Category::Bottles => "Bottles",
            Category::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

// ---------------------------------------------------------------------------
// ItemStatus
// ---------------------------------------------------------------------------

/// Item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Unclaimed,
    Claimed,
    Deleted,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Unclaimed => "unclaimed",
            ItemStatus::Claimed => "claimed",
            ItemStatus::Deleted => "deleted",
        }
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        ItemStatus::Unclaimed
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Unclaimed => "Available",
            ItemStatus::Claimed => "Claimed",
            ItemStatus::Deleted => "Deleted",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// PickupLocation
// ---------------------------------------------------------------------------

/// Desk where a claimed item is handed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupLocation {
    #[serde(rename = "SLC")]
    Slc,
    #[serde(rename = "PAC")]
    Pac,
    #[serde(rename = "CIF")]
    Cif,
}

impl PickupLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupLocation::Slc => "SLC",
            PickupLocation::Pac => "PAC",
            PickupLocation::Cif => "CIF",
        }
    }
}

impl std::str::FromStr for PickupLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SLC" => Ok(PickupLocation::Slc),
            "PAC" => Ok(PickupLocation::Pac),
            "CIF" => Ok(PickupLocation::Cif),
            _ => Err("Invalid pickup_at. Must be one of: SLC, PAC, CIF".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Warning,
    Danger,
    /// Unknown types from newer backends land here
    #[serde(other)]
    Info,
}

impl NotificationType {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Success => "✅",
            NotificationType::Warning => "⚠️",
            NotificationType::Info => "ℹ️",
            NotificationType::Danger => "❗",
        }
    }
}

// ---------------------------------------------------------------------------
// ReadFilter
// ---------------------------------------------------------------------------

/// Notification read-state filter (`status` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadFilter {
    Unread,
    Read,
    All,
}

impl ReadFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadFilter::Unread => "unread",
            ReadFilter::Read => "read",
            ReadFilter::All => "all",
        }
    }
}

impl Default for ReadFilter {
    fn default() -> Self {
        ReadFilter::Unread
    }
}

// ---------------------------------------------------------------------------
// SortOrder
// ---------------------------------------------------------------------------

/// Sort order for item listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Recent,
    Oldest,
    Category,
    Location,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Oldest => "oldest",
            SortOrder::Category => "category",
            SortOrder::Location => "location",
        }
    }

    /// Only recent/oldest are understood by the item listing endpoint
    pub fn is_server_supported(&self) -> bool {
        matches!(self, SortOrder::Recent | SortOrder::Oldest)
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Recent
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SortOrder::Recent => "Most Recent",
            SortOrder::Oldest => "Oldest First",
            SortOrder::Category => "Category",
            SortOrder::Location => "Location",
        };
        write!(f, "{}", label)
    }
}
