//! Found item model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::claim::ClaimStatus;
use super::enums::{Category, ItemStatus, PickupLocation, SortOrder};
use super::page::PageInfo;

/// Found item as returned by the item endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub location_found: Option<String>,
    #[serde(default)]
    pub pickup_at: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub date_found: Option<NaiveDateTime>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub found_by_desk: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub latest_claim_status: Option<ClaimStatus>,
    #[serde(default)]
    pub latest_claim_id: Option<i64>,
    #[serde(default)]
    pub latest_claimant_name: Option<String>,
    #[serde(default)]
    pub pending_claims: Option<u32>,
    #[serde(default)]
    pub approved_claims: Option<u32>,
    #[serde(default)]
    pub picked_up_claims: Option<u32>,
    #[serde(default)]
    pub is_picked_up: bool,
}

impl Item {
    /// Display title: name, then description, then category
    pub fn title(&self) -> String {
        [&self.name, &self.description]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| self.category.to_string())
    }

    /// Whether a student may still submit a claim for this item
    pub fn is_claimable(&self) -> bool {
        self.status == ItemStatus::Unclaimed
            && !self.is_picked_up
            && !matches!(
                self.latest_claim_status,
                Some(ClaimStatus::Approved) | Some(ClaimStatus::PickedUp)
            )
    }
}

/// Filters and paging sent to `GET /api/items`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemQuery {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub status: Option<ItemStatus>,
    pub sort: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl ItemQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category".to_string(), category.as_str().to_string()));
        }
        if let Some(location) = self.location.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("location".to_string(), location.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status".to_string(), status.as_str().to_string()));
        }
        let sort = if self.sort.is_server_supported() {
            self.sort
        } else {
            SortOrder::Recent
        };
        pairs.push(("sort".to_string(), sort.as_str().to_string()));
        pairs.push(("page".to_string(), self.page.max(1).to_string()));
        pairs.push(("page_size".to_string(), self.page_size.to_string()));
        pairs
    }
}

/// Response of `GET /api/items`
///
/// Paging metadata is normally nested under `pagination`; older builds put it
/// at the top level.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemListResponse {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pagination: Option<PageInfo>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl ItemListResponse {
    pub fn page_info(&self) -> PageInfo {
        self.pagination.clone().unwrap_or(PageInfo {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(0),
            total_count: self.total_count.unwrap_or(0),
            total_pages: self.total_pages.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemEnvelope {
    pub item: Item,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemMutationResponse {
    pub message: String,
    #[serde(default)]
    pub item: Option<Item>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDeletedResponse {
    pub message: String,
    pub item_id: i64,
}

/// Create item request (staff only)
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewItem {
    #[validate(length(min = 1, message = "Missing required field: name"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    #[validate(length(min = 1, message = "Missing required field: location_found"))]
    pub location_found: String,
    pub pickup_at: PickupLocation,
    #[validate(length(min = 1, message = "Missing required field: date_found"))]
    pub date_found: String,
    #[validate(length(min = 1, message = "Missing required field: found_by_desk"))]
    pub found_by_desk: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// Update item request (staff only); absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_at: Option<PickupLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_found: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_by_desk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.location_found.is_none()
            && self.pickup_at.is_none()
            && self.date_found.is_none()
            && self.found_by_desk.is_none()
            && self.image_url.is_none()
            && self.status.is_none()
    }
}

/// Claim snapshot attached to an archived item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedClaim {
    pub claim_id: i64,
    #[serde(default)]
    pub claimant_name: Option<String>,
    #[serde(default)]
    pub claimant_email: Option<String>,
    #[serde(default)]
    pub claimant_phone: Option<String>,
    #[serde(default)]
    pub verification_text: Option<String>,
    pub status: ClaimStatus,
    #[serde(default)]
    pub staff_notes: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "super::timestamp")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub processed_by_staff_id: Option<i64>,
    #[serde(default)]
    pub processed_by_staff_name: Option<String>,
}

/// Item whose claim reached `picked_up`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedItem {
    pub item_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location_found: Option<String>,
    #[serde(default)]
    pub pickup_at: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub date_found: Option<NaiveDateTime>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub found_by_desk: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub item_created_at: Option<NaiveDateTime>,
    pub claim: ArchivedClaim,
}

impl ArchivedItem {
    /// Description worth showing separately from the name
    pub fn distinct_description(&self) -> Option<&str> {
        let description = self.description.as_deref()?;
        match self.name.as_deref() {
            Some(name) if name.trim().eq_ignore_ascii_case(description.trim()) => None,
            _ => Some(description),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchivedItemsResponse {
    #[serde(default)]
    pub archived_items: Vec<ArchivedItem>,
    #[serde(default)]
    pub total_count: u64,
}
