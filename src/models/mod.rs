//! Data models for the Lost-and-Found API

pub mod activity_log;
pub mod analytics;
pub mod claim;
pub mod enums;
pub mod item;
pub mod notification;
pub mod page;
pub mod timestamp;
pub mod user;

// Re-export commonly used types
pub use activity_log::{ActivityLogEntry, ActivityLogFilters};
pub use analytics::AnalyticsDashboard;
pub use claim::{Claim, ClaimQuery, ClaimStatus, ClaimUpdate, NewClaim};
pub use enums::{Category, ItemStatus, NotificationType, PickupLocation, ReadFilter, Role, SortOrder};
pub use item::{ArchivedItem, Item, ItemQuery, ItemUpdate, NewItem};
pub use notification::{Notification, NotificationQuery};
pub use page::{Page, PageInfo};
pub use user::{SessionStatus, User};

/// First human-readable message out of a validation failure.
///
/// Struct-level errors come first, then fields in name order.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for {}", field),
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}
