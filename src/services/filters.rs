//! Item search and filter panel, and the item grid it drives

use crate::{
    api::items::ItemsApi,
    models::{Category, Item, ItemQuery, ItemStatus, SortOrder},
};

use super::list::{FetchOutcome, ListController};

pub const ITEMS_LOAD_FAILED: &str = "Failed to load items. Please try again later.";

/// Pickup desks and common drop-off buildings offered by the location filter
pub const LOCATIONS: [&str; 8] = ["SLC", "PAC", "CIF", "Library", "DC", "MC", "E7", "QNC"];

/// Filter set for the item grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilters {
    pub search: String,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub status: Option<ItemStatus>,
    pub sort: SortOrder,
}

impl ItemFilters {
    /// Number of filters that differ from the defaults, sort included
    pub fn active_count(&self) -> usize {
        [
            !self.search.trim().is_empty(),
            self.category.is_some(),
            self.location.is_some(),
            self.status.is_some(),
            self.sort != SortOrder::Recent,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn has_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Whether the result set is narrowed (sort alone does not count)
    pub fn is_narrowed(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.location.is_some()
            || self.status.is_some()
    }

    pub fn to_query(&self, page: u32, page_size: u32) -> ItemQuery {
        ItemQuery {
            search: Some(self.search.clone()),
            category: self.category,
            location: self.location.clone(),
            status: self.status,
            sort: self.sort,
            page,
            page_size,
        }
    }
}

/// Filter panel state.
///
/// [`SearchFilters::sync`] plays the role of the change effect: the first call
/// only records the initial filters, later calls report the filters when they
/// changed since the previous call.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    filters: ItemFilters,
    expanded: bool,
    last_synced: Option<ItemFilters>,
}

impl SearchFilters {
    pub fn new(initial: ItemFilters) -> Self {
        Self {
            filters: initial,
            expanded: false,
            last_synced: None,
        }
    }

    /// Panel for a list that already holds `applied`; only edits away from
    /// those filters are reported by [`SearchFilters::sync`]
    pub fn attached(applied: ItemFilters) -> Self {
        Self {
            last_synced: Some(applied.clone()),
            filters: applied,
            expanded: false,
        }
    }

    pub fn filters(&self) -> &ItemFilters {
        &self.filters
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn clear_search(&mut self) {
        self.filters.search.clear();
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.filters.category = category;
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.filters.location = location.filter(|l| !l.is_empty());
    }

    pub fn set_status(&mut self, status: Option<ItemStatus>) {
        self.filters.status = status;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filters.sort = sort;
    }

    /// Back to defaults (sort = recent) and collapse the panel
    pub fn clear(&mut self) {
        self.filters = ItemFilters::default();
        self.expanded = false;
    }

    /// Filters to hand to the list, if they changed since the last sync
    pub fn sync(&mut self) -> Option<ItemFilters> {
        match &self.last_synced {
            None => {
                self.last_synced = Some(self.filters.clone());
                None
            }
            Some(previous) if *previous == self.filters => None,
            Some(_) => {
                self.last_synced = Some(self.filters.clone());
                Some(self.filters.clone())
            }
        }
    }
}

/// Filter panel wired to a server-paginated item grid
pub struct ItemBrowser {
    panel: SearchFilters,
    list: ListController<ItemFilters, Item>,
}

impl ItemBrowser {
    pub fn new(page_size: u32) -> Self {
        let applied = ItemFilters::default();
        Self {
            panel: SearchFilters::attached(applied.clone()),
            list: ListController::new(applied, page_size, ITEMS_LOAD_FAILED),
        }
    }

    pub fn panel(&self) -> &SearchFilters {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut SearchFilters {
        &mut self.panel
    }

    pub fn list(&self) -> &ListController<ItemFilters, Item> {
        &self.list
    }

    pub fn set_page(&mut self, page: u32) -> bool {
        self.list.set_page(page)
    }

    /// Push panel edits into the list, then fetch if anything moved
    pub async fn refresh(&mut self, api: &ItemsApi) -> Option<FetchOutcome> {
        if let Some(filters) = self.panel.sync() {
            self.list.set_filters(filters);
        }
        self.list
            .refresh(|ticket| async move {
                api.list(&ticket.filters.to_query(ticket.page, ticket.page_size))
                    .await
            })
            .await
    }
}
