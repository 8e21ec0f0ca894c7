//! Item endpoints (`/api/items`)

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{
            ArchivedItemsResponse, ItemDeletedResponse, ItemEnvelope, ItemListResponse,
            ItemMutationResponse,
        },
        ArchivedItem, Item, ItemQuery, ItemUpdate, NewItem, Page,
    },
};

use super::client::ApiClient;

#[derive(Clone)]
pub struct ItemsApi {
    client: ApiClient,
}

impl ItemsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One server-side page of items
    pub async fn list(&self, query: &ItemQuery) -> AppResult<Page<Item>> {
        let response: ItemListResponse = self
            .client
            .get_json("/api/items", query.to_query_pairs())
            .await?;
        let info = response.page_info();
        Ok(Page {
            rows: response.items,
            info,
        })
    }

    /// Unfiltered listing with the server's default paging
    pub async fn list_all(&self) -> AppResult<Vec<Item>> {
        let response: ItemListResponse = self.client.get_json("/api/items", Vec::new()).await?;
        Ok(response.items)
    }

    pub async fn get(&self, item_id: i64) -> AppResult<Item> {
        let response: ItemEnvelope = self
            .client
            .get_json(&format!("/api/items/{}", item_id), Vec::new())
            .await?;
        Ok(response.item)
    }

    pub async fn create(&self, item: &NewItem) -> AppResult<Item> {
        item.validate()?;
        let response: ItemMutationResponse = self.client.post_json("/api/items", item).await?;
        tracing::info!("{}", response.message);
        response
            .item
            .ok_or_else(|| AppError::Decode("Create response carried no item".to_string()))
    }

    pub async fn update(&self, item_id: i64, update: &ItemUpdate) -> AppResult<Item> {
        if update.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }
        update.validate()?;
        let response: ItemMutationResponse = self
            .client
            .put_json(&format!("/api/items/{}", item_id), update)
            .await?;
        response
            .item
            .ok_or_else(|| AppError::Decode("Update response carried no item".to_string()))
    }

    /// Soft delete: the server flips the status to `deleted`
    pub async fn delete(&self, item_id: i64) -> AppResult<i64> {
        let response: ItemDeletedResponse = self
            .client
            .delete_json(&format!("/api/items/{}", item_id))
            .await?;
        tracing::info!("Item {} deleted", response.item_id);
        Ok(response.item_id)
    }

    /// Items whose claim reached `picked_up` (staff only)
    pub async fn archived(&self) -> AppResult<Vec<ArchivedItem>> {
        let response: ArchivedItemsResponse = self
            .client
            .get_json("/api/items/archived", Vec::new())
            .await?;
        Ok(response.archived_items)
    }
}
