use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::cache::Repository;
use super::source::EntitySource;
use crate::entity::{EntityId, EntityRef};
use crate::models::{Order, OrderType};
use crate::server::{Page, StoreServer};
use crate::shared::AppError;

/// Order history cache with paginated listing and refunds
pub struct OrderRepository {
    orders: Repository<Order>,
    server: Arc<dyn StoreServer>,
}

impl OrderRepository {
    pub fn new(server: Arc<dyn StoreServer>, source: Arc<dyn EntitySource<Order>>) -> Self {
        Self {
            orders: Repository::new(source),
            server,
        }
    }

    /// Fetches one page of the order history
    #[instrument(skip(self, attributes))]
    pub async fn load_page(
        &self,
        attributes: &[String],
        page: u32,
        page_size: u32,
        order_type: Option<OrderType>,
    ) -> Result<Page<EntityRef<Order>>, AppError> {
        let result = self
            .server
            .get_orders(None, attributes, page, page_size, order_type)
            .await?;

        debug!(
            page = result.page_number,
            total_pages = result.total_pages,
            orders = result.entries.len(),
            "Order page loaded"
        );

        Ok(Page {
            entries: self.orders.update_many(result.entries, true),
            page_number: result.page_number,
            page_size: result.page_size,
            total_pages: result.total_pages,
        })
    }

    pub async fn load(&self, id: &EntityId, attributes: &[String]) -> Result<EntityRef<Order>, AppError> {
        self.orders.load(id, attributes).await
    }

    pub async fn fill(
        &self,
        orders: &[EntityRef<Order>],
        attributes: &[String],
    ) -> Result<Vec<EntityRef<Order>>, AppError> {
        self.orders.fill(orders, attributes).await
    }

    pub fn update(&self, record: Order, cache_new: bool) -> EntityRef<Order> {
        self.orders.update(record, cache_new)
    }

    /// Refunds the given games of an order and merges the server's view of the
    /// order back into the cache
    #[instrument(skip(self, attributes))]
    pub async fn refund(
        &self,
        id: &EntityId,
        game_ids: &[EntityId],
        attributes: &[String],
    ) -> Result<EntityRef<Order>, AppError> {
        let record = self.server.refund_order(id, game_ids, attributes).await?;
        info!(order_id = %id, games = game_ids.len(), "Order refunded");
        Ok(self.orders.update(record, true))
    }

    pub fn retrieve(&self, id: &EntityId) -> Option<EntityRef<Order>> {
        self.orders.retrieve(id)
    }

    pub fn clear(&self) {
        self.orders.clear();
    }
}
