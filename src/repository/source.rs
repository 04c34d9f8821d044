use async_trait::async_trait;
use std::sync::Arc;

use crate::entity::{Entity, EntityId};
use crate::models::{Game, Order, User};
use crate::server::{Page, StoreServer};
use crate::session::Session;
use crate::shared::AppError;

/// Remote collaborator a [`Repository`](super::Repository) fetches from
#[async_trait]
pub trait EntitySource<E: Entity>: Send + Sync {
    async fn fetch_one(&self, id: &EntityId, attributes: &[String]) -> Result<E, AppError>;

    /// One batched request for every id; unknown ids are absent from the result
    async fn fetch_many(&self, ids: &[EntityId], attributes: &[String])
        -> Result<Vec<E>, AppError>;

    async fn search(
        &self,
        _query: &str,
        _attributes: &[String],
        _page: u32,
    ) -> Result<Page<E>, AppError> {
        Err(AppError::Unsupported(format!("search over {}", E::KIND)))
    }
}

/// Entity source backed by the store server
pub struct RemoteSource {
    server: Arc<dyn StoreServer>,
    session: Session,
}

impl RemoteSource {
    pub fn new(server: Arc<dyn StoreServer>, session: Session) -> Self {
        Self { server, session }
    }
}

#[async_trait]
impl EntitySource<Game> for RemoteSource {
    async fn fetch_one(&self, id: &EntityId, attributes: &[String]) -> Result<Game, AppError> {
        self.server
            .get_game(id, attributes, self.session.is_authenticated())
            .await
    }

    async fn fetch_many(
        &self,
        ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Vec<Game>, AppError> {
        self.server
            .get_games(ids, attributes, self.session.is_authenticated())
            .await
    }

    async fn search(
        &self,
        query: &str,
        attributes: &[String],
        page: u32,
    ) -> Result<Page<Game>, AppError> {
        self.server
            .search_games(query, attributes, self.session.is_authenticated(), page)
            .await
    }
}

#[async_trait]
impl EntitySource<User> for RemoteSource {
    async fn fetch_one(&self, id: &EntityId, attributes: &[String]) -> Result<User, AppError> {
        self.server.get_user(id, attributes).await
    }

    async fn fetch_many(
        &self,
        ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Vec<User>, AppError> {
        self.server.get_users(ids, attributes).await
    }

    async fn search(
        &self,
        query: &str,
        attributes: &[String],
        page: u32,
    ) -> Result<Page<User>, AppError> {
        self.server.search_users(query, attributes, page).await
    }
}

#[async_trait]
impl EntitySource<Order> for RemoteSource {
    async fn fetch_one(&self, id: &EntityId, attributes: &[String]) -> Result<Order, AppError> {
        let page = self
            .server
            .get_orders(Some(std::slice::from_ref(id)), attributes, 1, 1, None)
            .await?;
        page.entries
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))
    }

    async fn fetch_many(
        &self,
        ids: &[EntityId],
        attributes: &[String],
    ) -> Result<Vec<Order>, AppError> {
        let page_size = u32::try_from(ids.len()).unwrap_or(u32::MAX);
        let page = self
            .server
            .get_orders(Some(ids), attributes, 1, page_size, None)
            .await?;
        Ok(page.entries)
    }
}
