use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

use super::cache::UserRepository;
use crate::entity::{Entity, EntityId, EntityRef};
use crate::models::{FriendRequest, RequestDirection};
use crate::server::StoreServer;
use crate::shared::AppError;

/// Pending friend requests in both directions.
///
/// Sending, accepting and declining are optimistic: the local list changes
/// first and is restored if the server refuses.
pub struct FriendRequestRepository {
    server: Arc<dyn StoreServer>,
    users: Arc<UserRepository>,
    requests: Mutex<Vec<EntityRef<FriendRequest>>>,
}

impl FriendRequestRepository {
    pub fn new(server: Arc<dyn StoreServer>, users: Arc<UserRepository>) -> Self {
        Self {
            server,
            users,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> MutexGuard<'_, Vec<EntityRef<FriendRequest>>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the local list with the server's pending requests.
    ///
    /// Embedded users are merged into the user repository; requests already
    /// known keep their instance.
    #[instrument(skip(self, user_attributes))]
    pub async fn load(&self, user_attributes: &[String]) -> Result<Vec<EntityRef<FriendRequest>>, AppError> {
        let records = self.server.get_friend_requests(user_attributes).await?;

        let mut requests = self.requests();
        let loaded: Vec<EntityRef<FriendRequest>> = records
            .into_iter()
            .map(|record| {
                let (request, user) = record.into_parts();
                self.users.update(user, true);
                match requests.iter().find(|known| known.read().id == request.id) {
                    Some(known) => {
                        known.merge(request);
                        known.clone()
                    }
                    None => EntityRef::new(request),
                }
            })
            .collect();

        debug!(requests = loaded.len(), "Friend requests loaded");
        *requests = loaded.clone();
        Ok(loaded)
    }

    /// Sends a request to `user_id`.
    ///
    /// The request shows up immediately under a temporary id, which is swapped
    /// for the server id on success. A pending request to or from the same user
    /// is returned as is.
    #[instrument(skip(self))]
    pub async fn send(&self, user_id: &EntityId) -> Result<EntityRef<FriendRequest>, AppError> {
        let pending = {
            let mut requests = self.requests();
            if let Some(existing) = requests
                .iter()
                .find(|request| request.read().user.as_ref() == Some(user_id))
            {
                debug!(user_id = %user_id, "Request already pending");
                return Ok(existing.clone());
            }
            let pending = EntityRef::new(FriendRequest::pending_to(user_id.clone()));
            requests.push(pending.clone());
            pending
        };

        match self.server.send_friend_request(user_id).await {
            Ok(record) => {
                let (confirmed, user) = record.into_parts();
                self.users.update(user, true);
                {
                    let mut request = pending.write();
                    request.id = confirmed.id.clone();
                    request.merge(confirmed);
                }
                info!(user_id = %user_id, request_id = %pending.id(), "Friend request sent");
                Ok(pending)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Friend request failed, rolling back");
                self.requests()
                    .retain(|request| !request.ptr_eq(&pending));
                Err(e)
            }
        }
    }

    #[instrument(skip(self, request), fields(request_id = %request.id()))]
    pub async fn accept(&self, request: &EntityRef<FriendRequest>) -> Result<(), AppError> {
        let id = Self::confirmed_id(request)?;
        let index = self.take(request);

        match self.server.accept_friend_request(&id).await {
            Ok(()) => {
                info!(request_id = %id, "Friend request accepted");
                Ok(())
            }
            Err(e) => {
                self.restore(index, request);
                Err(e)
            }
        }
    }

    /// Declines an incoming request
    pub async fn decline(&self, request: &EntityRef<FriendRequest>) -> Result<(), AppError> {
        self.dismiss(request).await
    }

    /// Withdraws an outgoing request
    pub async fn cancel(&self, request: &EntityRef<FriendRequest>) -> Result<(), AppError> {
        self.dismiss(request).await
    }

    #[instrument(skip(self, request), fields(request_id = %request.id()))]
    async fn dismiss(&self, request: &EntityRef<FriendRequest>) -> Result<(), AppError> {
        let id = Self::confirmed_id(request)?;
        let index = self.take(request);

        match self.server.decline_friend_request(&id).await {
            Ok(()) => {
                info!(request_id = %id, "Friend request dismissed");
                Ok(())
            }
            Err(e) => {
                self.restore(index, request);
                Err(e)
            }
        }
    }

    fn confirmed_id(request: &EntityRef<FriendRequest>) -> Result<EntityId, AppError> {
        let request = request.read();
        if request.is_temporary() {
            return Err(AppError::rejected(
                "unconfirmed",
                "Friend request has not been confirmed by the server yet",
            ));
        }
        Ok(request.id.clone())
    }

    /// Removes `request` from the list, returning where it was
    fn take(&self, request: &EntityRef<FriendRequest>) -> Option<usize> {
        let mut requests = self.requests();
        let index = requests.iter().position(|known| known.ptr_eq(request));
        if let Some(index) = index {
            requests.remove(index);
        }
        index
    }

    fn restore(&self, index: Option<usize>, request: &EntityRef<FriendRequest>) {
        let Some(index) = index else {
            return;
        };
        let mut requests = self.requests();
        warn!(request_id = %request.id(), "Restoring friend request after failure");
        let index = index.min(requests.len());
        requests.insert(index, request.clone());
    }

    pub fn incoming(&self) -> Vec<EntityRef<FriendRequest>> {
        self.with_direction(RequestDirection::Incoming)
    }

    pub fn outgoing(&self) -> Vec<EntityRef<FriendRequest>> {
        self.with_direction(RequestDirection::Outgoing)
    }

    fn with_direction(&self, direction: RequestDirection) -> Vec<EntityRef<FriendRequest>> {
        self.requests()
            .iter()
            .filter(|request| request.read().direction == Some(direction))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<EntityRef<FriendRequest>> {
        self.requests().clone()
    }

    pub fn retrieve(&self, id: &EntityId) -> Option<EntityRef<FriendRequest>> {
        self.requests()
            .iter()
            .find(|request| request.read().id == *id)
            .cloned()
    }

    pub fn clear(&self) {
        self.requests().clear();
    }
}
