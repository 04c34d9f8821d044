use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, instrument, warn};

use super::source::EntitySource;
use crate::entity::{Entity, EntityId, EntityRef};
use crate::models::{Game, User};
use crate::server::Page;
use crate::shared::AppError;

pub type GameRepository = Repository<Game>;
pub type UserRepository = Repository<User>;

/// Cache and de-duplication authority for one entity type.
///
/// Holds at most one live instance per id. Every load, search and fill merges
/// into that instance, so attributes fetched anywhere show up everywhere the
/// entity is referenced.
pub struct Repository<E: Entity> {
    source: Arc<dyn EntitySource<E>>,
    entities: RwLock<HashMap<EntityId, EntityRef<E>>>,
}

impl<E: Entity> Repository<E> {
    pub fn new(source: Arc<dyn EntitySource<E>>) -> Self {
        Self {
            source,
            entities: RwLock::new(HashMap::new()),
        }
    }

    fn read_entities(&self) -> RwLockReadGuard<'_, HashMap<EntityId, EntityRef<E>>> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entities(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, EntityRef<E>>> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches one entity with `attributes` and returns the cached instance
    #[instrument(skip(self, attributes), fields(kind = E::KIND))]
    pub async fn load(&self, id: &EntityId, attributes: &[String]) -> Result<EntityRef<E>, AppError> {
        debug!(id = %id, ?attributes, "Loading entity");

        let record = self.source.fetch_one(id, attributes).await?;
        if record.id() != id {
            warn!(requested = %id, received = %record.id(), "Server returned a different entity");
            return Err(AppError::NotFound(format!("{} {}", E::KIND, id)));
        }

        Ok(self.update(record, true))
    }

    /// Merges one record, see [`Repository::update_many`]
    pub fn update(&self, record: E, cache_new: bool) -> EntityRef<E> {
        let mut entities = self.write_entities();
        Self::merge_record(&mut entities, record, cache_new)
    }

    /// Merges records into the cache, returning one handle per record in
    /// input order.
    ///
    /// Known ids are merged into the existing instance. Unknown ids become new
    /// cached instances when `cache_new` is set, otherwise transient handles
    /// that the cache never sees.
    pub fn update_many(&self, records: Vec<E>, cache_new: bool) -> Vec<EntityRef<E>> {
        let mut entities = self.write_entities();
        records
            .into_iter()
            .map(|record| Self::merge_record(&mut entities, record, cache_new))
            .collect()
    }

    fn merge_record(
        entities: &mut HashMap<EntityId, EntityRef<E>>,
        record: E,
        cache_new: bool,
    ) -> EntityRef<E> {
        match entities.get(record.id()).cloned() {
            Some(existing) => {
                existing.merge(record);
                existing
            }
            None => {
                let id = record.id().clone();
                let handle = EntityRef::new(record);
                if cache_new {
                    entities.insert(id, handle.clone());
                }
                handle
            }
        }
    }

    /// Completes `entities` so each holds every attribute in `attributes`.
    ///
    /// Resolves without touching the network when nothing is missing. Otherwise
    /// the incomplete ids go out in a single batched request. The result holds,
    /// in input order, the cached instance for each input.
    #[instrument(skip(self, entities, attributes), fields(kind = E::KIND, count = entities.len()))]
    pub async fn fill(
        &self,
        entities: &[EntityRef<E>],
        attributes: &[String],
    ) -> Result<Vec<EntityRef<E>>, AppError> {
        let mut seen = HashSet::new();
        let missing: Vec<EntityId> = entities
            .iter()
            .filter(|entity| !entity.has_attributes(attributes))
            .map(EntityRef::id)
            .filter(|id| seen.insert(id.clone()))
            .collect();

        if missing.is_empty() {
            debug!("All entities complete, skipping fetch");
            return Ok(entities.to_vec());
        }

        debug!(missing = missing.len(), "Fetching missing attributes");
        let records = self.source.fetch_many(&missing, attributes).await?;
        let merged: HashMap<EntityId, EntityRef<E>> = self
            .update_many(records, true)
            .into_iter()
            .map(|handle| (handle.id(), handle))
            .collect();

        for id in missing.iter().filter(|id| !merged.contains_key(*id)) {
            warn!(id = %id, "Entity missing from batched response");
        }

        Ok(entities
            .iter()
            .map(|entity| {
                merged
                    .get(&entity.id())
                    .cloned()
                    .unwrap_or_else(|| entity.clone())
            })
            .collect())
    }

    /// Cached instance for `id`, without network access
    pub fn retrieve(&self, id: &EntityId) -> Option<EntityRef<E>> {
        self.read_entities().get(id).cloned()
    }

    #[instrument(skip(self, attributes), fields(kind = E::KIND))]
    pub async fn search(
        &self,
        query: &str,
        attributes: &[String],
        page: u32,
        cache_new: bool,
    ) -> Result<Page<EntityRef<E>>, AppError> {
        let result = self.source.search(query, attributes, page).await?;
        debug!(
            query = %query,
            page = result.page_number,
            total_pages = result.total_pages,
            hits = result.entries.len(),
            "Search completed"
        );

        Ok(Page {
            entries: self.update_many(result.entries, cache_new),
            page_number: result.page_number,
            page_size: result.page_size,
            total_pages: result.total_pages,
        })
    }

    pub fn len(&self) -> usize {
        self.read_entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entities().is_empty()
    }

    pub fn clear(&self) {
        let mut entities = self.write_entities();
        debug!(kind = E::KIND, cleared = entities.len(), "Clearing repository");
        entities.clear();
    }
}
