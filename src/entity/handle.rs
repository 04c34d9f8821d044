use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Entity, EntityId};

/// Shared handle to an entity instance.
///
/// Repositories hand out clones of the same handle for a given id, so a merge
/// through any clone is visible to every holder.
pub struct EntityRef<E> {
    inner: Arc<RwLock<E>>,
}

impl<E: Entity> EntityRef<E> {
    pub fn new(entity: E) -> Self {
        Self {
            inner: Arc::new(RwLock::new(entity)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, E> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, E> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current attribute set
    pub fn snapshot(&self) -> E {
        self.read().clone()
    }

    pub fn id(&self) -> EntityId {
        self.read().id().clone()
    }

    pub fn has_attributes(&self, attributes: &[String]) -> bool {
        self.read().has_attributes(attributes)
    }

    /// Merges a record into this instance
    pub(crate) fn merge(&self, data: E) {
        self.write().merge(data);
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> Clone for EntityRef<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Entity + fmt::Debug> fmt::Debug for EntityRef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityRef").field(&*self.read()).finish()
    }
}
