//! In-memory user store.
//!
//! One mutex guards both the record map and the ID counter, so concurrent
//! creates can never hand out the same ID. IDs start at 1, only grow, and are
//! never reused after a delete. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::users::model::{NewUser, User, UserId};

/// Errors returned by [`UserStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(UserId),

    /// A writer panicked while holding the lock.
    #[error("user store lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
struct StoreState {
    // Keyed by monotonic IDs, so iteration order is insertion order.
    users: BTreeMap<UserId, User>,
    next_id: UserId,
}

/// Process-lifetime store of user records.
#[derive(Debug)]
pub struct UserStore {
    state: Mutex<StoreState>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert a new record under the next unused ID.
    pub fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;

        let user = new_user.into_user(id);
        state.users.insert(id, user.clone());
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<User, StoreError> {
        self.lock()?.users.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    /// Snapshot of all records, in insertion order.
    pub fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    /// Replace every mutable field of `id`, keeping the ID.
    pub fn update(&self, id: UserId, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        let slot = state.users.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = new_user.into_user(id);
        Ok(slot.clone())
    }

    pub fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.lock()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.users.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Poison the lock, as a panicking writer would.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.state.lock();
            panic!("poisoning user store");
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            age: Some(30),
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let store = UserStore::new();
        let a = store.create(new_user("A")).unwrap();
        let b = store.create(new_user("B")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn test_get_returns_created_record() {
        let store = UserStore::new();
        let created = store.create(new_user("Jane")).unwrap();
        assert_eq!(store.get(created.id).unwrap(), created);
    }

    #[test]
    fn test_deleted_id_is_gone_and_never_reissued() {
        let store = UserStore::new();
        let a = store.create(new_user("A")).unwrap();
        let b = store.create(new_user("B")).unwrap();

        store.delete(b.id).unwrap();
        assert_eq!(store.get(b.id), Err(StoreError::NotFound(b.id)));
        assert_eq!(store.delete(b.id), Err(StoreError::NotFound(b.id)));

        let c = store.create(new_user("C")).unwrap();
        assert!(c.id > b.id);
        let ids: Vec<_> = store.list().unwrap().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_update_replaces_fields_and_keeps_id() {
        let store = UserStore::new();
        let created = store.create(new_user("Old")).unwrap();

        let replacement = NewUser {
            name: "New".into(),
            email: "new@example.com".into(),
            age: None,
        };
        let updated = store.update(created.id, replacement).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.age, None);
        assert_eq!(store.get(created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing() {
        let store = UserStore::new();
        assert_eq!(store.update(7, new_user("X")), Err(StoreError::NotFound(7)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_list_is_a_snapshot() {
        let store = UserStore::new();
        store.create(new_user("A")).unwrap();
        let snapshot = store.list().unwrap();
        store.create(new_user("B")).unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_concurrent_creates_get_unique_ids() {
        let store = Arc::new(UserStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(new_user(&format!("u{t}-{i}"))).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<UserId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(ids.last(), Some(&400));
    }

    #[test]
    fn test_poisoned_lock_surfaces_as_error() {
        let store = UserStore::new();
        store.poison();
        assert_eq!(store.create(new_user("A")), Err(StoreError::Poisoned));
        assert_eq!(store.list(), Err(StoreError::Poisoned));
    }
}
