//! Persistent favorites, partitioned by identity.
//!
//! Anonymous sessions and each signed-in user keep independent lists.
//! The partitions never merge: signing out does not fold the signed-in
//! list into the anonymous one, it just switches back.

use std::sync::Arc;

use skydeck_storage::{get_json, keys, put_json, KeyValueStore};

pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(identity_id: Option<&str>) -> String {
        match identity_id {
            Some(id) => keys::favorites_for(id),
            None => keys::LOCAL_FAVORITES.to_string(),
        }
    }

    /// The stored list for the given partition; absent or unreadable
    /// data reads as empty.
    pub async fn load(&self, identity_id: Option<&str>) -> Vec<String> {
        get_json(self.store.as_ref(), &Self::key(identity_id))
            .await
            .unwrap_or_default()
    }

    /// Add `city` to the partition and return the resulting list. A
    /// duplicate leaves the stored list untouched. The write lands
    /// before this returns; a failed write is logged and the in-memory
    /// result still includes the city.
    pub async fn add(&self, city: &str, identity_id: Option<&str>) -> Vec<String> {
        let mut list = self.load(identity_id).await;
        if list.iter().any(|f| f == city) {
            return list;
        }
        list.push(city.to_string());
        self.persist(&list, identity_id).await;
        list
    }

    /// Remove `city` from the partition and return the resulting list.
    pub async fn remove(&self, city: &str, identity_id: Option<&str>) -> Vec<String> {
        let mut list = self.load(identity_id).await;
        let before = list.len();
        list.retain(|f| f != city);
        if list.len() != before {
            self.persist(&list, identity_id).await;
        }
        list
    }

    async fn persist(&self, list: &[String], identity_id: Option<&str>) {
        let key = Self::key(identity_id);
        if let Err(e) = put_json(self.store.as_ref(), &key, &list).await {
            tracing::warn!("Failed to persist favorites under {}: {}", key, e);
        }
    }
}
