use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{Ordering, Profile, ProfileFields, ProfileFilter, ProfileQuery};
use crate::services::store::{ProfileStore, StoreError};

/// In-memory profile store, selected with a `memory:` database URL
///
/// Applies the same filtering, ordering and pagination rules as the
/// PostgreSQL store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Table>,
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Profile>,
    last_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn list(&self, query: &ProfileQuery) -> Result<Vec<Profile>, StoreError> {
        let table = self.inner.read().await;

        let mut profiles: Vec<Profile> = table
            .rows
            .values()
            .filter(|p| query.filter.matches(p))
            .cloned()
            .collect();
        profiles.sort_by(|a, b| Ordering::compare_all(&query.ordering, a, b));

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = query
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        Ok(profiles.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: &ProfileFilter) -> Result<i64, StoreError> {
        let table = self.inner.read().await;
        Ok(table.rows.values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn get(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, fields: ProfileFields) -> Result<Profile, StoreError> {
        let mut table = self.inner.write().await;
        table.last_id += 1;

        let profile = Profile { id: table.last_id, fields };
        table.rows.insert(profile.id, profile.clone());

        Ok(profile)
    }

    async fn update(&self, id: i64, fields: ProfileFields) -> Result<Option<Profile>, StoreError> {
        let mut table = self.inner.write().await;

        Ok(table.rows.get_mut(&id).map(|profile| {
            profile.fields = fields;
            profile.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderField;

    fn fields(name: &str, industry: Option<&str>, salary: Option<f64>) -> ProfileFields {
        ProfileFields {
            first_name: name.to_string(),
            last_name: "Test".to_string(),
            industry: industry.map(String::from),
            salary,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryStore::new();

        let created = store.create(fields("Ann", Some("Banking"), Some(10.0))).await.unwrap();
        assert_eq!(created.id, 1);

        let updated = store
            .update(created.id, fields("Anna", None, None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.fields.first_name, "Anna");
        assert_eq!(store.get(1).await.unwrap(), Some(updated));

        assert!(store.delete(1).await.unwrap());
        assert!(!store.delete(1).await.unwrap());
        assert!(store.update(1, fields("Ghost", None, None)).await.unwrap().is_none());

        // ids are never reused
        assert_eq!(store.create(fields("Bob", None, None)).await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_list_filter_order_page() {
        let store = MemoryStore::new();
        store.create(fields("A", Some("Banking"), Some(300.0))).await.unwrap();
        store.create(fields("B", Some("Retail"), Some(100.0))).await.unwrap();
        store.create(fields("C", Some("Banking"), None)).await.unwrap();
        store.create(fields("D", Some("Banking"), Some(200.0))).await.unwrap();

        let filter = ProfileFilter::industry("Banking");
        assert_eq!(store.count(&filter).await.unwrap(), 3);

        let query = ProfileQuery {
            filter,
            ordering: vec![Ordering { field: OrderField::Salary, descending: false }],
            limit: Some(2),
            offset: 1,
        };
        let names: Vec<String> = store
            .list(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.fields.first_name)
            .collect();

        // 200, 300, NULL -> skip one, take two
        assert_eq!(names, vec!["A", "C"]);
    }
}
