use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, Pagination, UpdateUser, User, UserId};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under a freshly issued id
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get(&self, id: UserId) -> UserResult<User>;

    /// List users in insertion order
    async fn list(&self, page: Pagination) -> UserResult<Vec<User>>;

    /// Count total users
    async fn count(&self) -> UserResult<usize>;

    /// One page plus the total number of users, read from a single snapshot
    async fn list_with_total(&self, page: Pagination) -> UserResult<(Vec<User>, usize)>;

    /// Apply a partial update, re-validating the result
    async fn update(&self, id: UserId, update: UpdateUser) -> UserResult<User>;

    /// Hard-delete a user by ID
    async fn delete(&self, id: UserId) -> UserResult<()>;
}

#[derive(Debug)]
struct Store {
    next_id: u64,
    users: BTreeMap<UserId, User>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            users: BTreeMap::new(),
        }
    }
}

impl Store {
    fn page(&self, page: Pagination) -> Vec<User> {
        let users = self.users.values().skip(page.offset);

        match page.limit {
            Some(limit) => users.take(limit).cloned().collect(),
            None => users.cloned().collect(),
        }
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.has_email(email))
    }
}

/// In-memory implementation of UserRepository.
///
/// Ids come from a counter starting at 1 and are never handed out twice, even
/// after the user holding one is deleted. Since ids only grow, iterating the
/// map by key yields insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(user.email(), None) {
            return Err(UserError::DuplicateEmail(user.email().to_string()));
        }

        let id = UserId(store.next_id);
        store.next_id += 1;

        let user = User::from_new(id, user);
        store.users.insert(id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get(&self, id: UserId) -> UserResult<User> {
        let store = self.store.read().await;
        store.users.get(&id).cloned().ok_or(UserError::NotFound(id))
    }

    async fn list(&self, page: Pagination) -> UserResult<Vec<User>> {
        let store = self.store.read().await;
        Ok(store.page(page))
    }

    async fn count(&self) -> UserResult<usize> {
        let store = self.store.read().await;
        Ok(store.users.len())
    }

    async fn list_with_total(&self, page: Pagination) -> UserResult<(Vec<User>, usize)> {
        let store = self.store.read().await;
        Ok((store.page(page), store.users.len()))
    }

    async fn update(&self, id: UserId, update: UpdateUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }

        let update = update.validated()?;
        if let Some(email) = update.email.as_deref() {
            if store.email_taken(email, Some(id)) {
                return Err(UserError::DuplicateEmail(email.to_string()));
            }
        }

        let user = store.users.get_mut(&id).ok_or(UserError::NotFound(id))?;
        user.apply_update(&update)?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let mut store = self.store.write().await;

        store.users.remove(&id).ok_or(UserError::NotFound(id))?;

        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser::new(name, email).unwrap()
    }

    #[tokio::test]
    async fn test_ids_start_at_one_and_increase() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        let b = repo.create(new_user("Leo", "leo@x.com")).await.unwrap();

        assert_eq!(a.id, UserId(1));
        assert_eq!(b.id, UserId(2));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();

        let a = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        repo.delete(a.id).await.unwrap();
        let b = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(b.id, UserId(2));
    }

    #[tokio::test]
    async fn test_duplicate_email_keeps_first_user() {
        let repo = InMemoryUserRepository::new();

        let first = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        let result = repo.create(new_user("Leo", "ANA@x.com")).await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(repo.get(first.id).await.unwrap(), first);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_round_trips_created_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();

        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let repo = InMemoryUserRepository::new();
        for (name, email) in [("Ana", "ana@x.com"), ("Leo", "leo@x.com"), ("Mia", "mia@x.com")] {
            repo.create(new_user(name, email)).await.unwrap();
        }

        let first = repo.list(Pagination::page(0, 1)).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Ana");

        let rest = repo.list(Pagination::page(1, 10)).await.unwrap();
        let names: Vec<_> = rest.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Leo", "Mia"]);

        assert_eq!(repo.list(Pagination::all()).await.unwrap().len(), 3);
        assert!(repo.list(Pagination::page(5, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_total_reports_whole_collection() {
        let repo = InMemoryUserRepository::new();
        for (name, email) in [("Ana", "ana@x.com"), ("Leo", "leo@x.com"), ("Mia", "mia@x.com")] {
            repo.create(new_user(name, email)).await.unwrap();
        }

        let (users, total) = repo.list_with_total(Pagination::page(1, 1)).await.unwrap();

        assert_eq!(total, 3);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Leo");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_list_with_total_is_consistent_under_concurrent_writes() {
        let repo = InMemoryUserRepository::new();

        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    let user = repo
                        .create(new_user("User", &format!("user{}@x.com", i)))
                        .await
                        .unwrap();
                    if i % 2 == 0 {
                        repo.delete(user.id).await.unwrap();
                    }
                }
            })
        };

        while !writer.is_finished() {
            let (users, total) = repo.list_with_total(Pagination::all()).await.unwrap();
            assert_eq!(users.len(), total);
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();

        let (users, total) = repo.list_with_total(Pagination::all()).await.unwrap();
        assert_eq!(total, 100);
        assert_eq!(users.len(), total);
    }

    #[tokio::test]
    async fn test_update_name_preserves_other_fields() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                UpdateUser {
                    name: Some("Ana Maria".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Ana Maria");
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_user() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        let leo = repo.create(new_user("Leo", "leo@x.com")).await.unwrap();

        let result = repo
            .update(
                leo.id,
                UpdateUser {
                    name: None,
                    email: Some("ana@x.com".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(repo.get(leo.id).await.unwrap(), leo);
    }

    #[tokio::test]
    async fn test_update_to_own_email_is_allowed() {
        let repo = InMemoryUserRepository::new();
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        let updated = repo
            .update(
                ana.id,
                UpdateUser {
                    name: None,
                    email: Some("Ana@X.com".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();

        let result = repo.update(UserId(9), UpdateUser::default()).await;

        assert_eq!(result, Err(UserError::NotFound(UserId(9))));
    }

    #[tokio::test]
    async fn test_delete_is_not_idempotent() {
        let repo = InMemoryUserRepository::new();
        let ana = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        repo.delete(ana.id).await.unwrap();

        assert_eq!(repo.get(ana.id).await, Err(UserError::NotFound(ana.id)));
        assert_eq!(repo.delete(ana.id).await, Err(UserError::NotFound(ana.id)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_issue_unique_ids() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_user("User", &format!("user{}@x.com", i)))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 50);
        assert_eq!(repo.count().await.unwrap(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_creates_store_one_user() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(new_user("Ana", "ana@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
