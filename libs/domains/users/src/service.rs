use std::sync::Arc;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{CreateUser, NewUser, Pagination, UpdateUser, User, UserId};
use crate::repository::UserRepository;

/// Use cases for the User entity.
///
/// The service knows nothing about HTTP or API versions. Every controller that
/// holds a clone of it talks to the same repository.
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_shared(Arc::new(repository))
    }

    /// Builds the service over a repository handle owned elsewhere.
    pub fn with_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user
    #[instrument(skip(self), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let new_user = NewUser::new(&input.name, &input.email)?;
        self.repository.create(new_user).await
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> UserResult<User> {
        self.repository.get(id).await
    }

    /// List users, oldest first
    #[instrument(skip(self))]
    pub async fn list_users(&self, page: Pagination) -> UserResult<Vec<User>> {
        self.repository.list(page).await
    }

    /// One page of users together with the size of the whole collection
    #[instrument(skip(self))]
    pub async fn list_users_page(&self, page: Pagination) -> UserResult<(Vec<User>, usize)> {
        self.repository.list_with_total(page).await
    }

    /// Total number of stored users
    pub async fn count_users(&self) -> UserResult<usize> {
        self.repository.count().await
    }

    /// Update a user; only supplied fields change
    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, input: UpdateUser) -> UserResult<User> {
        self.repository.update(id, input).await
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn stored(id: u64, name: &str, email: &str) -> User {
        User::from_new(UserId(id), NewUser::new(name, email).unwrap())
    }

    #[tokio::test]
    async fn test_create_user_normalizes_before_storing() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .withf(|user| user.name() == "Ana" && user.email() == "ana@x.com")
            .times(1)
            .returning(|user| Ok(User::from_new(UserId(1), user)));

        let service = UserService::new(mock_repo);
        let user = service
            .create_user(CreateUser {
                name: " Ana ".to_string(),
                email: "ANA@x.com".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.id, UserId(1));
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_create_user_with_invalid_email_never_reaches_repository() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo);
        let result = service
            .create_user(CreateUser {
                name: "Ana".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_repository_errors_pass_through_unchanged() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_create()
            .returning(|user| Err(UserError::DuplicateEmail(user.email().to_string())));
        mock_repo
            .expect_get()
            .with(eq(UserId(7)))
            .returning(|id| Err(UserError::NotFound(id)));
        mock_repo
            .expect_delete()
            .with(eq(UserId(7)))
            .returning(|id| Err(UserError::NotFound(id)));

        let service = UserService::new(mock_repo);

        let created = service
            .create_user(CreateUser {
                name: "Leo".to_string(),
                email: "ana@x.com".to_string(),
            })
            .await;
        assert_eq!(
            created,
            Err(UserError::DuplicateEmail("ana@x.com".to_string()))
        );
        assert_eq!(
            service.get_user(UserId(7)).await,
            Err(UserError::NotFound(UserId(7)))
        );
        assert_eq!(
            service.delete_user(UserId(7)).await,
            Err(UserError::NotFound(UserId(7)))
        );
    }

    #[tokio::test]
    async fn test_list_users_forwards_pagination() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_list()
            .with(eq(Pagination::page(0, 1)))
            .times(1)
            .returning(|_| Ok(vec![stored(1, "Ana", "ana@x.com")]));

        let service = UserService::new(mock_repo);
        let users = service.list_users(Pagination::page(0, 1)).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, UserId(1));
    }

    #[tokio::test]
    async fn test_list_users_page_reads_page_and_total_together() {
        let mut mock_repo = MockUserRepository::new();

        mock_repo
            .expect_list_with_total()
            .with(eq(Pagination::page(0, 1)))
            .times(1)
            .returning(|_| Ok((vec![stored(1, "Ana", "ana@x.com")], 3)));
        mock_repo.expect_count().never();
        mock_repo.expect_list().never();

        let service = UserService::new(mock_repo);
        let (users, total) = service.list_users_page(Pagination::page(0, 1)).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_update_user_forwards_partial_update() {
        let mut mock_repo = MockUserRepository::new();
        let update = UpdateUser {
            name: Some("Ana Maria".to_string()),
            email: None,
        };

        mock_repo
            .expect_update()
            .with(eq(UserId(1)), eq(update.clone()))
            .times(1)
            .returning(|id, update| {
                let mut user = stored(id.0, "Ana", "ana@x.com");
                user.apply_update(&update)?;
                Ok(user)
            });

        let service = UserService::new(mock_repo);
        let user = service.update_user(UserId(1), update).await.unwrap();

        assert_eq!(user.name, "Ana Maria");
        assert_eq!(user.email, "ana@x.com");
    }
}
