use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User, UserFilter};

/// Repository trait for User persistence.
///
/// The store is an external collaborator; implementations must enforce
/// email uniqueness atomically in `create` — callers may pre-check with
/// `email_exists`, but that check is an optimization, not the guarantee.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, failing on a duplicate email
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// List users with optional filters
    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check if an email already exists
    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    /// Count users matching a filter (for pagination)
    async fn count(&self, filter: UserFilter) -> UserResult<usize>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn matches(user: &User, filter: &UserFilter) -> bool {
    if let Some(ref email) = filter.email {
        if !user.email.to_lowercase().contains(&email.to_lowercase()) {
            return false;
        }
    }
    if let Some(ref role) = filter.role {
        // Parsed through Role so `?role=Admin` and `?role=admin` both
        // match; an unknown role name matches nothing.
        match role.parse::<Role>() {
            Ok(role) if user.role == role => {}
            _ => return false,
        }
    }
    if let Some(status) = filter.status {
        if user.status != status {
            return false;
        }
    }
    true
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Uniqueness is checked under the write lock so two racing
        // registrations cannot both succeed.
        let email_exists = users
            .values()
            .any(|u| u.email.to_lowercase() == user.email.to_lowercase());

        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        let user = users
            .values()
            .find(|u| u.email.to_lowercase() == email.to_lowercase())
            .cloned();
        Ok(user)
    }

    async fn list(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| matches(u, &filter))
            .cloned()
            .collect();

        // Newest first
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let result: Vec<User> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound);
        }

        let email_exists = users
            .values()
            .any(|u| u.id != user.id && u.email.to_lowercase() == user.email.to_lowercase());

        if email_exists {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        let exists = users
            .values()
            .any(|u| u.email.to_lowercase() == email.to_lowercase());
        Ok(exists)
    }

    async fn count(&self, filter: UserFilter) -> UserResult<usize> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| matches(u, &filter)).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegisterRequest, Role, Status};

    fn user(email: &str, role: Option<Role>) -> User {
        let input = RegisterRequest {
            username: "test".to_string(),
            password: "pw".to_string(),
            email: email.to_string(),
            phone: "+1000".to_string(),
            role,
            image: None,
            region_id: 1,
            year: 2000,
        };
        User::new(&input, "hashed_password".to_string())
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(user("test@example.com", None)).await.unwrap();
        assert_eq!(created.email, "test@example.com");
        assert_eq!(created.status, Status::Pending);

        let fetched = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("test@example.com", None)).await.unwrap();

        assert!(repo.get_by_email("TEST@EXAMPLE.COM").await.unwrap().is_some());
        assert!(repo.email_exists("Test@Example.Com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("test@example.com", None)).await.unwrap();

        let result = repo.create(user("test@example.com", None)).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
        assert_eq!(repo.count(UserFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_role_and_status() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@x.com", Some(Role::Admin))).await.unwrap();
        let mut active = user("b@x.com", None);
        active.status = Status::Active;
        repo.create(active).await.unwrap();

        let admins = repo
            .list(UserFilter {
                role: Some("admin".to_string()),
                limit: 50,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "a@x.com");

        let active = repo
            .list(UserFilter {
                status: Some(Status::Active),
                limit: 50,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].email, "b@x.com");
    }

    #[tokio::test]
    async fn test_role_filter_is_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@x.com", Some(Role::Admin))).await.unwrap();

        let admins = repo
            .list(UserFilter {
                role: Some("Admin".to_string()),
                limit: 50,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(admins.len(), 1);

        let unknown = repo
            .list(UserFilter {
                role: Some("root".to_string()),
                limit: 50,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("a@x.com", None)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_email_collision() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@x.com", None)).await.unwrap();
        let other = repo.create(user("b@x.com", None)).await.unwrap();

        let mut moved = other.clone();
        moved.email = "a@x.com".to_string();
        let result = repo.update(moved).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
