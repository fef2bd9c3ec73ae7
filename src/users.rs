//! User records.
//!
//! The store is a collaborator boundary: the pipeline only needs lookup by
//! email and creation. Credential hashing is the store's problem, not the
//! pipeline's; this in-memory implementation holds the credential opaquely.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Email already registered")]
    EmailTaken,
}

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub plan: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub plan: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Option<UserRecord>;

    async fn create(&self, new: NewUser) -> Result<UserRecord, UserError>;
}

#[derive(Default)]
pub struct InMemoryUserStore {
    records: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.records.read().await.get(email).cloned()
    }

    async fn create(&self, new: NewUser) -> Result<UserRecord, UserError> {
        let mut records = self.records.write().await;

        if records.contains_key(&new.email) {
            return Err(UserError::EmailTaken);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            password: new.password,
            full_name: new.full_name,
            plan: new.plan,
            created_at: Utc::now(),
        };

        records.insert(new.email, record.clone());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "secret".to_string(),
            full_name: None,
            plan: None,
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let store = InMemoryUserStore::new();

        let created = store.create(new_user("a@b.com")).await.unwrap();
        let found = store.find_by_email("a@b.com").await.unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "a@b.com");
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = InMemoryUserStore::new();

        store.create(new_user("a@b.com")).await.unwrap();

        assert!(matches!(
            store.create(new_user("a@b.com")).await,
            Err(UserError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let store = InMemoryUserStore::new();

        assert!(store.find_by_email("missing@b.com").await.is_none());
    }
}
