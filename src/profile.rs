//! Business profiles.
//!
//! A profile is an open mapping: the store accepts whatever fields the
//! client sends and echoes them back, so the frontend can evolve its form
//! without a backend deploy. At most one profile per subject.
//!
//! The whole map sits behind one `RwLock`; a write guard covers an entire
//! replace or merge, so two concurrent merges on the same subject can never
//! interleave field by field.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

pub type Profile = Map<String, Value>;

#[derive(Default)]
pub struct ProfileStore {
    records: RwLock<HashMap<String, Profile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, subject_id: &str) -> Option<Profile> {
        self.records.read().await.get(subject_id).cloned()
    }

    /// Full replace. Creates the record if the subject has none.
    pub async fn put(&self, subject_id: &str, fields: Profile) -> Profile {
        self.records
            .write()
            .await
            .insert(subject_id.to_string(), fields.clone());

        fields
    }

    /// Partial overlay: incoming keys overwrite, existing keys absent from
    /// the update are preserved. Returns `None` when the subject has no
    /// profile yet; merge does not create.
    pub async fn merge(&self, subject_id: &str, fields: Profile) -> Option<Profile> {
        let mut records = self.records.write().await;
        let existing = records.get_mut(subject_id)?;

        for (key, value) in fields {
            existing.insert(key, value);
        }

        Some(existing.clone())
    }
}
