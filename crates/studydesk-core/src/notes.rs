//! Subject-tagged study notes, kept as one JSON array in a key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StorageError, ValidationError};
use crate::storage::KeyValueStore;

const NOTES_KEY: &str = "notes";

/// Pseudo-subject meaning "no filter".
pub const ALL_SUBJECTS: &str = "All";

pub const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Computer Science",
    "Biology",
    "English",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub subject: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notes kept in an injected store.
///
/// Nothing is cached: every read decodes the stored array and every change
/// is a single [`KeyValueStore::update`], so a failed write leaves no trace
/// and concurrent writers on a shared store never drop each other's notes.
pub struct Notebook<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Notebook<S> {
    /// Wrap `store`, failing early if the stored notes don't decode.
    pub fn open(store: S) -> Result<Self> {
        let book = Self { store };
        book.load()?;
        Ok(book)
    }

    /// Newest first; `None` or `"All"` lists every subject.
    pub fn list(&self, subject: Option<&str>) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .load()?
            .into_iter()
            .filter(|n| match subject {
                None | Some(ALL_SUBJECTS) => true,
                Some(s) => n.subject.eq_ignore_ascii_case(s),
            })
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    pub fn get(&self, id: Uuid) -> Result<Option<Note>> {
        Ok(self.load()?.into_iter().find(|n| n.id == id))
    }

    pub fn add(&mut self, subject: &str, text: &str) -> Result<Note> {
        let text = non_blank(text)?;
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            subject: subject.trim().to_string(),
            text,
            created_at: now,
            updated_at: now,
        };
        self.store
            .update(NOTES_KEY, &mut |raw: Option<String>| -> Result<String> {
                let mut notes = decode(raw)?;
                notes.push(note.clone());
                Ok(serde_json::to_string(&notes)?)
            })?;
        debug!(id = %note.id, subject = %note.subject, "note added");
        Ok(note)
    }

    pub fn update(&mut self, id: Uuid, text: &str) -> Result<Note> {
        let text = non_blank(text)?;
        let mut updated = None;
        self.store
            .update(NOTES_KEY, &mut |raw: Option<String>| -> Result<String> {
                let mut notes = decode(raw)?;
                let note = notes
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or_else(|| not_found(id))?;
                note.text = text.clone();
                note.updated_at = Utc::now();
                updated = Some(note.clone());
                Ok(serde_json::to_string(&notes)?)
            })?;
        updated.ok_or_else(|| not_found(id))
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Note> {
        let mut removed = None;
        self.store
            .update(NOTES_KEY, &mut |raw: Option<String>| -> Result<String> {
                let mut notes = decode(raw)?;
                let idx = notes
                    .iter()
                    .position(|n| n.id == id)
                    .ok_or_else(|| not_found(id))?;
                removed = Some(notes.remove(idx));
                Ok(serde_json::to_string(&notes)?)
            })?;
        let note = removed.ok_or_else(|| not_found(id))?;
        debug!(id = %note.id, "note removed");
        Ok(note)
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn load(&self) -> Result<Vec<Note>> {
        decode(self.store.get(NOTES_KEY)?)
    }
}

fn decode(raw: Option<String>) -> Result<Vec<Note>> {
    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw).map_err(|source| {
            StorageError::MalformedValue {
                key: NOTES_KEY.into(),
                source,
            }
        })?),
        None => Ok(Vec::new()),
    }
}

fn non_blank(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyText.into());
    }
    Ok(trimmed.to_string())
}

fn not_found(id: Uuid) -> crate::error::CoreError {
    ValidationError::NotFound {
        kind: "note",
        id: id.to_string(),
    }
    .into()
}
