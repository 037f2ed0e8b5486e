//! Student profile card and the session role, persisted in the key-value
//! store next to the notes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StorageError, ValidationError};
use crate::storage::KeyValueStore;

const PROFILE_KEY: &str = "userProfile";
const ROLE_KEY: &str = "userRole";

pub const DEFAULT_ROLE: &str = "Student";

pub const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Editable field names, in display order.
pub const FIELDS: &[&str] = &[
    "name",
    "email",
    "phone",
    "rollNumber",
    "role",
    "dob",
    "bloodGroup",
    "department",
    "batch",
];

/// Stored as one camelCase JSON object; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roll_number: String,
    pub role: String,
    /// `YYYY-MM-DD`
    pub dob: String,
    pub blood_group: String,
    pub department: String,
    pub batch: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            roll_number: String::new(),
            role: DEFAULT_ROLE.to_string(),
            dob: "2005-05-15".to_string(),
            blood_group: "AB+".to_string(),
            department: String::new(),
            batch: String::new(),
        }
    }
}

impl Profile {
    /// The saved profile, or the default card if none was saved yet.
    pub fn load(store: &impl KeyValueStore) -> Result<Self> {
        decode(store.get(PROFILE_KEY)?)
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<()> {
        store.set(PROFILE_KEY, &serde_json::to_string(self)?)?;
        debug!("profile saved");
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match canonical_field(field)? {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "rollNumber" => &self.roll_number,
            "role" => &self.role,
            "dob" => &self.dob,
            "bloodGroup" => &self.blood_group,
            "department" => &self.department,
            _ => &self.batch,
        };
        Some(value.as_str())
    }

    /// Set one field by name (`rollNumber` or `roll_number`), validating
    /// dates, blood groups, emails and phone numbers.
    pub fn set(&mut self, field: &str, value: &str) -> std::result::Result<(), ValidationError> {
        let field = canonical_field(field).ok_or_else(|| ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("unknown profile field; expected one of {}", FIELDS.join(", ")),
        })?;
        let value = value.trim();
        let invalid = |message: &str| ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.to_string(),
        };

        match field {
            "name" => self.name = value.to_string(),
            "email" => {
                if !value.is_empty() && !is_email(value) {
                    return Err(invalid("not an email address"));
                }
                self.email = value.to_string();
            }
            "phone" => {
                if !value
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-'))
                {
                    return Err(invalid("only digits, spaces, '+' and '-' are allowed"));
                }
                self.phone = value.to_string();
            }
            "rollNumber" => self.roll_number = value.to_string(),
            "role" => {
                if value.is_empty() {
                    return Err(invalid("role cannot be empty"));
                }
                self.role = value.to_string();
            }
            "dob" => {
                NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|_| invalid("expected a date as YYYY-MM-DD"))?;
                self.dob = value.to_string();
            }
            "bloodGroup" => {
                let group = value.to_ascii_uppercase();
                if !BLOOD_GROUPS.contains(&group.as_str()) {
                    return Err(invalid("expected one of A+, A-, B+, B-, AB+, AB-, O+, O-"));
                }
                self.blood_group = group;
            }
            "department" => self.department = value.to_string(),
            _ => self.batch = value.to_string(),
        }
        Ok(())
    }

    /// Change one stored field in a single read-modify-write.
    ///
    /// Setting `role` also updates the session role.
    pub fn update_field(store: &mut impl KeyValueStore, field: &str, value: &str) -> Result<Self> {
        let mut updated = None;
        store.update(PROFILE_KEY, &mut |raw: Option<String>| -> Result<String> {
            let mut profile = decode(raw)?;
            profile.set(field, value)?;
            let encoded = serde_json::to_string(&profile)?;
            updated = Some(profile);
            Ok(encoded)
        })?;
        let profile = match updated {
            Some(profile) => profile,
            None => Self::load(&*store)?,
        };
        if canonical_field(field) == Some("role") {
            remember_role(store, &profile.role)?;
        }
        debug!(field, "profile field updated");
        Ok(profile)
    }
}

/// Role chosen at login, falling back to the profile card's role.
pub fn current_role(store: &impl KeyValueStore) -> Result<String> {
    match store.get(ROLE_KEY)? {
        Some(role) => Ok(role),
        None => Ok(Profile::load(store)?.role),
    }
}

pub fn remember_role(store: &mut impl KeyValueStore, role: &str) -> Result<()> {
    store.set(ROLE_KEY, role)?;
    Ok(())
}

/// Forget everything the store holds: profile, role and notes.
pub fn logout(store: &mut impl KeyValueStore) -> Result<()> {
    store.clear()?;
    info!("logged out, local data cleared");
    Ok(())
}

fn decode(raw: Option<String>) -> Result<Profile> {
    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw).map_err(|source| {
            StorageError::MalformedValue {
                key: PROFILE_KEY.into(),
                source,
            }
        })?),
        None => Ok(Profile::default()),
    }
}

fn canonical_field(field: &str) -> Option<&'static str> {
    let folded: String = field
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    FIELDS
        .iter()
        .copied()
        .find(|f| f.to_ascii_lowercase() == folded)
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
