//! Lumo model: a travel plan owned by a user.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::MaskField;
use crate::{Error, Result};

// ============================================================================
// Lumo
// ============================================================================

/// A travel plan container.
#[derive(Debug, Clone, PartialEq)]
pub struct Lumo {
    pub id: i64,
    pub lumo_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a lumo. `user_id` is validated by the service.
#[derive(Debug, Clone, Default)]
pub struct NewLumo {
    pub user_id: String,
    pub title: String,
}

/// Candidate values for an update.
#[derive(Debug, Clone, Default)]
pub struct LumoUpdate {
    pub title: String,
}

// ============================================================================
// Field Mask
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LumoField {
    Title,
}

impl MaskField for LumoField {
    const ALL: &'static [Self] = &[LumoField::Title];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(LumoField::Title),
            _ => None,
        }
    }
}

/// Resolved, validated changes to apply to a stored lumo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LumoChanges {
    pub title: Option<String>,
}

impl LumoChanges {
    pub fn resolve(candidate: LumoUpdate, fields: &[LumoField]) -> Result<Self> {
        let mut changes = Self::default();

        for field in fields {
            match field {
                LumoField::Title => {
                    validate_title(&candidate.title)?;
                    changes.title = Some(candidate.title.clone());
                }
            }
        }

        Ok(changes)
    }

    pub fn apply(self, lumo: &mut Lumo) {
        if let Some(title) = self.title {
            lumo.title = title;
        }
    }
}

pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidArgument("title is required".to_string()));
    }
    Ok(())
}
