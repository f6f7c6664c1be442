//! Link model: a directed edge between two lumes.
//!
//! Links are directional: from -> to. A link may point at its own source.
//! Travel details are independent of the link type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_external_id, MaskField};
use crate::{Error, Result};

// ============================================================================
// Link Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    #[serde(rename = "LINK_TYPE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "LINK_TYPE_TRAVEL")]
    Travel,
    #[serde(rename = "LINK_TYPE_RECOMMENDED")]
    Recommended,
    #[serde(rename = "LINK_TYPE_CUSTOM")]
    Custom,
}

impl LinkType {
    pub const ALL: &'static [LinkType] = &[LinkType::Travel, LinkType::Recommended, LinkType::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Unspecified => "UNSPECIFIED",
            LinkType::Travel => "TRAVEL",
            LinkType::Recommended => "RECOMMENDED",
            LinkType::Custom => "CUSTOM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UNSPECIFIED" => Some(LinkType::Unspecified),
            "TRAVEL" => Some(LinkType::Travel),
            "RECOMMENDED" => Some(LinkType::Recommended),
            "CUSTOM" => Some(LinkType::Custom),
            _ => None,
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != LinkType::Unspecified
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Travel
// ============================================================================

/// How a traveller moves along a travel link. `Unspecified` is a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TravelMode {
    #[default]
    #[serde(rename = "TRAVEL_MODE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "TRAVEL_MODE_FLIGHT")]
    Flight,
    #[serde(rename = "TRAVEL_MODE_TRAIN")]
    Train,
    #[serde(rename = "TRAVEL_MODE_BUS")]
    Bus,
    #[serde(rename = "TRAVEL_MODE_DRIVE")]
    Drive,
    #[serde(rename = "TRAVEL_MODE_UBER")]
    Uber,
    #[serde(rename = "TRAVEL_MODE_METRO")]
    Metro,
}

impl TravelMode {
    pub const ALL: &'static [TravelMode] = &[
        TravelMode::Unspecified,
        TravelMode::Flight,
        TravelMode::Train,
        TravelMode::Bus,
        TravelMode::Drive,
        TravelMode::Uber,
        TravelMode::Metro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Unspecified => "UNSPECIFIED",
            TravelMode::Flight => "FLIGHT",
            TravelMode::Train => "TRAIN",
            TravelMode::Bus => "BUS",
            TravelMode::Drive => "DRIVE",
            TravelMode::Uber => "UBER",
            TravelMode::Metro => "METRO",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UNSPECIFIED" => Some(TravelMode::Unspecified),
            "FLIGHT" => Some(TravelMode::Flight),
            "TRAIN" => Some(TravelMode::Train),
            "BUS" => Some(TravelMode::Bus),
            "DRIVE" => Some(TravelMode::Drive),
            "UBER" => Some(TravelMode::Uber),
            "METRO" => Some(TravelMode::Metro),
            _ => None,
        }
    }
}

/// Travel segment attached to a link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TravelDetails {
    pub mode: TravelMode,
    pub duration_sec: i32,
    /// Unconstrained, may be negative
    pub cost_estimate: f64,
    pub distance_meters: f64,
}

impl TravelDetails {
    pub fn validate(&self) -> Result<()> {
        if self.duration_sec < 0 {
            return Err(Error::InvalidArgument(format!(
                "travel duration must not be negative, got {}",
                self.duration_sec
            )));
        }
        if self.distance_meters < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "travel distance must not be negative, got {}",
                self.distance_meters
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Link
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub link_id: Uuid,
    pub from_lume_id: Uuid,
    pub to_lume_id: Uuid,
    pub link_type: LinkType,
    pub travel: Option<TravelDetails>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied link values, used both to create a link and as the
/// candidate of an update. Lume ids are validated by the service.
#[derive(Debug, Clone, Default)]
pub struct LinkDraft {
    pub from_lume_id: String,
    pub to_lume_id: String,
    pub link_type: LinkType,
    pub travel: Option<TravelDetails>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLink {
    pub from_lume_id: Uuid,
    pub to_lume_id: Uuid,
    pub link_type: LinkType,
    pub travel: Option<TravelDetails>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
}

impl LinkDraft {
    pub fn validate(self) -> Result<ValidLink> {
        let from_lume_id = parse_external_id(&self.from_lume_id, "from_lume_id")?;
        let to_lume_id = parse_external_id(&self.to_lume_id, "to_lume_id")?;
        validate_link_type(self.link_type)?;
        if let Some(travel) = &self.travel {
            travel.validate()?;
        }

        Ok(ValidLink {
            from_lume_id,
            to_lume_id,
            link_type: self.link_type,
            travel: self.travel,
            notes: self.notes,
            sequence_index: self.sequence_index,
        })
    }
}

/// Which lumes a link listing or count is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSelector {
    /// Links from one lume to another
    Between { from: String, to: String },
    /// Outgoing links
    From(String),
    /// Incoming links
    To(String),
    /// Links in either direction, optionally of one type
    Lume {
        lume_id: String,
        link_type: Option<LinkType>,
    },
    /// Every link of one type
    Type(LinkType),
}

// ============================================================================
// Field Mask
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    FromLumeId,
    ToLumeId,
    Type,
    Travel,
    Notes,
    SequenceIndex,
}

impl MaskField for LinkField {
    const ALL: &'static [Self] = &[
        LinkField::FromLumeId,
        LinkField::ToLumeId,
        LinkField::Type,
        LinkField::Travel,
        LinkField::Notes,
        LinkField::SequenceIndex,
    ];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "from_lume_id" => Some(LinkField::FromLumeId),
            "to_lume_id" => Some(LinkField::ToLumeId),
            "type" => Some(LinkField::Type),
            "travel" => Some(LinkField::Travel),
            "notes" => Some(LinkField::Notes),
            "sequence_index" => Some(LinkField::SequenceIndex),
            _ => None,
        }
    }
}

/// Resolved changes to apply to a stored link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkChanges {
    pub from_lume_id: Option<Uuid>,
    pub to_lume_id: Option<Uuid>,
    pub link_type: Option<LinkType>,
    pub travel: Option<TravelDetails>,
    pub notes: Option<String>,
    pub sequence_index: Option<i32>,
}

impl LinkChanges {
    /// Travel, notes and sequence index only change when the candidate
    /// carries a value.
    pub fn resolve(candidate: LinkDraft, fields: &[LinkField]) -> Result<Self> {
        let mut changes = Self::default();

        for field in fields {
            match field {
                LinkField::FromLumeId => {
                    changes.from_lume_id =
                        Some(parse_external_id(&candidate.from_lume_id, "from_lume_id")?);
                }
                LinkField::ToLumeId => {
                    changes.to_lume_id = Some(parse_external_id(&candidate.to_lume_id, "to_lume_id")?);
                }
                LinkField::Type => {
                    validate_link_type(candidate.link_type)?;
                    changes.link_type = Some(candidate.link_type);
                }
                LinkField::Travel => {
                    if let Some(travel) = candidate.travel {
                        travel.validate()?;
                        changes.travel = Some(travel);
                    }
                }
                LinkField::Notes => {
                    if let Some(notes) = &candidate.notes {
                        changes.notes = Some(notes.clone());
                    }
                }
                LinkField::SequenceIndex => {
                    if let Some(index) = candidate.sequence_index {
                        changes.sequence_index = Some(index);
                    }
                }
            }
        }

        Ok(changes)
    }

    pub fn apply(self, link: &mut Link) {
        if let Some(from) = self.from_lume_id {
            link.from_lume_id = from;
        }
        if let Some(to) = self.to_lume_id {
            link.to_lume_id = to;
        }
        if let Some(link_type) = self.link_type {
            link.link_type = link_type;
        }
        if let Some(travel) = self.travel {
            link.travel = Some(travel);
        }
        if let Some(notes) = self.notes {
            link.notes = Some(notes);
        }
        if let Some(index) = self.sequence_index {
            link.sequence_index = Some(index);
        }
    }
}

fn validate_link_type(link_type: LinkType) -> Result<()> {
    if !link_type.is_specified() {
        return Err(Error::InvalidArgument("link type is required".to_string()));
    }
    Ok(())
}
