//! Lume model: a place, stop or event inside a lumo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MaskField;
use crate::{Error, Result};

// ============================================================================
// Lume Type
// ============================================================================

/// Kind of lume. `Unspecified` is accepted on the wire but never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LumeType {
    #[default]
    #[serde(rename = "LUME_TYPE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "LUME_TYPE_CITY")]
    City,
    #[serde(rename = "LUME_TYPE_ATTRACTION")]
    Attraction,
    #[serde(rename = "LUME_TYPE_ACCOMMODATION")]
    Accommodation,
    #[serde(rename = "LUME_TYPE_RESTAURANT")]
    Restaurant,
    #[serde(rename = "LUME_TYPE_TRANSPORT_HUB")]
    TransportHub,
    #[serde(rename = "LUME_TYPE_ACTIVITY")]
    Activity,
    #[serde(rename = "LUME_TYPE_SHOPPING")]
    Shopping,
    #[serde(rename = "LUME_TYPE_ENTERTAINMENT")]
    Entertainment,
    #[serde(rename = "LUME_TYPE_CUSTOM")]
    Custom,
}

impl LumeType {
    /// Every value that may be stored.
    pub const ALL: &'static [LumeType] = &[
        LumeType::City,
        LumeType::Attraction,
        LumeType::Accommodation,
        LumeType::Restaurant,
        LumeType::TransportHub,
        LumeType::Activity,
        LumeType::Shopping,
        LumeType::Entertainment,
        LumeType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LumeType::Unspecified => "UNSPECIFIED",
            LumeType::City => "CITY",
            LumeType::Attraction => "ATTRACTION",
            LumeType::Accommodation => "ACCOMMODATION",
            LumeType::Restaurant => "RESTAURANT",
            LumeType::TransportHub => "TRANSPORT_HUB",
            LumeType::Activity => "ACTIVITY",
            LumeType::Shopping => "SHOPPING",
            LumeType::Entertainment => "ENTERTAINMENT",
            LumeType::Custom => "CUSTOM",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UNSPECIFIED" => Some(LumeType::Unspecified),
            "CITY" => Some(LumeType::City),
            "ATTRACTION" => Some(LumeType::Attraction),
            "ACCOMMODATION" => Some(LumeType::Accommodation),
            "RESTAURANT" => Some(LumeType::Restaurant),
            "TRANSPORT_HUB" => Some(LumeType::TransportHub),
            "ACTIVITY" => Some(LumeType::Activity),
            "SHOPPING" => Some(LumeType::Shopping),
            "ENTERTAINMENT" => Some(LumeType::Entertainment),
            "CUSTOM" => Some(LumeType::Custom),
            _ => None,
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != LumeType::Unspecified
    }
}

impl std::fmt::Display for LumeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Lume
// ============================================================================

/// A node of a travel plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Lume {
    pub id: i64,
    pub lume_id: Uuid,
    pub lumo_id: Uuid,
    pub lume_type: LumeType,
    pub name: String,
    /// Empty when not given
    pub description: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub booking_link: Option<String>,
    pub images: Vec<String>,
    pub category_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a lume.
#[derive(Debug, Clone, Default)]
pub struct NewLume {
    pub lumo_id: String,
    pub lume_type: LumeType,
    pub name: String,
    pub description: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub booking_link: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_tags: Option<Vec<String>>,
}

impl NewLume {
    pub fn validate(&self) -> Result<()> {
        if !self.lume_type.is_specified() {
            return Err(Error::InvalidArgument("lume type is required".to_string()));
        }
        validate_name(&self.name)?;
        validate_coordinates(self.latitude, self.longitude)?;
        validate_date_range(self.date_start, self.date_end)
    }
}

/// Candidate values for an update. The parent lumo cannot change.
#[derive(Debug, Clone, Default)]
pub struct LumeUpdate {
    pub lume_type: LumeType,
    pub name: String,
    pub description: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub booking_link: Option<String>,
    pub images: Option<Vec<String>>,
    pub category_tags: Option<Vec<String>>,
}

/// Filters for listing the lumes of a lumo.
#[derive(Debug, Clone, Default)]
pub struct LumeFilter {
    pub lumo_id: String,
    /// `Unspecified` means no type filter
    pub lume_type: LumeType,
}

/// Geographic search window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn validate(&self) -> Result<()> {
        validate_coordinates(Some(self.min_lat), Some(self.min_lng))?;
        validate_coordinates(Some(self.max_lat), Some(self.max_lng))?;
        if self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(Error::InvalidArgument(
                "bounding box minimum exceeds maximum".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Field Mask
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LumeField {
    Name,
    Type,
    Description,
    DateStart,
    DateEnd,
    Latitude,
    Longitude,
    Address,
    BookingLink,
    Images,
    CategoryTags,
}

impl MaskField for LumeField {
    const ALL: &'static [Self] = &[
        LumeField::Name,
        LumeField::Type,
        LumeField::Description,
        LumeField::DateStart,
        LumeField::DateEnd,
        LumeField::Latitude,
        LumeField::Longitude,
        LumeField::Address,
        LumeField::BookingLink,
        LumeField::Images,
        LumeField::CategoryTags,
    ];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(LumeField::Name),
            "type" => Some(LumeField::Type),
            "description" => Some(LumeField::Description),
            "date_start" => Some(LumeField::DateStart),
            "date_end" => Some(LumeField::DateEnd),
            "latitude" => Some(LumeField::Latitude),
            "longitude" => Some(LumeField::Longitude),
            "address" => Some(LumeField::Address),
            "booking_link" => Some(LumeField::BookingLink),
            "images" => Some(LumeField::Images),
            "category_tags" => Some(LumeField::CategoryTags),
            _ => None,
        }
    }
}

/// Resolved changes to apply to a stored lume.
///
/// Outer `None` leaves the stored value alone; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LumeChanges {
    pub lume_type: Option<LumeType>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub date_start: Option<Option<DateTime<Utc>>>,
    pub date_end: Option<Option<DateTime<Utc>>>,
    pub latitude: Option<Option<f64>>,
    pub longitude: Option<Option<f64>>,
    pub address: Option<Option<String>>,
    pub booking_link: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub category_tags: Option<Vec<String>>,
}

impl LumeChanges {
    pub fn resolve(candidate: LumeUpdate, fields: &[LumeField]) -> Result<Self> {
        let mut changes = Self::default();

        for field in fields {
            match field {
                LumeField::Name => {
                    validate_name(&candidate.name)?;
                    changes.name = Some(candidate.name.clone());
                }
                LumeField::Type => {
                    if !candidate.lume_type.is_specified() {
                        return Err(Error::InvalidArgument("lume type is required".to_string()));
                    }
                    changes.lume_type = Some(candidate.lume_type);
                }
                LumeField::Description => changes.description = Some(candidate.description.clone()),
                LumeField::DateStart => changes.date_start = Some(candidate.date_start),
                LumeField::DateEnd => changes.date_end = Some(candidate.date_end),
                LumeField::Latitude => {
                    validate_coordinates(candidate.latitude, None)?;
                    changes.latitude = Some(candidate.latitude);
                }
                LumeField::Longitude => {
                    validate_coordinates(None, candidate.longitude)?;
                    changes.longitude = Some(candidate.longitude);
                }
                LumeField::Address => changes.address = Some(candidate.address.clone()),
                LumeField::BookingLink => changes.booking_link = Some(candidate.booking_link.clone()),
                LumeField::Images => {
                    if let Some(images) = &candidate.images {
                        changes.images = Some(images.clone());
                    }
                }
                LumeField::CategoryTags => {
                    if let Some(tags) = &candidate.category_tags {
                        changes.category_tags = Some(tags.clone());
                    }
                }
            }
        }

        Ok(changes)
    }

    pub fn apply(self, lume: &mut Lume) {
        if let Some(lume_type) = self.lume_type {
            lume.lume_type = lume_type;
        }
        if let Some(name) = self.name {
            lume.name = name;
        }
        if let Some(description) = self.description {
            lume.description = description;
        }
        if let Some(date_start) = self.date_start {
            lume.date_start = date_start;
        }
        if let Some(date_end) = self.date_end {
            lume.date_end = date_end;
        }
        if let Some(latitude) = self.latitude {
            lume.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            lume.longitude = longitude;
        }
        if let Some(address) = self.address {
            lume.address = address;
        }
        if let Some(booking_link) = self.booking_link {
            lume.booking_link = booking_link;
        }
        if let Some(images) = self.images {
            lume.images = images;
        }
        if let Some(tags) = self.category_tags {
            lume.category_tags = tags;
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument("name is required".to_string()));
    }
    Ok(())
}

pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
    if let Some(lat) = latitude {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::InvalidArgument(format!(
                "latitude must be between -90 and 90, got {}",
                lat
            )));
        }
    }
    if let Some(lng) = longitude {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(Error::InvalidArgument(format!(
                "longitude must be between -180 and 180, got {}",
                lng
            )));
        }
    }
    Ok(())
}

pub fn validate_date_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::InvalidArgument(
                "date_start must not be after date_end".to_string(),
            ));
        }
    }
    Ok(())
}
