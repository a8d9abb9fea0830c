// Closed amenity vocabulary shared by listings and the filter sidebar

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown amenity: {0}")]
pub struct AmenityError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Amenity {
    WiFi,
    Pool,
    Kitchen,
    Parking,
    PetFriendly,
}

impl Amenity {
    // Sidebar order
    pub const ALL: [Amenity; 5] = [
        Amenity::WiFi,
        Amenity::Pool,
        Amenity::Kitchen,
        Amenity::Parking,
        Amenity::PetFriendly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Amenity::WiFi => "WiFi",
            Amenity::Pool => "Pool",
            Amenity::Kitchen => "Kitchen",
            Amenity::Parking => "Parking",
            Amenity::PetFriendly => "Pet Friendly",
        }
    }

    // Lowercase key, as used in listing feeds and checkbox ids
    pub fn key(&self) -> &'static str {
        match self {
            Amenity::WiFi => "wifi",
            Amenity::Pool => "pool",
            Amenity::Kitchen => "kitchen",
            Amenity::Parking => "parking",
            Amenity::PetFriendly => "pet-friendly",
        }
    }

    // Case-insensitive lookup by label or key. Spaces, dashes and
    // underscores are interchangeable, so "Pet Friendly", "pet_friendly"
    // and "PET-FRIENDLY" all resolve.
    pub fn lookup(text: &str) -> Option<Amenity> {
        let normalized: String = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        Amenity::ALL.into_iter().find(|amenity| {
            let key: String = amenity.key().chars().filter(|c| *c != '-').collect();
            key == normalized
        })
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Amenity {
    type Err = AmenityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amenity::lookup(s).ok_or_else(|| AmenityError(s.to_string()))
    }
}

impl TryFrom<String> for Amenity {
    type Error = AmenityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amenity> for String {
    fn from(amenity: Amenity) -> Self {
        amenity.label().to_string()
    }
}
