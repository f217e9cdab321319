//! Bike catalogue entity.
//!
//! ## Invariants
//! - `available` is `true` iff no rental referencing this bike is `Active`.
//!   Only the availability ledger (driven by the rental coordinator) flips
//!   the flag; attribute edits leave it untouched.
//! - `price_per_hour_cents` is non-negative. Money is held in integer minor
//!   units throughout the crate.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default placement for a bike without an explicit location label.
pub const DEFAULT_LOCATION: &str = "Main Station";

/// Default image path served when no photo has been uploaded.
pub const DEFAULT_IMAGE: &str = "/placeholder.svg?height=300&width=400";

/// Fixed set of catalogue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BikeCategory {
    Supersport,
    Naked,
    Tourer,
    Twostroke,
}

impl BikeCategory {
    /// All categories, in catalogue display order.
    pub const ALL: [Self; 4] = [Self::Supersport, Self::Naked, Self::Tourer, Self::Twostroke];
}

impl std::fmt::Display for BikeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Supersport => "supersport",
            Self::Naked => "naked",
            Self::Tourer => "tourer",
            Self::Twostroke => "twostroke",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for BikeCategory {
    type Err = BikeValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supersport" => Ok(Self::Supersport),
            "naked" => Ok(Self::Naked),
            "tourer" => Ok(Self::Tourer),
            "twostroke" => Ok(Self::Twostroke),
            other => Err(BikeValidationError::UnknownCategory {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by [`Bike::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BikeValidationError {
    /// Name empty once trimmed.
    #[error("bike name is required")]
    EmptyName,
    /// Description empty once trimmed.
    #[error("description is required")]
    EmptyDescription,
    /// Negative hourly rate.
    #[error("price per hour cannot be negative")]
    NegativePrice,
    /// Category string outside the fixed set.
    #[error("unknown bike category: {value}")]
    UnknownCategory {
        /// The rejected input.
        value: String,
    },
}

/// Input payload for [`Bike::new`].
#[derive(Debug, Clone)]
pub struct BikeDraft {
    pub id: Uuid,
    pub name: String,
    pub category: BikeCategory,
    pub price_per_hour_cents: i64,
    pub available: bool,
    pub description: String,
    pub features: Vec<String>,
    pub location: String,
    pub image: String,
}

impl BikeDraft {
    /// Draft for a newly listed bike: available, default image and location
    /// unless overridden.
    #[must_use]
    pub fn listed(
        name: String,
        category: BikeCategory,
        price_per_hour_cents: i64,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            category,
            price_per_hour_cents,
            available: true,
            description,
            features: Vec::new(),
            location: DEFAULT_LOCATION.to_owned(),
            image: DEFAULT_IMAGE.to_owned(),
        }
    }
}

/// A catalogue bike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bike {
    id: Uuid,
    name: String,
    category: BikeCategory,
    price_per_hour_cents: i64,
    available: bool,
    description: String,
    features: Vec<String>,
    location: String,
    image: String,
}

impl Bike {
    /// Creates a validated bike.
    pub fn new(draft: BikeDraft) -> Result<Self, BikeValidationError> {
        Self::try_from(draft)
    }

    /// Returns the bike id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the catalogue category.
    pub fn category(&self) -> BikeCategory {
        self.category
    }

    /// Returns the hourly rate in integer minor units.
    pub fn price_per_hour_cents(&self) -> i64 {
        self.price_per_hour_cents
    }

    /// Returns the availability flag.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Returns the free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the feature tags in listing order.
    pub fn features(&self) -> &[String] {
        self.features.as_slice()
    }

    /// Returns the location label.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the image path.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Copy of this bike with the availability flag replaced.
    ///
    /// Reserved for the persistence layer when rehydrating rows; domain code
    /// flips availability through the ledger.
    #[must_use]
    pub(crate) fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }
}

impl TryFrom<BikeDraft> for Bike {
    type Error = BikeValidationError;

    fn try_from(value: BikeDraft) -> Result<Self, Self::Error> {
        let name = value.name.trim().to_owned();
        if name.is_empty() {
            return Err(BikeValidationError::EmptyName);
        }
        let description = value.description.trim().to_owned();
        if description.is_empty() {
            return Err(BikeValidationError::EmptyDescription);
        }
        if value.price_per_hour_cents < 0 {
            return Err(BikeValidationError::NegativePrice);
        }
        let location = match value.location.trim() {
            "" => DEFAULT_LOCATION.to_owned(),
            trimmed => trimmed.to_owned(),
        };
        let image = match value.image.trim() {
            "" => DEFAULT_IMAGE.to_owned(),
            trimmed => trimmed.to_owned(),
        };
        Ok(Self {
            id: value.id,
            name,
            category: value.category,
            price_per_hour_cents: value.price_per_hour_cents,
            available: value.available,
            description,
            features: value.features,
            location,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn draft() -> BikeDraft {
        BikeDraft::listed(
            "Aprilia RS660".to_owned(),
            BikeCategory::Supersport,
            1500,
            "Twin-cylinder sports bike".to_owned(),
        )
    }

    #[test]
    fn listed_draft_defaults() {
        let bike = Bike::new(draft()).expect("valid draft");
        assert!(bike.is_available());
        assert_eq!(bike.location(), DEFAULT_LOCATION);
        assert_eq!(bike.image(), DEFAULT_IMAGE);
    }

    #[test]
    fn rejects_negative_price() {
        let mut d = draft();
        d.price_per_hour_cents = -1;
        assert_eq!(Bike::new(d), Err(BikeValidationError::NegativePrice));
    }

    #[rstest]
    #[case("", BikeValidationError::EmptyName)]
    #[case("   ", BikeValidationError::EmptyName)]
    fn rejects_blank_names(#[case] name: &str, #[case] expected: BikeValidationError) {
        let mut d = draft();
        d.name = name.to_owned();
        assert_eq!(Bike::new(d), Err(expected));
    }

    #[test]
    fn blank_location_falls_back_to_default() {
        let mut d = draft();
        d.location = "  ".to_owned();
        let bike = Bike::new(d).expect("valid draft");
        assert_eq!(bike.location(), DEFAULT_LOCATION);
    }

    #[test]
    fn category_round_trips_through_strings() {
        for category in BikeCategory::ALL {
            let parsed: BikeCategory = category.to_string().parse().expect("known label");
            assert_eq!(parsed, category);
        }
        assert!("cruiser".parse::<BikeCategory>().is_err());
    }
}
