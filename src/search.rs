// Listing search filter
// A stable AND-filter: surviving listings keep their catalog order.

use crate::amenity::Amenity;
use crate::booking::ConfigError;
use crate::catalog::ListingRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

// Price slider of the filter sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSlider {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default_selection: (u32, u32),
}

impl Default for PriceSlider {
    fn default() -> Self {
        Self {
            min: 0,
            max: 1000,
            step: 10,
            default_selection: (50, 500),
        }
    }
}

impl PriceSlider {
    // Thumbs may cross; each value is clamped to the domain and snapped to
    // the nearest step
    pub fn select(&self, a: u32, b: u32) -> PriceRange {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        PriceRange::new(
            Decimal::from(self.snap(lo)),
            Decimal::from(self.snap(hi)),
        )
    }

    pub fn default_range(&self) -> PriceRange {
        let (lo, hi) = self.default_selection;
        self.select(lo, hi)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidPriceDomain {
                min: self.min,
                max: self.max,
            });
        }
        if self.step == 0 {
            return Err(ConfigError::InvalidPriceStep);
        }
        Ok(())
    }

    // Unvalidated domains are ordered first so a crossed min/max never panics
    fn snap(&self, value: u32) -> u32 {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let value = value.clamp(min, max);
        if self.step == 0 {
            return value;
        }
        // Widened so rounding up near u32::MAX cannot overflow
        let step = u64::from(self.step);
        let offset = u64::from(value - min);
        let snapped = u64::from(min) + (offset + step / 2) / step * step;
        u32::try_from(snapped.min(u64::from(max))).unwrap_or(max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub destination: String,
    pub price_range: Option<PriceRange>,
    pub required_amenities: BTreeSet<Amenity>,
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl SearchCriteria {
    // No clauses: every listing passes
    pub fn unfiltered(page_size: NonZeroUsize) -> Self {
        Self {
            destination: String::new(),
            price_range: None,
            required_amenities: BTreeSet::new(),
            page: 1,
            page_size,
        }
    }

    pub fn matches(&self, listing: &ListingRecord) -> bool {
        if !self
            .price_range
            .map_or(true, |range| range.contains(listing.price_per_night))
        {
            return false;
        }

        if !self
            .required_amenities
            .iter()
            .all(|amenity| listing.has_amenity(*amenity))
        {
            return false;
        }

        if !self.destination.is_empty()
            && !listing
                .location
                .to_lowercase()
                .contains(&self.destination.to_lowercase())
        {
            return false;
        }

        true
    }
}

// Catalog order is kept; the page fields are ignored here
pub fn filter_listings(catalog: &[ListingRecord], criteria: &SearchCriteria) -> Vec<ListingRecord> {
    let mut filtered = Vec::new();

    for listing in catalog {
        if !criteria.matches(listing) {
            continue;
        }

        filtered.push(listing.clone());
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn listing(id: &str, location: &str, price: i64, amenities: &[Amenity]) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            title: format!("Listing {}", id),
            location: location.to_string(),
            price_per_night: Decimal::from(price),
            rating: Some(4.5),
            review_count: Some(10),
            amenities: amenities.iter().copied().collect(),
            tags: Vec::new(),
            image_url: None,
        }
    }

    fn catalog() -> Vec<ListingRecord> {
        vec![
            listing("loft", "New York, NY", 120, &[Amenity::WiFi, Amenity::Kitchen]),
            listing("villa", "Miami, FL", 600, &[Amenity::WiFi, Amenity::Pool]),
            listing("cabin", "Austin, TX", 50, &[Amenity::PetFriendly, Amenity::Parking]),
            listing("studio", "New Orleans, LA", 500, &[Amenity::WiFi]),
            listing("bungalow", "Los Angeles, CA", 200, &[Amenity::Pool, Amenity::Parking]),
        ]
    }

    fn criteria(
        destination: &str,
        price: Option<(i64, i64)>,
        amenities: &[Amenity],
    ) -> SearchCriteria {
        SearchCriteria {
            destination: destination.to_string(),
            price_range: price.map(|(lo, hi)| PriceRange::new(Decimal::from(lo), Decimal::from(hi))),
            required_amenities: amenities.iter().copied().collect(),
            ..SearchCriteria::unfiltered(NonZeroUsize::new(9).unwrap())
        }
    }

    fn ids(listings: &[ListingRecord]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test_case(criteria("", None, &[]), vec!["loft", "villa", "cabin", "studio", "bungalow"]; "#1 no clauses")]
    #[test_case(criteria("", Some((50, 500)), &[]), vec!["loft", "cabin", "studio", "bungalow"]; "#2 price inclusive both ends")]
    #[test_case(criteria("", None, &[Amenity::WiFi]), vec!["loft", "villa", "studio"]; "#3 single amenity")]
    #[test_case(criteria("", None, &[Amenity::Pool, Amenity::Parking]), vec!["bungalow"]; "#4 all amenities required")]
    #[test_case(criteria("new", None, &[]), vec!["loft", "studio"]; "#5 destination substring")]
    #[test_case(criteria("MIAMI", None, &[]), vec!["villa"]; "#6 destination ignores case")]
    #[test_case(criteria("new", Some((100, 300)), &[Amenity::WiFi]), vec!["loft"]; "#7 combined clauses")]
    #[test_case(criteria("Paris", None, &[]), vec![]; "#8 nothing matches")]
    fn test_filter_listings(criteria: SearchCriteria, expected: Vec<&str>) {
        let results = filter_listings(&catalog(), &criteria);
        assert_eq!(ids(&results), expected);
    }

    #[test]
    fn test_price_and_wifi_scenario() {
        let catalog = vec![
            listing("A", "Chicago, IL", 600, &[Amenity::WiFi]),
            listing("B", "Chicago, IL", 200, &["wifi".parse().unwrap()]),
        ];
        let criteria = criteria("", Some((50, 500)), &[Amenity::WiFi]);

        assert_eq!(ids(&filter_listings(&catalog, &criteria)), vec!["B"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = criteria("a", Some((60, 550)), &[Amenity::Parking]);

        let once = filter_listings(&catalog(), &criteria);
        let twice = filter_listings(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_is_stable() {
        let mut reversed = catalog();
        reversed.reverse();

        let results = filter_listings(&reversed, &criteria("", None, &[Amenity::WiFi]));
        assert_eq!(ids(&results), vec!["studio", "villa", "loft"]);
    }

    #[test_case(50, 500, 50, 500; "#1 default selection")]
    #[test_case(500, 50, 50, 500; "#2 crossed thumbs")]
    #[test_case(44, 1096, 40, 1000; "#3 snapped and clamped")]
    #[test_case(0, 5, 0, 10; "#4 rounds half up")]
    fn test_price_slider(a: u32, b: u32, lo: i64, hi: i64) {
        let range = PriceSlider::default().select(a, b);
        assert_eq!(range, PriceRange::new(Decimal::from(lo), Decimal::from(hi)));
    }

    #[test]
    fn test_price_slider_with_crossed_domain() {
        let slider: PriceSlider = serde_json::from_str(r#"{"min":500,"max":100}"#).unwrap();
        assert!(matches!(
            slider.validate(),
            Err(ConfigError::InvalidPriceDomain { min: 500, max: 100 })
        ));

        let range = slider.select(50, 500);
        assert_eq!(range, PriceRange::new(Decimal::from(100), Decimal::from(500)));
    }

    #[test]
    fn test_price_slider_zero_step() {
        let slider = PriceSlider {
            step: 0,
            ..PriceSlider::default()
        };
        assert_eq!(slider.validate(), Err(ConfigError::InvalidPriceStep));

        let range = slider.select(44, 1096);
        assert_eq!(range, PriceRange::new(Decimal::from(44), Decimal::from(1000)));
    }

    #[test_case(u32::MAX, u32::MAX; "#1 rounds up past the max")]
    #[test_case(u32::MAX - 4, u32::MAX - 5; "#2 rounds down near the max")]
    #[test_case(3, 0; "#3 rounds down near zero")]
    fn test_price_slider_huge_domain(value: u32, expected: u32) {
        let slider = PriceSlider {
            min: 0,
            max: u32::MAX,
            step: 10,
            default_selection: (0, u32::MAX),
        };
        assert_eq!(slider.validate(), Ok(()));

        let range = slider.select(value, value);
        assert_eq!(range.min, Decimal::from(expected));
    }
}
