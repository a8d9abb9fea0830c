// Results page: search criteria transitions and the paged result set

use crate::amenity::Amenity;
use crate::booking::ConfigError;
use crate::catalog::ListingRecord;
use crate::pagination::{paginate, Navigation};
use crate::query::SearchQuery;
use crate::search::{filter_listings, PriceSlider, SearchCriteria};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use tracing::debug;

const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(9) {
    Some(size) => size,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: NonZeroUsize,
    pub price_slider: PriceSlider,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            price_slider: PriceSlider::default(),
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.price_slider.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPage {
    pub items: Vec<ListingRecord>,
    pub total_count: usize,
    pub page_count: usize,
    pub current_page: usize,
}

impl SearchResultPage {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    // Page links to render; empty when there are no results
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.page_count
    }
}

// The page in `criteria` is the one currently shown; a request outside the
// result set keeps it (or page 1 if it is stale) and reports
// `Navigation::Rejected`.
pub fn search(
    catalog: &[ListingRecord],
    criteria: &SearchCriteria,
    requested_page: usize,
) -> (SearchResultPage, Navigation) {
    let filtered = filter_listings(catalog, criteria);
    let paginated = paginate(&filtered, criteria.page_size, requested_page, criteria.page);

    let page = SearchResultPage {
        items: paginated.slice,
        total_count: filtered.len(),
        page_count: paginated.page_count,
        current_page: paginated.current_page,
    };
    (page, paginated.navigation)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    NewSearch(SearchQuery),
    SetPriceRange(u32, u32),
    ToggleAmenity(Amenity, bool),
    GoToPage(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: SearchQuery,
    pub criteria: SearchCriteria,
    pub page: SearchResultPage,
    pub navigation: Navigation,
}

// Pure transitions of the results page; the host owns the state values.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    config: SearchConfig,
}

impl SearchSession {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // Sidebar defaults plus the destination from the URL
    pub fn initial_criteria(&self, query: &SearchQuery) -> SearchCriteria {
        SearchCriteria {
            destination: query.destination.clone(),
            price_range: Some(self.config.price_slider.default_range()),
            required_amenities: BTreeSet::new(),
            page: 1,
            page_size: self.config.page_size,
        }
    }

    pub fn start(&self, catalog: &[ListingRecord], query: SearchQuery) -> SearchState {
        let criteria = self.initial_criteria(&query);
        self.settle(catalog, query, criteria, 1)
    }

    // Applies one sidebar, search bar or pagination event. Criteria changes
    // go back to the first page; page moves leave the criteria alone unless
    // accepted.
    pub fn apply(&self, catalog: &[ListingRecord], state: &SearchState, event: SearchEvent) -> SearchState {
        debug!(?event, "search event");

        let mut query = state.query.clone();
        let mut criteria = state.criteria.clone();

        match event {
            SearchEvent::NewSearch(new_query) => {
                criteria.destination = new_query.destination.clone();
                query = new_query;
            }
            SearchEvent::SetPriceRange(lo, hi) => {
                criteria.price_range = Some(self.config.price_slider.select(lo, hi));
            }
            SearchEvent::ToggleAmenity(amenity, true) => {
                criteria.required_amenities.insert(amenity);
            }
            SearchEvent::ToggleAmenity(amenity, false) => {
                criteria.required_amenities.remove(&amenity);
            }
            SearchEvent::GoToPage(page) => {
                return self.settle(catalog, query, criteria, page);
            }
        }

        criteria.page = 1;
        self.settle(catalog, query, criteria, 1)
    }

    fn settle(
        &self,
        catalog: &[ListingRecord],
        query: SearchQuery,
        mut criteria: SearchCriteria,
        requested_page: usize,
    ) -> SearchState {
        let (page, navigation) = search(catalog, &criteria, requested_page);
        criteria.page = page.current_page;

        debug!(
            total = page.total_count,
            page = page.current_page,
            pages = page.page_count,
            "search results updated"
        );

        SearchState {
            query,
            criteria,
            page,
            navigation,
        }
    }
}
