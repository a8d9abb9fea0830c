// Main library file for the stay booking core

// Booking: nights, pricing, guests and the widget state machine
pub mod booking;
pub mod guests;
pub mod nights;
pub mod pricing;

// Search: catalog, filtering, pagination and the results page
pub mod amenity;
pub mod catalog;
pub mod pagination;
pub mod query;
pub mod results;
pub mod search;

// Around the core boundary
pub mod gateway;
pub mod memo;

// Re-export key types for convenience
pub use amenity::{Amenity, AmenityError};
pub use booking::{
    BookingConfiguration, BookingEvent, BookingQuote, BookingSnapshot, BookingStateMachine,
    BookingWidgetConfig, ConfigError, ReservationRejected, ReservationRequest, Transition,
};
pub use catalog::{load_catalog_file, load_catalog_json, CatalogError, ListingRecord};
pub use gateway::{
    GatewayError, InMemoryReservationGateway, ReservationGateway, ReservationReceipt,
};
pub use guests::adjust_guests;
pub use memo::{CacheConfig, CacheStatsReport, ResultCache};
pub use nights::{calculate_nights, DateRange, NightsOutcome, QuoteStatus};
pub use pagination::{paginate, Navigation, Paginated};
pub use pricing::{price_stay, FeeKind, FeeLine, FeeRule, FeeSchedule, PriceBreakdown};
pub use query::{QueryError, SearchQuery};
pub use results::{search, SearchConfig, SearchEvent, SearchResultPage, SearchSession, SearchState};
pub use search::{filter_listings, PriceRange, PriceSlider, SearchCriteria};
