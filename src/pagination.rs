// Page slicing
// Out-of-range requests are never renormalized: the last valid page stands.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    Moved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub slice: Vec<T>,
    pub page_count: usize,
    pub current_page: usize,
    pub navigation: Navigation,
}

// ceil(total / page_size); zero only for an empty result set
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

// Slices `items` to `requested_page` (1-based). A request outside
// [1, page_count] is rejected and the page stays at `previous_page` when that
// page is still in range, otherwise at 1.
pub fn paginate<T: Clone>(
    items: &[T],
    page_size: NonZeroUsize,
    requested_page: usize,
    previous_page: usize,
) -> Paginated<T> {
    let page_count = page_count(items.len(), page_size);

    let (current_page, navigation) = if (1..=page_count).contains(&requested_page) {
        (requested_page, Navigation::Moved)
    } else {
        debug!(
            requested_page,
            page_count, previous_page, "page request out of range"
        );
        (last_valid_page(previous_page, page_count), Navigation::Rejected)
    };

    Paginated {
        slice: slice_page(items, page_size, current_page).to_vec(),
        page_count,
        current_page,
        navigation,
    }
}

// A stale previous page falls back to 1; an empty result set stays on 1
fn last_valid_page(previous_page: usize, page_count: usize) -> usize {
    if (1..=page_count).contains(&previous_page) {
        previous_page
    } else {
        1
    }
}

fn slice_page<T>(items: &[T], page_size: NonZeroUsize, page: usize) -> &[T] {
    let size = page_size.get();
    let start = page.saturating_sub(1).saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}
