// Guest count bounds

pub const MIN_GUESTS: u32 = 1;

// Upper bound actually enforced; a misconfigured limit below 1 still admits one guest
pub fn guest_limit(max_guests: u32) -> u32 {
    max_guests.max(MIN_GUESTS)
}

// Applies `delta` to `current` and clamps the result to `[1, max(1, max_guests)]`.
pub fn adjust_guests(current: u32, delta: i64, max_guests: u32) -> u32 {
    let wanted = i64::from(current).saturating_add(delta);
    let clamped = wanted.clamp(i64::from(MIN_GUESTS), i64::from(guest_limit(max_guests)));
    // In range of u32 by construction
    clamped as u32
}

pub fn clamp_guests(current: u32, max_guests: u32) -> u32 {
    adjust_guests(current, 0, max_guests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4, 1, 4, 4; "#1 plus at the limit")]
    #[test_case(1, -1, 4, 1; "#2 minus at one")]
    #[test_case(2, 1, 4, 3; "#3 plus")]
    #[test_case(3, -1, 4, 2; "#4 minus")]
    #[test_case(1, 50, 8, 8; "#5 large jump")]
    #[test_case(6, -100, 8, 1; "#6 large drop")]
    #[test_case(3, 0, 0, 1; "#7 misconfigured zero limit")]
    #[test_case(0, 0, 4, 1; "#8 zero guests lifted")]
    #[test_case(u32::MAX, i64::MAX, u32::MAX, u32::MAX; "#9 saturates")]
    fn test_adjust_guests(current: u32, delta: i64, max_guests: u32, expected: u32) {
        assert_eq!(adjust_guests(current, delta, max_guests), expected);
    }

    #[test]
    fn test_always_in_bounds_and_idempotent() {
        for max_guests in 0..=10u32 {
            for current in 0..=12u32 {
                for delta in -15..=15i64 {
                    let once = adjust_guests(current, delta, max_guests);
                    assert!(once >= MIN_GUESTS && once <= guest_limit(max_guests));
                    assert_eq!(clamp_guests(once, max_guests), once);
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_current() {
        for delta in -3..=3i64 {
            let results: Vec<u32> = (0..=10).map(|c| adjust_guests(c, delta, 6)).collect();
            assert!(results.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
