//! Token amounts.
//!
//! Amounts are raw integers (u128) in the smallest token unit to avoid
//! floating-point drift in stakes, weights and rewards.

/// Raw units per whole FUM token (8 decimals).
pub const TOKEN_UNIT: u128 = 100_000_000;

/// `amount * bps / 10_000`, rounded down.
pub fn bps_of(amount: u128, bps: u32) -> u128 {
    amount.saturating_mul(bps as u128) / 10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_points_round_down() {
        assert_eq!(bps_of(1_000, 2_500), 250);
        assert_eq!(bps_of(3, 1_000), 0);
        assert_eq!(bps_of(5 * TOKEN_UNIT, 1_000), TOKEN_UNIT / 2);
    }
}
