use serde::{Deserialize, Serialize};

/// Pricing and remaining allocation for one partner, as reported by the
/// partner catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartnerPricing {
    /// Fiat price of a single unit.
    pub unit_price_fiat: f64,
    /// Address the transfer must be sent to.
    pub payments_wallet: String,
    /// Units still available in this partner's allocation.
    pub available_capacity: u64,
}

/// Bonus units granted with an order: one for every three purchased.
pub fn bonus_units(quantity: u32) -> u32 {
    quantity / 3
}

/// Total units the partner's allocation must cover, bonus included.
pub fn units_required(quantity: u32) -> u64 {
    quantity as u64 + bonus_units(quantity) as u64
}

impl PartnerPricing {
    pub fn can_cover(&self, quantity: u32) -> bool {
        units_required(quantity) <= self.available_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_grid() {
        let cases = [
            (0, 0),
            (1, 0),
            (2, 0),
            (3, 1),
            (4, 1),
            (5, 1),
            (6, 2),
            (9, 3),
            (10, 3),
        ];
        for (quantity, expected) in cases {
            assert_eq!(bonus_units(quantity), expected, "quantity {}", quantity);
        }
    }

    #[test]
    fn test_units_required_includes_bonus() {
        assert_eq!(units_required(10), 13);
        assert_eq!(units_required(2), 2);
    }

    #[test]
    fn test_capacity_boundary_is_inclusive() {
        let pricing = PartnerPricing {
            unit_price_fiat: 5.0,
            payments_wallet: "0xabc".into(),
            available_capacity: 13,
        };
        // 10 purchased + 3 bonus exactly fills the allocation
        assert!(pricing.can_cover(10));
        assert!(!pricing.can_cover(11));
    }

    #[test]
    fn test_small_order_fits_small_allocation() {
        let pricing = PartnerPricing {
            unit_price_fiat: 5.0,
            payments_wallet: "0xabc".into(),
            available_capacity: 1,
        };
        assert!(pricing.can_cover(1));
        assert!(!pricing.can_cover(2));
    }
}
