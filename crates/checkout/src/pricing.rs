/// Fiat → crypto conversion for a priced order.
///
/// Rates arrive as fiat per whole coin; on-chain transfers are denominated
/// in integer base units of 10^-18 coin. Fractions below one base unit are
/// truncated, never rounded up.
use crate::error::{CheckoutError, Result};

/// Decimal places of one whole coin.
pub const BASE_UNIT_DECIMALS: u32 = 18;

const BASE_UNIT_SCALE: f64 = 1e18;

/// A priced order: fiat total, crypto total and the exact on-chain amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    pub fiat_total: f64,
    pub crypto_total: f64,
    pub base_units: u128,
}

pub fn quote(unit_price_fiat: f64, quantity: u32, rate: f64) -> Result<Quote> {
    if !unit_price_fiat.is_finite() || unit_price_fiat < 0.0 {
        return Err(CheckoutError::ConversionFailed {
            detail: format!("unit price {} is not usable", unit_price_fiat),
        });
    }
    if !rate.is_finite() || rate <= 0.0 {
        return Err(CheckoutError::ConversionFailed {
            detail: format!("rate {} is not usable", rate),
        });
    }

    let fiat_total = unit_price_fiat * quantity as f64;
    let crypto_total = fiat_total / rate;
    let base_units = to_base_units(crypto_total)?;

    Ok(Quote {
        fiat_total,
        crypto_total,
        base_units,
    })
}

/// Truncate a coin amount into integer base units.
pub fn to_base_units(crypto_total: f64) -> Result<u128> {
    let scaled = crypto_total * BASE_UNIT_SCALE;
    if !scaled.is_finite() || scaled < 0.0 {
        return Err(CheckoutError::ConversionFailed {
            detail: format!("amount {} does not convert to base units", crypto_total),
        });
    }
    if scaled >= u128::MAX as f64 {
        return Err(CheckoutError::ConversionFailed {
            detail: format!("amount {} exceeds the representable range", crypto_total),
        });
    }
    Ok(scaled.floor() as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn test_quote_ten_units_at_five_fiat_rate_two_thousand() {
        let quote = quote(5.0, 10, 2000.0).unwrap();
        assert_eq!(quote.fiat_total, 50.0);
        assert_eq!(quote.crypto_total, 0.025);
        assert_eq!(quote.base_units, 25_000_000_000_000_000u128);
    }

    #[test]
    fn test_sub_base_unit_fraction_truncates_down() {
        // 1.5 base units of value: the half unit is dropped
        assert_eq!(to_base_units(1.5e-18).unwrap(), 1);
        assert_eq!(to_base_units(0.9e-18).unwrap(), 0);
    }

    #[test]
    fn test_whole_coin_scales_exactly() {
        assert_eq!(to_base_units(1.0).unwrap(), 1_000_000_000_000_000_000u128);
    }

    #[test]
    fn test_zero_rate_rejected() {
        let err = quote(5.0, 10, 0.0).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConversionFailed);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = quote(5.0, 10, -2000.0).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConversionFailed);
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        assert!(quote(5.0, 10, f64::NAN).is_err());
        assert!(quote(5.0, 10, f64::INFINITY).is_err());
    }

    #[test]
    fn test_negative_unit_price_rejected() {
        let err = quote(-5.0, 10, 2000.0).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConversionFailed);
    }

    #[test]
    fn test_free_units_quote_to_zero() {
        let quote = quote(0.0, 10, 2000.0).unwrap();
        assert_eq!(quote.base_units, 0);
    }

    #[test]
    fn test_overflowing_amount_rejected() {
        let err = to_base_units(1e30).unwrap_err();
        assert_eq!(err.kind(), FailureKind::ConversionFailed);
    }
}
