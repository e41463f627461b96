//! Fee breakdown computation (SPEC_FULL.md §4.6 step 4): platform fee via
//! base-plus-percentage clamped to `[minFee, maxFee]`, bridge fee zero
//! same-chain / quoted-or-flat-fallback cross-chain. All arithmetic runs in
//! [`rust_decimal::Decimal`]; nothing here ever touches `f64`.

use rust_decimal::Decimal;

use crate::error::PaymentError;

/// Defaults used when no [`paycross_repo::entities::FeeConfig`] row exists
/// for a `(chain, token)` pair (SPEC_FULL.md §6, "fee defaults").
pub const DEFAULT_FIXED_BASE_FEE: &str = "0.50";
pub const DEFAULT_PERCENTAGE_FEE: &str = "0.003";
pub const DEFAULT_BRIDGE_FEE_FLAT: &str = "0.10";

/// Inputs to the platform-fee computation, all in human decimal form.
pub struct PlatformFeeParams<'a> {
    pub amount_decimal: Decimal,
    pub decimals: u8,
    pub fixed_base_fee: &'a str,
    pub percentage_fee: &'a str,
    pub min_fee: &'a str,
    pub max_fee: Option<&'a str>,
    /// Multiplicative merchant discount (e.g. `"0.9"` for 10% off), applied
    /// before the `[minFee, maxFee]` clamp.
    pub merchant_discount: Option<&'a str>,
}

fn parse_decimal(label: &str, value: &str) -> Result<Decimal, PaymentError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| PaymentError::InvalidInput(format!("{label} is not a valid decimal: {value:?}")))
}

fn decimal_to_smallest_unit(value: Decimal, decimals: u8) -> Result<u128, PaymentError> {
    let clamped = value.max(Decimal::ZERO);
    let scale = Decimal::from_i128_with_scale(10i128.pow(decimals as u32), 0);
    let scaled = (clamped * scale).round();
    scaled
        .to_string()
        .parse::<u128>()
        .map_err(|_| PaymentError::InvalidInput("fee amount overflows u128 smallest-unit representation".to_string()))
}

/// `platformFee = min(max(baseFee + amount * percentageFee, minFee), maxFee)`,
/// with an optional multiplicative merchant discount folded in before the
/// clamp (SPEC_FULL.md §4.6 step 4).
pub fn compute_platform_fee(params: &PlatformFeeParams) -> Result<u128, PaymentError> {
    let base = parse_decimal("fixedBaseFee", params.fixed_base_fee)?;
    let percentage = parse_decimal("percentageFee", params.percentage_fee)?;
    let min_fee = parse_decimal("minFee", params.min_fee)?;

    let raw = base + params.amount_decimal * percentage;
    let discounted = match params.merchant_discount {
        Some(discount) => raw * parse_decimal("merchantDiscount", discount)?,
        None => raw,
    };

    let mut clamped = discounted.max(min_fee);
    if let Some(max_fee_str) = params.max_fee {
        let max_fee = parse_decimal("maxFee", max_fee_str)?;
        clamped = clamped.min(max_fee);
    }

    decimal_to_smallest_unit(clamped, params.decimals)
}

/// Bridge fee in the source token's smallest-unit terms: zero for a
/// same-chain payment, otherwise the quote engine's on-chain quote if it
/// produced one, else the configured flat fallback (SPEC_FULL.md §4.6 step 4).
pub fn compute_bridge_fee(
    same_chain: bool,
    quoted_fee_smallest_unit: Option<u128>,
    flat_fallback: &str,
    decimals: u8,
) -> Result<u128, PaymentError> {
    if same_chain {
        return Ok(0);
    }
    match quoted_fee_smallest_unit {
        Some(fee) if fee > 0 => Ok(fee),
        _ => {
            let fallback = parse_decimal("bridgeFeeFlatFallback", flat_fallback)?;
            decimal_to_smallest_unit(fallback, decimals)
        }
    }
}

/// The three fee-breakdown figures the Coordinator records on a [`Payment`]
/// row: `feeAmount = platformFee + bridgeFee`, `totalCharged = sourceAmount +
/// feeAmount`.
///
/// [`Payment`]: paycross_repo::entities::Payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub platform_fee: u128,
    pub bridge_fee: u128,
    pub fee_amount: u128,
    pub total_charged: u128,
}

impl FeeBreakdown {
    pub fn new(source_amount: u128, platform_fee: u128, bridge_fee: u128) -> Self {
        let fee_amount = platform_fee.saturating_add(bridge_fee);
        Self {
            platform_fee,
            bridge_fee,
            fee_amount,
            total_charged: source_amount.saturating_add(fee_amount),
        }
    }
}
