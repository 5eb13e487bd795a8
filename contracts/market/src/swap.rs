use cosmwasm_std::{Decimal, Decimal256, SignedDecimal, Uint128, Uint256};
use stable_base::error::market::{ContractError, ContractResult};
use stable_base::state::market::MarketParams;

/// Direction of a swap relative to the reserve currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapKind {
    ReserveToSynthetic,
    SyntheticToReserve,
    SyntheticToSynthetic,
}

impl SwapKind {
    pub fn new(reserve_denom: &str, offer_denom: &str, ask_denom: &str) -> Self {
        if offer_denom == reserve_denom {
            SwapKind::ReserveToSynthetic
        } else if ask_denom == reserve_denom {
            SwapKind::SyntheticToReserve
        } else {
            SwapKind::SyntheticToSynthetic
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SwapQuote {
    pub return_amount: Uint128,
    pub spread: Decimal,
    /// Reserve value of the offered coin.
    pub offer_base: Decimal256,
    /// Signed change applied to the pool delta when the swap settles.
    pub pool_delta_change: SignedDecimal,
}

/// Prices `offer_amount` against the virtual pools. Rates are units of the
/// currency per reserve unit; the reserve itself has rate one.
pub fn compute_swap(
    params: &MarketParams,
    pool_delta: SignedDecimal,
    kind: SwapKind,
    offer_amount: Uint128,
    offer_rate: Decimal,
    ask_rate: Decimal,
) -> ContractResult<SwapQuote> {
    let offer = Decimal::checked_from_ratio(offer_amount, 1u128).map_err(|_| {
        ContractError::overflow(format!("offer amount {offer_amount} is not representable"))
    })?;
    let offer_base = Decimal256::from(offer)
        .checked_div(Decimal256::from(offer_rate))
        .map_err(ContractError::overflow)?;
    let converted = offer_base
        .checked_mul(Decimal256::from(ask_rate))
        .map_err(ContractError::overflow)?;

    let spread = match kind {
        SwapKind::SyntheticToSynthetic => params.tobin_tax,
        _ => pool_spread(params, pool_delta, kind, offer_base)?,
    }
    .clamp(params.min_spread, params.max_spread);

    let return_amount = apply_spread(converted, spread)?;

    let pool_delta_change = match kind {
        SwapKind::SyntheticToReserve => to_signed(offer_base)?,
        SwapKind::ReserveToSynthetic => {
            let returned_base = offer_base
                .checked_mul(Decimal256::one() - Decimal256::from(spread))
                .map_err(ContractError::overflow)?;
            SignedDecimal::zero()
                .checked_sub(to_signed(returned_base)?)
                .map_err(ContractError::overflow)?
        }
        SwapKind::SyntheticToSynthetic => SignedDecimal::zero(),
    };

    Ok(SwapQuote {
        return_amount,
        spread,
        offer_base,
        pool_delta_change,
    })
}

/// Spread implied by a constant product over the two virtual pools. The
/// pool of the offered currency receives `offer_base`; whatever the ask pool
/// gives back below `offer_base` is the spread. Both directions share the
/// formula, the sign of the delta decides which pool is the deep one.
fn pool_spread(
    params: &MarketParams,
    pool_delta: SignedDecimal,
    kind: SwapKind,
    offer_base: Decimal256,
) -> ContractResult<Decimal> {
    if offer_base.is_zero() {
        return Ok(params.min_spread);
    }
    let base_pool = Decimal256::from_ratio(params.base_pool, 1u128);
    let synthetic_pool = match shift_pool(base_pool, pool_delta) {
        Some(pool) => pool,
        // the synthetic side is drained: selling reserve only deepens it
        None if kind == SwapKind::ReserveToSynthetic => return Ok(params.max_spread),
        None => return Ok(params.min_spread),
    };

    let cp = base_pool
        .checked_mul(base_pool)
        .map_err(ContractError::overflow)?;
    let reserve_pool = cp
        .checked_div(synthetic_pool)
        .map_err(ContractError::overflow)?;
    let (offer_pool, ask_pool) = match kind {
        SwapKind::ReserveToSynthetic => (reserve_pool, synthetic_pool),
        _ => (synthetic_pool, reserve_pool),
    };

    let offer_pool_after = offer_pool
        .checked_add(offer_base)
        .map_err(ContractError::overflow)?;
    let ask_pool_after = cp
        .checked_div(offer_pool_after)
        .map_err(ContractError::overflow)?;
    let ask_base = ask_pool.saturating_sub(ask_pool_after);

    let spread = offer_base
        .saturating_sub(ask_base)
        .checked_div(offer_base)
        .map_err(ContractError::overflow)?;
    Decimal::try_from(spread).map_err(ContractError::overflow)
}

/// `floor(converted * (1 - spread))`.
pub fn apply_spread(converted: Decimal256, spread: Decimal) -> ContractResult<Uint128> {
    let kept = Decimal256::one().saturating_sub(Decimal256::from(spread));
    let amount = converted
        .checked_mul(kept)
        .map_err(ContractError::overflow)?
        .to_uint_floor();
    Uint128::try_from(amount).map_err(ContractError::overflow)
}

/// `base + delta`, or `None` when the pool would be empty or negative.
fn shift_pool(base: Decimal256, delta: SignedDecimal) -> Option<Decimal256> {
    let magnitude = Decimal256::new(Uint256::from(delta.atomics().i128().unsigned_abs()));
    if delta.is_negative() {
        base.checked_sub(magnitude).ok().filter(|pool| !pool.is_zero())
    } else {
        Some(base.saturating_add(magnitude))
    }
}

fn to_signed(value: Decimal256) -> ContractResult<SignedDecimal> {
    let atomics = Uint128::try_from(value.atomics()).map_err(ContractError::overflow)?;
    let atomics = i128::try_from(atomics.u128()).map_err(ContractError::overflow)?;
    Ok(SignedDecimal::raw(atomics))
}
