use cosmwasm_std::{Decimal, Decimal256, Uint128, Uint256};
use stable_base::{
    error::treasury::{ContractError, ContractResult},
    state::treasury::{EpochState, PolicyConstraints, TreasuryParams},
};

/// Inclusive range of epoch indices a window ending at `last` averages over.
/// Epochs below `probation` never qualify.
pub fn window_bounds(last: u64, window: u64, probation: u64) -> Option<(u64, u64)> {
    if window == 0 {
        return None;
    }
    let start = (last + 1).saturating_sub(window).max(probation);
    (start <= last).then_some((start, last))
}

/// Mean of `tax_reward / total_staked`; epochs without stake are skipped.
pub fn tax_reward_per_stake(states: &[EpochState]) -> ContractResult<Option<Decimal>> {
    mean(states.iter().filter_map(|state| {
        if state.total_staked.is_zero() {
            return None;
        }
        let staked = Decimal256::from_atomics(Uint256::from(state.total_staked), 0);
        Some(
            staked
                .map_err(ContractError::overflow)
                .and_then(|staked| ratio(state.tax_reward.into(), staked)),
        )
    }))
}

/// Mean share of seigniorage in the total reward of each epoch.
pub fn seigniorage_burden(states: &[EpochState]) -> ContractResult<Option<Decimal>> {
    mean(states.iter().filter_map(|state| {
        let seigniorage = Decimal256::from(state.seigniorage_reward);
        let total = seigniorage + Decimal256::from(state.tax_reward);
        (!total.is_zero()).then(|| ratio(seigniorage, total))
    }))
}

fn ratio(numerator: Decimal256, denominator: Decimal256) -> ContractResult<Decimal256> {
    numerator
        .checked_div(denominator)
        .map_err(ContractError::overflow)
}

fn mean(
    values: impl Iterator<Item = ContractResult<Decimal256>>,
) -> ContractResult<Option<Decimal>> {
    let mut sum = Decimal256::zero();
    let mut count = 0u64;
    for value in values {
        sum = sum.checked_add(value?).map_err(ContractError::overflow)?;
        count += 1;
    }
    if count == 0 {
        return Ok(None);
    }
    let count = Decimal256::from_atomics(count, 0).map_err(ContractError::overflow)?;
    let mean = ratio(sum, count)?;
    Decimal::try_from(mean)
        .map(Some)
        .map_err(ContractError::overflow)
}

/// Follows the observed tax reward per stake. Without observations the
/// previous rate is kept.
pub fn next_tax_rate(
    policy: &PolicyConstraints,
    prev: Decimal,
    mean: Option<Decimal>,
) -> Decimal {
    policy.clamp(prev, mean.unwrap_or(prev))
}

/// Pushes the reward weight towards the bound that brings the seigniorage
/// burden back to target.
pub fn next_reward_weight(
    params: &TreasuryParams,
    prev: Decimal,
    burden: Option<Decimal>,
) -> Decimal {
    let policy = &params.reward_policy;
    let candidate = match burden {
        Some(burden) if burden < params.seigniorage_burden_target => policy.rate_max,
        Some(burden) if burden > params.seigniorage_burden_target => policy.rate_min,
        _ => prev,
    };
    policy.clamp(prev, candidate)
}

/// Reserve amount still to be mined in the running epoch.
pub fn pending_seigniorage(
    initial_issuance: Uint128,
    mining_increment: Decimal,
    current_supply: Uint128,
) -> ContractResult<Uint128> {
    let target = initial_issuance
        .checked_mul_floor(mining_increment)
        .map_err(ContractError::overflow)?;
    Ok(target.saturating_sub(current_supply))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub minted: Uint128,
    pub burned: Uint128,
    pub remainder: Uint128,
}

impl Settlement {
    pub fn new(minted: Uint128, reward_weight: Decimal) -> Self {
        let burned = minted.mul_floor(reward_weight.min(Decimal::one()));
        Self {
            minted,
            burned,
            remainder: minted - burned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn state(epoch: u64, tax_reward: &str, seigniorage_reward: &str, staked: u128) -> EpochState {
        EpochState {
            epoch,
            tax_reward: dec(tax_reward),
            seigniorage_reward: dec(seigniorage_reward),
            total_staked: Uint128::new(staked),
        }
    }

    fn params() -> TreasuryParams {
        TreasuryParams {
            tax_policy: PolicyConstraints {
                rate_min: dec("0.0005"),
                rate_max: dec("0.01"),
                cap: dec("1000000"),
                change_rate_max: dec("0.00025"),
            },
            reward_policy: PolicyConstraints {
                rate_min: dec("0.05"),
                rate_max: dec("0.9"),
                cap: Decimal::zero(),
                change_rate_max: dec("0.025"),
            },
            mining_increment: dec("1.07"),
            seigniorage_burden_target: dec("0.67"),
            window_short: 4,
            window_long: 52,
            window_probation: 2,
            history_retention: None,
        }
    }

    #[test]
    fn windows_respect_probation() {
        assert_eq!(window_bounds(0, 4, 2), None);
        assert_eq!(window_bounds(1, 4, 2), None);
        assert_eq!(window_bounds(2, 4, 2), Some((2, 2)));
        assert_eq!(window_bounds(9, 4, 2), Some((6, 9)));
        assert_eq!(window_bounds(9, 4, 0), Some((6, 9)));
        assert_eq!(window_bounds(3, 52, 0), Some((0, 3)));
        assert_eq!(window_bounds(3, 0, 0), None);
    }

    #[test]
    fn tax_reward_per_stake_skips_unstaked_epochs() {
        let states = [
            state(0, "7", "0", 1000),
            state(1, "100", "0", 0),
            state(2, "21", "0", 1000),
        ];
        assert_eq!(tax_reward_per_stake(&states).unwrap(), Some(dec("0.014")));
        assert_eq!(tax_reward_per_stake(&[state(0, "5", "0", 0)]).unwrap(), None);
        assert_eq!(tax_reward_per_stake(&[]).unwrap(), None);
    }

    #[test]
    fn burden_skips_epochs_without_rewards() {
        let states = [
            state(0, "3", "1", 10),
            state(1, "0", "0", 10),
            state(2, "1", "1", 10),
        ];
        assert_eq!(seigniorage_burden(&states).unwrap(), Some(dec("0.375")));
    }

    #[test]
    fn constant_tax_history_keeps_rate() {
        let states: Vec<_> = (0..4).map(|epoch| state(epoch, "7", "0", 1000)).collect();
        let mean = tax_reward_per_stake(&states).unwrap();
        assert_eq!(mean, Some(dec("0.007")));
        assert_eq!(
            next_tax_rate(&params().tax_policy, dec("0.007"), mean),
            dec("0.007")
        );
    }

    #[test]
    fn tax_rate_moves_by_bounded_steps() {
        let policy = params().tax_policy;
        assert_eq!(
            next_tax_rate(&policy, dec("0.005"), Some(dec("0.5"))),
            dec("0.00525")
        );
        assert_eq!(
            next_tax_rate(&policy, dec("0.005"), Some(Decimal::zero())),
            dec("0.00475")
        );
        assert_eq!(next_tax_rate(&policy, dec("0.005"), None), dec("0.005"));
        // out of range after a policy change, even without history
        assert_eq!(next_tax_rate(&policy, dec("0.02"), None), dec("0.01"));
    }

    #[test]
    fn reward_weight_follows_burden() {
        let params = params();
        assert_eq!(
            next_reward_weight(&params, dec("0.5"), Some(dec("0.1"))),
            dec("0.525")
        );
        assert_eq!(
            next_reward_weight(&params, dec("0.5"), Some(dec("0.9"))),
            dec("0.475")
        );
        assert_eq!(
            next_reward_weight(&params, dec("0.5"), Some(dec("0.67"))),
            dec("0.5")
        );
        assert_eq!(next_reward_weight(&params, dec("0.5"), None), dec("0.5"));
        assert_eq!(
            next_reward_weight(&params, dec("0.89"), Some(dec("0.1"))),
            dec("0.9")
        );
    }

    #[test]
    fn indicators_never_leave_policy_bounds() {
        let params = params();
        let inputs = [None, Some(Decimal::zero()), Some(dec("0.3")), Some(Decimal::MAX)];
        let mut tax_rate = Decimal::zero();
        let mut reward_weight = Decimal::one();
        for _ in 0..50 {
            for input in inputs {
                let next = next_tax_rate(&params.tax_policy, tax_rate, input);
                assert!(next >= params.tax_policy.rate_min && next <= params.tax_policy.rate_max);
                if tax_rate >= params.tax_policy.rate_min && tax_rate <= params.tax_policy.rate_max
                {
                    assert!(next.abs_diff(tax_rate) <= params.tax_policy.change_rate_max);
                }
                tax_rate = next;

                let next = next_reward_weight(&params, reward_weight, input);
                let policy = &params.reward_policy;
                assert!(next >= policy.rate_min && next <= policy.rate_max);
                if reward_weight >= policy.rate_min && reward_weight <= policy.rate_max {
                    assert!(next.abs_diff(reward_weight) <= policy.change_rate_max);
                }
                reward_weight = next;
            }
        }
    }

    #[test]
    fn pending_seigniorage_is_never_negative() {
        assert_eq!(
            pending_seigniorage(Uint128::new(1000), dec("1.07"), Uint128::new(1000)).unwrap(),
            Uint128::new(70)
        );
        assert_eq!(
            pending_seigniorage(Uint128::new(1000), dec("1.07"), Uint128::new(1100)).unwrap(),
            Uint128::zero()
        );
        assert_eq!(
            pending_seigniorage(Uint128::new(1000), dec("1.0005"), Uint128::new(1000)).unwrap(),
            Uint128::zero()
        );
    }

    #[test]
    fn settlement_split() {
        assert_eq!(
            Settlement::new(Uint128::new(100), dec("0.17")),
            Settlement {
                minted: Uint128::new(100),
                burned: Uint128::new(17),
                remainder: Uint128::new(83),
            }
        );
        for weight in ["0", "0.333333333333333333", "0.5", "0.999", "1"] {
            for minted in [0u128, 1, 7, 1_000_003, u128::MAX / 3] {
                let settlement = Settlement::new(Uint128::new(minted), dec(weight));
                assert_eq!(settlement.burned + settlement.remainder, settlement.minted);
            }
        }
    }
}
