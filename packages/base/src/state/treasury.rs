use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, Decimal, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    pub reserve_denom: String,
    pub oracle_contract: Addr,
    pub mint_contract: Addr,
    pub staking_contract: Addr,
    pub community_pool: Addr,
    pub fee_collector: Addr,
    pub epoch_manager: Addr,
}

/// Bounds of a fiscal indicator. `cap` is only meaningful for the tax policy
/// and is expressed in reserve units.
#[cw_serde]
pub struct PolicyConstraints {
    pub rate_min: Decimal,
    pub rate_max: Decimal,
    pub cap: Decimal,
    pub change_rate_max: Decimal,
}

impl PolicyConstraints {
    /// Moves `prev` towards `next` without leaving `[rate_min, rate_max]` and
    /// without moving by more than `change_rate_max`.
    pub fn clamp(&self, prev: Decimal, next: Decimal) -> Decimal {
        let target = next.clamp(self.rate_min, self.rate_max);
        let stepped = if target > prev {
            target.min(prev.saturating_add(self.change_rate_max))
        } else {
            target.max(prev.saturating_sub(self.change_rate_max))
        };
        // prev may sit outside a freshly updated range
        stepped.clamp(self.rate_min, self.rate_max)
    }
}

#[cw_serde]
pub struct TreasuryParams {
    pub tax_policy: PolicyConstraints,
    pub reward_policy: PolicyConstraints,
    /// Per-epoch growth factor of the reserve monetary base.
    pub mining_increment: Decimal,
    pub seigniorage_burden_target: Decimal,
    pub window_short: u64,
    pub window_long: u64,
    pub window_probation: u64,
    /// Number of most recent epoch states kept; `None` keeps everything.
    pub history_retention: Option<u64>,
}

#[cw_serde]
pub struct EpochState {
    pub epoch: u64,
    pub tax_reward: Decimal,
    pub seigniorage_reward: Decimal,
    pub total_staked: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const PARAMS: Item<TreasuryParams> = Item::new("params");
pub const TAX_RATE: Item<Decimal> = Item::new("tax_rate");
pub const REWARD_WEIGHT: Item<Decimal> = Item::new("reward_weight");
pub const TAX_CAPS: Map<&str, Uint128> = Map::new("tax_caps");
pub const CURRENT_EPOCH: Item<u64> = Item::new("current_epoch");
pub const EPOCH_STATES: Map<u64, EpochState> = Map::new("epoch_states");
pub const EPOCH_INITIAL_ISSUANCE: Item<Uint128> = Item::new("epoch_initial_issuance");
pub const TAX_PROCEEDS: Item<Vec<Coin>> = Item::new("tax_proceeds");
