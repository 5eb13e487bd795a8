use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, SignedDecimal, Uint128};
use cw_storage_plus::Item;

#[cw_serde]
pub struct Config {
    pub oracle_contract: Addr,
    pub mint_contract: Addr,
    pub reserve_denom: String,
}

#[cw_serde]
pub struct MarketParams {
    /// Depth of each virtual pool, in reserve units.
    pub base_pool: Uint128,
    pub min_spread: Decimal,
    pub max_spread: Decimal,
    /// Flat spread of synthetic to synthetic swaps.
    pub tobin_tax: Decimal,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const PARAMS: Item<MarketParams> = Item::new("params");
pub const POOL_DELTA: Item<SignedDecimal> = Item::new("pool_delta");
