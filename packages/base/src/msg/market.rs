use crate::state::market::{Config, MarketParams};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Decimal, SignedDecimal};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    pub oracle_contract: String,
    pub mint_contract: String,
    pub reserve_denom: String,
    pub params: MarketParams,
}

#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Swaps the single attached coin into `ask_denom`.
    Swap {
        ask_denom: String,
        receiver: Option<String>,
    },
    UpdateParams {
        params: MarketParams,
    },
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(SwapResponse)]
    Swap { offer_coin: Coin, ask_denom: String },
    #[returns(SignedDecimal)]
    PoolDelta {},
    #[returns(MarketParams)]
    Params {},
    #[returns(Config)]
    Config {},
}

#[cw_serde]
pub struct SwapResponse {
    pub return_coin: Coin,
    pub spread: Decimal,
}

#[cw_serde]
pub struct MigrateMsg {}
