use crate::state::treasury::{Config, EpochState, TreasuryParams};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Decimal, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    pub reserve_denom: String,
    pub oracle_contract: String,
    pub mint_contract: String,
    pub staking_contract: String,
    pub community_pool: String,
    pub fee_collector: String,
    pub epoch_manager: String,
    pub params: TreasuryParams,
    pub tax_rate: Decimal,
    pub reward_weight: Decimal,
}

#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Closes the running epoch. Only the epoch manager may call it.
    EndEpoch {},
    /// Accounts the attached coins as tax proceeds of the running epoch.
    RecordTaxProceeds {},
    UpdateParams {
        params: TreasuryParams,
    },
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(TreasuryParams)]
    Params {},
    #[returns(Decimal)]
    TaxRate {},
    #[returns(Uint128)]
    TaxCap { denom: String },
    #[returns(Decimal)]
    RewardWeight {},
    #[returns(u64)]
    CurrentEpoch {},
    #[returns(EpochState)]
    EpochState { epoch: u64 },
    #[returns(Vec<EpochState>)]
    EpochStates {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<Coin>)]
    TaxProceeds {},
    #[returns(Uint128)]
    Seigniorage {},
    #[returns(IndicatorsResponse)]
    Indicators {},
}

/// Window means over the epochs closed so far. `None` when a window holds no
/// eligible epoch.
#[cw_serde]
pub struct IndicatorsResponse {
    pub tax_reward_per_stake: Option<Decimal>,
    pub seigniorage_burden: Option<Decimal>,
}

#[cw_serde]
pub struct MigrateMsg {}
