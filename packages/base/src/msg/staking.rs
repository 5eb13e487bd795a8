use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

/// Query interface the treasury expects from the staking subsystem.
#[cw_serde]
#[derive(QueryResponses)]
pub enum StakingQueryMsg {
    #[returns(Uint128)]
    TotalStaked {},
}
