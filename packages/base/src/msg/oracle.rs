use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Decimal;
use cw_ownable::{cw_ownable_execute, cw_ownable_query};

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    SetExchangeRate { denom: String, rate: Decimal },
    RemoveExchangeRate { denom: String },
}

#[cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ExchangeRateResponse)]
    ExchangeRate { denom: String },
    #[returns(Vec<ExchangeRateResponse>)]
    ExchangeRates {},
}

/// `rate` is `None` while no price is published for `denom`.
#[cw_serde]
pub struct ExchangeRateResponse {
    pub denom: String,
    pub rate: Option<Decimal>,
}

#[cw_serde]
pub struct MigrateMsg {}
