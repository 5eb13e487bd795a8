use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Coin;

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: Option<String>,
    pub minters: Vec<String>,
}

#[cw_ownable::cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    CreateDenom {
        subdenom: String,
    },
    Mint {
        coin: Coin,
        receiver: String,
    },
    /// Burns every attached coin.
    Burn {},
    UpdateMinters {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_ownable::cw_ownable_query]
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Vec<String>)]
    Denoms {},
    #[returns(Vec<String>)]
    Minters {},
}

#[cw_serde]
pub struct MigrateMsg {}
