use cosmwasm_std::Decimal;
use cw_storage_plus::Map;

/// Units of a denom per one reserve unit.
pub const EXCHANGE_RATES: Map<&str, Decimal> = Map::new("exchange_rates");
