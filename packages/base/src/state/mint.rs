use cosmwasm_std::{Addr, Empty};
use cw_storage_plus::{Item, Map};

pub const DENOMS: Map<&str, Empty> = Map::new("denoms");
pub const MINTERS: Map<&Addr, Empty> = Map::new("minters");
pub const PENDING_SUBDENOM: Item<String> = Item::new("pending_subdenom");
