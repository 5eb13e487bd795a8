#![cfg(not(target_arch = "wasm32"))]

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;

use cosmwasm_std::testing::{MockApi, MockQuerier, MockStorage};
use cosmwasm_std::{
    from_json, Binary, Coin, ContractResult, OwnedDeps, Querier, QuerierResult, QueryRequest,
    SystemError, SystemResult, WasmQuery,
};

use neutron_sdk::bindings::query::NeutronQuery;

pub const MOCK_CONTRACT_ADDR: &str = "cosmos2contract";

type WasmFn = dyn Fn(&Binary) -> ContractResult<Binary>;
type CustomFn = dyn Fn(&QueryRequest<NeutronQuery>) -> Binary;

pub fn mock_dependencies(
    contract_balance: &[Coin],
) -> OwnedDeps<MockStorage, MockApi, WasmMockQuerier, NeutronQuery> {
    let custom_querier: WasmMockQuerier =
        WasmMockQuerier::new(MockQuerier::new(&[(MOCK_CONTRACT_ADDR, contract_balance)]));

    OwnedDeps {
        storage: MockStorage::default(),
        api: MockApi::default(),
        querier: custom_querier,
        custom_query_type: PhantomData,
    }
}

/// Querier that answers bank queries from a `MockQuerier` and smart queries
/// from per-contract handlers. A handler stays registered for every call, so
/// a contract mock can serve any number of queries in one execution.
pub struct WasmMockQuerier {
    base: MockQuerier<NeutronQuery>,
    wasm_query_responses: HashMap<String, Box<WasmFn>>,
    custom_query_responses: RefCell<Vec<Box<CustomFn>>>,
}

impl Querier for WasmMockQuerier {
    fn raw_query(&self, bin_request: &[u8]) -> QuerierResult {
        let request: QueryRequest<NeutronQuery> = match from_json(bin_request) {
            Ok(v) => v,
            Err(e) => {
                return QuerierResult::Err(SystemError::InvalidRequest {
                    error: format!("Parsing query request: {}", e),
                    request: bin_request.into(),
                });
            }
        };
        self.handle_query(&request)
    }
}

impl WasmMockQuerier {
    pub fn new(base: MockQuerier<NeutronQuery>) -> Self {
        WasmMockQuerier {
            base,
            wasm_query_responses: HashMap::new(),
            custom_query_responses: Vec::new().into(),
        }
    }

    pub fn handle_query(&self, request: &QueryRequest<NeutronQuery>) -> QuerierResult {
        match request {
            QueryRequest::Wasm(WasmQuery::Smart { contract_addr, msg }) => {
                match self.wasm_query_responses.get(contract_addr) {
                    Some(handler) => SystemResult::Ok(handler(msg)),
                    None => SystemResult::Err(SystemError::NoSuchContract {
                        addr: contract_addr.to_string(),
                    }),
                }
            }
            QueryRequest::Custom(custom_query) => {
                let mut custom_query_responses = self.custom_query_responses.borrow_mut();
                if custom_query_responses.is_empty() {
                    return SystemResult::Err(SystemError::UnsupportedRequest {
                        kind: format!("Custom query is not mocked: {:?}", custom_query),
                    });
                }
                let response = custom_query_responses.remove(0);
                SystemResult::Ok(ContractResult::Ok(response(request)))
            }
            _ => self.base.handle_query(request),
        }
    }

    /// Replaces the smart query handler of `contract_address`.
    pub fn add_wasm_query_response<F>(&mut self, contract_address: &str, response_func: F)
    where
        F: 'static + Fn(&Binary) -> ContractResult<Binary>,
    {
        self.wasm_query_responses
            .insert(contract_address.to_string(), Box::new(response_func));
    }

    /// Queues a one-shot answer for the next custom query.
    pub fn add_custom_query_response<F>(&mut self, response_func: F)
    where
        F: 'static + Fn(&QueryRequest<NeutronQuery>) -> Binary,
    {
        self.custom_query_responses
            .borrow_mut()
            .push(Box::new(response_func));
    }

    /// Overwrites the balance of `addr`; bank supply is recomputed from all
    /// balances.
    pub fn set_balance(&mut self, addr: &str, balance: Vec<Coin>) {
        self.base.update_balance(addr, balance);
    }
}
