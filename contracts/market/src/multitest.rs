use std::str::FromStr;

use cosmwasm_std::{coin, coins, Addr, Decimal, Empty, SignedDecimal, Uint128};
use cw_multi_test::{App, Contract, ContractWrapper, Executor};
use stable_base::msg::{
    market::{ExecuteMsg, InstantiateMsg, QueryMsg, SwapResponse},
    oracle::{ExecuteMsg as OracleExecuteMsg, InstantiateMsg as OracleInstantiateMsg},
};
use stable_base::state::market::MarketParams;

const RESERVE: &str = "ureserve";
const SDR: &str = "usdr";

fn market_contract() -> Box<dyn Contract<Empty>> {
    Box::new(
        ContractWrapper::new(
            crate::contract::execute,
            crate::contract::instantiate,
            crate::contract::query,
        )
        .with_reply(crate::contract::reply),
    )
}

fn oracle_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        stable_oracle::contract::execute,
        stable_oracle::contract::instantiate,
        stable_oracle::contract::query,
    ))
}

struct Suite {
    app: App,
    owner: Addr,
    oracle: Addr,
    market: Addr,
}

fn setup() -> Suite {
    let owner = Addr::unchecked("owner");
    let trader = Addr::unchecked("trader");
    let mut app = App::new(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &trader, coins(1_000, RESERVE))
            .unwrap();
    });

    let oracle_code = app.store_code(oracle_contract());
    let market_code = app.store_code(market_contract());

    let oracle = app
        .instantiate_contract(
            oracle_code,
            owner.clone(),
            &OracleInstantiateMsg { owner: None },
            &[],
            "oracle",
            None,
        )
        .unwrap();
    let market = app
        .instantiate_contract(
            market_code,
            owner.clone(),
            &InstantiateMsg {
                owner: None,
                oracle_contract: oracle.to_string(),
                mint_contract: "mint".to_string(),
                reserve_denom: RESERVE.to_string(),
                params: MarketParams {
                    base_pool: Uint128::new(1_000_000),
                    min_spread: Decimal::from_str("0.005").unwrap(),
                    max_spread: Decimal::from_str("0.5").unwrap(),
                    tobin_tax: Decimal::from_str("0.0025").unwrap(),
                },
            },
            &[],
            "market",
            None,
        )
        .unwrap();

    Suite {
        app,
        owner,
        oracle,
        market,
    }
}

fn swap_query(offer: u128, offer_denom: &str, ask_denom: &str) -> QueryMsg {
    QueryMsg::Swap {
        offer_coin: coin(offer, offer_denom),
        ask_denom: ask_denom.to_string(),
    }
}

#[test]
fn quote_follows_published_rate() {
    let mut suite = setup();

    let error = suite
        .app
        .wrap()
        .query_wasm_smart::<SwapResponse>(&suite.market, &swap_query(10, RESERVE, SDR))
        .unwrap_err();
    assert!(error.to_string().contains("No exchange rate published for usdr"));

    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.oracle.clone(),
            &OracleExecuteMsg::SetExchangeRate {
                denom: SDR.to_string(),
                rate: Decimal::from_str("1.7").unwrap(),
            },
            &[],
        )
        .unwrap();

    let quote: SwapResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.market, &swap_query(10, RESERVE, SDR))
        .unwrap();
    assert_eq!(quote.return_coin, coin(16, SDR));
    assert_eq!(quote.spread, Decimal::from_str("0.005").unwrap());

    let quote: SwapResponse = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.market, &swap_query(170, SDR, RESERVE))
        .unwrap();
    assert_eq!(quote.return_coin, coin(99, RESERVE));
}

#[test]
fn failed_ledger_call_reverts_swap() {
    let mut suite = setup();
    suite
        .app
        .execute_contract(
            suite.owner.clone(),
            suite.oracle.clone(),
            &OracleExecuteMsg::SetExchangeRate {
                denom: SDR.to_string(),
                rate: Decimal::from_str("1.7").unwrap(),
            },
            &[],
        )
        .unwrap();

    // "mint" is not a deployed contract, so burning the offer fails
    let error = suite
        .app
        .execute_contract(
            Addr::unchecked("trader"),
            suite.market.clone(),
            &ExecuteMsg::Swap {
                ask_denom: SDR.to_string(),
                receiver: None,
            },
            &coins(100, RESERVE),
        )
        .unwrap_err();
    assert!(error
        .chain()
        .any(|cause| cause.to_string().contains("Ledger call failed")));

    let delta: SignedDecimal = suite
        .app
        .wrap()
        .query_wasm_smart(&suite.market, &QueryMsg::PoolDelta {})
        .unwrap();
    assert_eq!(delta, SignedDecimal::zero());
    assert_eq!(
        suite
            .app
            .wrap()
            .query_balance("trader", RESERVE)
            .unwrap()
            .amount,
        Uint128::new(1_000)
    );
}
