use cosmwasm_std::{
    attr, coin, ensure, entry_point, to_json_binary, Attribute, Binary, Coin, Decimal, Deps,
    DepsMut, Env, MessageInfo, Reply, Response, SignedDecimal, WasmMsg,
};
use stable_base::{
    error::market::{ContractError, ContractResult},
    msg::{
        market::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, SwapResponse},
        mint::ExecuteMsg as MintExecuteMsg,
        oracle::{ExchangeRateResponse, QueryMsg as OracleQueryMsg},
    },
    state::market::{Config, MarketParams, CONFIG, PARAMS, POOL_DELTA},
};
use stable_helpers::{
    answer::{attr_coin, response},
    reply::{ledger_fault_reason, ledger_submsg, LEDGER_REPLY_ID},
};

use crate::swap::{compute_swap, SwapKind, SwapQuote};

pub const CONTRACT_NAME: &str = concat!("crates.io:stable-ledger__", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps
        .api
        .addr_validate(&msg.owner.unwrap_or(info.sender.to_string()))?;
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(owner.as_str()))?;

    ensure!(
        !msg.reserve_denom.is_empty(),
        ContractError::InvalidParams {
            details: "reserve denom is empty".to_string()
        }
    );
    verify_params(&msg.params)?;

    let config = Config {
        oracle_contract: deps.api.addr_validate(&msg.oracle_contract)?,
        mint_contract: deps.api.addr_validate(&msg.mint_contract)?,
        reserve_denom: msg.reserve_denom,
    };
    CONFIG.save(deps.storage, &config)?;
    PARAMS.save(deps.storage, &msg.params)?;
    POOL_DELTA.save(deps.storage, &SignedDecimal::zero())?;

    Ok(response(
        "instantiate",
        CONTRACT_NAME,
        [
            attr("owner", owner),
            attr("reserve_denom", config.reserve_denom),
            attr("oracle_contract", config.oracle_contract),
            attr("mint_contract", config.mint_contract),
        ],
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Swap {
            offer_coin,
            ask_denom,
        } => query_swap(deps, offer_coin, ask_denom),
        QueryMsg::PoolDelta {} => Ok(to_json_binary(&POOL_DELTA.load(deps.storage)?)?),
        QueryMsg::Params {} => Ok(to_json_binary(&PARAMS.load(deps.storage)?)?),
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
    }
}

fn query_swap(deps: Deps, offer_coin: Coin, ask_denom: String) -> ContractResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;
    let pool_delta = POOL_DELTA.load(deps.storage)?;

    let quote = quote_swap(deps, &config, &params, pool_delta, &offer_coin, &ask_denom)?;

    Ok(to_json_binary(&SwapResponse {
        return_coin: coin(quote.return_amount.u128(), ask_denom),
        spread: quote.spread,
    })?)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::Swap {
            ask_denom,
            receiver,
        } => execute_swap(deps, info, ask_denom, receiver),
        ExecuteMsg::UpdateParams { params } => execute_update_params(deps, info, params),
        ExecuteMsg::UpdateOwnership(action) => {
            cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
            Ok(response::<(&str, &str), _>(
                "execute-update-ownership",
                CONTRACT_NAME,
                [],
            ))
        }
    }
}

fn execute_swap(
    deps: DepsMut,
    info: MessageInfo,
    ask_denom: String,
    receiver: Option<String>,
) -> ContractResult<Response> {
    let offer_coin = cw_utils::one_coin(&info)?;
    let receiver = match receiver {
        Some(receiver) => deps.api.addr_validate(&receiver)?,
        None => info.sender.clone(),
    };

    let config = CONFIG.load(deps.storage)?;
    let params = PARAMS.load(deps.storage)?;
    let pool_delta = POOL_DELTA.load(deps.storage)?;

    let quote = quote_swap(
        deps.as_ref(),
        &config,
        &params,
        pool_delta,
        &offer_coin,
        &ask_denom,
    )?;
    ensure!(
        !quote.return_amount.is_zero(),
        ContractError::invalid_request("swap returns nothing")
    );

    let pool_delta = pool_delta
        .checked_add(quote.pool_delta_change)
        .map_err(ContractError::overflow)?;
    POOL_DELTA.save(deps.storage, &pool_delta)?;

    let return_coin = coin(quote.return_amount.u128(), &ask_denom);
    let burn_msg = WasmMsg::Execute {
        contract_addr: config.mint_contract.to_string(),
        msg: to_json_binary(&MintExecuteMsg::Burn {})?,
        funds: vec![offer_coin.clone()],
    };
    let mint_msg = WasmMsg::Execute {
        contract_addr: config.mint_contract.to_string(),
        msg: to_json_binary(&MintExecuteMsg::Mint {
            coin: return_coin.clone(),
            receiver: receiver.to_string(),
        })?,
        funds: vec![],
    };

    Ok(response(
        "execute-swap",
        CONTRACT_NAME,
        [
            attr("trader", info.sender),
            attr("receiver", receiver),
            attr_coin("offer", offer_coin.amount, offer_coin.denom),
            attr_coin("return", return_coin.amount, return_coin.denom),
            attr("spread", quote.spread.to_string()),
            attr("pool_delta", pool_delta.to_string()),
        ],
    )
    .add_submessage(ledger_submsg(burn_msg))
    .add_submessage(ledger_submsg(mint_msg)))
}

fn execute_update_params(
    deps: DepsMut,
    info: MessageInfo,
    params: MarketParams,
) -> ContractResult<Response> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    verify_params(&params)?;
    PARAMS.save(deps.storage, &params)?;

    let attrs: Vec<Attribute> = vec![
        attr("base_pool", params.base_pool),
        attr("min_spread", params.min_spread.to_string()),
        attr("max_spread", params.max_spread.to_string()),
        attr("tobin_tax", params.tobin_tax.to_string()),
    ];
    Ok(response("execute-update-params", CONTRACT_NAME, attrs))
}

/// Validates the request and prices it against the current pool delta.
pub fn quote_swap(
    deps: Deps,
    config: &Config,
    params: &MarketParams,
    pool_delta: SignedDecimal,
    offer_coin: &Coin,
    ask_denom: &str,
) -> ContractResult<SwapQuote> {
    ensure!(
        !ask_denom.is_empty(),
        ContractError::invalid_request("ask denom is empty")
    );
    ensure!(
        !offer_coin.denom.is_empty(),
        ContractError::invalid_request("offer denom is empty")
    );
    ensure!(
        !offer_coin.amount.is_zero(),
        ContractError::invalid_request("offer amount is zero")
    );
    ensure!(
        offer_coin.denom != ask_denom,
        ContractError::invalid_request("recursive swap")
    );

    let kind = SwapKind::new(&config.reserve_denom, &offer_coin.denom, ask_denom);
    let offer_rate = exchange_rate(deps, config, &offer_coin.denom)?;
    let ask_rate = exchange_rate(deps, config, ask_denom)?;

    compute_swap(
        params,
        pool_delta,
        kind,
        offer_coin.amount,
        offer_rate,
        ask_rate,
    )
}

fn exchange_rate(deps: Deps, config: &Config, denom: &str) -> ContractResult<Decimal> {
    if denom == config.reserve_denom {
        return Ok(Decimal::one());
    }
    let response: ExchangeRateResponse = deps.querier.query_wasm_smart(
        &config.oracle_contract,
        &OracleQueryMsg::ExchangeRate {
            denom: denom.to_string(),
        },
    )?;
    response
        .rate
        .filter(|rate| !rate.is_zero())
        .ok_or_else(|| ContractError::PriceUnavailable {
            denom: denom.to_string(),
        })
}

fn verify_params(params: &MarketParams) -> ContractResult<()> {
    let invalid = |details: &str| ContractError::InvalidParams {
        details: details.to_string(),
    };
    ensure!(!params.base_pool.is_zero(), invalid("base pool is zero"));
    ensure!(
        params.min_spread <= params.max_spread,
        invalid("min spread exceeds max spread")
    );
    ensure!(
        params.max_spread < Decimal::one(),
        invalid("max spread must be below one")
    );
    ensure!(
        params.tobin_tax <= Decimal::one(),
        invalid("tobin tax exceeds one")
    );
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> ContractResult<Response> {
    match msg.id {
        LEDGER_REPLY_ID => Err(ContractError::LedgerFault {
            reason: ledger_fault_reason(msg.result),
        }),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> ContractResult<Response> {
    deps.api.debug("WASMDEBUG: migrate");
    let contract_version_metadata = cw2::get_contract_version(deps.storage)?;
    let storage_contract_name = contract_version_metadata.contract.as_str();
    if storage_contract_name != CONTRACT_NAME {
        return Err(ContractError::MigrationError {
            storage_contract_name: storage_contract_name.to_string(),
            contract_name: CONTRACT_NAME.to_string(),
        });
    }

    let storage_version: semver::Version = contract_version_metadata.version.parse()?;
    let version: semver::Version = CONTRACT_VERSION.parse()?;

    if storage_version < version {
        cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    }

    Ok(Response::new())
}
