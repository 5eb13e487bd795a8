use cosmwasm_std::{
    attr, ensure, entry_point, to_json_binary, Binary, Decimal, Deps, DepsMut, Env, MessageInfo,
    Order, Response, StdResult,
};
use stable_base::error::oracle::{ContractError, ContractResult};
use stable_base::msg::oracle::{
    ExchangeRateResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg,
};
use stable_base::state::oracle::EXCHANGE_RATES;
use stable_helpers::answer::response;

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

    Ok(response("instantiate", CONTRACT_NAME, [attr("owner", owner)]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::ExchangeRate { denom } => {
            let rate = EXCHANGE_RATES.may_load(deps.storage, &denom)?;
            Ok(to_json_binary(&ExchangeRateResponse { denom, rate })?)
        }
        QueryMsg::ExchangeRates {} => query_exchange_rates(deps),
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
    }
}

fn query_exchange_rates(deps: Deps) -> ContractResult<Binary> {
    let rates = EXCHANGE_RATES
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| {
            item.map(|(denom, rate)| ExchangeRateResponse {
                denom,
                rate: Some(rate),
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(to_json_binary(&rates)?)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::SetExchangeRate { denom, rate } => {
            execute_set_exchange_rate(deps, info, denom, rate)
        }
        ExecuteMsg::RemoveExchangeRate { denom } => execute_remove_exchange_rate(deps, info, denom),
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

fn execute_set_exchange_rate(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    rate: Decimal,
) -> ContractResult<Response> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    ensure!(!denom.is_empty(), ContractError::EmptyDenom {});
    ensure!(!rate.is_zero(), ContractError::ZeroRate { denom });

    EXCHANGE_RATES.save(deps.storage, &denom, &rate)?;
    Ok(response(
        "execute-set-exchange-rate",
        CONTRACT_NAME,
        [attr("denom", denom), attr("rate", rate.to_string())],
    ))
}

fn execute_remove_exchange_rate(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
) -> ContractResult<Response> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    EXCHANGE_RATES.remove(deps.storage, &denom);
    Ok(response(
        "execute-remove-exchange-rate",
        CONTRACT_NAME,
        [attr("denom", denom)],
    ))
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
