use cosmwasm_std::{
    attr, coin, ensure, ensure_eq, entry_point, to_json_binary, Addr, Attribute, BankMsg, Binary,
    Coin, CosmosMsg, Decimal, Decimal256, Deps, DepsMut, Env, MessageInfo, Order, Reply, Response,
    StdResult, Storage, Uint128, Uint256, WasmMsg,
};
use cw_storage_plus::Bound;
use stable_base::{
    error::treasury::{ContractError, ContractResult},
    msg::{
        mint::ExecuteMsg as MintExecuteMsg,
        oracle::{ExchangeRateResponse, QueryMsg as OracleQueryMsg},
        staking::StakingQueryMsg,
        treasury::{ExecuteMsg, IndicatorsResponse, InstantiateMsg, MigrateMsg, QueryMsg},
    },
    state::treasury::{
        Config, EpochState, PolicyConstraints, TreasuryParams, CONFIG, CURRENT_EPOCH,
        EPOCH_INITIAL_ISSUANCE, EPOCH_STATES, PARAMS, REWARD_WEIGHT, TAX_CAPS, TAX_PROCEEDS,
        TAX_RATE,
    },
};
use stable_helpers::{
    answer::{attr_coin, attr_coins, response},
    reply::{ledger_fault_reason, ledger_submsg, LEDGER_REPLY_ID},
};

use crate::policy::{self, Settlement};

pub const CONTRACT_NAME: &str = concat!("crates.io:stable-ledger__", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;
pub const MAX_PRUNED_PER_EPOCH: usize = 30;

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
    verify_rate(&msg.params.tax_policy, msg.tax_rate, "tax rate")?;
    verify_rate(&msg.params.reward_policy, msg.reward_weight, "reward weight")?;

    let config = Config {
        reserve_denom: msg.reserve_denom,
        oracle_contract: deps.api.addr_validate(&msg.oracle_contract)?,
        mint_contract: deps.api.addr_validate(&msg.mint_contract)?,
        staking_contract: deps.api.addr_validate(&msg.staking_contract)?,
        community_pool: deps.api.addr_validate(&msg.community_pool)?,
        fee_collector: deps.api.addr_validate(&msg.fee_collector)?,
        epoch_manager: deps.api.addr_validate(&msg.epoch_manager)?,
    };
    let issuance = deps.querier.query_supply(&config.reserve_denom)?.amount;

    CONFIG.save(deps.storage, &config)?;
    PARAMS.save(deps.storage, &msg.params)?;
    TAX_RATE.save(deps.storage, &msg.tax_rate)?;
    REWARD_WEIGHT.save(deps.storage, &msg.reward_weight)?;
    CURRENT_EPOCH.save(deps.storage, &0)?;
    EPOCH_INITIAL_ISSUANCE.save(deps.storage, &issuance)?;
    TAX_PROCEEDS.save(deps.storage, &vec![])?;

    Ok(response(
        "instantiate",
        CONTRACT_NAME,
        [
            attr("owner", owner),
            attr("reserve_denom", &config.reserve_denom),
            attr("epoch_manager", config.epoch_manager),
            attr("tax_rate", msg.tax_rate.to_string()),
            attr("reward_weight", msg.reward_weight.to_string()),
            attr_coin("initial_issuance", issuance, config.reserve_denom),
        ],
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Params {} => Ok(to_json_binary(&PARAMS.load(deps.storage)?)?),
        QueryMsg::TaxRate {} => Ok(to_json_binary(&TAX_RATE.load(deps.storage)?)?),
        QueryMsg::TaxCap { denom } => query_tax_cap(deps, denom),
        QueryMsg::RewardWeight {} => Ok(to_json_binary(&REWARD_WEIGHT.load(deps.storage)?)?),
        QueryMsg::CurrentEpoch {} => Ok(to_json_binary(&CURRENT_EPOCH.load(deps.storage)?)?),
        QueryMsg::EpochState { epoch } => {
            let state = EPOCH_STATES
                .may_load(deps.storage, epoch)?
                .ok_or(ContractError::EpochStateNotFound { epoch })?;
            Ok(to_json_binary(&state)?)
        }
        QueryMsg::EpochStates { start_after, limit } => {
            query_epoch_states(deps, start_after, limit)
        }
        QueryMsg::TaxProceeds {} => Ok(to_json_binary(&TAX_PROCEEDS.load(deps.storage)?)?),
        QueryMsg::Seigniorage {} => {
            let config = CONFIG.load(deps.storage)?;
            let params = PARAMS.load(deps.storage)?;
            Ok(to_json_binary(&peek_seigniorage(deps, &config, &params)?)?)
        }
        QueryMsg::Indicators {} => query_indicators(deps),
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
    }
}

fn query_tax_cap(deps: Deps, denom: String) -> ContractResult<Binary> {
    let cap = match TAX_CAPS.may_load(deps.storage, &denom)? {
        Some(cap) => cap,
        None => PARAMS.load(deps.storage)?.tax_policy.cap.to_uint_floor(),
    };
    Ok(to_json_binary(&cap)?)
}

fn query_epoch_states(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> ContractResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let states = EPOCH_STATES
        .range(
            deps.storage,
            start_after.map(Bound::exclusive),
            None,
            Order::Ascending,
        )
        .take(limit)
        .map(|item| item.map(|(_, state)| state))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(to_json_binary(&states)?)
}

fn query_indicators(deps: Deps) -> ContractResult<Binary> {
    let params = PARAMS.load(deps.storage)?;
    let current = CURRENT_EPOCH.load(deps.storage)?;
    let indicators = match current.checked_sub(1) {
        Some(last) => IndicatorsResponse {
            tax_reward_per_stake: policy::tax_reward_per_stake(&load_window(
                deps.storage,
                last,
                params.window_short,
                params.window_probation,
            )?)?,
            seigniorage_burden: policy::seigniorage_burden(&load_window(
                deps.storage,
                last,
                params.window_long,
                params.window_probation,
            )?)?,
        },
        None => IndicatorsResponse {
            tax_reward_per_stake: None,
            seigniorage_burden: None,
        },
    };
    Ok(to_json_binary(&indicators)?)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response> {
    match msg {
        ExecuteMsg::EndEpoch {} => execute_end_epoch(deps, env, info),
        ExecuteMsg::RecordTaxProceeds {} => execute_record_tax_proceeds(deps, info),
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

/// Settles seigniorage, records the closing epoch, re-evaluates the fiscal
/// policy over windows that include it and opens the next epoch.
fn execute_end_epoch(deps: DepsMut, env: Env, info: MessageInfo) -> ContractResult<Response> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(
        info.sender,
        config.epoch_manager,
        ContractError::Unauthorized {}
    );
    let params = PARAMS.load(deps.storage)?;
    let epoch = CURRENT_EPOCH.load(deps.storage)?;
    let prev_tax_rate = TAX_RATE.load(deps.storage)?;
    let prev_reward_weight = REWARD_WEIGHT.load(deps.storage)?;

    let current_supply = deps.querier.query_supply(&config.reserve_denom)?.amount;
    let initial_issuance = EPOCH_INITIAL_ISSUANCE.load(deps.storage)?;
    let pending =
        policy::pending_seigniorage(initial_issuance, params.mining_increment, current_supply)?;
    let settlement = Settlement::new(pending, prev_reward_weight);
    let ledger_msgs = settlement_msgs(&env.contract.address, &config, &settlement)?;

    let tax_reward = aligned_tax_proceeds(deps.as_ref(), &config)?;
    let total_staked: Uint128 = deps
        .querier
        .query_wasm_smart(&config.staking_contract, &StakingQueryMsg::TotalStaked {})?;
    let state = EpochState {
        epoch,
        tax_reward,
        seigniorage_reward: Decimal::from_atomics(settlement.burned, 0)
            .map_err(ContractError::overflow)?,
        total_staked,
    };
    EPOCH_STATES.save(deps.storage, epoch, &state)?;

    let short_window = load_window(
        deps.storage,
        epoch,
        params.window_short,
        params.window_probation,
    )?;
    let tax_rate = policy::next_tax_rate(
        &params.tax_policy,
        prev_tax_rate,
        policy::tax_reward_per_stake(&short_window)?,
    );
    let long_window = load_window(
        deps.storage,
        epoch,
        params.window_long,
        params.window_probation,
    )?;
    let reward_weight = policy::next_reward_weight(
        &params,
        prev_reward_weight,
        policy::seigniorage_burden(&long_window)?,
    );
    TAX_RATE.save(deps.storage, &tax_rate)?;
    REWARD_WEIGHT.save(deps.storage, &reward_weight)?;
    let rates: Vec<ExchangeRateResponse> = deps
        .querier
        .query_wasm_smart(&config.oracle_contract, &OracleQueryMsg::ExchangeRates {})?;
    update_tax_caps(deps.storage, &config, params.tax_policy.cap, rates)?;

    if let Some(retention) = params.history_retention {
        prune_epoch_states(deps.storage, (epoch + 1).saturating_sub(retention))?;
    }

    let next_issuance = current_supply
        .checked_add(settlement.minted)
        .map_err(ContractError::overflow)?
        - settlement.burned;
    TAX_PROCEEDS.save(deps.storage, &vec![])?;
    EPOCH_INITIAL_ISSUANCE.save(deps.storage, &next_issuance)?;
    CURRENT_EPOCH.save(deps.storage, &(epoch + 1))?;

    let attrs: Vec<Attribute> = vec![
        attr("epoch", epoch.to_string()),
        attr_coin("minted", settlement.minted, &config.reserve_denom),
        attr_coin("burned", settlement.burned, &config.reserve_denom),
        attr_coin("community_pool", settlement.remainder, &config.reserve_denom),
        attr("tax_reward", state.tax_reward.to_string()),
        attr("total_staked", state.total_staked),
        attr("tax_rate", tax_rate.to_string()),
        attr("reward_weight", reward_weight.to_string()),
    ];
    Ok(response("execute-end-epoch", CONTRACT_NAME, attrs)
        .add_submessages(ledger_msgs.into_iter().map(ledger_submsg)))
}

/// Mint to the treasury, burn the reward share, hand the rest to the
/// community pool. Zero parts are left out.
fn settlement_msgs(
    treasury: &Addr,
    config: &Config,
    settlement: &Settlement,
) -> ContractResult<Vec<CosmosMsg>> {
    let mut msgs: Vec<CosmosMsg> = vec![];
    if settlement.minted.is_zero() {
        return Ok(msgs);
    }
    msgs.push(
        WasmMsg::Execute {
            contract_addr: config.mint_contract.to_string(),
            msg: to_json_binary(&MintExecuteMsg::Mint {
                coin: coin(settlement.minted.u128(), &config.reserve_denom),
                receiver: treasury.to_string(),
            })?,
            funds: vec![],
        }
        .into(),
    );
    if !settlement.burned.is_zero() {
        msgs.push(
            WasmMsg::Execute {
                contract_addr: config.mint_contract.to_string(),
                msg: to_json_binary(&MintExecuteMsg::Burn {})?,
                funds: vec![coin(settlement.burned.u128(), &config.reserve_denom)],
            }
            .into(),
        );
    }
    if !settlement.remainder.is_zero() {
        msgs.push(
            BankMsg::Send {
                to_address: config.community_pool.to_string(),
                amount: vec![coin(settlement.remainder.u128(), &config.reserve_denom)],
            }
            .into(),
        );
    }
    Ok(msgs)
}

fn peek_seigniorage(
    deps: Deps,
    config: &Config,
    params: &TreasuryParams,
) -> ContractResult<Uint128> {
    let current_supply = deps.querier.query_supply(&config.reserve_denom)?.amount;
    let initial_issuance = EPOCH_INITIAL_ISSUANCE.load(deps.storage)?;
    policy::pending_seigniorage(initial_issuance, params.mining_increment, current_supply)
}

/// Tax proceeds of the running epoch in reserve units. Coins whose rate was
/// withdrawn since they were recorded are left out. A total beyond the
/// `Decimal` range saturates.
fn aligned_tax_proceeds(deps: Deps, config: &Config) -> ContractResult<Decimal> {
    let mut total = Decimal256::zero();
    for proceeds in TAX_PROCEEDS.load(deps.storage)? {
        let rate = if proceeds.denom == config.reserve_denom {
            Decimal::one()
        } else {
            match exchange_rate(deps, config, &proceeds.denom)? {
                Some(rate) => rate,
                None => continue,
            }
        };
        let amount = Decimal256::from_atomics(Uint256::from(proceeds.amount), 0)
            .map_err(ContractError::overflow)?;
        let value = amount
            .checked_div(Decimal256::from(rate))
            .map_err(ContractError::overflow)?;
        total = total.checked_add(value).map_err(ContractError::overflow)?;
    }
    Ok(Decimal::try_from(total).unwrap_or(Decimal::MAX))
}

fn exchange_rate(deps: Deps, config: &Config, denom: &str) -> ContractResult<Option<Decimal>> {
    let response: ExchangeRateResponse = deps.querier.query_wasm_smart(
        &config.oracle_contract,
        &OracleQueryMsg::ExchangeRate {
            denom: denom.to_string(),
        },
    )?;
    Ok(response.rate.filter(|rate| !rate.is_zero()))
}

/// Caps are expressed in reserve units and converted into every priced denom.
fn update_tax_caps(
    storage: &mut dyn Storage,
    config: &Config,
    cap: Decimal,
    rates: Vec<ExchangeRateResponse>,
) -> ContractResult<()> {
    TAX_CAPS.clear(storage);
    TAX_CAPS.save(storage, &config.reserve_denom, &cap.to_uint_floor())?;
    for ExchangeRateResponse { denom, rate } in rates {
        let Some(rate) = rate else { continue };
        let denom_cap = cap
            .checked_mul(rate)
            .map_err(ContractError::overflow)?
            .to_uint_floor();
        TAX_CAPS.save(storage, &denom, &denom_cap)?;
    }
    Ok(())
}

fn load_window(
    storage: &dyn Storage,
    last: u64,
    window: u64,
    probation: u64,
) -> StdResult<Vec<EpochState>> {
    let Some((start, end)) = policy::window_bounds(last, window, probation) else {
        return Ok(vec![]);
    };
    EPOCH_STATES
        .range(
            storage,
            Some(Bound::inclusive(start)),
            Some(Bound::inclusive(end)),
            Order::Ascending,
        )
        .map(|item| item.map(|(_, state)| state))
        .collect()
}

/// Removes at most `MAX_PRUNED_PER_EPOCH` records below `oldest_kept`; a
/// longer backlog is worked off over the following epochs.
fn prune_epoch_states(storage: &mut dyn Storage, oldest_kept: u64) -> StdResult<()> {
    let stale = EPOCH_STATES
        .keys(
            storage,
            None,
            Some(Bound::exclusive(oldest_kept)),
            Order::Ascending,
        )
        .take(MAX_PRUNED_PER_EPOCH)
        .collect::<StdResult<Vec<_>>>()?;
    for epoch in stale {
        EPOCH_STATES.remove(storage, epoch);
    }
    Ok(())
}

fn execute_record_tax_proceeds(deps: DepsMut, info: MessageInfo) -> ContractResult<Response> {
    ensure!(
        !info.funds.is_empty(),
        ContractError::PaymentError(cw_utils::PaymentError::NoFunds {})
    );
    let config = CONFIG.load(deps.storage)?;

    // only the reserve and priced denoms count towards the tax reward
    let mut proceeds = TAX_PROCEEDS.load(deps.storage)?;
    let mut accounted = vec![];
    for fund in &info.funds {
        let priced = fund.denom == config.reserve_denom
            || exchange_rate(deps.as_ref(), &config, &fund.denom)?.is_some();
        if priced && !fund.amount.is_zero() {
            add_coin(&mut proceeds, fund)?;
            accounted.push(fund.clone());
        }
    }
    TAX_PROCEEDS.save(deps.storage, &proceeds)?;

    let forward = BankMsg::Send {
        to_address: config.fee_collector.to_string(),
        amount: info.funds.clone(),
    };
    Ok(response(
        "execute-record-tax-proceeds",
        CONTRACT_NAME,
        [
            attr("sender", info.sender),
            attr_coins("amount", &info.funds),
            attr_coins("accounted", &accounted),
        ],
    )
    .add_submessage(ledger_submsg(forward)))
}

fn add_coin(coins: &mut Vec<Coin>, fund: &Coin) -> ContractResult<()> {
    match coins.iter_mut().find(|c| c.denom == fund.denom) {
        Some(existing) => {
            existing.amount = existing
                .amount
                .checked_add(fund.amount)
                .map_err(ContractError::overflow)?;
        }
        None => {
            coins.push(fund.clone());
            coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        }
    }
    Ok(())
}

fn execute_update_params(
    deps: DepsMut,
    info: MessageInfo,
    params: TreasuryParams,
) -> ContractResult<Response> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;
    verify_params(&params)?;
    PARAMS.save(deps.storage, &params)?;
    // stored rates follow a narrowed range right away
    let tax_rate = TAX_RATE.load(deps.storage)?;
    let tax_rate = params.tax_policy.clamp(tax_rate, tax_rate);
    TAX_RATE.save(deps.storage, &tax_rate)?;
    let reward_weight = REWARD_WEIGHT.load(deps.storage)?;
    let reward_weight = params.reward_policy.clamp(reward_weight, reward_weight);
    REWARD_WEIGHT.save(deps.storage, &reward_weight)?;

    let attrs: Vec<Attribute> = vec![
        attr("mining_increment", params.mining_increment.to_string()),
        attr(
            "seigniorage_burden_target",
            params.seigniorage_burden_target.to_string(),
        ),
        attr("window_short", params.window_short.to_string()),
        attr("window_long", params.window_long.to_string()),
        attr("window_probation", params.window_probation.to_string()),
        attr("tax_rate", tax_rate.to_string()),
        attr("reward_weight", reward_weight.to_string()),
    ];
    Ok(response("execute-update-params", CONTRACT_NAME, attrs))
}

fn verify_params(params: &TreasuryParams) -> ContractResult<()> {
    let invalid = |details: &str| ContractError::InvalidParams {
        details: details.to_string(),
    };
    ensure!(
        params.tax_policy.rate_min <= params.tax_policy.rate_max,
        invalid("tax rate min exceeds max")
    );
    ensure!(
        params.tax_policy.rate_max <= Decimal::one(),
        invalid("tax rate max exceeds one")
    );
    ensure!(
        params.reward_policy.rate_min <= params.reward_policy.rate_max,
        invalid("reward weight min exceeds max")
    );
    ensure!(
        params.reward_policy.rate_max <= Decimal::one(),
        invalid("reward weight max exceeds one")
    );
    ensure!(
        params.seigniorage_burden_target <= Decimal::one(),
        invalid("seigniorage burden target exceeds one")
    );
    ensure!(params.window_short > 0, invalid("short window is empty"));
    ensure!(
        params.window_short < params.window_long,
        invalid("short window must be shorter than long window")
    );
    if let Some(retention) = params.history_retention {
        ensure!(
            retention >= params.window_long,
            invalid("history retention is shorter than long window")
        );
    }
    Ok(())
}

fn verify_rate(policy: &PolicyConstraints, rate: Decimal, name: &str) -> ContractResult<()> {
    ensure!(
        rate >= policy.rate_min && rate <= policy.rate_max,
        ContractError::InvalidParams {
            details: format!("{} is out of policy range", name)
        }
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
