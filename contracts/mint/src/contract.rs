use cosmwasm_std::{
    attr, ensure, ensure_ne, entry_point, to_json_binary, Addr, Binary, Coin, Deps, DepsMut,
    Empty, Env, MessageInfo, Order, Reply, Response, StdResult, SubMsg, Uint128,
};
use neutron_sdk::{
    bindings::{msg::NeutronMsg, query::NeutronQuery},
    query::token_factory::query_full_denom,
};
use stable_base::{
    error::mint::{ContractError, ContractResult},
    msg::mint::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg},
    state::mint::{DENOMS, MINTERS, PENDING_SUBDENOM},
};
use stable_helpers::answer::{attr_coin, attr_coins, response};

pub const CONTRACT_NAME: &str = concat!("crates.io:stable-ledger__", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CREATE_DENOM_REPLY_ID: u64 = 1;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut<NeutronQuery>,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> ContractResult<Response<NeutronMsg>> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = deps
        .api
        .addr_validate(&msg.owner.unwrap_or(info.sender.to_string()))?;
    cw_ownable::initialize_owner(deps.storage, deps.api, Some(owner.as_str()))?;

    for minter in &msg.minters {
        let minter = deps.api.addr_validate(minter)?;
        MINTERS.save(deps.storage, &minter, &Empty {})?;
    }

    Ok(response(
        "instantiate",
        CONTRACT_NAME,
        [
            attr("owner", owner),
            attr("minters", msg.minters.join(",")),
        ],
    ))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> ContractResult<Response<NeutronMsg>> {
    match msg {
        ExecuteMsg::UpdateOwnership(action) => {
            cw_ownable::update_ownership(deps.into_empty(), &env.block, &info.sender, action)?;
            Ok(response::<(&str, &str), _>(
                "execute-update-ownership",
                CONTRACT_NAME,
                [],
            ))
        }
        ExecuteMsg::CreateDenom { subdenom } => create_denom(deps, info, subdenom),
        ExecuteMsg::Mint { coin, receiver } => mint(deps, info, coin, receiver),
        ExecuteMsg::Burn {} => burn(deps, info),
        ExecuteMsg::UpdateMinters { add, remove } => update_minters(deps, info, add, remove),
    }
}

fn create_denom(
    deps: DepsMut<NeutronQuery>,
    info: MessageInfo,
    subdenom: String,
) -> ContractResult<Response<NeutronMsg>> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    PENDING_SUBDENOM.save(deps.storage, &subdenom)?;
    let create_denom_msg = SubMsg::reply_on_success(
        NeutronMsg::submit_create_denom(&subdenom),
        CREATE_DENOM_REPLY_ID,
    );

    Ok(response(
        "execute-create-denom",
        CONTRACT_NAME,
        [attr("subdenom", subdenom)],
    )
    .add_submessage(create_denom_msg))
}

fn mint(
    deps: DepsMut<NeutronQuery>,
    info: MessageInfo,
    coin: Coin,
    receiver: String,
) -> ContractResult<Response<NeutronMsg>> {
    assert_minter(deps.as_ref(), &info.sender)?;
    ensure_ne!(coin.amount, Uint128::zero(), ContractError::NothingToMint);
    assert_managed(deps.as_ref(), &coin.denom)?;

    let receiver = deps.api.addr_validate(&receiver)?;
    let mint_msg = NeutronMsg::submit_mint_tokens(&coin.denom, coin.amount, receiver.as_str());

    Ok(response(
        "execute-mint",
        CONTRACT_NAME,
        [
            attr_coin("amount", coin.amount, coin.denom),
            attr("receiver", receiver),
        ],
    )
    .add_message(mint_msg))
}

fn burn(deps: DepsMut<NeutronQuery>, info: MessageInfo) -> ContractResult<Response<NeutronMsg>> {
    assert_minter(deps.as_ref(), &info.sender)?;
    ensure!(
        !info.funds.is_empty(),
        ContractError::PaymentError(cw_utils::PaymentError::NoFunds {})
    );

    let mut burn_msgs = Vec::with_capacity(info.funds.len());
    for coin in &info.funds {
        assert_managed(deps.as_ref(), &coin.denom)?;
        burn_msgs.push(NeutronMsg::submit_burn_tokens(&coin.denom, coin.amount));
    }

    Ok(response(
        "execute-burn",
        CONTRACT_NAME,
        [attr_coins("amount", &info.funds)],
    )
    .add_messages(burn_msgs))
}

fn update_minters(
    deps: DepsMut<NeutronQuery>,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> ContractResult<Response<NeutronMsg>> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    for minter in &remove {
        MINTERS.remove(deps.storage, &deps.api.addr_validate(minter)?);
    }
    for minter in &add {
        MINTERS.save(deps.storage, &deps.api.addr_validate(minter)?, &Empty {})?;
    }

    Ok(response(
        "execute-update-minters",
        CONTRACT_NAME,
        [attr("add", add.join(",")), attr("remove", remove.join(","))],
    ))
}

fn assert_minter(deps: Deps<NeutronQuery>, sender: &Addr) -> ContractResult<()> {
    ensure!(
        MINTERS.has(deps.storage, sender),
        ContractError::Unauthorized
    );
    Ok(())
}

fn assert_managed(deps: Deps<NeutronQuery>, denom: &str) -> ContractResult<()> {
    ensure!(
        DENOMS.has(deps.storage, denom),
        ContractError::UnknownDenom {
            denom: denom.to_string()
        }
    );
    Ok(())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps<NeutronQuery>, _env: Env, msg: QueryMsg) -> ContractResult<Binary> {
    match msg {
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(deps.storage)?)?),
        QueryMsg::Denoms {} => {
            let denoms = DENOMS
                .keys(deps.storage, None, None, Order::Ascending)
                .collect::<StdResult<Vec<String>>>()?;
            Ok(to_json_binary(&denoms)?)
        }
        QueryMsg::Minters {} => {
            let minters = MINTERS
                .keys(deps.storage, None, None, Order::Ascending)
                .map(|minter| minter.map(Addr::into_string))
                .collect::<StdResult<Vec<String>>>()?;
            Ok(to_json_binary(&minters)?)
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    msg: Reply,
) -> ContractResult<Response<NeutronMsg>> {
    match msg.id {
        CREATE_DENOM_REPLY_ID => {
            let subdenom = PENDING_SUBDENOM.load(deps.storage)?;
            PENDING_SUBDENOM.remove(deps.storage);
            let full_denom = query_full_denom(deps.as_ref(), &env.contract.address, subdenom)?;
            DENOMS.save(deps.storage, &full_denom.denom, &Empty {})?;

            Ok(response(
                "reply-create-denom",
                CONTRACT_NAME,
                [attr("denom", full_denom.denom)],
            ))
        }
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(
    deps: DepsMut,
    _env: Env,
    _msg: MigrateMsg,
) -> ContractResult<Response<NeutronMsg>> {
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
