use cosmwasm_std::{CosmosMsg, SubMsg, SubMsgResult};

/// Reply id shared by every ledger mutation (mint, burn, module transfer).
pub const LEDGER_REPLY_ID: u64 = 1;

/// Wraps a ledger mutation so that its failure comes back through `reply`
/// instead of an opaque submessage error.
pub fn ledger_submsg<T>(msg: impl Into<CosmosMsg<T>>) -> SubMsg<T> {
    SubMsg::reply_on_error(msg, LEDGER_REPLY_ID)
}

pub fn ledger_fault_reason(result: SubMsgResult) -> String {
    match result {
        SubMsgResult::Err(reason) => reason,
        SubMsgResult::Ok(_) => "ledger call replied without error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::{coins, BankMsg, Empty, ReplyOn};

    #[test]
    fn ledger_submsg_replies_on_error_only() {
        let msg: SubMsg<Empty> = ledger_submsg(BankMsg::Burn {
            amount: coins(1, "ureserve"),
        });
        assert_eq!(msg.id, LEDGER_REPLY_ID);
        assert_eq!(msg.reply_on, ReplyOn::Error);
    }

    #[test]
    fn fault_reason_passes_error_through() {
        assert_eq!(
            ledger_fault_reason(SubMsgResult::Err("insufficient funds".to_string())),
            "insufficient funds"
        );
    }
}
