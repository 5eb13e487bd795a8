use cosmwasm_std::{attr, Attribute, Coin, Event, Response};

pub fn response<A: Into<Attribute>, T>(
    ty: &str,
    contract_name: &str,
    attrs: impl IntoIterator<Item = A>,
) -> Response<T> {
    Response::<T>::new()
        .add_event(Event::new(format!("{}-{}", contract_name, ty)).add_attributes(attrs))
}

pub fn attr_coin(
    key: impl Into<String>,
    amount: impl std::fmt::Display,
    denom: impl std::fmt::Display,
) -> Attribute {
    attr(key, format!("{}{}", amount, denom))
}

/// Renders a coin list the way the bank module prints it: `10ufoo,3ubar`.
pub fn attr_coins(key: impl Into<String>, coins: &[Coin]) -> Attribute {
    let value = coins
        .iter()
        .map(|c| format!("{}{}", c.amount, c.denom))
        .collect::<Vec<_>>()
        .join(",");
    attr(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coin;

    #[test]
    fn coins_attribute() {
        assert_eq!(
            attr_coins("amount", &[coin(10, "ufoo"), coin(3, "ubar")]),
            attr("amount", "10ufoo,3ubar")
        );
        assert_eq!(attr_coins("amount", &[]), attr("amount", ""));
    }

    #[test]
    fn event_name_is_prefixed() {
        let res: Response = response("execute-swap", "stable-market", [attr("k", "v")]);
        assert_eq!(
            res.events,
            vec![Event::new("stable-market-execute-swap").add_attribute("k", "v")]
        );
    }
}
