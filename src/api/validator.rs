//! Per-type payload validation. Pure predicates over `serde_json::Value`;
//! never touch the book or the session store.

use serde_json::Value;
use std::fmt;

/// A payload failed schema validation for its request type.
#[derive(Debug, Clone)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

fn require_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, ValidationError> {
    payload
        .get(field)
        .ok_or_else(|| ValidationError(format!("missing required field '{field}'")))?
        .as_str()
        .ok_or_else(|| ValidationError(format!("field '{field}' must be a string")))
}

fn require_positive_f64(payload: &Value, field: &str) -> Result<f64, ValidationError> {
    let value = payload
        .get(field)
        .ok_or_else(|| ValidationError(format!("missing required field '{field}'")))?
        .as_f64()
        .ok_or_else(|| ValidationError(format!("field '{field}' must be a number")))?;
    if value <= 0.0 {
        return Err(ValidationError(format!("field '{field}' must be strictly positive")));
    }
    Ok(value)
}

/// `login`: requires `username` and `password`, both strings.
pub fn validate_login(payload: &Value) -> Result<(), ValidationError> {
    require_str(payload, "username")?;
    require_str(payload, "password")?;
    Ok(())
}

/// `logout`: requires `token`, a string.
pub fn validate_logout(payload: &Value) -> Result<(), ValidationError> {
    require_str(payload, "token")?;
    Ok(())
}

/// `order`: requires `token`, `side` ∈ {buy, sell}, a strictly positive
/// numeric `qty`, an `order_type` ∈ {limit, market}, and — exactly for
/// `limit` — a strictly positive numeric `price` (absent for `market`).
pub fn validate_order(payload: &Value) -> Result<(), ValidationError> {
    require_str(payload, "token")?;

    let side = require_str(payload, "side")?;
    if side != "buy" && side != "sell" {
        return Err(ValidationError(format!("invalid value for 'side': '{side}'")));
    }

    require_positive_f64(payload, "qty")?;

    let order_type = require_str(payload, "order_type")?;
    match order_type {
        "limit" => {
            require_positive_f64(payload, "price")?;
        }
        "market" => {
            if payload.get("price").is_some() {
                return Err(ValidationError("'market' orders must not include a price".into()));
            }
        }
        other => return Err(ValidationError(format!("unsupported order type: '{other}'"))),
    }

    Ok(())
}

/// `cancel`: requires `token` and `order_id`, both strings.
pub fn validate_cancel(payload: &Value) -> Result<(), ValidationError> {
    require_str(payload, "token")?;
    require_str(payload, "order_id")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_rejects_string_qty() {
        let payload = json!({"token": "t", "side": "buy", "qty": "5", "order_type": "market"});
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn order_rejects_non_positive_qty() {
        let payload = json!({"token": "t", "side": "buy", "qty": 0, "order_type": "market"});
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn order_rejects_unknown_side() {
        let payload = json!({"token": "t", "side": "hold", "qty": 1, "order_type": "market"});
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn limit_order_requires_price() {
        let payload = json!({"token": "t", "side": "buy", "qty": 1, "order_type": "limit"});
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn market_order_rejects_price() {
        let payload = json!({"token": "t", "side": "buy", "qty": 1, "order_type": "market", "price": 10.0});
        assert!(validate_order(&payload).is_err());
    }

    #[test]
    fn valid_limit_order_passes() {
        let payload = json!({"token": "t", "side": "buy", "qty": 1, "order_type": "limit", "price": 10.0});
        assert!(validate_order(&payload).is_ok());
    }

    #[test]
    fn cancel_requires_order_id() {
        let payload = json!({"token": "t"});
        assert!(validate_cancel(&payload).is_err());
    }
}
