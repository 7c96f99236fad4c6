use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The Mage-OS order primary key.
pub const DEFAULT_ORDER_ID_FIELD: &str = "entity_id";

// f64 can represent every integer up to 2^53 exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

//--------------------------------------     OrderId       ---------------------------------------------------------
/// The canonical (string) form of an order identifier.
///
/// Numeric and string identifiers that stringify identically are the same id, so `101`, `101.0` and `"101"` all map
/// to `OrderId("101")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Canonicalizes a JSON value. Returns `None` for anything that cannot serve as an identifier.
    ///
    /// Surrounding whitespace is trimmed from string ids, so `" 101"` and `"101"` are the same order. Blank strings are
    /// not identifiers.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| Self(s.to_string()))
            },
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64().filter(|f| f.is_finite()).map(|f| {
                        if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
                            #[allow(clippy::cast_possible_truncation)]
                            Self((f as i64).to_string())
                        } else {
                            Self(f.to_string())
                        }
                    })
                }
            },
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OrderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderId::from_json(&Value::String(s.to_string())).ok_or_else(|| "Order id cannot be empty".to_string())
    }
}

impl From<u64> for OrderId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

//--------------------------------------       Order       ---------------------------------------------------------
/// An order as delivered by the commerce platform.
///
/// Only the identifier field is ever interpreted. Everything else is passed to the forwarder untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(Map<String, Value>);

impl Order {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns `None` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn order_id(&self, id_field: &str) -> Option<OrderId> {
        self.0.get(id_field).and_then(OrderId::from_json)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Order {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
