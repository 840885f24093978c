//! Identity claims carried by a decoded bearer token, and the typed lookups
//! the rest of the auth code performs over them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim names as they appear in the token payload.
pub mod names {
    /// NameIdentifier: the numeric user id
    pub const NAME_IDENTIFIER: &str = "nameid";
    pub const ROLE: &str = "role";
    pub const ISSUER: &str = "iss";
    pub const AUDIENCE: &str = "aud";
    pub const EXPIRY: &str = "exp";
    pub const UNIQUE_NAME: &str = "unique_name";
    pub const ISSUED_AT: &str = "iat";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    /// Form written into the `role` claim.
    pub const fn claim_value(&self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }

    /// Form stored in `users.role`.
    pub const fn as_db(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }

    /// Exact match, ignoring ASCII case. `" teacher"` or `"Teachers"` do not match.
    pub fn from_claim(value: &str) -> Option<Role> {
        if value.eq_ignore_ascii_case("TEACHER") {
            Some(Role::Teacher)
        } else if value.eq_ignore_ascii_case("STUDENT") {
            Some(Role::Student)
        } else {
            None
        }
    }
}

/// Immutable claim name -> string value mapping.
///
/// Produced once per request by token decoding; there is no way to mutate
/// it after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    entries: HashMap<String, String>,
}

impl ClaimSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens a JWT payload. Strings are taken as-is, numbers and booleans
    /// are rendered, and nulls or nested objects are dropped. Only `aud` may
    /// be an array (its first scalar entry is kept); any other array-valued
    /// claim is dropped.
    pub fn from_json(payload: serde_json::Map<String, Value>) -> Self {
        payload
            .into_iter()
            .filter_map(|(name, value)| {
                let rendered = match value {
                    Value::Array(items) if name == names::AUDIENCE => {
                        items.into_iter().find_map(scalar_to_string)
                    }
                    other => scalar_to_string(other),
                }?;
                Some((name, rendered))
            })
            .collect()
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl<K, V> FromIterator<(K, V)> for ClaimSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// `nameid` parsed as an integer; absent or non-numeric yields `None`.
pub fn user_id(claims: &ClaimSet) -> Option<i64> {
    claims.get(names::NAME_IDENTIFIER)?.parse().ok()
}

pub fn role(claims: &ClaimSet) -> Option<Role> {
    claims.get(names::ROLE).and_then(Role::from_claim)
}

pub fn issuer(claims: &ClaimSet) -> Option<&str> {
    claims.get(names::ISSUER)
}

pub fn audience(claims: &ClaimSet) -> Option<&str> {
    claims.get(names::AUDIENCE)
}

/// Raw `exp` value, unparsed.
pub fn expiry_raw(claims: &ClaimSet) -> Option<&str> {
    claims.get(names::EXPIRY)
}
