//! Canonical CBOR encoding for predicates.
//!
//! Two structurally identical predicates always encode to identical bytes,
//! so the encoding (and its Blake3 [`Fingerprint`]) can key a query cache on
//! the caller's side or travel to a search backend. Rules:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - Non-integral numbers encode as 64-bit floats

use ciborium::value::{Integer, Value as Cbor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::predicate::Predicate;

/// Node field keys (integer keys for compact encoding).
mod keys {
    pub const KIND: u64 = 0;
    pub const FIELD: u64 = 1;
    pub const VALUE: u64 = 2;
    pub const CHILDREN: u64 = 3;
}

/// Node kind discriminators.
mod kinds {
    pub const MATCH_ALL: u64 = 0;
    pub const MATCH_NONE: u64 = 1;
    pub const MATCH: u64 = 2;
    pub const NOT: u64 = 3;
    pub const AND: u64 = 4;
    pub const OR: u64 = 5;
}

/// A 32-byte Blake3 digest of a predicate's canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Hash arbitrary bytes.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl Predicate {
    /// Canonical CBOR bytes of this predicate.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_value_to(&mut buf, &predicate_to_cbor(self));
        buf
    }

    /// Blake3 fingerprint of [`Predicate::canonical_bytes`].
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::hash(&self.canonical_bytes())
    }

    /// Decode a predicate from its canonical bytes.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self> {
        let value: Cbor =
            ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))?;
        cbor_to_predicate(&value)
    }
}

fn uint(n: u64) -> Cbor {
    Cbor::Integer(n.into())
}

fn predicate_to_cbor(predicate: &Predicate) -> Cbor {
    let node = |kind: u64, mut rest: Vec<(Cbor, Cbor)>| {
        let mut entries = vec![(uint(keys::KIND), uint(kind))];
        entries.append(&mut rest);
        Cbor::Map(entries)
    };

    match predicate {
        Predicate::MatchAll => node(kinds::MATCH_ALL, vec![]),
        Predicate::MatchNone => node(kinds::MATCH_NONE, vec![]),
        Predicate::Match { field, value } => node(
            kinds::MATCH,
            vec![
                (uint(keys::FIELD), Cbor::Text(field.clone())),
                (uint(keys::VALUE), json_to_cbor(value)),
            ],
        ),
        Predicate::Not { predicate } => node(
            kinds::NOT,
            vec![(uint(keys::CHILDREN), Cbor::Array(vec![predicate_to_cbor(predicate)]))],
        ),
        Predicate::And { predicates } => node(
            kinds::AND,
            vec![(
                uint(keys::CHILDREN),
                Cbor::Array(predicates.iter().map(predicate_to_cbor).collect()),
            )],
        ),
        Predicate::Or { predicates } => node(
            kinds::OR,
            vec![(
                uint(keys::CHILDREN),
                Cbor::Array(predicates.iter().map(predicate_to_cbor).collect()),
            )],
        ),
    }
}

fn json_to_cbor(value: &Json) -> Cbor {
    match value {
        Json::Null => Cbor::Null,
        Json::Bool(b) => Cbor::Bool(*b),
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Cbor::Integer(u.into())
            } else if let Some(i) = n.as_i64() {
                Cbor::Integer(i.into())
            } else {
                Cbor::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Json::String(s) => Cbor::Text(s.clone()),
        Json::Array(items) => Cbor::Array(items.iter().map(json_to_cbor).collect()),
        Json::Object(map) => Cbor::Map(
            map.iter()
                .map(|(k, v)| (Cbor::Text(k.clone()), json_to_cbor(v)))
                .collect(),
        ),
    }
}

fn cbor_to_json(value: &Cbor) -> Result<Json> {
    Ok(match value {
        Cbor::Null => Json::Null,
        Cbor::Bool(b) => Json::Bool(*b),
        Cbor::Integer(i) => {
            let n: i128 = (*i).into();
            if let Ok(u) = u64::try_from(n) {
                Json::Number(u.into())
            } else if let Ok(s) = i64::try_from(n) {
                Json::Number(s.into())
            } else {
                return Err(CoreError::DecodingError(format!("integer out of range: {}", n)));
            }
        }
        Cbor::Float(f) => Number::from_f64(*f)
            .map(Json::Number)
            .ok_or_else(|| CoreError::DecodingError("non-finite float".into()))?,
        Cbor::Text(s) => Json::String(s.clone()),
        Cbor::Array(items) => Json::Array(items.iter().map(cbor_to_json).collect::<Result<_>>()?),
        Cbor::Map(entries) => {
            let mut map = Map::new();
            for (k, v) in entries {
                let key = match k {
                    Cbor::Text(key) => key.clone(),
                    _ => return Err(CoreError::DecodingError("non-text map key".into())),
                };
                map.insert(key, cbor_to_json(v)?);
            }
            Json::Object(map)
        }
        _ => return Err(CoreError::DecodingError("unsupported CBOR value type".into())),
    })
}

fn cbor_to_predicate(value: &Cbor) -> Result<Predicate> {
    let map = match value {
        Cbor::Map(m) => m,
        _ => return Err(CoreError::MalformedPredicate("expected map".into())),
    };

    let get = |key: u64| -> Option<&Cbor> {
        map.iter()
            .find(|(k, _)| matches!(k, Cbor::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let kind = match get(keys::KIND) {
        Some(Cbor::Integer(i)) => u64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedPredicate("negative kind".into()))?,
        _ => return Err(CoreError::MalformedPredicate("missing kind".into())),
    };

    let children = || -> Result<Vec<Predicate>> {
        match get(keys::CHILDREN) {
            Some(Cbor::Array(items)) => items.iter().map(cbor_to_predicate).collect(),
            _ => Err(CoreError::MalformedPredicate("missing children".into())),
        }
    };

    match kind {
        kinds::MATCH_ALL => Ok(Predicate::MatchAll),
        kinds::MATCH_NONE => Ok(Predicate::MatchNone),
        kinds::MATCH => {
            let field = match get(keys::FIELD) {
                Some(Cbor::Text(s)) => s.clone(),
                _ => return Err(CoreError::MalformedPredicate("missing field".into())),
            };
            let value = match get(keys::VALUE) {
                Some(v) => cbor_to_json(v)?,
                None => return Err(CoreError::MalformedPredicate("missing value".into())),
            };
            Ok(Predicate::Match { field, value })
        }
        kinds::NOT => {
            let mut inner = children()?;
            if inner.len() != 1 {
                return Err(CoreError::MalformedPredicate(
                    "negation takes exactly one child".into(),
                ));
            }
            Ok(Predicate::Not {
                predicate: Box::new(inner.remove(0)),
            })
        }
        kinds::AND => Ok(Predicate::And {
            predicates: children()?,
        }),
        kinds::OR => Ok(Predicate::Or {
            predicates: children()?,
        }),
        other => Err(CoreError::MalformedPredicate(format!("unknown kind {}", other))),
    }
}

/// Recursively encode a CBOR value canonically.
fn encode_value_to(buf: &mut Vec<u8>, value: &Cbor) {
    match value {
        Cbor::Integer(i) => encode_integer(buf, *i),
        Cbor::Bytes(b) => {
            encode_uint(buf, 2, b.len() as u64);
            buf.extend_from_slice(b);
        }
        Cbor::Text(s) => {
            encode_uint(buf, 3, s.len() as u64);
            buf.extend_from_slice(s.as_bytes());
        }
        Cbor::Array(arr) => {
            encode_uint(buf, 4, arr.len() as u64);
            for item in arr {
                encode_value_to(buf, item);
            }
        }
        Cbor::Map(entries) => encode_map_canonical(buf, entries),
        Cbor::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Cbor::Null => buf.push(0xf6),
        Cbor::Float(f) => {
            buf.push(0xfb);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        // Tags never appear in predicates built from JSON.
        _ => buf.push(0xf7),
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a map with keys sorted by their encoded bytes.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Cbor, Cbor)]) {
    let mut pairs: Vec<(Vec<u8>, &Cbor)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}
