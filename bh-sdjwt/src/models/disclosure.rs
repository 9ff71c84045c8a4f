// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::{fmt, str::FromStr};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use bh_jws_utils::base64_url_encode;
use bherror::{
    traits::{ErrorContext, ForeignError},
    Error,
};

use super::{error::DecodingResult, Value};
use crate::{utils::base64_url_digest, DecodingError, Hasher, HashingAlgorithm};

/// Base64url encoded disclosure hash salt.
pub type Salt = String;

/// Base64url encoded hash value.
pub type Digest = String;

/// How the `[salt, key, value]` array of a disclosure is rendered to JSON text
/// before base64url encoding.
///
/// Both modes produce disclosures every decoder accepts. They only differ in
/// the resulting bytes and hence in the digest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StringifyMode {
    /// Compact JSON, e.g. `["salt","key","value"]`.
    #[default]
    Compact,
    /// Elements joined with `", "`, e.g. `["salt", "key", "value"]`, as used
    /// by the examples of the SD-JWT drafts.
    SpecCompat,
}

/// The cleartext content of a disclosure.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Claim {
    /// A selectively disclosable object property, `[salt, key, value]`.
    ObjectProperty {
        /// Disclosure hash salt.
        salt: Salt,
        /// Claim name.
        key: String,
        /// Claim value.
        value: Value,
    },
    /// A selectively disclosable array element, `[salt, value]`.
    ArrayElement {
        /// Disclosure hash salt.
        salt: Salt,
        /// Element value.
        value: Value,
    },
}

impl Claim {
    /// Disclosure hash salt.
    pub fn salt(&self) -> &str {
        match self {
            Claim::ObjectProperty { salt, .. } | Claim::ArrayElement { salt, .. } => salt,
        }
    }

    /// Claim name, present only for object properties.
    pub fn key(&self) -> Option<&str> {
        match self {
            Claim::ObjectProperty { key, .. } => Some(key),
            Claim::ArrayElement { .. } => None,
        }
    }

    /// Disclosed value.
    pub fn value(&self) -> &Value {
        match self {
            Claim::ObjectProperty { value, .. } | Claim::ArrayElement { value, .. } => value,
        }
    }

    fn elements(&self) -> Vec<Value> {
        match self {
            Claim::ObjectProperty { salt, key, value } => vec![
                Value::String(salt.clone()),
                Value::String(key.clone()),
                value.clone(),
            ],
            Claim::ArrayElement { salt, value } => {
                vec![Value::String(salt.clone()), value.clone()]
            }
        }
    }

    /// Serializes the claim to JSON text according to `mode` and returns its
    /// base64url encoding, i.e. the wire form of the disclosure.
    pub fn encode(&self, mode: StringifyMode) -> String {
        let elements = self.elements();
        let text = match mode {
            StringifyMode::Compact => Value::Array(elements).to_string(),
            StringifyMode::SpecCompat => {
                let rendered: Vec<String> = elements.iter().map(Value::to_string).collect();
                format!("[{}]", rendered.join(", "))
            }
        };

        base64_url_encode(text)
    }

    /// Decodes the wire form of a disclosure.
    ///
    /// The decoded JSON must be an array of exactly two (array element) or
    /// three (object property) elements whose salt, and key if any, are
    /// strings.
    pub fn decode(serialized: &str) -> DecodingResult<Self> {
        let decoded = URL_SAFE_NO_PAD
            .decode(serialized)
            .foreign_err(|| {
                DecodingError::MalformedDisclosure("provided string is not base64url".to_owned())
            })
            .ctx(|| serialized.to_owned())?;

        let elements: Vec<Value> = serde_json::from_slice(&decoded)
            .foreign_err(|| {
                DecodingError::MalformedDisclosure("decoded content is not a JSON array".to_owned())
            })
            .ctx(|| serialized.to_owned())?;

        match <[Value; 3]>::try_from(elements) {
            Ok([salt, key, value]) => object_property(salt, key, value),
            Err(elements) => match <[Value; 2]>::try_from(elements) {
                Ok([salt, value]) => array_element(salt, value),
                Err(elements) => Err(Error::root(DecodingError::MalformedDisclosure(format!(
                    "deserialized disclosure array has invalid length {}",
                    elements.len()
                )))),
            },
        }
        .ctx(|| serialized.to_owned())
    }
}

fn object_property(salt: Value, key: Value, value: Value) -> DecodingResult<Claim> {
    let Value::String(salt) = salt else {
        return Err(Error::root(DecodingError::MalformedDisclosure(
            "salt value is not a string".to_owned(),
        )));
    };
    let Value::String(key) = key else {
        return Err(Error::root(DecodingError::MalformedDisclosure(
            "key value is not a string".to_owned(),
        )));
    };

    Ok(Claim::ObjectProperty { salt, key, value })
}

fn array_element(salt: Value, value: Value) -> DecodingResult<Claim> {
    let Value::String(salt) = salt else {
        return Err(Error::root(DecodingError::MalformedDisclosure(
            "salt value is not a string".to_owned(),
        )));
    };

    Ok(Claim::ArrayElement { salt, value })
}

/// A disclosure in its wire form, together with its digest and decoded claim.
///
/// The digest is always computed over the exact wire string, so a parsed
/// disclosure keeps the bytes it was received as.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Disclosure {
    serialized: String,
    digest: Digest,
    claim: Claim,
}

impl Disclosure {
    /// Encodes `claim` and computes its digest with `hasher`.
    pub fn new(claim: Claim, mode: StringifyMode, hasher: impl Hasher) -> Self {
        let serialized = claim.encode(mode);
        let digest = base64_url_digest(serialized.as_bytes(), hasher);

        Self {
            serialized,
            digest,
            claim,
        }
    }

    /// Parses a wire form disclosure, computing its digest with `hasher`.
    pub fn parse(serialized: String, hasher: impl Hasher) -> DecodingResult<Self> {
        let digest = base64_url_digest(serialized.as_bytes(), hasher);
        let claim = Claim::decode(&serialized)?;

        Ok(Self {
            serialized,
            digest,
            claim,
        })
    }

    /// Digest of the wire form.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Decoded claim.
    pub fn claim(&self) -> &Claim {
        &self.claim
    }

    /// Wire form of [`Self`].
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    /// Consume [`Self`] into its wire form.
    pub fn into_string(self) -> String {
        self.serialized
    }
}

impl fmt::Display for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Array(self.claim.elements()))
    }
}

/// Parses a wire form disclosure, hashing it with the algorithm named by
/// `sd_alg`.
pub fn parse_disclosure(serialized: String, sd_alg: &str) -> DecodingResult<Disclosure> {
    let alg = HashingAlgorithm::from_str(sd_alg)?;

    Disclosure::parse(serialized, alg.hasher())
}

/// Returns the base64url digest of a wire form disclosure under the algorithm
/// named by `sd_alg`.
pub fn hash_disclosure(serialized: &str, sd_alg: &str) -> DecodingResult<Digest> {
    let alg = HashingAlgorithm::from_str(sd_alg)?;

    Ok(base64_url_digest(serialized.as_bytes(), alg.hasher()))
}
