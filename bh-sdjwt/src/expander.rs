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

use std::collections::HashSet;

use bherror::{traits::ErrorContext, Error};
use lazy_static::lazy_static;
use serde_json::Value;

use crate::{
    Claim, DecodingError, DecodingResult, DigestIndex, Disclosure, JsonObject, ELLIPSIS, SD,
};

/// Default bound on the nesting depth of an expanded payload.
pub const DEFAULT_MAX_DEPTH: usize = 64;

lazy_static! {
    /// Registered claims that carry validity times and must stay in cleartext.
    static ref TIME_CLAIM_NAMES: HashSet<&'static str> = ["nbf", "iat", "exp"].into();
}

/// Options controlling [`expand_disclosures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Expand digests found inside disclosed values and nested cleartext
    /// objects. When `false`, only the top-level object and the arrays
    /// directly reachable from it are expanded.
    pub recurse: bool,

    /// Maximum nesting depth of objects and arrays, the top-level object
    /// being at depth zero.
    pub max_depth: usize,

    /// Fail with [`DecodingError::DuplicateDigest`] when a digest is
    /// referenced more than once.
    pub reject_duplicate_digests: bool,

    /// Fail with [`DecodingError::DisclosedTimeClaim`] when `nbf`, `iat` or
    /// `exp` is disclosed at the top level instead of sent in cleartext.
    pub reject_disclosed_time_claims: bool,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            max_depth: DEFAULT_MAX_DEPTH,
            reject_duplicate_digests: false,
            reject_disclosed_time_claims: false,
        }
    }
}

impl ExpandOptions {
    /// Default options with the given `recurse` flag.
    pub fn with_recurse(recurse: bool) -> Self {
        Self {
            recurse,
            ..Self::default()
        }
    }
}

/// Reconstructs the visible payload by substituting the disclosed claims of
/// `index` for the digests found in `payload`.
///
/// * Digests under `_sd` resolve to object properties which are added to the
///   object, after which `_sd` is removed.
/// * Array elements of the form `{"...": digest}` resolve to array element
///   disclosures, or are dropped when the digest was not disclosed.
/// * Digests without a matching disclosure are skipped silently.
/// * A disclosed property whose name already exists in the object fails with
///   [`DecodingError::DuplicateClaim`].
///
/// The `_sd_alg` claim is left untouched; removing it is up to the caller.
pub fn expand_disclosures(
    payload: &JsonObject,
    index: &DigestIndex,
    options: &ExpandOptions,
) -> DecodingResult<JsonObject> {
    let mut state = ExpanderState {
        index,
        options,
        processed_digests: HashSet::new(),
    };

    state.expand_object(payload, 0)
}

struct ExpanderState<'a> {
    index: &'a DigestIndex,
    options: &'a ExpandOptions,
    processed_digests: HashSet<String>,
}

impl<'a> ExpanderState<'a> {
    fn expand_object(&mut self, object: &JsonObject, depth: usize) -> DecodingResult<JsonObject> {
        self.check_depth(depth)?;

        let mut expanded = JsonObject::new();

        for (key, value) in object {
            if key == SD {
                continue;
            }
            let value = match value {
                Value::Array(array) => Value::Array(self.expand_array(array, depth + 1)?),
                Value::Object(inner) if self.options.recurse => {
                    Value::Object(self.expand_object(inner, depth + 1)?)
                }
                _ => value.clone(),
            };
            expanded.insert(key.clone(), value);
        }

        let Some(sd) = object.get(SD) else {
            return Ok(expanded);
        };
        let digests = sd
            .as_array()
            .ok_or_else(|| Error::root(DecodingError::MalformedDigest(sd.to_string())))?;

        for digest in digests {
            let Some(disclosure) = self.resolve(digest)? else {
                continue;
            };
            let Claim::ObjectProperty { key, value, .. } = disclosure.claim() else {
                return Err(Error::root(DecodingError::MismatchedDisclosureFormat)).ctx(|| {
                    format!(
                        "array element disclosure {} referenced from {SD}",
                        disclosure.digest()
                    )
                });
            };

            // the input object is checked as well so that a disclosure can
            // never shadow `_sd` itself
            if object.contains_key(key) || expanded.contains_key(key) {
                return Err(Error::root(DecodingError::DuplicateClaim(key.clone())));
            }
            if depth == 0 {
                self.check_time_claim(key)?;
            }

            let value = if self.options.recurse {
                self.expand_value(value, depth + 1)?
            } else {
                value.clone()
            };
            expanded.insert(key.clone(), value);
        }

        Ok(expanded)
    }

    fn expand_array(&mut self, array: &[Value], depth: usize) -> DecodingResult<Vec<Value>> {
        self.check_depth(depth)?;

        let mut expanded = Vec::with_capacity(array.len());

        for element in array {
            if let Some(digest) = element.as_object().and_then(|object| object.get(ELLIPSIS)) {
                let Some(disclosure) = self.resolve(digest)? else {
                    continue;
                };
                let Claim::ArrayElement { value, .. } = disclosure.claim() else {
                    return Err(Error::root(DecodingError::MismatchedDisclosureFormat)).ctx(|| {
                        format!(
                            "object property disclosure {} referenced from an array",
                            disclosure.digest()
                        )
                    });
                };

                let value = if self.options.recurse {
                    self.expand_value(value, depth + 1)?
                } else {
                    value.clone()
                };
                expanded.push(value);
                continue;
            }

            let element = if self.options.recurse {
                self.expand_value(element, depth + 1)?
            } else {
                element.clone()
            };
            expanded.push(element);
        }

        Ok(expanded)
    }

    fn expand_value(&mut self, value: &Value, depth: usize) -> DecodingResult<Value> {
        match value {
            Value::Object(object) => Ok(Value::Object(self.expand_object(object, depth)?)),
            Value::Array(array) => Ok(Value::Array(self.expand_array(array, depth)?)),
            _ => Ok(value.clone()),
        }
    }

    /// Looks the digest up in the index. `None` means the holder did not
    /// disclose it.
    fn resolve(&mut self, digest: &Value) -> DecodingResult<Option<&'a Disclosure>> {
        let Some(digest) = digest.as_str() else {
            return Err(Error::root(DecodingError::MalformedDigest(
                digest.to_string(),
            )));
        };

        if self.options.reject_duplicate_digests
            && !self.processed_digests.insert(digest.to_owned())
        {
            return Err(Error::root(DecodingError::DuplicateDigest(
                digest.to_owned(),
            )));
        }

        let index = self.index;
        let disclosure = index.get(digest);
        if disclosure.is_none() {
            tracing::trace!(digest, "digest not disclosed, skipping");
        }

        Ok(disclosure)
    }

    fn check_time_claim(&self, key: &str) -> DecodingResult<()> {
        if self.options.reject_disclosed_time_claims && TIME_CLAIM_NAMES.contains(key) {
            return Err(Error::root(DecodingError::DisclosedTimeClaim(
                key.to_owned(),
            )));
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> DecodingResult<()> {
        if depth > self.options.max_depth {
            return Err(Error::root(DecodingError::MaxDepthExceeded(
                self.options.max_depth,
            )));
        }
        Ok(())
    }
}
