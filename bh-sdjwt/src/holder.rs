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

//! Presentation of a subset of the disclosures of an issued SD-JWT.

use bherror::traits::PropagateError;

use crate::{
    jwt::decode_jwt,
    sd_jwt::{form_sd_jwt, split_sd_jwt},
    verifier::payload_hashing_algorithm,
    Disclosure, Result,
};

/// Re-serializes `sd_jwt` keeping only the disclosures accepted by `keep`,
/// and attaches `kb_jwt` in place of any Key Binding JWT it carried.
///
/// The disclosures are parsed and hashed with the algorithm of the payload's
/// `_sd_alg`, so `keep` can inspect the disclosed claims. Disclosures nested in
/// a disclosed value are only visible to a verifier if the enclosing
/// disclosure is kept as well.
pub fn present(
    sd_jwt: &str,
    mut keep: impl FnMut(&Disclosure) -> bool,
    kb_jwt: Option<&str>,
) -> Result<String, crate::Error> {
    let split = split_sd_jwt(sd_jwt).match_err(|error| crate::Error::Format(error.clone()))?;
    let decoded = decode_jwt(&split.jwt).match_err(|error| crate::Error::Format(error.clone()))?;
    let hasher = payload_hashing_algorithm(&decoded.payload)
        .match_err(|error| crate::Error::Decoding(error.clone()))?
        .hasher();

    let presented = split.disclosures.len();
    let mut kept = Vec::new();
    for serialized in split.disclosures {
        let disclosure = Disclosure::parse(serialized, &hasher)
            .match_err(|error| crate::Error::Decoding(error.clone()))?;
        if keep(&disclosure) {
            kept.push(disclosure.into_string());
        }
    }

    tracing::debug!(presented, kept = kept.len(), "presenting SD-JWT");

    Ok(form_sd_jwt(&split.jwt, &kept, kb_jwt))
}
