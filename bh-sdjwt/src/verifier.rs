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

//! Decoding and verification of SD-JWTs presented to a verifier.

use std::str::FromStr;

use bh_jws_utils::{JwkPublic, SignatureVerifier, SigningAlgorithm};
use bherror::{traits::PropagateError, Error};
use serde_json::Value;

use crate::{
    expand_disclosures,
    jwt::{decode_jwt, verify_jwt, JwtHeader, VerifyOptions},
    sd_jwt::split_sd_jwt,
    DecodingError, DecodingResult, DigestIndex, ExpandOptions, HashingAlgorithm, IssuerKeyResolver,
    JsonObject, Result, SD_ALG,
};

/// An SD-JWT decoded without any signature check, its payload reconstructed
/// from the presented disclosures.
#[derive(Debug, Clone, PartialEq)]
pub struct SdJwtDecoded {
    /// The JOSE header of the issuer-signed JWT.
    pub header: JsonObject,
    /// The reconstructed payload, without `_sd_alg`.
    pub payload: JsonObject,
    /// The base64url signature of the issuer-signed JWT.
    pub signature: String,
    /// The signing input of the issuer-signed JWT.
    pub data: String,
    /// The presented disclosures in wire form.
    pub disclosures: Vec<String>,
    /// The Key Binding JWT, if one is attached.
    pub kb_jwt: Option<String>,
}

/// Decodes `sd_jwt` and reconstructs its payload, see [`decode_sd_jwt_with`].
///
/// With `recurse` unset, digests nested below the top-level object are left
/// as they are, except in arrays directly reachable from it.
pub fn decode_sd_jwt(sd_jwt: &str, recurse: bool) -> Result<SdJwtDecoded, crate::Error> {
    decode_sd_jwt_with(sd_jwt, &ExpandOptions::with_recurse(recurse))
}

/// Decodes `sd_jwt` and reconstructs its payload by substituting the
/// presented disclosures for their digests.
///
/// The signature is **not** verified. The disclosures are hashed with the
/// algorithm named by `_sd_alg`, `sha-256` when the claim is absent.
pub fn decode_sd_jwt_with(
    sd_jwt: &str,
    options: &ExpandOptions,
) -> Result<SdJwtDecoded, crate::Error> {
    let split = split_sd_jwt(sd_jwt).match_err(|error| crate::Error::Format(error.clone()))?;

    tracing::debug!(
        disclosures = split.disclosures.len(),
        key_binding = split.kb_jwt.is_some(),
        recurse = options.recurse,
        "decoding SD-JWT"
    );

    let decoded = decode_jwt(&split.jwt).match_err(|error| crate::Error::Format(error.clone()))?;
    let payload = reconstruct_payload(&decoded.payload, &split.disclosures, options)
        .match_err(|error| crate::Error::Decoding(error.clone()))?;

    Ok(SdJwtDecoded {
        header: decoded.header,
        payload,
        signature: decoded.signature,
        data: decoded.data,
        disclosures: split.disclosures,
        kb_jwt: split.kb_jwt,
    })
}

/// Reads the hash algorithm from the `_sd_alg` claim of `payload`, `sha-256`
/// when the claim is absent.
pub(crate) fn payload_hashing_algorithm(payload: &JsonObject) -> DecodingResult<HashingAlgorithm> {
    match payload.get(SD_ALG) {
        None => Ok(HashingAlgorithm::default()),
        Some(Value::String(sd_alg)) => HashingAlgorithm::from_str(sd_alg),
        Some(other) => Err(Error::root(DecodingError::UnsupportedAlgorithm(
            other.to_string(),
        ))),
    }
}

fn reconstruct_payload(
    payload: &JsonObject,
    disclosures: &[String],
    options: &ExpandOptions,
) -> DecodingResult<JsonObject> {
    let alg = payload_hashing_algorithm(payload)?;
    let index = DigestIndex::build(disclosures.iter().map(String::as_str), alg.hasher())?;
    let mut expanded = expand_disclosures(payload, &index, options)?;
    expanded.remove(SD_ALG);

    Ok(expanded)
}

/// An SD-JWT whose issuer signature verified, with the payload reconstructed
/// from the presented disclosures.
#[derive(Debug, Clone, PartialEq)]
pub struct SdJwtVerified {
    /// The JOSE header of the issuer-signed JWT.
    pub header: JwtHeader,
    /// The payload reconstructed without recursion, see [`decode_sd_jwt`].
    pub payload: JsonObject,
    /// The `iss` claim.
    pub issuer: String,
    /// The issuer key the signature verified under.
    pub signer: JwkPublic,
    /// The issuer-signed JWT.
    pub jwt: String,
    /// The presented disclosures in wire form.
    pub disclosures: Vec<String>,
    /// The Key Binding JWT, if one is attached. It is **not** verified.
    pub kb_jwt: Option<String>,
}

/// Verifies the issuer signature of `sd_jwt` and reconstructs its payload.
///
/// The issuer-signed JWT is checked with [`verify_jwt`] under the key the
/// `resolver` returns and the `options` given. The payload is then rebuilt
/// from the disclosures with [`decode_sd_jwt`] without recursion, replacing
/// the signed one.
pub async fn verify_sd_jwt<'a>(
    sd_jwt: &str,
    resolver: &impl IssuerKeyResolver,
    get_signature_verifier: impl FnOnce(SigningAlgorithm) -> Option<&'a dyn SignatureVerifier>,
    options: &VerifyOptions,
) -> Result<SdJwtVerified, crate::Error> {
    let split = split_sd_jwt(sd_jwt).match_err(|error| crate::Error::Format(error.clone()))?;

    let verified = verify_jwt(&split.jwt, resolver, get_signature_verifier, options).await?;
    tracing::debug!(issuer = %verified.issuer, "issuer signature verified");

    // TODO(kb-jwt): verify the Key Binding JWT signature against the `cnf` key
    // and check its `sd_hash`, `aud`, `nonce` and `iat`.

    let decoded = decode_sd_jwt(sd_jwt, false)?;

    Ok(SdJwtVerified {
        header: verified.header,
        payload: decoded.payload,
        issuer: verified.issuer,
        signer: verified.signer,
        jwt: verified.jwt,
        disclosures: decoded.disclosures,
        kb_jwt: decoded.kb_jwt,
    })
}
