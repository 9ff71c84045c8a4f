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

//! Signing, structural decoding and verification of the issuer-signed JWT.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bh_jws_utils::{
    base64_url_encode, construct_jws_payload, jwt, JwkPublic, JwtSigner, JwtVerifier as _,
    SignatureVerifier, SigningAlgorithm,
};
use bherror::{
    traits::{ErrorContext, ForeignBoxed, ForeignError, PropagateError},
    Error,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decodes unpadded `base64url` input; the published `bh-jws-utils` does not
/// export this helper.
fn base64_url_decode<T: AsRef<[u8]>>(
    payload: T,
) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(payload)
}

use crate::{
    error::{FormatError, Result, VerificationError},
    issuer::IssuerError,
    IssuerKeyResolver, JsonObject, SecondsSinceEpoch,
};

/// Default leeway, in seconds, applied when checking `nbf`, `iat` and `exp`.
pub const DEFAULT_SKEW_TIME: u64 = 300;

const DEFAULT_TYP: &str = "JWT";

/// Header of the issuer-signed JWT.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtHeader {
    /// Algorithm used to sign the JWT.
    pub alg: SigningAlgorithm,

    /// Media type of the JWT, `JWT` unless set otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Identifier of the signing key, e.g. a DID URL of a verification method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// Any other header parameters.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl jwt::JoseHeader for JwtHeader {
    fn algorithm_type(&self) -> jwt::AlgorithmType {
        self.alg.into()
    }
}

/// Options applied to the payload when signing a JWT.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SigningOptions {
    /// Value of the `iss` claim; overwrites the payload's own when set.
    pub issuer: Option<String>,

    /// Lifetime in seconds; sets `exp` to `nbf` (or `iat` when there is no
    /// `nbf`) plus this value.
    pub expires_in: Option<u64>,

    /// Value of the `iat` claim when the payload has none. Defaults to the
    /// current time.
    pub issued_at: Option<SecondsSinceEpoch>,

    /// Encode the payload with the JSON Canonicalization Scheme.
    pub canonicalize: bool,
}

/// Signs `payload` with `signer` and returns the compact JWS.
///
/// The header parameters are taken from `header`. `alg` always comes from
/// the signer and `typ` defaults to `JWT`. With
/// [`SigningOptions::canonicalize`] set, the payload is encoded with the JSON
/// Canonicalization Scheme ([RFC 8785]).
///
/// [RFC 8785]: https://www.rfc-editor.org/rfc/rfc8785
pub fn sign_jwt<S: JwtSigner + ?Sized>(
    mut payload: JsonObject,
    options: &SigningOptions,
    header: JsonObject,
    signer: &S,
) -> Result<String, IssuerError> {
    let header = build_header(header, signer.algorithm())?;

    let iat = options.issued_at.unwrap_or_else(current_timestamp);
    if !payload.contains_key("iat") {
        payload.insert("iat".to_owned(), iat.into());
    }
    if let Some(expires_in) = options.expires_in {
        let not_before = payload.get("nbf").and_then(Value::as_u64).unwrap_or(iat);
        let exp = not_before
            .checked_add(expires_in)
            .ok_or_else(|| Error::root(IssuerError::InvalidTimeClaim("exp")))
            .ctx(|| format!("{not_before} + {expires_in} overflows"))?;
        payload.insert("exp".to_owned(), exp.into());
    }
    if let Some(issuer) = &options.issuer {
        payload.insert("iss".to_owned(), issuer.clone().into());
    }

    if options.canonicalize {
        return sign_canonical(&header, &payload, signer);
    }

    let signed: jwt::Token<JwtHeader, JsonObject, jwt::token::Signed> = signer
        .sign_jwt(jwt::Token::new(header, payload))
        .foreign_boxed_err(|| IssuerError::SigningFailed)?;

    Ok(signed.as_str().to_owned())
}

fn sign_canonical<S: JwtSigner + ?Sized>(
    header: &JwtHeader,
    payload: &JsonObject,
    signer: &S,
) -> Result<String, IssuerError> {
    let header = serde_json::to_vec(header).foreign_err(|| IssuerError::SigningFailed)?;
    let payload = serde_jcs::to_string(payload).foreign_err(|| IssuerError::SigningFailed)?;

    let message = construct_jws_payload(&base64_url_encode(header), &base64_url_encode(payload));
    let signature = signer
        .sign(message.as_bytes())
        .foreign_boxed_err(|| IssuerError::SigningFailed)?;

    Ok(format!("{message}.{}", base64_url_encode(signature)))
}

fn build_header(mut params: JsonObject, alg: SigningAlgorithm) -> Result<JwtHeader, IssuerError> {
    if let Some(requested) = params.remove("alg") {
        if requested.as_str() != Some(alg.to_string().as_str()) {
            return Err(Error::root(IssuerError::AlgorithmMismatch(
                requested.to_string(),
                alg,
            )));
        }
    }

    let typ = match params.remove("typ") {
        None => Some(DEFAULT_TYP.to_owned()),
        Some(Value::String(typ)) => Some(typ),
        Some(_) => return Err(Error::root(IssuerError::InvalidHeaderParameter("typ"))),
    };
    let kid = match params.remove("kid") {
        None => None,
        Some(Value::String(kid)) => Some(kid),
        Some(_) => return Err(Error::root(IssuerError::InvalidHeaderParameter("kid"))),
    };

    Ok(JwtHeader {
        alg,
        typ,
        kid,
        extra: params,
    })
}

/// A JWT decoded without any signature check.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedJwt {
    /// The JOSE header. Kept as a raw object so that algorithms unknown to
    /// this crate still decode.
    pub header: JsonObject,
    /// The claims.
    pub payload: JsonObject,
    /// The base64url signature.
    pub signature: String,
    /// The signing input, `<header>.<payload>`.
    pub data: String,
}

/// Decodes the header and payload of a compact JWS without checking its
/// signature.
pub fn decode_jwt(token: &str) -> Result<DecodedJwt, FormatError> {
    let parts: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = parts.as_slice() else {
        return Err(Error::root(FormatError::NonParseableJwt))
            .ctx(|| format!("expected 3 parts, found {}", parts.len()));
    };

    Ok(DecodedJwt {
        header: decode_part(header).ctx(|| "invalid header")?,
        payload: decode_part(payload).ctx(|| "invalid payload")?,
        signature: (*signature).to_owned(),
        data: format!("{header}.{payload}"),
    })
}

fn decode_part(part: &str) -> Result<JsonObject, FormatError> {
    let decoded = base64_url_decode(part).foreign_err(|| FormatError::NonParseableJwt)?;

    serde_json::from_slice(&decoded).foreign_err(|| FormatError::NonParseableJwt)
}

/// Which registered claims [`verify_jwt`] checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyPolicies {
    /// Reject a JWT whose `nbf` lies in the future.
    pub nbf: bool,
    /// Reject a JWT whose `iat` lies in the future. Only checked when there
    /// is no `nbf` to check.
    pub iat: bool,
    /// Reject a JWT whose `exp` lies in the past.
    pub exp: bool,
    /// Require the configured audience to be listed in `aud`, if present.
    pub aud: bool,
}

impl Default for VerifyPolicies {
    fn default() -> Self {
        Self {
            nbf: true,
            iat: true,
            exp: true,
            aud: true,
        }
    }
}

/// Options for [`verify_jwt`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    /// The verifier's own identifier, matched against the `aud` claim.
    pub audience: Option<String>,
    /// Leeway in seconds for the time checks.
    pub skew_time: u64,
    /// The time to check against. Defaults to the system clock.
    pub current_time: Option<SecondsSinceEpoch>,
    /// The checks to apply.
    pub policies: VerifyPolicies,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            audience: None,
            skew_time: DEFAULT_SKEW_TIME,
            current_time: None,
            policies: VerifyPolicies::default(),
        }
    }
}

/// A JWT whose signature verified under the issuer's resolved key.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifiedJwt {
    /// The JOSE header.
    pub header: JwtHeader,
    /// The claims.
    pub payload: JsonObject,
    /// The `iss` claim.
    pub issuer: String,
    /// The public key the signature verified under.
    pub signer: JwkPublic,
    /// The verified compact JWS.
    pub jwt: String,
}

/// Verifies the signature of `token` under the key `resolver` returns for its
/// issuer, then checks the registered time claims and the audience according
/// to `options`.
pub async fn verify_jwt<'a>(
    token: &str,
    resolver: &impl IssuerKeyResolver,
    get_signature_verifier: impl FnOnce(SigningAlgorithm) -> Option<&'a dyn SignatureVerifier>,
    options: &VerifyOptions,
) -> Result<VerifiedJwt, crate::Error> {
    let unverified: jwt::Token<JwtHeader, JsonObject, jwt::Unverified<'_>> =
        jwt::Token::parse_unverified(token)
            .foreign_err(|| FormatError::NonParseableJwt)
            .match_err(|error| crate::Error::Format(error.clone()))?;

    verify_signature(token, unverified, resolver, get_signature_verifier, options)
        .await
        .match_err(|error| crate::Error::Verification(error.clone()))
}

async fn verify_signature<'a>(
    token: &str,
    unverified: jwt::Token<JwtHeader, JsonObject, jwt::Unverified<'_>>,
    resolver: &impl IssuerKeyResolver,
    get_signature_verifier: impl FnOnce(SigningAlgorithm) -> Option<&'a dyn SignatureVerifier>,
    options: &VerifyOptions,
) -> Result<VerifiedJwt, VerificationError> {
    // !!! `iss` and the header are not integrity protected yet, they only
    // select the key and the verifier
    let issuer = unverified
        .claims()
        .get("iss")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::root(VerificationError::MissingIssuer))?
        .to_owned();

    let signer = resolver
        .resolve(&issuer, unverified.header())
        .await
        .with_err(|| VerificationError::KeyResolutionFailed(issuer.clone()))?;

    let alg = unverified.header().alg;
    let verifier = get_signature_verifier(alg)
        .ok_or_else(|| Error::root(VerificationError::MissingSignatureVerifier(alg)))?;

    let verified: jwt::Token<JwtHeader, JsonObject, jwt::Verified> = verifier
        .verify_jwt_signature(unverified, &signer)
        .foreign_boxed_err(|| VerificationError::InvalidJwtSignature)?;
    let header = verified.header().clone();
    let payload = verified.claims().clone();

    let now = options.current_time.unwrap_or_else(current_timestamp);
    check_time_claims(&payload, now, options)?;
    check_audience(&payload, options)?;

    Ok(VerifiedJwt {
        header,
        payload,
        issuer,
        signer,
        jwt: token.to_owned(),
    })
}

fn check_time_claims(
    payload: &JsonObject,
    now: SecondsSinceEpoch,
    options: &VerifyOptions,
) -> Result<(), VerificationError> {
    let policies = &options.policies;
    let now_skewed = now.saturating_add(options.skew_time);

    if let Some(nbf) = time_claim(payload, "nbf")?.filter(|_| policies.nbf) {
        if nbf > now_skewed {
            return Err(Error::root(VerificationError::JwtNotYetValid(now, nbf)));
        }
    } else if let Some(iat) = time_claim(payload, "iat")?.filter(|_| policies.iat) {
        if iat > now_skewed {
            return Err(Error::root(VerificationError::JwtIssuedInFuture(now, iat)));
        }
    }

    if let Some(exp) = time_claim(payload, "exp")?.filter(|_| policies.exp) {
        if exp <= now.saturating_sub(options.skew_time) {
            return Err(Error::root(VerificationError::JwtExpired(now, exp)));
        }
    }

    Ok(())
}

fn time_claim(
    payload: &JsonObject,
    name: &'static str,
) -> Result<Option<SecondsSinceEpoch>, VerificationError> {
    let Some(value) = payload.get(name) else {
        return Ok(None);
    };

    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|time| *time >= 0.0)
                .map(|time| time as u64)
        })
        .map(Some)
        .ok_or_else(|| Error::root(VerificationError::InvalidTimeClaim(name)))
}

fn check_audience(payload: &JsonObject, options: &VerifyOptions) -> Result<(), VerificationError> {
    if !options.policies.aud {
        return Ok(());
    }
    let Some(aud) = payload.get("aud") else {
        return Ok(());
    };
    let Some(audience) = &options.audience else {
        return Err(Error::root(VerificationError::MissingAudience));
    };

    let listed = match aud {
        Value::String(aud) => aud == audience,
        Value::Array(auds) => auds.iter().any(|aud| aud.as_str() == Some(audience)),
        _ => false,
    };
    if !listed {
        return Err(Error::root(VerificationError::AudienceMismatch(
            audience.clone(),
        )));
    }

    Ok(())
}

pub(crate) fn current_timestamp() -> SecondsSinceEpoch {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
