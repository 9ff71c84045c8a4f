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

//! Issuance of SD-JWTs: salts, disclosures, payload assembly and signing.

use std::str::FromStr;

use bh_jws_utils::{base64_url_encode, JwtSigner, SigningAlgorithm};
use bherror::{traits::PropagateError, Error};
use rand_core::CryptoRngCore;
use serde_json::Value;

use crate::{
    jwt::{sign_jwt, SigningOptions},
    sd_jwt::form_sd_jwt,
    Claim, Disclosure, Hasher, HashingAlgorithm, JsonObject, Salt, StringifyMode, ELLIPSIS, SD,
    SD_ALG,
};

/// Minimum number of random bytes in a salt.
pub const MINIMUM_SALT_LENGTH: usize = 16;

/// Error type related to the issuance operations.
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum IssuerError {
    /// The payload's `_sd_alg` is missing or names an unsupported algorithm.
    #[strum(to_string = "Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The header asks for an algorithm other than the signer's.
    #[strum(to_string = "Header algorithm {0} does not match signer algorithm {1}")]
    AlgorithmMismatch(String, SigningAlgorithm),

    /// A header parameter has the wrong JSON type.
    #[strum(to_string = "Invalid header parameter {0}")]
    InvalidHeaderParameter(&'static str),

    /// A claim is given both as selectively disclosable and in cleartext.
    #[strum(to_string = "Claim {0} is both selectively disclosable and cleartext")]
    ConflictingClaim(String),

    /// A registered time claim cannot be computed.
    #[strum(to_string = "Invalid {0} claim")]
    InvalidTimeClaim(&'static str),

    /// A salt shorter than [`MINIMUM_SALT_LENGTH`] bytes was requested.
    #[strum(to_string = "Salt of {0} bytes is too short")]
    SaltTooShort(usize),

    /// The random source failed.
    #[strum(to_string = "Salt generation failed")]
    SaltGenerationFailed,

    /// The signer failed.
    #[strum(to_string = "Signing failed")]
    SigningFailed,
}

impl bherror::BhError for IssuerError {}

/// Result type used by the [`issuer`][crate::issuer] module.
pub type Result<T> = bherror::Result<T, IssuerError>;

/// Creates a base64url salt of [`MINIMUM_SALT_LENGTH`] random bytes.
pub fn create_salt<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Salt> {
    create_salt_with_length(rng, MINIMUM_SALT_LENGTH)
}

/// Creates a base64url salt of `length` random bytes, `length` being at
/// least [`MINIMUM_SALT_LENGTH`].
pub fn create_salt_with_length<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    length: usize,
) -> Result<Salt> {
    if length < MINIMUM_SALT_LENGTH {
        return Err(Error::root(IssuerError::SaltTooShort(length)));
    }

    let mut salt = vec![0u8; length];
    rng.try_fill_bytes(&mut salt)
        .map_err(|err| Error::root(IssuerError::SaltGenerationFailed).ctx(err))?;

    Ok(base64_url_encode(salt))
}

/// Creates disclosures and SD-JWT payloads with a fixed [`Hasher`] and
/// [`StringifyMode`].
#[derive(Debug, Clone)]
pub struct Issuer<H: Hasher> {
    hasher: H,
    stringify_mode: StringifyMode,
}

/// A payload ready for signing, with the disclosures its digests refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct SdJwtPayloadParts {
    /// Payload carrying `_sd_alg`, `_sd`, the cleartext claims and the
    /// array placeholders.
    pub payload: JsonObject,
    /// Every disclosure created for the payload.
    pub disclosures: Vec<Disclosure>,
}

impl<H: Hasher> Issuer<H> {
    /// Construct a new [`Issuer`] with the given [`Hasher`] and compact
    /// disclosure encoding.
    pub fn new(hasher: H) -> Self {
        Self {
            hasher,
            stringify_mode: StringifyMode::Compact,
        }
    }

    /// Use `mode` to encode the disclosures.
    pub fn with_stringify_mode(mut self, mode: StringifyMode) -> Self {
        self.stringify_mode = mode;
        self
    }

    /// Creates a disclosure for the object property `key: value`.
    pub fn object_property_disclosure(
        &self,
        key: impl Into<String>,
        value: Value,
        salt: Salt,
    ) -> Disclosure {
        let claim = Claim::ObjectProperty {
            salt,
            key: key.into(),
            value,
        };
        Disclosure::new(claim, self.stringify_mode, &self.hasher)
    }

    /// Creates a disclosure for the array element `value`.
    pub fn array_element_disclosure(&self, value: Value, salt: Salt) -> Disclosure {
        Disclosure::new(
            Claim::ArrayElement { salt, value },
            self.stringify_mode,
            &self.hasher,
        )
    }

    /// Assembles a payload from selectively disclosable and cleartext claims.
    ///
    /// An array value in `sd_claims` stays a cleartext array whose every
    /// element is replaced by a `{"...": digest}` placeholder. Any other value
    /// is hidden as a whole behind a digest in the top-level `_sd`.
    pub fn payload_helper<R: CryptoRngCore + ?Sized>(
        &self,
        sd_claims: JsonObject,
        clear_claims: JsonObject,
        rng: &mut R,
    ) -> Result<SdJwtPayloadParts> {
        if let Some(key) = sd_claims.keys().find(|key| clear_claims.contains_key(*key)) {
            return Err(Error::root(IssuerError::ConflictingClaim(key.clone())));
        }

        let mut digests = Vec::new();
        let mut placeholder_arrays = JsonObject::new();
        let mut disclosures = Vec::new();

        for (key, value) in sd_claims {
            match value {
                Value::Array(elements) => {
                    let mut placeholders = Vec::with_capacity(elements.len());
                    for element in elements {
                        let disclosure = self.array_element_disclosure(element, create_salt(rng)?);
                        placeholders.push(array_placeholder(disclosure.digest()));
                        disclosures.push(disclosure);
                    }
                    placeholder_arrays.insert(key, Value::Array(placeholders));
                }
                value => {
                    let disclosure = self.object_property_disclosure(key, value, create_salt(rng)?);
                    digests.push(Value::String(disclosure.digest().to_owned()));
                    disclosures.push(disclosure);
                }
            }
        }

        let mut payload = JsonObject::new();
        payload.insert(SD_ALG.to_owned(), self.hasher.algorithm().as_str().into());
        payload.insert(SD.to_owned(), Value::Array(digests));
        payload.extend(clear_claims);
        payload.extend(placeholder_arrays);

        Ok(SdJwtPayloadParts {
            payload,
            disclosures,
        })
    }
}

fn array_placeholder(digest: &str) -> Value {
    let mut placeholder = JsonObject::new();
    placeholder.insert(ELLIPSIS.to_owned(), digest.into());
    Value::Object(placeholder)
}

/// Options for [`create_sd_jwt`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdJwtOptions {
    /// Options applied to the payload when signing.
    pub signing: SigningOptions,
    /// Disclosures in wire form to append to the signed JWT.
    pub disclosures: Vec<String>,
    /// Key Binding JWT to append, if any.
    pub kb_jwt: Option<String>,
}

/// Signs `payload` and serializes it together with the disclosures and the
/// optional Key Binding JWT of `options`.
///
/// The payload must carry an `_sd_alg` naming a supported hash algorithm.
/// `header` holds additional JOSE header parameters, see
/// [`sign_jwt`][crate::jwt::sign_jwt].
pub fn create_sd_jwt<S: JwtSigner + ?Sized>(
    payload: JsonObject,
    options: &SdJwtOptions,
    header: JsonObject,
    signer: &S,
) -> Result<String> {
    tracing::debug!(
        disclosures = options.disclosures.len(),
        key_binding = options.kb_jwt.is_some(),
        "creating SD-JWT"
    );

    let sd_alg = match payload.get(SD_ALG) {
        Some(Value::String(sd_alg)) => sd_alg.as_str(),
        Some(other) => {
            return Err(Error::root(IssuerError::UnsupportedAlgorithm(
                other.to_string(),
            )))
        }
        None => {
            return Err(Error::root(IssuerError::UnsupportedAlgorithm(format!(
                "missing {SD_ALG}"
            ))))
        }
    };
    HashingAlgorithm::from_str(sd_alg)
        .with_err(|| IssuerError::UnsupportedAlgorithm(sd_alg.to_owned()))?;

    let jwt = sign_jwt(payload, &options.signing, header, signer)?;

    Ok(form_sd_jwt(
        &jwt,
        &options.disclosures,
        options.kb_jwt.as_deref(),
    ))
}
