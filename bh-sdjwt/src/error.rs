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

use bh_jws_utils::SigningAlgorithm;

use crate::DecodingError;

/// Top-level error type returned by the decoding and verification entry points.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum Error {
    /// The compact serialization or the inner JWT could not be parsed.
    #[strum(to_string = "Format error: {0}")]
    Format(FormatError),

    /// The disclosures could not be decoded or substituted into the payload.
    #[strum(to_string = "Decoding error: {0}")]
    Decoding(DecodingError),

    /// The signed JWT did not pass verification.
    #[strum(to_string = "Verification error: {0}")]
    Verification(VerificationError),
}

impl bherror::BhError for Error {}

/// Error related to the structure of an SD-JWT or of its JWT part.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum FormatError {
    /// The compact serialization is not `<jwt>~<disclosure>~...~<kb-jwt>`.
    #[strum(to_string = "Invalid SD-JWT format")]
    InvalidSdJwtFormat,

    /// The JWT is not made of three parts holding a JSON header and payload.
    #[strum(to_string = "Provided JWT is not parsable")]
    NonParseableJwt,
}

impl bherror::BhError for FormatError {}

/// Failure reported while verifying the signed JWT of an SD-JWT.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum VerificationError {
    /// The signature does not verify under the resolved issuer key.
    #[strum(to_string = "Invalid Jwt signature")]
    InvalidJwtSignature,

    /// No signature verifier is available for the algorithm in the header.
    #[strum(to_string = "Missing signature verifier for algorithm {0}")]
    MissingSignatureVerifier(SigningAlgorithm),

    /// The issuer key could not be resolved.
    #[strum(to_string = "Issuer key resolution failed for {0}")]
    KeyResolutionFailed(String),

    /// The JWT carries no `iss` claim.
    #[strum(to_string = "JWT iss is required")]
    MissingIssuer,

    /// The JWT carries an `aud` claim but no audience was configured.
    #[strum(to_string = "JWT audience is required but no audience is configured")]
    MissingAudience,

    /// The configured audience is not listed in the `aud` claim.
    #[strum(to_string = "JWT audience does not match {0}")]
    AudienceMismatch(String),

    /// The `nbf` claim lies in the future: current time is `{0}`, nbf is `{1}`.
    #[strum(to_string = "Jwt not valid before nbf: current time is {0}, nbf is {1}")]
    JwtNotYetValid(u64, u64),

    /// The `iat` claim lies in the future: current time is `{0}`, iat is `{1}`.
    #[strum(to_string = "Jwt issued in the future: current time is {0}, iat is {1}")]
    JwtIssuedInFuture(u64, u64),

    /// The `exp` claim lies in the past: current time is `{0}`, exp is `{1}`.
    #[strum(to_string = "Jwt expired, current time is {0}, expiration is {1}")]
    JwtExpired(u64, u64),

    /// A registered time claim is present but is not a number.
    #[strum(to_string = "Invalid {0} format, it needs to be a number")]
    InvalidTimeClaim(&'static str),
}

impl bherror::BhError for VerificationError {}

/// Result type used across the crate.
pub type Result<T, E> = bherror::Result<T, E>;
