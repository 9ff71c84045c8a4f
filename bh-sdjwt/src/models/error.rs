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

/// Error type defining possible failures while decoding disclosures and
/// substituting them into an SD-JWT payload.
#[derive(strum_macros::Display, Debug, PartialEq, Clone)]
pub enum DecodingError {
    /// The hash algorithm is missing, unknown or not supported.
    #[strum(to_string = "Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The disclosure is not base64url JSON array of length 2 or 3.
    #[strum(to_string = "Malformed disclosure: {0}")]
    MalformedDisclosure(String),

    /// A disclosed claim name already exists in the reconstructed object.
    #[strum(to_string = "Duplicate claim name: {0}")]
    DuplicateClaim(String),

    /// An array element disclosure was referenced from `_sd`, or an object
    /// property disclosure from an array placeholder.
    #[strum(to_string = "Mismatched disclosure format")]
    MismatchedDisclosureFormat,

    /// The `_sd` claim or an array placeholder holds something other than a
    /// digest string.
    #[strum(to_string = "Malformed digest: {0}")]
    MalformedDigest(String),

    /// The payload is nested deeper than allowed.
    #[strum(to_string = "Maximum nesting depth of {0} exceeded")]
    MaxDepthExceeded(usize),

    /// The same digest is referenced more than once in the payload.
    #[strum(to_string = "Duplicated digest: {0}")]
    DuplicateDigest(String),

    /// A registered time claim was selectively disclosed instead of being
    /// sent in cleartext.
    #[strum(to_string = "Time claim {0} must not be selectively disclosed")]
    DisclosedTimeClaim(String),
}

impl bherror::BhError for DecodingError {}

/// Result type for the decoding functions.
pub type DecodingResult<T> = bherror::Result<T, DecodingError>;
