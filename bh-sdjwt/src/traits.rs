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

use std::future::Future;

use bh_jws_utils::JwkPublic;
use bherror::{BhError, Error};

use crate::jwt::JwtHeader;

mod hasher;
pub use hasher::{Hasher, HashingAlgorithm};
mod r#impl;
pub use r#impl::Sha256;

/// Resolve the issuer's public key for signature verification from the
/// alleged `iss` identifier and the JWT header, neither of which is verified
/// yet.
///
/// Implementations typically resolve a DID document for `iss` and pick the
/// verification method named by the header `kid`, but any trusted key source
/// (a pinned key set, a database, a mock) fits.
///
/// # Security
///
/// The implementation MUST only return keys obtained from trusted sources.
/// Otherwise an attacker controls the key the signature is checked against
/// and the verification result is meaningless.
pub trait IssuerKeyResolver: Sync {
    /// [`BhError`] type used in this trait.
    type Err: BhError;

    /// Resolve a public key for the alleged issuer identifier.
    fn resolve(
        &self,
        alleged_iss: &str,
        header: &JwtHeader,
    ) -> impl Future<Output = Result<JwkPublic, Error<Self::Err>>> + Send;
}
