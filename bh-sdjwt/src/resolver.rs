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

//! Issuer key resolution from a fixed set of trusted keys.

use std::collections::HashMap;

use bh_jws_utils::JwkPublic;
use bherror::Error;

use crate::{jwt::JwtHeader, IssuerKeyResolver};

/// Error type of the [`StaticKeyResolver`].
#[derive(strum_macros::Display, Debug, PartialEq, Eq, Clone)]
pub enum ResolverError {
    /// No key is registered for the issuer.
    #[strum(to_string = "Unknown issuer {0}")]
    UnknownIssuer(String),
}

impl bherror::BhError for ResolverError {}

/// An [`IssuerKeyResolver`] over keys registered up front.
///
/// A key registered for an issuer together with a `kid` takes precedence over
/// the issuer's default key when the JWT header names that `kid`.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, JwkPublic>,
    kid_keys: HashMap<(String, String), JwkPublic>,
}

impl StaticKeyResolver {
    /// Creates a resolver without any keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` as the default key of `issuer`.
    pub fn with_key(mut self, issuer: impl Into<String>, key: JwkPublic) -> Self {
        self.keys.insert(issuer.into(), key);
        self
    }

    /// Registers `key` for `issuer` when the JWT header names `kid`.
    pub fn with_kid_key(
        mut self,
        issuer: impl Into<String>,
        kid: impl Into<String>,
        key: JwkPublic,
    ) -> Self {
        self.kid_keys.insert((issuer.into(), kid.into()), key);
        self
    }
}

impl IssuerKeyResolver for StaticKeyResolver {
    type Err = ResolverError;

    async fn resolve(
        &self,
        alleged_iss: &str,
        header: &JwtHeader,
    ) -> Result<JwkPublic, Error<Self::Err>> {
        let by_kid = header
            .kid
            .as_ref()
            .and_then(|kid| self.kid_keys.get(&(alleged_iss.to_owned(), kid.clone())));

        by_kid
            .or_else(|| self.keys.get(alleged_iss))
            .cloned()
            .ok_or_else(|| Error::root(ResolverError::UnknownIssuer(alleged_iss.to_owned())))
    }
}
