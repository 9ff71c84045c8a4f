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

//! Compact serialization of an SD-JWT: `<jwt>~<disclosure 1>~...~<disclosure n>~<kb-jwt>`.

use std::{fmt, str::FromStr};

use bherror::Error;

use crate::error::FormatError;

pub(crate) const SD_JWT_DELIMITER: char = '~';

/// An SD-JWT split into its issuer-signed JWT, its disclosures and an
/// optional Key Binding JWT.
///
/// No checks are carried out on any of the parts, e.g. the JWT signature is
/// not verified and the disclosures are not decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSdJwt {
    /// The issuer-signed JWT.
    pub jwt: String,
    /// Disclosures in wire form, in the order they were serialized.
    pub disclosures: Vec<String>,
    /// The Key Binding JWT, if one is attached.
    pub kb_jwt: Option<String>,
}

impl FromStr for SplitSdJwt {
    type Err = Error<FormatError>;

    /// Splits a compact SD-JWT.
    ///
    /// The first segment is the JWT and the last one the Key Binding JWT, an
    /// empty last segment meaning there is none. The segments in between are
    /// the disclosures. A lone empty disclosure segment, as produced by
    /// serializing an SD-JWT without disclosures, is read as no disclosures.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = value.split(SD_JWT_DELIMITER).collect();

        if parts.len() < 2 {
            return Err(Error::root(FormatError::InvalidSdJwtFormat));
        }
        let kb_jwt = parts.pop().filter(|kb_jwt| !kb_jwt.is_empty());
        let jwt = parts.remove(0);
        if jwt.is_empty() {
            return Err(Error::root(FormatError::InvalidSdJwtFormat));
        }

        let disclosures = match parts.as_slice() {
            // `jwt~~` as written by `form_sd_jwt` for an empty disclosure list
            [""] => Vec::new(),
            _ => parts.into_iter().map(str::to_owned).collect(),
        };

        Ok(Self {
            jwt: jwt.to_owned(),
            disclosures,
            kb_jwt: kb_jwt.map(str::to_owned),
        })
    }
}

impl fmt::Display for SplitSdJwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SD_JWT_DELIMITER}{}{SD_JWT_DELIMITER}{}",
            self.jwt,
            self.disclosures.join("~"),
            self.kb_jwt.as_deref().unwrap_or_default()
        )
    }
}

/// Splits a compact SD-JWT into its parts, see [`SplitSdJwt::from_str`].
pub fn split_sd_jwt(sd_jwt: &str) -> Result<SplitSdJwt, Error<FormatError>> {
    sd_jwt.parse()
}

/// Joins the parts of an SD-JWT into its compact serialization.
///
/// The result always has a `~` between the disclosures and the Key Binding
/// JWT, even when there are no disclosures and no Key Binding JWT.
pub fn form_sd_jwt(jwt: &str, disclosures: &[String], kb_jwt: Option<&str>) -> String {
    SplitSdJwt {
        jwt: jwt.to_owned(),
        disclosures: disclosures.to_vec(),
        kb_jwt: kb_jwt.map(str::to_owned),
    }
    .to_string()
}
