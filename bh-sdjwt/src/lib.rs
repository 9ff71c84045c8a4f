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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate implements Selective Disclosure JSON Web Tokens.
//!
//! An issuer signs a JWT whose payload carries only digests of the selectively
//! disclosable claims, while the claims themselves travel next to it as
//! disclosures. A holder presents any subset of them, and a verifier
//! reconstructs the visible payload after checking the issuer signature. See
//! [Selective Disclosure for JWTs (SD-JWT)][1].
//!
//! [1]: <https://datatracker.ietf.org/doc/html/draft-ietf-oauth-selective-disclosure-jwt>
//!
//! # Details
//!
//! The main components of this crate are the following.
//!
//! * [`issuer`] -- Creates salts, disclosures and payloads, and signs SD-JWTs.
//! * [`holder`] -- Presents a subset of the disclosures of an SD-JWT.
//! * [`verifier`] -- Decodes SD-JWTs and verifies their issuer signature.
//! * [`jwt`] -- Signs, decodes and verifies the issuer-signed JWT.
//! * [`resolver`] -- Resolves issuer keys from a fixed set of trusted keys.
//!
//! The compact serialization is handled by [`split_sd_jwt`] and
//! [`form_sd_jwt`], and the payload reconstruction by [`expand_disclosures`]
//! over a [`DigestIndex`].
//!
//! # Examples
//!
//! The `bh-sdjwt` crate contains [a full example][examples] of issuing,
//! presenting and verifying an SD-JWT.
//!
//! [examples]: <https://github.com/blockhousetech/eudi-rust-core/tree/main/bh-sdjwt/examples>

// Re-export the `bh-jws-utils` crate
pub use bh_jws_utils;
pub use error::{Error, FormatError, Result, VerificationError};

mod digest_index;
mod error;
mod expander;
mod models;
mod sd_jwt;
mod traits;
mod utils;

pub mod holder;
pub mod issuer;
pub mod jwt;
pub mod resolver;
pub mod verifier;

pub use digest_index::*;
pub use expander::*;
pub use models::*;
pub use sd_jwt::{form_sd_jwt, split_sd_jwt, SplitSdJwt};
pub use traits::*;
pub use utils::base64_url_digest;
