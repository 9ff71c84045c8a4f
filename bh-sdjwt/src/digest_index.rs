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

use std::{collections::HashMap, str::FromStr};

use crate::{DecodingResult, Digest, Disclosure, Hasher, HashingAlgorithm};

/// Lookup table from digest to [`Disclosure`], built fresh for every decoded
/// SD-JWT.
#[derive(Debug, Default, Clone)]
pub struct DigestIndex(HashMap<Digest, Disclosure>);

impl DigestIndex {
    /// Parses every wire form disclosure and indexes it by its digest under
    /// `hasher`.
    ///
    /// Disclosures sharing a digest are not deduplicated; the last one wins.
    /// Distinct disclosures sharing a digest mean a hash collision and are
    /// logged as an anomaly.
    pub fn build<I, S>(disclosures: I, hasher: impl Hasher) -> DecodingResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut by_digest: HashMap<Digest, Disclosure> = HashMap::new();

        for serialized in disclosures {
            let disclosure = Disclosure::parse(serialized.into(), &hasher)?;
            let digest = disclosure.digest().to_owned();

            if let Some(previous) = by_digest.get(&digest) {
                if previous.as_str() != disclosure.as_str() {
                    tracing::warn!(digest = %digest, "distinct disclosures share a digest");
                }
            }
            by_digest.insert(digest, disclosure);
        }

        Ok(Self(by_digest))
    }

    /// Returns the disclosure with the given digest, if it was presented.
    pub fn get(&self, digest: &str) -> Option<&Disclosure> {
        self.0.get(digest)
    }

    /// Number of indexed disclosures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no disclosure was indexed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the indexed disclosures in no particular order.
    pub fn disclosures(&self) -> impl Iterator<Item = &Disclosure> {
        self.0.values()
    }
}

/// Builds a [`DigestIndex`] over wire form disclosures, hashing them with the
/// algorithm named by `sd_alg`.
pub fn build_digest_index(disclosures: &[String], sd_alg: &str) -> DecodingResult<DigestIndex> {
    let alg = HashingAlgorithm::from_str(sd_alg)?;

    DigestIndex::build(disclosures.iter().map(String::as_str), alg.hasher())
}
