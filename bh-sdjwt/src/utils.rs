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

use bh_jws_utils::base64_url_encode;

use crate::Hasher;

/// Returns the `base64url`-encoded hash digest of the given `input` using the
/// provided [`Hasher`] to calculate the digest.
pub fn base64_url_digest(input: &[u8], hasher: impl Hasher) -> String {
    let digest = hasher.digest(input);

    base64_url_encode(digest)
}
