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

use bh_jws_utils::{Es256Signer, Es256Verifier, SigningAlgorithm};
use bh_sdjwt::{
    holder::present,
    issuer::{create_sd_jwt, Issuer, SdJwtOptions},
    json_object,
    jwt::{SigningOptions, VerifyOptions},
    resolver::StaticKeyResolver,
    verifier::verify_sd_jwt,
    Disclosure, Sha256,
};

/// The issuer's identifier.
const ISSUER: &str = "https://example.com/issuer";

/// The claims the holder chooses to disclose.
const DISCLOSED_CLAIMS: &[&str] = &["given_name", "address"];

#[tokio::main]
async fn main() {
    // used to sign the issued credential
    let issuer_signer = Es256Signer::generate("issuer_kid".to_owned()).unwrap();

    // the SD-JWT Issuer
    let issuer = Issuer::new(Sha256);

    let parts = issuer
        .payload_helper(
            json_object!({
                "given_name": "John",
                "family_name": "Doe",
                "address": {
                    "street_address": "Street 17",
                    "locality": "New York",
                    "country": "US"
                },
                "nationalities": ["US", "DE"],
            }),
            json_object!({"sub": "user_42"}),
            &mut rand::thread_rng(),
        )
        .unwrap();

    let options = SdJwtOptions {
        signing: SigningOptions {
            issuer: Some(ISSUER.to_owned()),
            expires_in: Some(3600),
            ..SigningOptions::default()
        },
        disclosures: parts
            .disclosures
            .into_iter()
            .map(Disclosure::into_string)
            .collect(),
        kb_jwt: None,
    };
    let issued_sd_jwt =
        create_sd_jwt(parts.payload, &options, json_object!({}), &issuer_signer).unwrap();

    println!("Issued SD-JWT:\n{issued_sd_jwt}");

    // the holder presents only the [`DISCLOSED_CLAIMS`] and the `DE` nationality
    let presentation = present(
        &issued_sd_jwt,
        |disclosure| match disclosure.claim().key() {
            Some(key) => DISCLOSED_CLAIMS.contains(&key),
            None => disclosure.claim().value() == "DE",
        },
        None,
    )
    .unwrap();

    // the verifier trusts the issuer's key
    let resolver = StaticKeyResolver::new().with_key(ISSUER, issuer_signer.public_jwk().unwrap());

    let verified = verify_sd_jwt(
        &presentation,
        &resolver,
        |alg| (alg == SigningAlgorithm::Es256).then_some(&Es256Verifier),
        &VerifyOptions::default(),
    )
    .await
    .unwrap();

    println!(
        "\nVerified Claims:\n{}",
        serde_json::to_string_pretty(&verified.payload).unwrap()
    );
}
