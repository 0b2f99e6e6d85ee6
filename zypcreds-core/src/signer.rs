//! HMAC-SHA1 request signing.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::params::{canonicalize, ParameterSet, SIGNATURE_FIELD};

type HmacSha1 = Hmac<Sha1>;

/// Computes the HMAC-SHA1 of `canonical` keyed with `secret`, as lowercase hex.
#[must_use]
pub fn sign(canonical: &str, secret: &str) -> String {
    // HMAC accepts keys of any length, so this never fails.
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC can take a key of any size"));
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Signs `params` in place: canonicalizes the current set and appends the
/// signature as the last field.
pub fn sign_params(params: &mut ParameterSet, secret: &str) {
    params.remove(SIGNATURE_FIELD);
    let signature = sign(&canonicalize(params), secret);
    params.insert(SIGNATURE_FIELD, signature);
}
