use base64ct::{Base64, Encoding};
use rand::rngs::OsRng;
use rand::RngCore;

/// Width of the random refresh credential before base64 rendering.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Produces an opaque refresh credential: 32 bytes from the OS CSPRNG,
/// base64-rendered. Unrelated to the access token structure and never
/// derived from user data; the caller persists it.
pub fn generate() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Base64::encode_string(&bytes)
}
