use rand::rngs::OsRng;
use rand::RngCore;

use crate::ToolkitResult;

/// Alphabet for [`random_string`]. 64 symbols, so a byte masked with `63`
/// picks one uniformly.
pub const RANDOM_STRING_SOURCE: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_+";

/// Returns `n` characters drawn from [`RANDOM_STRING_SOURCE`] using the
/// operating system's CSPRNG.
///
/// Generated values double as collision-resistant file names, so a failing
/// entropy source is reported as an error instead of falling back to a
/// predictable generator.
pub fn random_string(n: usize) -> ToolkitResult<String> {
    let mut bytes = vec![0u8; n];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(bytes
        .into_iter()
        .map(|b| RANDOM_STRING_SOURCE[usize::from(b & 63)] as char)
        .collect())
}
