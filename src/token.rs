//! Redemption token generation.

use rand::{Rng, distr::Alphanumeric};

/// Number of characters in every issued token.
///
/// Must stay in sync with `random_string VARCHAR(10)` in the migration.
pub const TOKEN_LENGTH: usize = 10;

/// Generate a random alphanumeric token (`[A-Za-z0-9]{10}`).
///
/// Uses the thread-local CSPRNG. Tokens are scoped per user, so a collision
/// between two users' tokens is harmless.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
