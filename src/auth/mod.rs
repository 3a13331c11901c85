//! Provider-token authentication: key handling, ES256 signing and the
//! cache seam that lets a host reuse tokens across sends.

pub use self::cache::{MemoryTokenCache, NoCache, TokenCache};
pub use self::key::{validate_private_key, wrap_private_key, AuthKey};
pub use self::signer::TokenSigner;

mod cache;
mod key;
mod signer;
