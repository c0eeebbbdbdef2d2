//! Session tokens and the login account.
//!
//! Tokens are HS256 JWTs carrying `sub`, `iat` and `exp`. The last token
//! issued per subject is kept in a [`TokenStore`] so that the login
//! endpoint can report the current session's claims.

pub mod cookie;
pub mod credentials;
pub mod store;
pub mod token;

pub use credentials::Credentials;
pub use store::{StoreError, TokenStore};
pub use token::{Claims, IssuedToken, TokenCodec, TokenError};
