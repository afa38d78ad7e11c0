//! Authentication core: password hashing, token codec, request gate and
//! the ownership check.

pub mod authorize;
pub mod claims;
pub mod error;
pub mod gate;
pub mod jwt;
pub mod password;

pub use authorize::ensure_owner;
pub use claims::{Claims, Identity};
pub use error::{AuthError, AuthErrorKind, PasswordRule, TokenError};
pub use jwt::TokenCodec;
pub use password::PasswordHasher;
