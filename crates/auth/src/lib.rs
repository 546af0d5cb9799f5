//! `bookshelf-auth`: token issuance/validation and request-time authorization.
//!
//! Decoupled from HTTP and storage: stores are
//! consumed through the traits in [`store`], transport lives in the API crate.

pub mod claims;
pub mod config;
pub mod credentials;
pub mod identity;
pub mod jwt;
pub mod ownership;
pub mod session;
pub mod store;

pub use claims::{validate_claims, JwtClaims, TokenError};
pub use config::{AuthConfig, AuthConfigError, SigningSecret};
pub use credentials::{CredentialError, CredentialVerifier};
pub use identity::{Identity, NewProfile, ProfileUpdate};
pub use jwt::{Hs256JwtCodec, IssuedToken, JwtValidator};
pub use ownership::{OwnershipAuthorizer, OwnershipError};
pub use session::{LoginError, RegistrationError, SessionIssuer};
pub use store::{CredentialStore, Owned, ResourceStore, StoreError};
