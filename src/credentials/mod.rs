//! Credential subsystem.
//!
//! # Data Flow
//! ```text
//! (org_id, provider)
//!     → store.rs (CredentialStore::get → encrypted blob)
//!     → store.rs (Decryptor::decrypt → plaintext JSON)
//!     → resolver.rs (parse, usability check, token selection)
//!     → AuthContext { token, account_id } or OperationError::NoCredentials
//! ```
//!
//! # Security Constraints
//! - Nothing is cached; every operation resolves afresh
//! - Store, decrypt and parse failures all collapse to "absent"
//! - Never log tokens

pub mod resolver;
pub mod store;

pub use resolver::{AuthContext, CredentialResolver, Credentials, OrgId, TokenKind};
pub use store::{
    CredentialError, CredentialStore, Decryptor, FileCredentialStore, MemoryCredentialStore,
    PassthroughDecryptor,
};
