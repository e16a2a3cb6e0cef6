mod credentials;

pub use credentials::{generate_token, hash_credentials, verify_credentials, CredentialError};
