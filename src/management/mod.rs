mod credentials;
mod session;

pub use credentials::CREDENTIAL_SERVICE;
pub use credentials::CredentialStore;
pub use credentials::KeyringStore;
pub use credentials::MemoryStore;
pub use session::AuthState;
pub use session::Session;
