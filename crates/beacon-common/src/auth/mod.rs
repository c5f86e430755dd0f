//! Service-account credentials and OAuth2 assertion signing

mod assertion;
mod service_account;

pub use assertion::{AssertionClaims, AssertionSigner, FIREBASE_SCOPES};
pub use service_account::{CredentialError, ServiceAccount};
