pub mod credentials;
pub mod parser;
pub mod signature_v4;

pub use credentials::Credentials;
pub use signature_v4::{DEFAULT_REGION, sign_request, verify_request};
