//! Credential handling and SSRF protection for user-supplied auction URLs.

pub mod credentials;
pub mod url_validator;

pub use credentials::SecretString;
pub use url_validator::UrlValidator;
