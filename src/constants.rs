/// The Firebase Remote Config Rust SDK's version.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

pub(crate) const DEFAULT_BASE_URL: &str = "https://firebaseremoteconfig.googleapis.com";
pub(crate) const SERVER_NAMESPACE: &str = "firebase-server";
