//! Server-side Firebase Remote Config template evaluation.
//!
//! A [`Client`] bound to a project hands out [`ServerTemplate`]s. A template
//! caches the declarative config document fetched from the Remote Config
//! backend (or supplied as JSON) and evaluates it against a per-request
//! [`EvaluationContext`], producing a [`ServerConfig`] of typed,
//! provenance-tagged values for feature gating, experiments, and dynamic
//! tuning.
//!
//! Percentile bucketing is deterministic across the Remote Config server
//! SDKs: for a given condition seed and randomization id, every
//! implementation assigns the same bucket. `STRING_CONTAINS_REGEX` conditions
//! use Rust's default [`regex`](https://docs.rs/regex) semantics, unanchored
//! and with no implicit flags.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use firebase_remote_config::{Client, EvaluationContext};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::new("my-project").unwrap();
//!
//!     let defaults = HashMap::from([("welcome_message".to_owned(), "hi".into())]);
//!     let template = client.get_server_template(defaults).await.unwrap();
//!
//!     let context = EvaluationContext::new()
//!         .randomization_id("user-1234")
//!         .signal("tier", "paid");
//!     let config = template.evaluate(&context).unwrap();
//!     println!("{}", config.get_string("welcome_message"));
//! }
//! ```

mod builder;
mod client;
mod constants;
mod context;
mod errors;
mod eval;
mod fetch;
mod model;
mod template;
mod utils;
mod value;

pub use builder::ClientBuilder;
pub use client::Client;
pub use constants::PKG_VERSION;
pub use context::{EvaluationContext, SignalValue, RANDOMIZATION_ID};
pub use errors::{ClientError, ErrorKind, RemoteErrorCode};
pub use model::config::{
    AndCondition, CustomSignalCondition, MicroPercentRange, NamedCondition, OneOfCondition,
    OrCondition, Parameter, ParameterValue, PercentCondition, RemoteConfigUser,
    ServerTemplateData, Version,
};
pub use model::enums::{CustomSignalOperator, PercentOperator};
pub use template::ServerTemplate;
pub use value::{ServerConfig, Value, ValueSource};
