mod build;
mod options;

pub use build::{build_body, build_headers, build_query, build_uri, encode_query};
pub use options::{CallOptions, CallParams, EffectiveOptions};
