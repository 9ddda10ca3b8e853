pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use config::HttpConfig;
pub use crate::core::client::Http;
pub use crate::core::facade::{
    concat_url, get, get_async, get_with_params, post, post_async, post_body,
    post_body_stream, post_body_with_type,
};
pub use domain::{model::ResponseStream, ports::StringCallback};
pub use utils::error::{HttpError, Result};
