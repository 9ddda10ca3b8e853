pub mod client;
pub mod facade;
pub mod query;

pub use crate::domain::model::ResponseStream;
pub use crate::domain::ports::StringCallback;
pub use crate::utils::error::Result;
