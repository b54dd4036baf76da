//! Conversions between veenzo's remote types and Google's event schema.

mod from_google;
mod to_google;

pub use from_google::FromGoogle;
pub use to_google::ToGoogle;
