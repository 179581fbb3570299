pub mod error;
pub mod form;
pub mod sensitive;

pub use error::Error;
pub use sensitive::Sensitive;
