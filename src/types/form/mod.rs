pub mod draft;
pub mod profile;

pub use profile::ProfileInput;
