pub mod cover_letter;
pub mod email;
pub mod jobs;
pub mod profile;
pub mod public;
pub mod seo;
