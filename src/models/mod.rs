pub mod id;
pub mod profile;
pub mod settings;
pub mod user;

pub use profile::{Experience, Profile, Project, Skill};
pub use settings::{Availability, UserSettings};
pub use user::User;
