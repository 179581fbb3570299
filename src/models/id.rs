use serde::{Deserialize, Serialize};

macro_rules! make_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[sqlx(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

make_id! {
    /// Row id of a [`crate::models::User`].
    UserId
}
make_id! {
    /// Row id of a [`crate::models::Profile`].
    ProfileId
}
make_id!(ExperienceId);
make_id!(ProjectId);
make_id!(SkillId);
