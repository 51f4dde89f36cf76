pub mod membership;
pub mod snapshot;

pub use membership::{Member, difference, find_user, members_union, user_group_names};
pub use snapshot::DirectorySnapshot;
