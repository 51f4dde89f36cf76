//! User and group membership lookups and set operations over member lists.

use std::{collections::BTreeSet, fmt};

use crate::{
    directory::{Directory, DirectoryResult, Group, User},
    rules::report::eq_ignore_case,
};

/// Okta status of a user that has been offboarded.
pub const DEPROVISIONED_STATUS: &str = "DEPROVISIONED";

/// A group member as printed in listings: `jane@example.com (ACTIVE)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Member {
    pub email: String,
    pub status: String,
}

impl Member {
    pub fn is_deprovisioned(&self) -> bool {
        self.status == DEPROVISIONED_STATUS
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.email, self.status)
    }
}

impl Member {
    fn from_user(user: &User) -> Option<Self> {
        match user.email() {
            Some(email) => Some(Self {
                email: email.to_string(),
                status: user.status.clone(),
            }),
            None => {
                tracing::warn!(user_id = %user.id, "Skipping user without email or login");
                None
            }
        }
    }
}

/// Sort and remove duplicates.
pub fn sorted_unique<T: Ord>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    items.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Entries only in `a`, and entries only in `b`, each in the order of its input.
pub fn difference<T: Ord + Clone>(a: &[T], b: &[T]) -> (Vec<T>, Vec<T>) {
    let in_a: BTreeSet<&T> = a.iter().collect();
    let in_b: BTreeSet<&T> = b.iter().collect();

    let only_a = a.iter().filter(|item| !in_b.contains(item)).cloned().collect();
    let only_b = b.iter().filter(|item| !in_a.contains(item)).cloned().collect();

    (only_a, only_b)
}

/// Find a user by email, or by the part of the email before `@`, ignoring case.
pub async fn find_user(directory: &dyn Directory, name: &str) -> DirectoryResult<Option<User>> {
    let users = directory.list_users(name).await?;
    let by_full_email = name.contains('@');

    Ok(users.into_iter().find(|user| {
        let Some(email) = user.email() else {
            return false;
        };
        if by_full_email {
            eq_ignore_case(email, name)
        } else {
            let local_part = email.split('@').next().unwrap_or(email);
            eq_ignore_case(local_part, name)
        }
    }))
}

/// Find a group by exact name, ignoring case.
pub async fn find_group(directory: &dyn Directory, name: &str) -> DirectoryResult<Option<Group>> {
    let groups = directory.list_groups(Some(name)).await?;
    Ok(groups
        .into_iter()
        .find(|group| eq_ignore_case(&group.profile.name, name)))
}

/// Sorted names of the groups a user belongs to.
pub async fn user_group_names(directory: &dyn Directory, user_id: &str) -> DirectoryResult<Vec<String>> {
    let groups = directory.list_user_groups(user_id).await?;
    let mut names: Vec<String> = groups.into_iter().map(|group| group.profile.name).collect();
    names.sort();
    Ok(names)
}

/// Sorted members of a group, `None` if no group has that name.
pub async fn group_members(
    directory: &dyn Directory,
    group_name: &str,
) -> DirectoryResult<Option<Vec<Member>>> {
    let Some(group) = find_group(directory, group_name).await? else {
        return Ok(None);
    };

    let users = directory.list_group_members(&group.id).await?;
    tracing::debug!(group = %group.profile.name, members = users.len(), "Fetched group members");

    Ok(Some(sorted_unique(users.iter().filter_map(Member::from_user))))
}

/// Members of any of several groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembersUnion {
    /// Sorted, without duplicates.
    pub members: Vec<Member>,
    /// Requested group names that do not exist.
    pub missing_groups: Vec<String>,
}

/// Union of the members of `group_names`. Unknown groups are recorded, not fatal.
pub async fn members_union(
    directory: &dyn Directory,
    group_names: &[String],
) -> DirectoryResult<MembersUnion> {
    let mut members = Vec::new();
    let mut missing_groups = Vec::new();

    for name in group_names {
        match group_members(directory, name).await? {
            Some(group_members) => members.extend(group_members),
            None => missing_groups.push(name.clone()),
        }
    }

    Ok(MembersUnion {
        members: sorted_unique(members),
        missing_groups,
    })
}
