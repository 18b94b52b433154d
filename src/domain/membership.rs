//! Cluster membership as observed on the cluster network.

/// A container attached to the cluster network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub name: String,
}

impl Member {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Containers attached to a cluster's network at inspection time.
///
/// This is discovered, never stored: it is the only record of what runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMembership {
    members: Vec<Member>,
}

impl ClusterMembership {
    #[must_use]
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether a container with this name is attached.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }
}

impl IntoIterator for ClusterMembership {
    type Item = Member;
    type IntoIter = std::vec::IntoIter<Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}
