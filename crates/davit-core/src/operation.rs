//! Lifecycle operation tags, used as error context

/// A lifecycle operation attempted against the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    Create,
    Get,
    GetBySelector,
    Update,
    Patch,
    Delete,
    DeleteBySelector,
}

impl ResourceOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Get => "get",
            Self::GetBySelector => "get by selector",
            Self::Update => "update",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::DeleteBySelector => "delete by selector",
        }
    }
}

impl std::fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
