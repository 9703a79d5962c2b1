/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::model::{AccountId, Role, UserPatch};

/// Which backend collection (and endpoint group) a controller operates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    InactiveTeachers,
    InactiveDeanery,
    ActiveUsers,
    InactiveUsers,
}

impl ResourceKind {
    pub fn list_path(&self) -> &'static str {
        match self {
            ResourceKind::InactiveTeachers => "/api/admin/unactive-accounts",
            ResourceKind::InactiveDeanery => "/api/admin/unactive-deanery-accounts",
            ResourceKind::ActiveUsers => "/api/admin/users/active",
            ResourceKind::InactiveUsers => "/api/admin/users/inactive",
        }
    }

    pub fn detail_path(&self, id: AccountId) -> String {
        match self {
            ResourceKind::InactiveTeachers => format!("/api/admin/user-info/{}", id),
            ResourceKind::InactiveDeanery => format!("/api/admin/deanery-user-info/{}", id),
            ResourceKind::ActiveUsers | ResourceKind::InactiveUsers => {
                format!("/api/admin/users/{}", id)
            }
        }
    }

    pub fn activate_path(&self, id: AccountId) -> String {
        match self {
            ResourceKind::InactiveTeachers => format!("/api/admin/activate-account/{}", id),
            ResourceKind::InactiveDeanery => {
                format!("/api/admin/activate-deanery-account/{}", id)
            }
            ResourceKind::ActiveUsers | ResourceKind::InactiveUsers => {
                format!("/api/admin/users/{}/activate", id)
            }
        }
    }

    /// Role implied by a role-scoped endpoint group
    pub fn implied_role(&self) -> Option<Role> {
        match self {
            ResourceKind::InactiveTeachers => Some(Role::Teacher),
            ResourceKind::InactiveDeanery => Some(Role::Deanery),
            ResourceKind::ActiveUsers | ResourceKind::InactiveUsers => None,
        }
    }

    /// Fallback message when listing fails without server text
    pub fn list_error(&self) -> &'static str {
        match self {
            ResourceKind::InactiveTeachers => "Ошибка при получении списка пользователей",
            ResourceKind::InactiveDeanery => "Ошибка при получении данных о деканате",
            ResourceKind::ActiveUsers => "Ошибка при получении активных пользователей",
            ResourceKind::InactiveUsers => "Ошибка при получении неактивных пользователей",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::InactiveTeachers => "inactive teachers",
            ResourceKind::InactiveDeanery => "inactive deanery accounts",
            ResourceKind::ActiveUsers => "active users",
            ResourceKind::InactiveUsers => "inactive users",
        }
    }

    /// Operation set offered for this collection
    pub fn supports(&self, op: MutationKind) -> bool {
        match self {
            ResourceKind::InactiveTeachers
            | ResourceKind::InactiveDeanery
            | ResourceKind::InactiveUsers => {
                matches!(op, MutationKind::Activate | MutationKind::Delete)
            }
            ResourceKind::ActiveUsers => matches!(
                op,
                MutationKind::Deactivate | MutationKind::Update | MutationKind::Delete
            ),
        }
    }
}

/// A state-changing call against one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Activate,
    Deactivate,
    Update(UserPatch),
    Delete,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Activate => MutationKind::Activate,
            Mutation::Deactivate => MutationKind::Deactivate,
            Mutation::Update(_) => MutationKind::Update,
            Mutation::Delete => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Activate,
    Deactivate,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Activate => "activate",
            MutationKind::Deactivate => "deactivate",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }

    /// Fallback message when the call fails without server text
    pub fn error_message(&self) -> &'static str {
        match self {
            MutationKind::Activate => "Ошибка при активации пользователя",
            MutationKind::Deactivate => "Ошибка при деактивации пользователя",
            MutationKind::Update => "Ошибка при обновлении пользователя",
            MutationKind::Delete => "Ошибка при удалении пользователя",
        }
    }
}
