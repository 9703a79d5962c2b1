use serde::{Deserialize, Deserializer, Serialize};

pub type AccountId = i64;

/// Account role as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Teacher,
    Deanery,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Deanery => "DEANERY",
            Role::Student => "STUDENT",
        }
    }

    /// Students cannot be deactivated once approved
    pub fn can_deactivate(&self) -> bool {
        !matches!(self, Role::Student)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional fields carried by teacher and deanery accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffProfile {
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
    pub email: Option<String>,
}

/// Optional fields carried by student accounts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentProfile {
    pub last_name: Option<String>,
}

/// Role-specific part of an account. The role is the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountProfile {
    Teacher(StaffProfile),
    Deanery(StaffProfile),
    Student(StudentProfile),
}

/// Snapshot of a registered bot user, as last fetched from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireAccount", try_from = "WireAccount")]
pub struct UserAccount {
    pub id: AccountId,
    pub first_name: String,
    pub phone: Option<String>,
    pub telegram_id: Option<String>,
    pub profile: AccountProfile,
}

impl UserAccount {
    pub fn role(&self) -> Role {
        match self.profile {
            AccountProfile::Teacher(_) => Role::Teacher,
            AccountProfile::Deanery(_) => Role::Deanery,
            AccountProfile::Student(_) => Role::Student,
        }
    }

    pub fn last_name(&self) -> Option<&str> {
        match &self.profile {
            AccountProfile::Teacher(staff) | AccountProfile::Deanery(staff) => {
                staff.last_name.as_deref()
            }
            AccountProfile::Student(student) => student.last_name.as_deref(),
        }
    }

    pub fn patronymic(&self) -> Option<&str> {
        match &self.profile {
            AccountProfile::Teacher(staff) | AccountProfile::Deanery(staff) => {
                staff.patronymic.as_deref()
            }
            AccountProfile::Student(_) => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match &self.profile {
            AccountProfile::Teacher(staff) | AccountProfile::Deanery(staff) => {
                staff.email.as_deref()
            }
            AccountProfile::Student(_) => None,
        }
    }

    /// "First Last", or "Без имени" when both are blank
    pub fn display_name(&self) -> String {
        let name = match self.last_name() {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        };
        let name = name.trim();
        if name.is_empty() {
            "Без имени".to_string()
        } else {
            name.to_string()
        }
    }

    /// Build from a wire record, using `fallback_role` when the payload omits the role.
    /// Role-scoped endpoints (inactive teachers, deanery) do not always send it.
    pub(crate) fn from_wire(
        wire: WireAccount,
        fallback_role: Option<Role>,
    ) -> Result<Self, String> {
        let role = wire
            .role
            .or(fallback_role)
            .ok_or_else(|| format!("account {} has no role", wire.id))?;

        let profile = match role {
            Role::Teacher => AccountProfile::Teacher(StaffProfile {
                last_name: wire.last_name,
                patronymic: wire.patronymic,
                email: wire.email,
            }),
            Role::Deanery => AccountProfile::Deanery(StaffProfile {
                last_name: wire.last_name,
                patronymic: wire.patronymic,
                email: wire.email,
            }),
            Role::Student => AccountProfile::Student(StudentProfile {
                last_name: wire.last_name,
            }),
        };

        Ok(Self {
            id: wire.id,
            first_name: wire.first_name,
            phone: wire.phone,
            telegram_id: wire.telegram_id,
            profile,
        })
    }
}

/// JSON shape exchanged with the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireAccount {
    pub id: AccountId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patronymic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub telegram_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl From<UserAccount> for WireAccount {
    fn from(account: UserAccount) -> Self {
        let role = account.role();
        let (last_name, patronymic, email) = match account.profile {
            AccountProfile::Teacher(staff) | AccountProfile::Deanery(staff) => {
                (staff.last_name, staff.patronymic, staff.email)
            }
            AccountProfile::Student(student) => (student.last_name, None, None),
        };
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name,
            patronymic,
            phone: account.phone,
            telegram_id: account.telegram_id,
            email,
            role: Some(role),
        }
    }
}

impl TryFrom<WireAccount> for UserAccount {
    type Error = String;

    fn try_from(wire: WireAccount) -> Result<Self, Self::Error> {
        UserAccount::from_wire(wire, None)
    }
}

// telegramId is a Long on the backend but some views send it as text
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "telegramId must be a string or number, got {}",
            other
        ))),
    }
}

// Absent names arrive as null
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Partial update sent with `PUT /api/admin/users/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}
