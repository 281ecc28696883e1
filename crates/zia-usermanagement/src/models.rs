//! User management models.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use zia_core::ids::{DepartmentId, GroupId, UserId};
use zia_core::QueryParams;

/// A department, as synchronised from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Department ID.
    pub id: DepartmentId,
    /// Department name.
    pub name: String,
    /// Identity provider ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_id: Option<i64>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Deleted in the identity provider but still referenced.
    #[serde(default)]
    pub deleted: bool,
}

/// A user group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group ID.
    pub id: GroupId,
    /// Group name.
    pub name: String,
    /// Identity provider ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_id: Option<i64>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Built-in group.
    #[serde(default)]
    pub is_system_defined: bool,
}

/// A user account.
///
/// `password` is only ever sent, never returned by the upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (zero before creation).
    #[serde(default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Groups the user belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Department.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    /// Comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Email used for temporary authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_auth_email: Option<String>,
    /// Initial password (create only).
    #[serde(
        default,
        skip_deserializing,
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_password"
    )]
    pub password: Option<SecretString>,
    /// Whether the user is also an admin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_user: Option<bool>,
    /// User type (e.g. `SUPERADMIN`, `ADMIN`).
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub user_type: Option<String>,
    /// Deleted in the identity provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

fn expose_password<S>(password: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match password {
        Some(secret) => serializer.serialize_some(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl User {
    /// A new user with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, department: Department) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            groups: Vec::new(),
            department: Some(department),
            comments: None,
            temp_auth_email: None,
            password: None,
            admin_user: None,
            user_type: None,
            deleted: None,
        }
    }

    /// Set the initial password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Typed ID of this user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        UserId::new(self.id)
    }
}

/// A `search` filter, used by department and group listings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NameSearchParams {
    /// Substring match on the name.
    pub search: Option<String>,
}

impl NameSearchParams {
    /// Search for `term`.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("search", self.search.as_deref());
        params
    }
}

/// Query parameters for listing users.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserListParams {
    /// Substring match on name or email.
    pub search: Option<String>,
    /// Department names; repeated as `dept=...`.
    pub dept: Vec<String>,
    /// Group names; repeated as `group=...`.
    pub group: Vec<String>,
}

impl UserListParams {
    /// Convert to query parameters.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("search", self.search.as_deref());
        params.push_all("dept", &self.dept);
        params.push_all("group", &self.group);
        params
    }
}
