use std::fmt;

use serde::Deserialize;

/// Column headers, in the order both renderers emit fields.
pub const COLUMNS: [&str; 9] = [
    "ID",
    "Email",
    "Nickname",
    "FirstName",
    "LastName",
    "Role",
    "PhoneNumber",
    "Department",
    "Title",
];

/// A single entry of the Pachca user directory.
///
/// Optional fields are absent when the API omits them or sends `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    /// Numeric account identifier.
    pub id: i64,
    /// Primary email address.
    pub email: String,
    /// Handle shown in mentions.
    pub nickname: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Workspace role, e.g. `admin` or `member`.
    pub role: String,
    /// Phone number, if the user filled it in.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Department, if set.
    #[serde(default)]
    pub department: Option<String>,
    /// Job title, if set.
    #[serde(default)]
    pub title: Option<String>,
}

impl UserRecord {
    /// Returns the record's fields in [`COLUMNS`] order.
    ///
    /// Absent optional fields become empty text.
    #[must_use]
    pub fn cells(&self) -> [Cell<'_>; 9] {
        [
            Cell::Integer(self.id),
            Cell::Text(&self.email),
            Cell::Text(&self.nickname),
            Cell::Text(&self.first_name),
            Cell::Text(&self.last_name),
            Cell::Text(&self.role),
            Cell::Text(self.phone_number.as_deref().unwrap_or_default()),
            Cell::Text(self.department.as_deref().unwrap_or_default()),
            Cell::Text(self.title.as_deref().unwrap_or_default()),
        ]
    }
}

/// A rendered field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// A whole number, written as a numeric cell in spreadsheets.
    Integer(i64),
    /// Plain text.
    Text(&'a str),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// The envelope returned by the directory endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryResponse {
    /// Users in the order the API returned them.
    pub data: Vec<UserRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"id":1,"email":"a@b.com","nickname":"a","first_name":"A","last_name":"B","role":"member"}"#;

    #[test]
    fn missing_optional_fields_are_absent() {
        let user: UserRecord = serde_json::from_str(MINIMAL).unwrap();

        assert_eq!(user.phone_number, None);
        assert_eq!(user.department, None);
        assert_eq!(user.title, None);
    }

    #[test]
    fn null_optional_fields_are_absent() {
        let json = r#"{"id":1,"email":"a@b.com","nickname":"a","first_name":"A","last_name":"B","role":"member","phone_number":null,"department":null,"title":null}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(user.phone_number, None);
        assert_eq!(user.title, None);
    }

    #[test]
    fn cells_follow_column_order_with_empty_text_for_absent_fields() {
        let user: UserRecord = serde_json::from_str(MINIMAL).unwrap();

        let rendered: Vec<String> = user.cells().iter().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            ["1", "a@b.com", "a", "A", "B", "member", "", "", ""]
        );
    }

    #[test]
    fn present_optional_fields_are_rendered() {
        let user = UserRecord {
            id: 7,
            email: "ivan@example.com".to_string(),
            nickname: "ivan".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrov".to_string(),
            role: "admin".to_string(),
            phone_number: Some("+7 900 000-00-00".to_string()),
            department: Some("Sales".to_string()),
            title: Some("Lead".to_string()),
        };

        let cells = user.cells();

        assert_eq!(cells[0], Cell::Integer(7));
        assert_eq!(cells[6], Cell::Text("+7 900 000-00-00"));
        assert_eq!(cells[7], Cell::Text("Sales"));
        assert_eq!(cells[8], Cell::Text("Lead"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"{"data":[{"id":2,"email":"x@y.z","nickname":"x","first_name":"X","last_name":"Y","role":"member","bot":false,"list_tags":[]}]}"#;
        let response: DirectoryResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].id, 2);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let json = r#"{"id":1,"email":"a@b.com"}"#;

        assert!(serde_json::from_str::<UserRecord>(json).is_err());
    }
}
