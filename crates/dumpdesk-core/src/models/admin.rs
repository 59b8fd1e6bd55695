use serde::{Deserialize, Serialize};

/// A console administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub cpf: String,
    #[serde(rename = "profilePictureUrl")]
    pub profile_picture_url: Option<String>,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Admin {
    pub fn status_display(&self) -> &'static str {
        if self.is_active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

/// Admin as the backend returns it: the email lives on the nested
/// identity user.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminResponse {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(rename = "profilePictureUrl", default)]
    pub profile_picture_url: Option<String>,
    #[serde(rename = "isActive", default)]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "applicationUser", default)]
    pub application_user: Option<ApplicationUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationUser {
    pub email: Option<String>,
}

impl AdminResponse {
    pub fn to_admin(&self) -> Admin {
        Admin {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self
                .application_user
                .as_ref()
                .and_then(|u| u.email.clone())
                .unwrap_or_default(),
            cpf: self.cpf.clone(),
            profile_picture_url: self.profile_picture_url.clone(),
            is_active: self.is_active,
            created_at: self.created_at.clone(),
        }
    }
}

/// Partial admin update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAdminPayload {
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "isActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_response_flattens_email() {
        let json = r#"{
            "id": "a1",
            "fullName": "Maria Souza",
            "cpf": "12345678909",
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00Z",
            "applicationUser": {"email": "maria@example.com"}
        }"#;
        let resp: AdminResponse = serde_json::from_str(json).expect("parse");
        let admin = resp.to_admin();
        assert_eq!(admin.email, "maria@example.com");
        assert_eq!(admin.full_name, "Maria Souza");
        assert_eq!(admin.status_display(), "Active");
    }

    #[test]
    fn test_admin_response_without_user_has_empty_email() {
        let json = r#"{"id": "a2", "fullName": "Sem Email"}"#;
        let resp: AdminResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(resp.to_admin().email, "");
    }

    #[test]
    fn test_update_payload_skips_unset() {
        let payload = UpdateAdminPayload {
            is_active: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&payload).expect("serialize");
        assert_eq!(json, r#"{"isActive":false}"#);
    }
}
