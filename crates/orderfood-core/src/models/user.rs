use serde::{Deserialize, Serialize};

/// The user as issued by the backend. Never edited locally, only replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Body for `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful response from either auth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{"token":"t1","user":{"id":"u1","email":"a@b.com","createdAt":"2024-01-01"}}"#;
        let resp: AuthResponse = serde_json::from_str(json).expect("valid auth json");
        assert_eq!(resp.token, "t1");
        assert_eq!(resp.user.id, "u1");
        assert_eq!(resp.user.email, "a@b.com");
    }

    #[test]
    fn test_credentials_body() {
        let body = serde_json::to_value(Credentials { email: "a@b.com", password: "pw" })
            .expect("serializable");
        assert_eq!(body, serde_json::json!({"email": "a@b.com", "password": "pw"}));
    }
}
