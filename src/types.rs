use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl LoginResponse {
    /// The issued bearer token, `token` taking precedence over `access_token`.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .or(self.access_token.as_deref())
            .filter(|token| !token.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Partial profile update; absent fields are left unchanged by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Farmer {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub crops: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub farm_size: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CropStatistic {
    pub crop: String,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RegionalStatistics {
    pub region: String,
    #[serde(default)]
    pub farmer_count: Option<u64>,
    #[serde(default)]
    pub crops: Vec<CropStatistic>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::LoginResponse;

    #[test]
    fn login_response_accepts_either_token_field() {
        let both: LoginResponse =
            serde_json::from_value(json!({"token": "t1", "access_token": "t2"}))
                .expect("both token fields must decode");
        assert_eq!(both.bearer_token(), Some("t1"));

        let access: LoginResponse = serde_json::from_value(json!({"access_token": "t2"}))
            .expect("access_token alone must decode");
        assert_eq!(access.bearer_token(), Some("t2"));

        let none: LoginResponse =
            serde_json::from_value(json!({"user": null})).expect("tokenless body must decode");
        assert_eq!(none.bearer_token(), None);
    }
}
