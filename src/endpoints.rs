//! Typed wrappers over the marketplace endpoints the UI calls.

use crate::{
    AgriClient, ApiRequest, ApiResponse, Farmer, LoginRequest, LoginResponse, ProfileUpdate,
    RegionalStatistics, UserProfile,
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const PROFILE_PATH: &str = "/api/users/profile";
pub const FARMERS_PATH: &str = "/api/farmers";
pub const REGIONAL_STATISTICS_PATH: &str = "/api/statistics/regional";

impl AgriClient {
    /// Logs in and stores the returned token for subsequent calls.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResponse<LoginResponse> {
        let response: ApiResponse<LoginResponse> = self
            .send(&ApiRequest::post(LOGIN_PATH).json(credentials))
            .await;
        if let Some(token) = response.data().and_then(LoginResponse::bearer_token) {
            self.token_store().set(token.to_owned());
        }
        response
    }

    /// Forgets the cached token. Local only, no request is made.
    pub fn logout(&self) {
        self.token_store().clear();
    }

    pub async fn profile(&self) -> ApiResponse<UserProfile> {
        self.send(&ApiRequest::get(PROFILE_PATH)).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResponse<UserProfile> {
        self.send(&ApiRequest::put(PROFILE_PATH).json(update)).await
    }

    pub async fn farmers(&self) -> ApiResponse<Vec<Farmer>> {
        self.send(&ApiRequest::get(FARMERS_PATH)).await
    }

    pub async fn regional_statistics(&self, region: &str) -> ApiResponse<RegionalStatistics> {
        self.send(&ApiRequest::get(REGIONAL_STATISTICS_PATH).segment(region))
            .await
    }
}
