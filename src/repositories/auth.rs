use crate::models::members::AuthUser;
use reqwest::StatusCode;

/// Client for the hosted auth service that owns user sessions.
#[derive(Clone)]
pub struct AuthApi {
    api_key: String,
    url: String,
    client: reqwest::Client,
}

impl AuthApi {
    pub fn new(api_key: String, url: String) -> Self {
        Self {
            api_key,
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Resolves an access token to its user. `None` means the token is not
    /// (or no longer) valid.
    pub async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, anyhow::Error> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let user: AuthUser = response.json().await?;
                Ok(Some(user))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => anyhow::bail!("Auth service: unexpected status {}.", status),
        }
    }
}
