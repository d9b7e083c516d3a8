//! Session-authenticated fetching
//!
//! A form login runs once before the crawl; every page fetch afterwards reuses
//! the same client and therefore the same cookie jar.

use crate::config::{SessionAuthConfig, UserAgentConfig};
use crate::crawler::fetcher::{build_http_client, get_markup, FetchFailure, PageFetcher};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// How the one-time login handshake went
///
/// Informational only: the crawl proceeds the same way in every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The credential form was posted and answered with this status
    Submitted(u16),

    /// The login page could not be retrieved, so nothing was posted
    LoginPageUnavailable(String),

    /// The credential post itself failed in transport
    PostFailed(String),
}

/// Fetches pages through a logged-in, cookie-keeping client
#[derive(Debug, Clone)]
pub struct SessionFetcher {
    client: Client,
    login: LoginOutcome,
}

impl SessionFetcher {
    /// Builds the session client and performs the login handshake
    ///
    /// Only building the client can fail. Login problems are logged and the
    /// fetcher continues unauthenticated.
    pub async fn login(
        config: &SessionAuthConfig,
        user_agent: &UserAgentConfig,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, timeout, true)?;
        let login = perform_login(&client, config).await;

        match &login {
            LoginOutcome::Submitted(status) => {
                tracing::info!("Submitted login form to {} (HTTP {})", config.login_url, status)
            }
            LoginOutcome::LoginPageUnavailable(reason) => tracing::warn!(
                "Login page {} unavailable ({}), continuing without authentication",
                config.login_url,
                reason
            ),
            LoginOutcome::PostFailed(reason) => tracing::warn!(
                "Login post to {} failed ({}), continuing without authentication",
                config.login_url,
                reason
            ),
        }

        Ok(Self { client, login })
    }

    pub fn login_outcome(&self) -> &LoginOutcome {
        &self.login
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl PageFetcher for SessionFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchFailure> {
        get_markup(&self.client, url).await
    }
}

/// GETs the login page for its cookies, then posts the credentials to it
async fn perform_login(client: &Client, config: &SessionAuthConfig) -> LoginOutcome {
    match client.get(&config.login_url).send().await {
        Ok(response) if response.status().is_success() => {}
        Ok(response) => {
            return LoginOutcome::LoginPageUnavailable(format!("HTTP {}", response.status().as_u16()))
        }
        Err(e) => return LoginOutcome::LoginPageUnavailable(e.to_string()),
    }

    let form = login_form(config);
    match client.post(&config.login_url).form(&form).send().await {
        Ok(response) => LoginOutcome::Submitted(response.status().as_u16()),
        Err(e) => LoginOutcome::PostFailed(e.to_string()),
    }
}

/// Form fields posted on login: credentials first, then any extras
///
/// Extra fields cannot override the credential fields.
fn login_form(config: &SessionAuthConfig) -> BTreeMap<String, String> {
    let mut form: BTreeMap<String, String> = config
        .extra_fields
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    form.insert(config.username_field.clone(), config.username.clone());
    form.insert(
        config.password_field.clone(),
        config.password.clone().unwrap_or_default(),
    );
    form
}
