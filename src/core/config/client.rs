use reqwest::header::HeaderValue;
use std::error::Error as StdError;
use std::fmt;

use crate::core::config::data::Config;
use crate::core::credentials::{Credential, API_KEY_ENV};
use crate::core::retry::RetryPolicy;
use crate::utils::url::is_http_url;

/// Why a usable client configuration could not be assembled at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientConfigError {
    MissingCredential,
    InvalidCredential,
    InvalidHeader { name: &'static str, value: String },
    InvalidBaseUrl(String),
}

impl fmt::Display for ClientConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientConfigError::MissingCredential => write!(
                f,
                "No API key configured. Set {API_KEY_ENV} or run `chatroute auth`."
            ),
            ClientConfigError::InvalidCredential => {
                write!(f, "The configured API key contains characters not allowed in an HTTP header")
            }
            ClientConfigError::InvalidHeader { name, value } => {
                write!(f, "Invalid value for {name}: {value:?}")
            }
            ClientConfigError::InvalidBaseUrl(url) => {
                write!(f, "Base URL must start with http:// or https://, got {url:?}")
            }
        }
    }
}

impl StdError for ClientConfigError {}

/// Everything the completion client needs, validated once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub site_url: String,
    pub site_name: String,
    pub retry: RetryPolicy,
    credential: Credential,
}

impl ClientConfig {
    pub fn resolve(
        config: &Config,
        credential: Option<Credential>,
    ) -> Result<Self, ClientConfigError> {
        let credential = credential
            .filter(|c| !c.secret().trim().is_empty())
            .ok_or(ClientConfigError::MissingCredential)?;
        HeaderValue::from_str(&format!("Bearer {}", credential.secret()))
            .map_err(|_| ClientConfigError::InvalidCredential)?;

        let base_url = config.base_url().trim().to_string();
        if !is_http_url(&base_url) {
            return Err(ClientConfigError::InvalidBaseUrl(base_url));
        }

        let site_url = validate_header("HTTP-Referer", config.site_url())?;
        let site_name = validate_header("X-Title", config.site_name())?;

        Ok(Self {
            base_url,
            site_url,
            site_name,
            retry: config.retry_policy(),
            credential,
        })
    }

    pub fn api_key(&self) -> &str {
        self.credential.secret()
    }
}

fn validate_header(name: &'static str, value: &str) -> Result<String, ClientConfigError> {
    HeaderValue::from_str(value)
        .map(|_| value.to_string())
        .map_err(|_| ClientConfigError::InvalidHeader {
            name,
            value: value.to_string(),
        })
}
