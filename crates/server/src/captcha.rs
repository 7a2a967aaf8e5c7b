//! Registration challenge check against the provider's verify endpoint.

use serde::Deserialize;

use crate::ServerError;

const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const CAPTCHA_FAILED: &str = "Captcha failed, try again.";

#[derive(Clone, Debug, Deserialize)]
pub struct CaptchaConfig {
    pub secret: String,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

fn default_verify_url() -> String {
    DEFAULT_VERIFY_URL.to_string()
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct CaptchaVerifier {
    config: CaptchaConfig,
    http: reqwest::Client,
}

impl CaptchaVerifier {
    pub(crate) fn new(config: CaptchaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub(crate) async fn verify(&self, token: Option<&str>) -> Result<(), ServerError> {
        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Err(ServerError::Generic(CAPTCHA_FAILED.to_string()));
        };

        let res = self
            .http
            .post(&self.config.verify_url)
            .form(&[("secret", self.config.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|err| ServerError::Internal(format!("captcha verification failed: {err}")))?;

        let body = res
            .json::<VerifyResponse>()
            .await
            .map_err(|err| ServerError::Internal(format!("invalid captcha response: {err}")))?;

        if !body.success {
            tracing::debug!("captcha rejected");
            return Err(ServerError::Generic(CAPTCHA_FAILED.to_string()));
        }
        Ok(())
    }
}
