use crate::settings::{ClientSettings, ConfigError};

/// Shared client for all three collaborators. Redirects are limited and every
/// request carries the configured timeouts.
pub(crate) fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout())
        .timeout(settings.request_timeout())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|err| ConfigError::HttpClient(err.to_string()))
}
