//! # Shared Credentials
//!
//! Resolves the AWS shared-credentials document stored in a ProviderConfig
//! secret through the SDK's own profile loader:
//!
//! ```ini
//! [default]
//! aws_access_key_id = AKIA...
//! aws_secret_access_key = ...
//! aws_session_token = ...
//! ```
//!
//! The raw document is wiped from memory once the profile is loaded.

use anyhow::{Context, Result};
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use zeroize::Zeroizing;

/// Load static credentials for `profile` from a shared-credentials document
pub async fn load_profile_credentials(document: &[u8], profile: &str) -> Result<Credentials> {
    let text = Zeroizing::new(
        String::from_utf8(document.to_vec()).context("Credentials document is not UTF-8")?,
    );

    let files = EnvConfigFiles::builder()
        .with_contents(EnvConfigFileKind::Credentials, text.as_str())
        .build();
    let provider = ProfileFileCredentialsProvider::builder()
        .profile_files(files)
        .profile_name(profile)
        .build();

    provider
        .provide_credentials()
        .await
        .with_context(|| format!("Failed to load profile [{profile}] from credentials document"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "
# comment
[other]
aws_access_key_id = OTHER
aws_secret_access_key = other-secret

[default]
aws_access_key_id = AKIAEXAMPLE
aws_secret_access_key = secret/key=
aws_session_token = token
";

    #[tokio::test]
    async fn test_load_default_profile() {
        let creds = load_profile_credentials(DOCUMENT.as_bytes(), "default")
            .await
            .unwrap();
        assert_eq!(creds.access_key_id(), "AKIAEXAMPLE");
        assert_eq!(creds.secret_access_key(), "secret/key=");
        assert_eq!(creds.session_token(), Some("token"));
    }

    #[tokio::test]
    async fn test_load_named_profile_without_token() {
        let creds = load_profile_credentials(DOCUMENT.as_bytes(), "other")
            .await
            .unwrap();
        assert_eq!(creds.access_key_id(), "OTHER");
        assert!(creds.session_token().is_none());
    }

    #[tokio::test]
    async fn test_missing_profile_is_an_error() {
        let err = load_profile_credentials(DOCUMENT.as_bytes(), "prod")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("[prod]"));
    }

    #[tokio::test]
    async fn test_non_utf8_document_is_an_error() {
        assert!(load_profile_credentials(&[0xff, 0xfe], "default").await.is_err());
    }

    #[tokio::test]
    async fn test_debug_hides_secret() {
        let creds = load_profile_credentials(DOCUMENT.as_bytes(), "default")
            .await
            .unwrap();
        assert!(!format!("{creds:?}").contains("secret/key="));
    }
}
