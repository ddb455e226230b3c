//! # Hyperwallet REST API Client
//!
//! Trait seam and reqwest-backed implementation for the Hyperwallet v4 REST
//! API. Operations are keyed by a program name resolved from the shop
//! mapping; the client translates it to the issuing program token from
//! configuration and fails with a configuration error for unknown programs.

use crate::config::HyperwalletConfig;
use crate::error::{ConnectorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hyperwallet user profile flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserProfileType {
    Individual,
    Business,
}

/// Bank account (transfer method) payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperwalletBankAccount {
    /// Transfer-method token. Absent until Hyperwallet mints one on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user_token: String,
    pub transfer_method_country: String,
    pub transfer_method_currency: String,
    pub bank_account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    pub bank_account_purpose: String,
}

/// User payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperwalletUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// The Mirakl shop id, used as the client-side correlation key.
    pub client_user_id: String,
    pub profile_type: UserProfileType,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_token: Option<String>,
}

/// KYC verification document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDocument {
    /// `IDENTIFICATION` or `BUSINESS`.
    pub category: String,
    pub document_type: String,
    pub file_name: String,
}

/// Seam for the Hyperwallet REST API.
#[async_trait]
pub trait HyperwalletClient: Send + Sync {
    async fn create_bank_account(
        &self,
        program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount>;

    async fn update_bank_account(
        &self,
        program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount>;

    async fn create_user(&self, program: &str, user: &HyperwalletUser)
        -> Result<HyperwalletUser>;

    async fn update_user(&self, program: &str, user: &HyperwalletUser)
        -> Result<HyperwalletUser>;

    async fn upload_documents(
        &self,
        user_token: &str,
        documents: &[VerificationDocument],
    ) -> Result<()>;
}

/// Production client for the Hyperwallet v4 REST API.
pub struct HyperwalletApiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    programs: HashMap<String, String>,
}

impl HyperwalletApiClient {
    pub fn new(config: &HyperwalletConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            programs: config.programs.clone(),
        }
    }

    fn program_token(&self, program: &str) -> Result<&str> {
        self.programs
            .get(program)
            .map(String::as_str)
            .ok_or_else(|| {
                ConnectorError::Configuration(format!(
                    "No issuing token configured for Hyperwallet program [{program}]"
                ))
            })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ConnectorError::HyperwalletApi {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn post_json<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<R>().await?)
    }

    async fn put_json<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R> {
        let response = self
            .http
            .put(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl HyperwalletClient for HyperwalletApiClient {
    async fn create_bank_account(
        &self,
        program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount> {
        // Program selects the issuing credentials; the transfer method itself
        // hangs off the user resource.
        self.program_token(program)?;
        let path = format!("/rest/v4/users/{}/bank-accounts", account.user_token);
        self.post_json(&path, account).await
    }

    async fn update_bank_account(
        &self,
        program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount> {
        self.program_token(program)?;
        let token = account.token.as_deref().ok_or_else(|| {
            ConnectorError::Configuration(
                "Bank account token is required for an update".to_string(),
            )
        })?;
        let path = format!(
            "/rest/v4/users/{}/bank-accounts/{token}",
            account.user_token
        );
        self.put_json(&path, account).await
    }

    async fn create_user(
        &self,
        program: &str,
        user: &HyperwalletUser,
    ) -> Result<HyperwalletUser> {
        let mut payload = user.clone();
        payload.program_token = Some(self.program_token(program)?.to_string());
        self.post_json("/rest/v4/users", &payload).await
    }

    async fn update_user(
        &self,
        program: &str,
        user: &HyperwalletUser,
    ) -> Result<HyperwalletUser> {
        self.program_token(program)?;
        let token = user.token.as_deref().ok_or_else(|| {
            ConnectorError::Configuration("User token is required for an update".to_string())
        })?;
        let path = format!("/rest/v4/users/{token}");
        self.put_json(&path, user).await
    }

    async fn upload_documents(
        &self,
        user_token: &str,
        documents: &[VerificationDocument],
    ) -> Result<()> {
        let path = format!("/rest/v4/users/{user_token}/documents");
        let payload = serde_json::json!({ "documents": documents });
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_programs(programs: &[(&str, &str)]) -> HyperwalletApiClient {
        let config = HyperwalletConfig {
            base_url: "https://api.sandbox.hyperwallet.com".to_string(),
            username: "restapiuser".to_string(),
            password: "secret".to_string(),
            programs: programs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        HyperwalletApiClient::new(&config)
    }

    #[test]
    fn program_token_resolves_configured_programs() {
        let client = client_with_programs(&[("DEFAULT", "prg-abc")]);

        assert_eq!(client.program_token("DEFAULT").unwrap(), "prg-abc");
    }

    #[test]
    fn unknown_program_is_a_configuration_error() {
        let client = client_with_programs(&[]);

        assert!(matches!(
            client.program_token("UNKNOWN"),
            Err(ConnectorError::Configuration(_))
        ));
    }
}
