//! # Hyperwallet User Synchronization
//!
//! Upsert of the Hyperwallet user behind a seller, keyed by the presence of
//! a user token: absent means create (and write the minted token back to the
//! shop), present means update. Same retry and alerting discipline as the
//! bank-account strategy; an exhausted item yields an absent result.

use crate::clients::hyperwallet::{HyperwalletClient, HyperwalletUser};
use crate::clients::mirakl::{MiraklClient, UpdateShopsRequest};
use crate::constants::custom_fields;
use crate::notifications::{notify_failure, MailNotifier};
use crate::resilience::RetryPolicy;
use crate::sellers::model::SellerModel;
use std::sync::Arc;
use tracing::{error, info};

const USER_ALERT_SUBJECT: &str = "Issue detected creating or updating user in Hyperwallet";
const USER_TOKEN_ALERT_SUBJECT: &str = "Issue detected updating user token in Mirakl";

/// Keeps the Hyperwallet user in step with the seller's marketplace data.
pub struct UserSyncService {
    hyperwallet: Arc<dyn HyperwalletClient>,
    mirakl: Arc<dyn MiraklClient>,
    notifier: Arc<dyn MailNotifier>,
    retry: RetryPolicy,
}

impl UserSyncService {
    pub fn new(
        hyperwallet: Arc<dyn HyperwalletClient>,
        mirakl: Arc<dyn MiraklClient>,
        notifier: Arc<dyn MailNotifier>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            hyperwallet,
            mirakl,
            notifier,
            retry,
        }
    }

    /// Synchronize the user and return the seller carrying its user token.
    /// `None` means the upsert failed after retries; the caller skips the
    /// item and the batch continues.
    pub async fn synchronize(&self, seller: &SellerModel) -> Option<SellerModel> {
        let payload = HyperwalletUser {
            token: seller.user_token.clone(),
            client_user_id: seller.client_user_id.clone(),
            profile_type: seller.profile_type,
            email: seller.email.clone(),
            business_name: Some(seller.name.clone()),
            program_token: None,
        };

        let is_create = seller.user_token.is_none();
        let operation = if is_create { "create user" } else { "update user" };
        let program = seller.program.as_str();
        let payload_ref = &payload;
        let outcome = self
            .retry
            .run(operation, || self.call_user(is_create, program, payload_ref))
            .await;

        match outcome {
            Ok(user) => {
                let Some(user_token) = user.token.as_deref() else {
                    error!(
                        shop_id = %seller.client_user_id,
                        "Hyperwallet returned a user without a token"
                    );
                    return None;
                };
                info!(
                    shop_id = %seller.client_user_id,
                    user_token,
                    "User synchronized in Hyperwallet"
                );
                if is_create {
                    self.write_back_user_token(seller, user_token).await;
                }
                Some(seller.with_user_token(user_token))
            }
            Err(user_error) => {
                error!(
                    shop_id = %seller.client_user_id,
                    %user_error,
                    "User synchronization failed after retries"
                );
                let detail = format!(
                    "Something went wrong processing the user of shop [{}]\n{user_error}",
                    seller.client_user_id
                );
                notify_failure(self.notifier.as_ref(), USER_ALERT_SUBJECT, &detail).await;
                None
            }
        }
    }

    async fn call_user(
        &self,
        is_create: bool,
        program: &str,
        payload: &HyperwalletUser,
    ) -> crate::error::Result<HyperwalletUser> {
        if is_create {
            self.hyperwallet.create_user(program, payload).await
        } else {
            self.hyperwallet.update_user(program, payload).await
        }
    }

    async fn write_back_user_token(&self, seller: &SellerModel, user_token: &str) {
        let request = UpdateShopsRequest::single_field(
            seller.client_user_id.clone(),
            custom_fields::HYPERWALLET_USER_TOKEN,
            user_token,
        );
        if let Err(update_error) = self.mirakl.update_shops(&request).await {
            error!(
                shop_id = %seller.client_user_id,
                %update_error,
                "Something went wrong updating user token of shop"
            );
            let detail = format!(
                "Something went wrong updating user token of shop [{}]\n{update_error}",
                seller.client_user_id
            );
            notify_failure(self.notifier.as_ref(), USER_TOKEN_ALERT_SUBJECT, &detail).await;
        }
    }
}
