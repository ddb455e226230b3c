//! # Bank-Account Strategy Executor
//!
//! Decides and executes the Hyperwallet bank-account operation for a seller.
//! The decision is a tagged variant computed once from the record: create
//! when no transfer-method token exists yet, update when one does, and an
//! explicit guarded skip when the seller has no bank-account details at all.
//! The strategy set is therefore exhaustive by construction and an
//! unanticipated input state is logged rather than silently mis-routed.
//!
//! Execution wraps the Hyperwallet call in the configured retry policy. On
//! success the minted token is written back to the Mirakl shop; a write-back
//! failure is alerted and swallowed. On exhausted retries the item is alerted
//! and reported as an absent result, a recoverable per-item failure rather
//! than a pipeline-fatal error.

use crate::clients::hyperwallet::{HyperwalletBankAccount, HyperwalletClient};
use crate::clients::mirakl::{MiraklClient, UpdateShopsRequest};
use crate::constants::custom_fields;
use crate::error::Result;
use crate::notifications::{notify_failure, MailNotifier};
use crate::resilience::RetryPolicy;
use crate::sellers::currency::CurrencyPriorityConfig;
use crate::sellers::model::SellerModel;
use std::sync::Arc;
use tracing::{error, info, warn};

const HYPERWALLET_ALERT_SUBJECT: &str = "Issue detected in Hyperwallet";
const MIRAKL_TOKEN_ALERT_SUBJECT: &str = "Issue detected updating bank token in Mirakl";
const ERROR_MESSAGE_PREFIX: &str =
    "There was an error, please check the logs for further information:\n";

/// Mutually exclusive, collectively exhaustive bank-account operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankAccountAction {
    /// No transfer-method token yet: create the bank account.
    Create,
    /// A token exists: update the bank account behind it.
    Update,
    /// The seller carries no bank-account details at all.
    Skip,
}

/// Compute the applicable action for a seller. Total over every input.
pub fn decide_bank_account_action(seller: &SellerModel) -> BankAccountAction {
    match &seller.bank_account {
        None => BankAccountAction::Skip,
        Some(details) if details.token.is_none() => BankAccountAction::Create,
        Some(_) => BankAccountAction::Update,
    }
}

/// Executes the decided bank-account operation with retry, alerting and
/// Mirakl token write-back.
pub struct BankAccountStrategyExecutor {
    hyperwallet: Arc<dyn HyperwalletClient>,
    mirakl: Arc<dyn MiraklClient>,
    notifier: Arc<dyn MailNotifier>,
    retry: RetryPolicy,
    currency: CurrencyPriorityConfig,
}

impl BankAccountStrategyExecutor {
    pub fn new(
        hyperwallet: Arc<dyn HyperwalletClient>,
        mirakl: Arc<dyn MiraklClient>,
        notifier: Arc<dyn MailNotifier>,
        retry: RetryPolicy,
        currency: CurrencyPriorityConfig,
    ) -> Self {
        Self {
            hyperwallet,
            mirakl,
            notifier,
            retry,
            currency,
        }
    }

    /// Run the applicable strategy for `seller`. `None` means the item was
    /// skipped or failed after retries; callers treat it as a recoverable
    /// per-item condition.
    pub async fn execute(&self, seller: &SellerModel) -> Option<HyperwalletBankAccount> {
        let action = decide_bank_account_action(seller);
        if action == BankAccountAction::Skip {
            warn!(
                shop_id = %seller.client_user_id,
                "Seller has no bank account details, skipping bank account synchronization"
            );
            return None;
        }

        let Some(payload) = self.to_bank_account(seller) else {
            warn!(
                shop_id = %seller.client_user_id,
                "Seller has no Hyperwallet user token yet, skipping bank account synchronization"
            );
            return None;
        };

        let operation = match action {
            BankAccountAction::Create => "create bank account",
            BankAccountAction::Update => "update bank account",
            BankAccountAction::Skip => unreachable!("skip handled above"),
        };

        let payload_ref = &payload;
        let outcome = self
            .retry
            .run(operation, || self.call_hyperwallet(action, seller, payload_ref))
            .await;

        match outcome {
            Ok(account) => {
                info!(
                    shop_id = %seller.client_user_id,
                    token = account.token.as_deref().unwrap_or_default(),
                    "Bank account synchronized in Hyperwallet"
                );
                if action == BankAccountAction::Create {
                    self.write_back_token(seller, &account).await;
                }
                Some(account)
            }
            Err(hyperwallet_error) => {
                error!(
                    shop_id = %seller.client_user_id,
                    %hyperwallet_error,
                    "Bank account synchronization failed after retries"
                );
                let detail = format!(
                    "{ERROR_MESSAGE_PREFIX}Something went wrong processing the bank account of shop [{}]\n{hyperwallet_error}",
                    seller.client_user_id
                );
                notify_failure(self.notifier.as_ref(), HYPERWALLET_ALERT_SUBJECT, &detail)
                    .await;
                None
            }
        }
    }

    async fn call_hyperwallet(
        &self,
        action: BankAccountAction,
        seller: &SellerModel,
        payload: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount> {
        match action {
            BankAccountAction::Create => {
                self.hyperwallet
                    .create_bank_account(&seller.program, payload)
                    .await
            }
            BankAccountAction::Update => {
                self.hyperwallet
                    .update_bank_account(&seller.program, payload)
                    .await
            }
            BankAccountAction::Skip => unreachable!("skip never reaches the API"),
        }
    }

    /// Build the transfer-method payload. Requires the seller's user token;
    /// user synchronization runs before this strategy in the sellers job.
    fn to_bank_account(&self, seller: &SellerModel) -> Option<HyperwalletBankAccount> {
        let details = seller.bank_account.as_ref()?;
        let user_token = seller.user_token.clone()?;
        let candidates = vec![seller.currency.clone()];
        let transfer_method_currency = self
            .currency
            .resolve(&details.country, &candidates)
            .unwrap_or_else(|| seller.currency.clone());

        Some(HyperwalletBankAccount {
            token: details.token.clone(),
            user_token,
            transfer_method_country: details.country.clone(),
            transfer_method_currency,
            bank_account_id: details.account_number.clone(),
            branch_id: details.branch_code.clone(),
            bank_account_purpose: "CHECKING".to_string(),
        })
    }

    /// Write the minted token back into the shop's custom field. Failures
    /// here are alerted and swallowed; the bank account already exists in
    /// Hyperwallet.
    async fn write_back_token(&self, seller: &SellerModel, account: &HyperwalletBankAccount) {
        let Some(token) = account.token.as_deref() else {
            return;
        };

        info!(shop_id = %seller.client_user_id, "Updating bank account token for shop");
        let request = UpdateShopsRequest::single_field(
            seller.client_user_id.clone(),
            custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN,
            token,
        );
        match self.mirakl.update_shops(&request).await {
            Ok(()) => {
                info!(shop_id = %seller.client_user_id, "Bank account token updated for shop");
            }
            Err(update_error) => {
                error!(
                    shop_id = %seller.client_user_id,
                    %update_error,
                    "Something went wrong updating information of shop"
                );
                let detail = format!(
                    "{ERROR_MESSAGE_PREFIX}Something went wrong updating bank token of shop [{}]\n{update_error}",
                    seller.client_user_id
                );
                notify_failure(self.notifier.as_ref(), MIRAKL_TOKEN_ALERT_SUBJECT, &detail)
                    .await;
            }
        }
    }
}
