//! Verification document upload to Hyperwallet.

use crate::clients::hyperwallet::HyperwalletClient;
use crate::clients::mirakl::{MiraklClient, UpdateShopsRequest};
use crate::constants::custom_fields;
use crate::kyc::model::KycDocumentInfo;
use crate::notifications::{notify_failure, MailNotifier};
use crate::resilience::RetryPolicy;
use std::sync::Arc;
use tracing::{error, info, warn};

const UPLOAD_ALERT_SUBJECT: &str = "Issue detected uploading KYC documents to Hyperwallet";
const FLAG_RESET_ALERT_SUBJECT: &str = "Issue detected resetting KYC flag in Mirakl";

/// Pushes a seller's verification documents and resets the marketplace
/// KYC-required flag once they land.
pub struct KycDocumentUploadService {
    hyperwallet: Arc<dyn HyperwalletClient>,
    mirakl: Arc<dyn MiraklClient>,
    notifier: Arc<dyn MailNotifier>,
    retry: RetryPolicy,
}

impl KycDocumentUploadService {
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

    /// Upload the documents of one seller. Returns `true` when the upload
    /// landed; exhausted retries alert and return `false` so the batch
    /// continues with the next seller.
    pub async fn upload(&self, document: &KycDocumentInfo) -> bool {
        let Some(user_token) = document.user_token.as_deref() else {
            warn!(
                shop_id = %document.shop_id,
                "Skipping KYC upload for shop without a Hyperwallet user"
            );
            return false;
        };
        if document.documents.is_empty() {
            warn!(
                shop_id = %document.shop_id,
                "Shop requires KYC proof but has no document selections"
            );
            return false;
        }

        let documents = document.documents.as_slice();
        let outcome = self
            .retry
            .run("upload KYC documents", || {
                self.hyperwallet.upload_documents(user_token, documents)
            })
            .await;

        match outcome {
            Ok(()) => {
                info!(
                    shop_id = %document.shop_id,
                    count = documents.len(),
                    "KYC documents uploaded to Hyperwallet"
                );
                self.reset_kyc_flag(&document.shop_id).await;
                true
            }
            Err(upload_error) => {
                error!(
                    shop_id = %document.shop_id,
                    %upload_error,
                    "KYC document upload failed after retries"
                );
                let detail = format!(
                    "Something went wrong uploading KYC documents of shop [{}]\n{upload_error}",
                    document.shop_id
                );
                notify_failure(self.notifier.as_ref(), UPLOAD_ALERT_SUBJECT, &detail).await;
                false
            }
        }
    }

    /// Flip the KYC-required flag back on the shop. A failure here leaves
    /// the flag set, which makes the next run re-upload; alert and move on.
    async fn reset_kyc_flag(&self, shop_id: &str) {
        let request = UpdateShopsRequest::single_field(
            shop_id,
            custom_fields::HYPERWALLET_KYC_REQUIRED_PROOF,
            "false",
        );
        if let Err(update_error) = self.mirakl.update_shops(&request).await {
            error!(
                shop_id,
                %update_error,
                "Something went wrong resetting KYC flag of shop"
            );
            let detail = format!(
                "Something went wrong resetting KYC flag of shop [{shop_id}]\n{update_error}"
            );
            notify_failure(self.notifier.as_ref(), FLAG_RESET_ALERT_SUBJECT, &detail).await;
        }
    }
}
