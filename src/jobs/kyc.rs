//! KYC document synchronization job.

use crate::error::Result;
use crate::jobs::JobContext;
use crate::kyc::extract::KycDocumentsExtractor;
use crate::kyc::upload::KycDocumentUploadService;
use chrono::{DateTime, Utc};
use tracing::info;

/// Outcome counts of one KYC run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KycSyncSummary {
    pub sellers_flagged: usize,
    pub uploaded: usize,
    pub failures: usize,
}

/// Pushes outstanding verification documents to Hyperwallet.
pub struct KycSyncJob {
    extractor: KycDocumentsExtractor,
    upload: KycDocumentUploadService,
}

impl KycSyncJob {
    pub fn new(extractor: KycDocumentsExtractor, upload: KycDocumentUploadService) -> Self {
        Self { extractor, upload }
    }

    pub async fn run(
        &self,
        context: JobContext,
        delta: Option<DateTime<Utc>>,
    ) -> Result<KycSyncSummary> {
        info!(run_id = %context.run_id, ?delta, "Starting KYC document synchronization");

        let documents = self.extractor.extract(delta).await?;
        let mut summary = KycSyncSummary {
            sellers_flagged: documents.len(),
            ..Default::default()
        };

        for document in &documents {
            if self.upload.upload(document).await {
                summary.uploaded += 1;
            } else {
                summary.failures += 1;
            }
        }

        info!(
            run_id = %context.run_id,
            flagged = summary.sellers_flagged,
            uploaded = summary.uploaded,
            failures = summary.failures,
            "Finished KYC document synchronization"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fixture::{FixtureHyperwalletClient, FixtureMiraklClient};
    use crate::clients::mirakl::{AdditionalFieldValue, MiraklShop};
    use crate::constants::custom_fields;
    use crate::notifications::RecordingNotifier;
    use crate::resilience::RetryPolicy;
    use std::sync::Arc;
    use std::time::Duration;

    fn flagged_shop(id: &str) -> MiraklShop {
        MiraklShop {
            id: id.to_string(),
            name: format!("shop-{id}"),
            email: format!("shop-{id}@example.com"),
            currency_iso_code: "EUR".to_string(),
            iso_country_code: "FR".to_string(),
            last_updated_date: Some(Utc::now()),
            bank_account: None,
            additional_field_values: vec![
                AdditionalFieldValue::new(custom_fields::HYPERWALLET_KYC_REQUIRED_PROOF, "true"),
                AdditionalFieldValue::new(custom_fields::HYPERWALLET_USER_TOKEN, "usr-1"),
                AdditionalFieldValue::new(
                    custom_fields::HYPERWALLET_KYC_PROOF_OF_IDENTITY,
                    "PASSPORT",
                ),
            ],
        }
    }

    #[tokio::test]
    async fn flagged_sellers_get_their_documents_uploaded() {
        let mirakl = Arc::new(FixtureMiraklClient::new().with_shops(vec![flagged_shop("3001")]));
        let hyperwallet = Arc::new(FixtureHyperwalletClient::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let job = KycSyncJob::new(
            KycDocumentsExtractor::new(mirakl.clone()),
            KycDocumentUploadService::new(
                hyperwallet.clone(),
                mirakl.clone(),
                notifier,
                RetryPolicy::new(2, Duration::from_millis(1)),
            ),
        );

        let summary = job.run(JobContext::new(), None).await.unwrap();

        assert_eq!(summary.sellers_flagged, 1);
        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failures, 0);
        assert_eq!(hyperwallet.uploaded_documents().len(), 1);
        // The KYC-required flag is reset after the upload.
        assert_eq!(mirakl.recorded_updates().len(), 1);
    }
}
