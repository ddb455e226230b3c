//! KYC document extraction from Mirakl shops.

use crate::clients::mirakl::{GetShopsRequest, MiraklClient};
use crate::error::Result;
use crate::kyc::model::{kyc_document_from_shop, KycDocumentInfo};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// Pulls shops flagged as requiring KYC proof and converts them to document
/// models ready for upload.
pub struct KycDocumentsExtractor {
    mirakl: Arc<dyn MiraklClient>,
}

impl KycDocumentsExtractor {
    pub fn new(mirakl: Arc<dyn MiraklClient>) -> Self {
        Self { mirakl }
    }

    /// KYC documents for shops updated since `delta` (or every shop when
    /// `delta` is absent). A shop listing failure aborts the run; shops
    /// without a Hyperwallet user yet are dropped with a single batch
    /// warning since their documents have nowhere to go.
    pub async fn extract(&self, delta: Option<DateTime<Utc>>) -> Result<Vec<KycDocumentInfo>> {
        let request = match delta {
            Some(delta) => GetShopsRequest::updated_since(delta),
            None => GetShopsRequest::by_ids(Vec::new()),
        };
        let shops = self.mirakl.get_shops(&request).await?;

        let flagged = shops
            .iter()
            .map(kyc_document_from_shop)
            .filter(|info| info.requires_kyc);

        let (ready, orphaned): (Vec<KycDocumentInfo>, Vec<KycDocumentInfo>) =
            flagged.partition(|info| info.user_token.is_some());

        if !orphaned.is_empty() {
            let shop_ids: Vec<&str> = orphaned.iter().map(|info| info.shop_id.as_str()).collect();
            warn!(
                ?shop_ids,
                "Skipping KYC documents of shops without a Hyperwallet user"
            );
        }

        Ok(ready)
    }
}
