//! Seller synchronization job.

use crate::clients::mirakl::{GetShopsRequest, MiraklClient};
use crate::error::Result;
use crate::jobs::JobContext;
use crate::sellers::model::seller_from_shop;
use crate::sellers::strategy::BankAccountStrategyExecutor;
use crate::sellers::user_sync::UserSyncService;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Outcome counts of one seller synchronization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SellerSyncSummary {
    pub shops_seen: usize,
    pub sellers_enrolled: usize,
    pub users_synced: usize,
    pub bank_accounts_synced: usize,
    pub failures: usize,
}

/// Pushes sellers updated since the last run into Hyperwallet: user first,
/// then the bank account. Items fail independently; a run only errors when
/// the shop listing itself cannot be fetched.
pub struct SellerSyncJob {
    mirakl: Arc<dyn MiraklClient>,
    user_sync: UserSyncService,
    strategy: BankAccountStrategyExecutor,
}

impl SellerSyncJob {
    pub fn new(
        mirakl: Arc<dyn MiraklClient>,
        user_sync: UserSyncService,
        strategy: BankAccountStrategyExecutor,
    ) -> Self {
        Self {
            mirakl,
            user_sync,
            strategy,
        }
    }

    pub async fn run(
        &self,
        context: JobContext,
        delta: Option<DateTime<Utc>>,
    ) -> Result<SellerSyncSummary> {
        info!(run_id = %context.run_id, ?delta, "Starting seller synchronization");

        let request = match delta {
            Some(delta) => GetShopsRequest::updated_since(delta),
            None => GetShopsRequest::by_ids(Vec::new()),
        };
        let shops = self.mirakl.get_shops(&request).await?;

        let mut summary = SellerSyncSummary {
            shops_seen: shops.len(),
            ..Default::default()
        };

        for shop in &shops {
            let Some(seller) = seller_from_shop(shop) else {
                continue;
            };
            summary.sellers_enrolled += 1;

            let Some(synced) = self.user_sync.synchronize(&seller).await else {
                summary.failures += 1;
                continue;
            };
            summary.users_synced += 1;

            if synced.bank_account.is_some() {
                match self.strategy.execute(&synced).await {
                    Some(_) => summary.bank_accounts_synced += 1,
                    None => summary.failures += 1,
                }
            }
        }

        info!(
            run_id = %context.run_id,
            shops = summary.shops_seen,
            sellers = summary.sellers_enrolled,
            users = summary.users_synced,
            bank_accounts = summary.bank_accounts_synced,
            failures = summary.failures,
            "Finished seller synchronization"
        );
        Ok(summary)
    }
}
