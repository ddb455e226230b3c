//! # Shop/Token Resolver
//!
//! Resolves a set of shop identifiers to their Hyperwallet routing pairs.
//! Identifiers are partitioned to stay under the shop-lookup batch ceiling;
//! each partition is looked up independently and a failed partition is
//! isolated: its shops are logged, an alert goes out, and an empty result is
//! substituted so the remaining partitions still resolve. A failed lookup is
//! therefore indistinguishable from "shop not found" further down the
//! pipeline; operators learn the difference from the alert channel.

use crate::clients::mirakl::{GetShopsRequest, MiraklClient, MiraklShop};
use crate::constants::MIRAKL_MAX_RESULTS_PER_PAGE;
use crate::extraction::partition_ids;
use crate::notifications::{notify_failure, MailNotifier};
use crate::shops::{destination_of, ShopToken};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info};

const SHOP_LOOKUP_ALERT_SUBJECT: &str = "Issue detected getting shops in Mirakl";

/// Resolves shop ids to `(destination token, program)` pairs with
/// per-partition failure isolation.
pub struct ShopTokenResolver {
    mirakl: Arc<dyn MiraklClient>,
    notifier: Arc<dyn MailNotifier>,
}

impl ShopTokenResolver {
    pub fn new(mirakl: Arc<dyn MiraklClient>, notifier: Arc<dyn MailNotifier>) -> Self {
        Self { mirakl, notifier }
    }

    /// Build the shop id → routing pair mapping. Shops lacking a destination
    /// token or program are dropped; on duplicate shop ids the first resolved
    /// value wins.
    pub async fn resolve(&self, shop_ids: &HashSet<String>) -> HashMap<String, ShopToken> {
        if shop_ids.is_empty() {
            return HashMap::new();
        }

        let mut ids: Vec<String> = shop_ids.iter().cloned().collect();
        ids.sort();

        info!(
            shop_count = ids.len(),
            "Resolving destination tokens for shops [{}]",
            ids.join(",")
        );

        let mut mapping: HashMap<String, ShopToken> = HashMap::new();
        for group in partition_ids(&ids, MIRAKL_MAX_RESULTS_PER_PAGE) {
            for shop in self.lookup_partition(&group).await {
                if let Some(token) = destination_of(&shop) {
                    mapping.entry(shop.id).or_insert(token);
                }
            }
        }
        mapping
    }

    /// Look up one id partition. On failure the partition is logged and
    /// alerted, and an empty shop list is substituted so the overall
    /// resolution continues.
    async fn lookup_partition(&self, shop_ids: &[String]) -> Vec<MiraklShop> {
        if shop_ids.is_empty() {
            return Vec::new();
        }

        let request = GetShopsRequest::by_ids(shop_ids.to_vec());
        match self.mirakl.get_shops(&request).await {
            Ok(shops) => shops,
            Err(lookup_error) => {
                let mut sorted = shop_ids.to_vec();
                sorted.sort();
                let detail = format!(
                    "Something went wrong getting information of shops [{}]\n{lookup_error}",
                    sorted.join(",")
                );
                error!(%lookup_error, shops = sorted.join(","), "Shop lookup partition failed");
                notify_failure(self.notifier.as_ref(), SHOP_LOOKUP_ALERT_SUBJECT, &detail)
                    .await;
                Vec::new()
            }
        }
    }
}
