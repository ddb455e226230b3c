//! Connector entry point: wires configuration, clients and jobs, then runs
//! one full synchronization cycle. Scheduling (cron or otherwise) is left to
//! the environment running the binary.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use hmc_core::clients::{
    FixtureHyperwalletClient, FixtureMiraklClient, HyperwalletApiClient, HyperwalletClient,
    MiraklApiClient, MiraklClient,
};
use hmc_core::config::ConnectorConfig;
use hmc_core::invoices::extract::{AccountingDocumentExtractor, CreditNoteAdapter, InvoiceAdapter};
use hmc_core::jobs::{
    CreditNoteExtractJob, InvoiceExtractJob, JobContext, KycSyncJob, SellerSyncJob,
};
use hmc_core::kyc::{KycDocumentUploadService, KycDocumentsExtractor};
use hmc_core::notifications::notifier_from_config;
use hmc_core::resilience::RetryPolicy;
use hmc_core::sellers::{BankAccountStrategyExecutor, CurrencyPriorityConfig, UserSyncService};
use hmc_core::shops::ShopTokenResolver;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hmc_core::logging::init_structured_logging();

    let config = ConnectorConfig::from_env().context("loading configuration")?;
    let delta = delta_from_env().context("reading delta window")?;

    let mirakl: Arc<dyn MiraklClient> = if config.use_fixture_clients {
        Arc::new(FixtureMiraklClient::new())
    } else {
        Arc::new(MiraklApiClient::new(
            config.mirakl.base_url.clone(),
            config.mirakl.operator_api_key.clone(),
        ))
    };
    let hyperwallet: Arc<dyn HyperwalletClient> = if config.use_fixture_clients {
        Arc::new(FixtureHyperwalletClient::new())
    } else {
        Arc::new(HyperwalletApiClient::new(&config.hyperwallet))
    };
    let notifier = notifier_from_config(&config.alerts);
    let retry = RetryPolicy::from_config(&config.retry);
    let currency = CurrencyPriorityConfig::parse(&config.currency_priorities);
    let lookback = config.invoices.id_search_max_lookback_minutes;

    let invoices = InvoiceExtractJob::new(AccountingDocumentExtractor::new(
        mirakl.clone(),
        ShopTokenResolver::new(mirakl.clone(), notifier.clone()),
        InvoiceAdapter,
        lookback,
    ));
    let credit_notes = CreditNoteExtractJob::new(AccountingDocumentExtractor::new(
        mirakl.clone(),
        ShopTokenResolver::new(mirakl.clone(), notifier.clone()),
        CreditNoteAdapter,
        lookback,
    ));
    let sellers = SellerSyncJob::new(
        mirakl.clone(),
        UserSyncService::new(
            hyperwallet.clone(),
            mirakl.clone(),
            notifier.clone(),
            retry.clone(),
        ),
        BankAccountStrategyExecutor::new(
            hyperwallet.clone(),
            mirakl.clone(),
            notifier.clone(),
            retry.clone(),
            currency,
        ),
    );
    let kyc = KycSyncJob::new(
        KycDocumentsExtractor::new(mirakl.clone()),
        KycDocumentUploadService::new(hyperwallet, mirakl, notifier, retry),
    );

    let context = JobContext::new();
    info!(run_id = %context.run_id, ?delta, "Starting connector cycle");

    let seller_summary = sellers.run(context, delta).await?;
    let extracted_invoices = invoices.run(context, delta).await?;
    let extracted_credit_notes = credit_notes.run(context, delta).await?;
    let kyc_summary = kyc.run(context, delta).await?;

    info!(
        run_id = %context.run_id,
        invoices = extracted_invoices.len(),
        credit_notes = extracted_credit_notes.len(),
        users_synced = seller_summary.users_synced,
        bank_accounts_synced = seller_summary.bank_accounts_synced,
        kyc_uploaded = kyc_summary.uploaded,
        "Connector cycle finished"
    );
    Ok(())
}

/// Delta window from `HMC_DELTA_MINUTES`; absent means a full run.
fn delta_from_env() -> anyhow::Result<Option<DateTime<Utc>>> {
    match std::env::var("HMC_DELTA_MINUTES") {
        Ok(minutes) => {
            let minutes: i64 = minutes.parse().context("HMC_DELTA_MINUTES must be an integer")?;
            Ok(Some(Utc::now() - Duration::minutes(minutes)))
        }
        Err(_) => Ok(None),
    }
}
