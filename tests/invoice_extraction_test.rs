//! End-to-end accounting-document extraction against the fixture clients:
//! pagination across many shops, partitioned shop lookup with failure
//! isolation, and reconciliation of documents against the resolved tokens.

use chrono::Utc;
use hmc_core::clients::fixture::FixtureMiraklClient;
use hmc_core::clients::mirakl::{
    AdditionalFieldValue, DocumentState, MiraklDocumentType, MiraklInvoice, MiraklShop,
    PaymentStatus,
};
use hmc_core::constants::custom_fields;
use hmc_core::invoices::extract::{AccountingDocumentExtractor, InvoiceAdapter};
use hmc_core::jobs::{InvoiceExtractJob, JobContext};
use hmc_core::notifications::RecordingNotifier;
use hmc_core::shops::ShopTokenResolver;
use std::sync::Arc;

fn invoice(id: &str, shop_id: &str) -> MiraklInvoice {
    MiraklInvoice {
        id: id.to_string(),
        shop_id: Some(shop_id.to_string()),
        document_type: MiraklDocumentType::Invoice,
        payment_status: PaymentStatus::Pending,
        state: DocumentState::Complete,
        total_charged_amount: 25.0,
        currency_iso_code: "EUR".to_string(),
        date_created: Utc::now(),
    }
}

fn mappable_shop(id: &str) -> MiraklShop {
    MiraklShop {
        id: id.to_string(),
        name: format!("shop-{id}"),
        email: format!("shop-{id}@example.com"),
        currency_iso_code: "EUR".to_string(),
        iso_country_code: "FR".to_string(),
        last_updated_date: None,
        bank_account: None,
        additional_field_values: vec![
            AdditionalFieldValue::new(
                custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN,
                format!("trm-{id}"),
            ),
            AdditionalFieldValue::new(custom_fields::HYPERWALLET_PROGRAM, "DEFAULT"),
        ],
    }
}

fn extraction_job(mirakl: Arc<FixtureMiraklClient>, notifier: Arc<RecordingNotifier>) -> InvoiceExtractJob {
    let resolver = ShopTokenResolver::new(mirakl.clone(), notifier);
    InvoiceExtractJob::new(AccountingDocumentExtractor::new(
        mirakl,
        resolver,
        InvoiceAdapter,
        15,
    ))
}

#[tokio::test]
async fn extraction_spans_many_pages_and_shop_partitions() {
    // 250 shops force three listing pages and three shop-lookup partitions.
    let shop_ids: Vec<String> = (0..250).map(|i| format!("{i:04}")).collect();
    let invoices = shop_ids
        .iter()
        .map(|id| invoice(&format!("inv-{id}"), id))
        .collect();
    let shops = shop_ids.iter().map(|id| mappable_shop(id)).collect();

    let mirakl = Arc::new(
        FixtureMiraklClient::new()
            .with_invoices(invoices)
            .with_shops(shops),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let job = extraction_job(mirakl, notifier.clone());

    let documents = job.run(JobContext::new(), None).await.unwrap();

    assert_eq!(documents.len(), 250);
    assert!(documents
        .iter()
        .all(|doc| doc.destination_token.is_some() && doc.hyperwallet_program.is_some()));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn a_failing_shop_partition_only_drops_its_own_invoices() {
    let shop_ids: Vec<String> = (0..250).map(|i| format!("{i:04}")).collect();
    let invoices = shop_ids
        .iter()
        .map(|id| invoice(&format!("inv-{id}"), id))
        .collect();
    let shops = shop_ids.iter().map(|id| mappable_shop(id)).collect();

    // Shop 0150 lives in the middle partition of the sorted id space; its
    // lookup failure takes down that whole partition of 100 shops.
    let mirakl = Arc::new(
        FixtureMiraklClient::new()
            .with_invoices(invoices)
            .with_shops(shops)
            .failing_lookups_for(&["0150"]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let job = extraction_job(mirakl, notifier.clone());

    let documents = job.run(JobContext::new(), None).await.unwrap();

    assert_eq!(documents.len(), 150);
    assert!(documents
        .iter()
        .all(|doc| !(100..200).contains(&doc.shop_id.as_deref().unwrap().parse::<usize>().unwrap())));

    let alerts = notifier.sent();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "Issue detected getting shops in Mirakl");
}

#[tokio::test]
async fn unmappable_shops_drop_their_documents_without_alerting() {
    let mut shop = mappable_shop("7");
    shop.additional_field_values.clear();

    let mirakl = Arc::new(
        FixtureMiraklClient::new()
            .with_invoices(vec![invoice("inv-7", "7"), invoice("inv-8", "8")])
            .with_shops(vec![shop, mappable_shop("8")]),
    );
    let notifier = Arc::new(RecordingNotifier::new());
    let job = extraction_job(mirakl, notifier.clone());

    let documents = job.run(JobContext::new(), None).await.unwrap();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].invoice_number, "inv-8");
    // Unmappable shops are reported in the logs, not by mail.
    assert!(notifier.sent().is_empty());
}
