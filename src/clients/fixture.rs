//! # Fixture Clients
//!
//! In-memory implementations of the upstream seams, selected through
//! `ConnectorConfig::use_fixture_clients`. They back the integration tests
//! and local runs: scripted invoice pages that honour `max`/`offset`,
//! scripted shops with failure injection for the partition-isolation
//! scenarios, recorded shop upserts, and token-minting Hyperwallet
//! operations. Verification documents whose file name contains `fail`
//! make the upload fail, matching the behaviour of the original mock
//! upload service.

use crate::clients::hyperwallet::{
    HyperwalletBankAccount, HyperwalletClient, HyperwalletUser, VerificationDocument,
};
use crate::clients::mirakl::{
    GetInvoicesRequest, GetShopsRequest, InvoicePage, MiraklClient, MiraklInvoice, MiraklShop,
    UpdateShopsRequest,
};
use crate::error::{ConnectorError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

const FAILING_FILE_MARKER: &str = "fail";

/// Scripted Mirakl operator API.
#[derive(Default)]
pub struct FixtureMiraklClient {
    invoices: Mutex<Vec<MiraklInvoice>>,
    shops: Mutex<Vec<MiraklShop>>,
    failing_shop_ids: Mutex<HashSet<String>>,
    recorded_updates: Mutex<Vec<UpdateShopsRequest>>,
    failing_updates: Mutex<bool>,
}

impl FixtureMiraklClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(self, invoices: Vec<MiraklInvoice>) -> Self {
        *self.invoices.lock().unwrap() = invoices;
        self
    }

    pub fn with_shops(self, shops: Vec<MiraklShop>) -> Self {
        *self.shops.lock().unwrap() = shops;
        self
    }

    /// Any shop lookup whose batch contains one of these ids fails with a
    /// server error. Used to exercise partition failure isolation.
    pub fn failing_lookups_for(self, shop_ids: &[&str]) -> Self {
        *self.failing_shop_ids.lock().unwrap() =
            shop_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Make every shop upsert fail with a server error.
    pub fn failing_updates(self) -> Self {
        *self.failing_updates.lock().unwrap() = true;
        self
    }

    /// Shop upserts received so far.
    pub fn recorded_updates(&self) -> Vec<UpdateShopsRequest> {
        self.recorded_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl MiraklClient for FixtureMiraklClient {
    async fn get_invoices(&self, request: &GetInvoicesRequest) -> Result<InvoicePage> {
        let invoices = self.invoices.lock().unwrap();
        let matching: Vec<MiraklInvoice> = invoices
            .iter()
            .filter(|invoice| invoice.document_type == request.document_type)
            .filter(|invoice| invoice.payment_status == request.payment_status)
            .filter(|invoice| request.states.contains(&invoice.state))
            .filter(|invoice| {
                request
                    .start_date
                    .map(|start| invoice.date_created >= start)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        let total_count = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(request.offset)
            .take(request.max)
            .collect();

        Ok(InvoicePage {
            invoices: page,
            total_count,
        })
    }

    async fn get_shops(&self, request: &GetShopsRequest) -> Result<Vec<MiraklShop>> {
        let failing = self.failing_shop_ids.lock().unwrap();
        if request.shop_ids.iter().any(|id| failing.contains(id)) {
            return Err(ConnectorError::MiraklApi {
                status: 500,
                message: "fixture: shop lookup failure injected".to_string(),
            });
        }
        drop(failing);

        let shops = self.shops.lock().unwrap();
        if request.shop_ids.is_empty() {
            let Some(delta) = request.updated_since else {
                return Ok(shops.clone());
            };
            return Ok(shops
                .iter()
                .filter(|shop| {
                    shop.last_updated_date
                        .map(|updated| updated >= delta)
                        .unwrap_or(false)
                })
                .cloned()
                .collect());
        }

        Ok(shops
            .iter()
            .filter(|shop| request.shop_ids.contains(&shop.id))
            .cloned()
            .collect())
    }

    async fn update_shops(&self, request: &UpdateShopsRequest) -> Result<()> {
        if *self.failing_updates.lock().unwrap() {
            return Err(ConnectorError::MiraklApi {
                status: 500,
                message: "fixture: shop update failure injected".to_string(),
            });
        }
        self.recorded_updates.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Token-minting Hyperwallet API double with per-operation failure budgets.
#[derive(Default)]
pub struct FixtureHyperwalletClient {
    created_bank_accounts: Mutex<Vec<HyperwalletBankAccount>>,
    updated_bank_accounts: Mutex<Vec<HyperwalletBankAccount>>,
    created_users: Mutex<Vec<HyperwalletUser>>,
    updated_users: Mutex<Vec<HyperwalletUser>>,
    uploaded_documents: Mutex<Vec<(String, Vec<VerificationDocument>)>>,
    /// Number of upcoming bank-account calls that fail before succeeding.
    bank_account_failures: AtomicU32,
    user_failures: AtomicU32,
}

impl FixtureHyperwalletClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` bank-account create/update calls.
    pub fn fail_next_bank_account_calls(&self, count: u32) {
        self.bank_account_failures.store(count, Ordering::SeqCst);
    }

    /// Fail the next `count` user create/update calls.
    pub fn fail_next_user_calls(&self, count: u32) {
        self.user_failures.store(count, Ordering::SeqCst);
    }

    pub fn created_bank_accounts(&self) -> Vec<HyperwalletBankAccount> {
        self.created_bank_accounts.lock().unwrap().clone()
    }

    pub fn updated_bank_accounts(&self) -> Vec<HyperwalletBankAccount> {
        self.updated_bank_accounts.lock().unwrap().clone()
    }

    pub fn created_users(&self) -> Vec<HyperwalletUser> {
        self.created_users.lock().unwrap().clone()
    }

    pub fn updated_users(&self) -> Vec<HyperwalletUser> {
        self.updated_users.lock().unwrap().clone()
    }

    pub fn uploaded_documents(&self) -> Vec<(String, Vec<VerificationDocument>)> {
        self.uploaded_documents.lock().unwrap().clone()
    }

    fn consume_failure(budget: &AtomicU32, operation: &str) -> Result<()> {
        let remaining = budget.load(Ordering::SeqCst);
        if remaining > 0 {
            budget.store(remaining - 1, Ordering::SeqCst);
            return Err(ConnectorError::HyperwalletApi {
                status: 500,
                message: format!("fixture: {operation} failure injected"),
            });
        }
        Ok(())
    }

    fn mint_token(prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::new_v4().simple())
    }
}

#[async_trait]
impl HyperwalletClient for FixtureHyperwalletClient {
    async fn create_bank_account(
        &self,
        _program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount> {
        Self::consume_failure(&self.bank_account_failures, "create bank account")?;
        let mut created = account.clone();
        created.token = Some(Self::mint_token("trm"));
        self.created_bank_accounts
            .lock()
            .unwrap()
            .push(created.clone());
        Ok(created)
    }

    async fn update_bank_account(
        &self,
        _program: &str,
        account: &HyperwalletBankAccount,
    ) -> Result<HyperwalletBankAccount> {
        Self::consume_failure(&self.bank_account_failures, "update bank account")?;
        self.updated_bank_accounts
            .lock()
            .unwrap()
            .push(account.clone());
        Ok(account.clone())
    }

    async fn create_user(
        &self,
        _program: &str,
        user: &HyperwalletUser,
    ) -> Result<HyperwalletUser> {
        Self::consume_failure(&self.user_failures, "create user")?;
        let mut created = user.clone();
        created.token = Some(Self::mint_token("usr"));
        self.created_users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_user(
        &self,
        _program: &str,
        user: &HyperwalletUser,
    ) -> Result<HyperwalletUser> {
        Self::consume_failure(&self.user_failures, "update user")?;
        self.updated_users.lock().unwrap().push(user.clone());
        Ok(user.clone())
    }

    async fn upload_documents(
        &self,
        user_token: &str,
        documents: &[VerificationDocument],
    ) -> Result<()> {
        if documents
            .iter()
            .any(|doc| doc.file_name.contains(FAILING_FILE_MARKER))
        {
            return Err(ConnectorError::HyperwalletApi {
                status: 400,
                message: "fixture: document upload failure injected".to_string(),
            });
        }
        self.uploaded_documents
            .lock()
            .unwrap()
            .push((user_token.to_string(), documents.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mirakl::{DocumentState, MiraklDocumentType, PaymentStatus};
    use chrono::Utc;

    fn invoice(id: &str, document_type: MiraklDocumentType) -> MiraklInvoice {
        MiraklInvoice {
            id: id.to_string(),
            shop_id: Some("2000".to_string()),
            document_type,
            payment_status: PaymentStatus::Pending,
            state: DocumentState::Complete,
            total_charged_amount: 10.0,
            currency_iso_code: "EUR".to_string(),
            date_created: Utc::now(),
        }
    }

    #[tokio::test]
    async fn invoice_paging_honours_offset_and_max() {
        let invoices = (0..5)
            .map(|i| invoice(&format!("inv-{i}"), MiraklDocumentType::Invoice))
            .collect();
        let client = FixtureMiraklClient::new().with_invoices(invoices);

        let mut request = GetInvoicesRequest::new(None, MiraklDocumentType::Invoice, 2);
        request.offset = 2;
        let page = client.get_invoices(&request).await.unwrap();

        assert_eq!(page.total_count, 5);
        assert_eq!(
            page.invoices.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec!["inv-2", "inv-3"]
        );
    }

    #[tokio::test]
    async fn listing_filters_by_document_type() {
        let client = FixtureMiraklClient::new().with_invoices(vec![
            invoice("inv-1", MiraklDocumentType::Invoice),
            invoice("cn-1", MiraklDocumentType::CreditNote),
        ]);

        let request = GetInvoicesRequest::new(None, MiraklDocumentType::CreditNote, 100);
        let page = client.get_invoices(&request).await.unwrap();

        assert_eq!(page.total_count, 1);
        assert_eq!(page.invoices[0].id, "cn-1");
    }

    #[tokio::test]
    async fn bank_account_failure_budget_is_consumed_per_call() {
        let client = FixtureHyperwalletClient::new();
        client.fail_next_bank_account_calls(1);

        let account = HyperwalletBankAccount {
            token: None,
            user_token: "usr-1".to_string(),
            transfer_method_country: "FR".to_string(),
            transfer_method_currency: "EUR".to_string(),
            bank_account_id: "FR761234".to_string(),
            branch_id: None,
            bank_account_purpose: "CHECKING".to_string(),
        };

        assert!(client.create_bank_account("DEFAULT", &account).await.is_err());
        let created = client
            .create_bank_account("DEFAULT", &account)
            .await
            .unwrap();
        assert!(created.token.as_deref().unwrap().starts_with("trm-"));
    }

    #[tokio::test]
    async fn failing_file_names_abort_document_upload() {
        let client = FixtureHyperwalletClient::new();
        let documents = vec![VerificationDocument {
            category: "IDENTIFICATION".to_string(),
            document_type: "PASSPORT".to_string(),
            file_name: "passport-fail.png".to_string(),
        }];

        assert!(client.upload_documents("usr-1", &documents).await.is_err());
        assert!(client.uploaded_documents().is_empty());
    }
}
