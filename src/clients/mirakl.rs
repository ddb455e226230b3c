//! # Mirakl Operator API Client
//!
//! Trait seam and reqwest-backed implementation for the Mirakl marketplace
//! operator API: paginated accounting-document listing, batched shop lookup
//! and shop upsert. Request and response shapes follow the operator API
//! (`{records[], total_count}` listing envelope, additional-field-value
//! custom fields on shops).

use crate::error::{ConnectorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Accounting-document flavour served by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MiraklDocumentType {
    Invoice,
    CreditNote,
}

impl MiraklDocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MiraklDocumentType::Invoice => "INVOICE",
            MiraklDocumentType::CreditNote => "CREDIT_NOTE",
        }
    }
}

/// Payment status filter for accounting documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
        }
    }
}

/// Lifecycle state of an accounting document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentState {
    Open,
    Complete,
}

impl DocumentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Open => "OPEN",
            DocumentState::Complete => "COMPLETE",
        }
    }
}

/// Accounting document as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiraklInvoice {
    pub id: String,
    /// Seller shop the document belongs to. Absent on platform-level
    /// documents; such records can never be mapped to a destination token.
    pub shop_id: Option<String>,
    #[serde(rename = "type")]
    pub document_type: MiraklDocumentType,
    pub payment_status: PaymentStatus,
    pub state: DocumentState,
    pub total_charged_amount: f64,
    pub currency_iso_code: String,
    pub date_created: DateTime<Utc>,
}

/// Query for the paginated accounting-document listing.
#[derive(Debug, Clone)]
pub struct GetInvoicesRequest {
    pub start_date: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub states: Vec<DocumentState>,
    pub document_type: MiraklDocumentType,
    /// Page size; the server never returns more than this many records.
    pub max: usize,
    pub offset: usize,
}

impl GetInvoicesRequest {
    /// Standard extraction query: pending payment, completed documents of
    /// the given type, starting at offset zero.
    pub fn new(
        start_date: Option<DateTime<Utc>>,
        document_type: MiraklDocumentType,
        page_size: usize,
    ) -> Self {
        Self {
            start_date,
            payment_status: PaymentStatus::Pending,
            states: vec![DocumentState::Complete],
            document_type,
            max: page_size,
            offset: 0,
        }
    }
}

/// One page of the accounting-document listing together with the full
/// result-set size reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoicePage {
    pub invoices: Vec<MiraklInvoice>,
    pub total_count: u64,
}

/// Custom field attached to a Mirakl shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFieldValue {
    pub code: String,
    pub value: String,
}

impl AdditionalFieldValue {
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// Bank account details registered on a Mirakl shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopBankAccount {
    pub owner: String,
    pub bank_name: Option<String>,
    pub bank_account_number: String,
    pub branch_code: Option<String>,
    pub country: String,
}

/// Seller shop detail object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiraklShop {
    pub id: String,
    pub name: String,
    pub email: String,
    pub currency_iso_code: String,
    pub iso_country_code: String,
    pub last_updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bank_account: Option<ShopBankAccount>,
    #[serde(default)]
    pub additional_field_values: Vec<AdditionalFieldValue>,
}

impl MiraklShop {
    /// Value of the additional field with the given code, if present and
    /// non-empty.
    pub fn additional_field(&self, code: &str) -> Option<&str> {
        self.additional_field_values
            .iter()
            .find(|field| field.code == code)
            .map(|field| field.value.as_str())
            .filter(|value| !value.is_empty())
    }
}

/// Batched shop lookup. `shop_ids` must stay under the API batch ceiling;
/// an empty id list combined with `updated_since` selects every shop
/// modified since that instant.
#[derive(Debug, Clone)]
pub struct GetShopsRequest {
    pub shop_ids: Vec<String>,
    pub updated_since: Option<DateTime<Utc>>,
    pub paginate: bool,
}

impl GetShopsRequest {
    pub fn by_ids(shop_ids: Vec<String>) -> Self {
        Self {
            shop_ids,
            updated_since: None,
            paginate: false,
        }
    }

    pub fn updated_since(delta: DateTime<Utc>) -> Self {
        Self {
            shop_ids: Vec::new(),
            updated_since: Some(delta),
            paginate: false,
        }
    }
}

/// Single shop mutation inside an upsert request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopUpdate {
    pub shop_id: String,
    pub additional_field_values: Vec<AdditionalFieldValue>,
}

/// Shop upsert request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShopsRequest {
    pub shops: Vec<ShopUpdate>,
}

impl UpdateShopsRequest {
    /// Upsert of a single additional field on a single shop.
    pub fn single_field(shop_id: impl Into<String>, code: &str, value: &str) -> Self {
        Self {
            shops: vec![ShopUpdate {
                shop_id: shop_id.into(),
                additional_field_values: vec![AdditionalFieldValue::new(code, value)],
            }],
        }
    }
}

/// Seam for the Mirakl operator API.
#[async_trait]
pub trait MiraklClient: Send + Sync {
    /// One page of the accounting-document listing.
    async fn get_invoices(&self, request: &GetInvoicesRequest) -> Result<InvoicePage>;

    /// Shop details for an id batch (or a delta window).
    async fn get_shops(&self, request: &GetShopsRequest) -> Result<Vec<MiraklShop>>;

    /// Upsert of shop custom fields.
    async fn update_shops(&self, request: &UpdateShopsRequest) -> Result<()>;
}

/// Production client for the Mirakl operator API.
pub struct MiraklApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MiraklApiClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ConnectorError::MiraklApi {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl MiraklClient for MiraklApiClient {
    async fn get_invoices(&self, request: &GetInvoicesRequest) -> Result<InvoicePage> {
        let mut query: Vec<(&str, String)> = vec![
            ("payment_status", request.payment_status.as_str().to_string()),
            ("type", request.document_type.as_str().to_string()),
            ("max", request.max.to_string()),
            ("offset", request.offset.to_string()),
        ];
        for state in &request.states {
            query.push(("state", state.as_str().to_string()));
        }
        if let Some(start_date) = request.start_date {
            query.push(("start_date", start_date.to_rfc3339()));
        }

        let response = self
            .http
            .get(format!("{}/api/invoices", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<InvoicePage>().await?)
    }

    async fn get_shops(&self, request: &GetShopsRequest) -> Result<Vec<MiraklShop>> {
        #[derive(Deserialize)]
        struct ShopsEnvelope {
            shops: Vec<MiraklShop>,
        }

        let mut query: Vec<(&str, String)> =
            vec![("paginate", request.paginate.to_string())];
        if !request.shop_ids.is_empty() {
            query.push(("shop_ids", request.shop_ids.join(",")));
        }
        if let Some(updated_since) = request.updated_since {
            query.push(("updated_since", updated_since.to_rfc3339()));
        }

        let response = self
            .http
            .get(format!("{}/api/shops", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&query)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<ShopsEnvelope>().await?.shops)
    }

    async fn update_shops(&self, request: &UpdateShopsRequest) -> Result<()> {
        let response = self
            .http
            .put(format!("{}/api/shops", self.base_url))
            .header("Authorization", &self.api_key)
            .json(request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
