//! # Upstream Client Seams
//!
//! Injected trait interfaces for the two external systems plus their
//! implementations: reqwest-backed production clients and in-memory fixture
//! clients selected by configuration. Everything above this module talks to
//! trait objects only, so swapping implementations never touches the
//! pipeline.

pub mod fixture;
pub mod hyperwallet;
pub mod mirakl;

pub use fixture::{FixtureHyperwalletClient, FixtureMiraklClient};
pub use hyperwallet::{
    HyperwalletApiClient, HyperwalletBankAccount, HyperwalletClient, HyperwalletUser,
    UserProfileType, VerificationDocument,
};
pub use mirakl::{
    AdditionalFieldValue, DocumentState, GetInvoicesRequest, GetShopsRequest, InvoicePage,
    MiraklApiClient, MiraklClient, MiraklDocumentType, MiraklInvoice, MiraklShop,
    PaymentStatus, ShopBankAccount, ShopUpdate, UpdateShopsRequest,
};
