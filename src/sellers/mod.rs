//! # Seller Extraction & Synchronization
//!
//! Seller-side pipeline: converting Mirakl shops into seller models,
//! resolving the bank-account currency by configured priority, and pushing
//! users and bank accounts to Hyperwallet with the create/update strategy
//! decision and token write-back.

pub mod currency;
pub mod model;
pub mod strategy;
pub mod user_sync;

pub use currency::CurrencyPriorityConfig;
pub use model::{seller_from_shop, BankAccountDetails, SellerModel};
pub use strategy::{decide_bank_account_action, BankAccountAction, BankAccountStrategyExecutor};
pub use user_sync::UserSyncService;
