//! Internal seller model and its conversion from a Mirakl shop.

use crate::clients::hyperwallet::UserProfileType;
use crate::clients::mirakl::MiraklShop;
use crate::constants::custom_fields;

/// Bank account details registered on the marketplace side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountDetails {
    /// Hyperwallet transfer-method token, once one has been minted. Its
    /// presence decides between the create and update strategies.
    pub token: Option<String>,
    pub owner: String,
    pub account_number: String,
    pub branch_code: Option<String>,
    pub country: String,
}

/// A seller extracted from Mirakl, ready for Hyperwallet synchronization.
/// Immutable value; updates go through the `with_*` copy helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerModel {
    /// Mirakl shop id, used as the Hyperwallet `clientUserId`.
    pub client_user_id: String,
    pub name: String,
    pub email: String,
    /// Hyperwallet program the seller is enrolled in.
    pub program: String,
    pub user_token: Option<String>,
    pub profile_type: UserProfileType,
    pub country: String,
    pub currency: String,
    /// Absent when the shop has no bank account registered at all; the
    /// strategy executor skips such sellers.
    pub bank_account: Option<BankAccountDetails>,
}

impl SellerModel {
    pub fn with_user_token(&self, user_token: &str) -> Self {
        Self {
            user_token: Some(user_token.to_string()),
            ..self.clone()
        }
    }
}

/// Convert a Mirakl shop into a seller model. Shops without an `hw-program`
/// custom field are not enrolled and yield `None`.
pub fn seller_from_shop(shop: &MiraklShop) -> Option<SellerModel> {
    let program = shop.additional_field(custom_fields::HYPERWALLET_PROGRAM)?;

    let bank_account = shop.bank_account.as_ref().map(|account| BankAccountDetails {
        token: shop
            .additional_field(custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN)
            .map(str::to_string),
        owner: account.owner.clone(),
        account_number: account.bank_account_number.clone(),
        branch_code: account.branch_code.clone(),
        country: account.country.clone(),
    });

    Some(SellerModel {
        client_user_id: shop.id.clone(),
        name: shop.name.clone(),
        email: shop.email.clone(),
        program: program.to_string(),
        user_token: shop
            .additional_field(custom_fields::HYPERWALLET_USER_TOKEN)
            .map(str::to_string),
        profile_type: UserProfileType::Business,
        country: shop.iso_country_code.clone(),
        currency: shop.currency_iso_code.clone(),
        bank_account,
    })
}
