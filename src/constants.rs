//! Shared constants: upstream API limits and the Mirakl custom-field codes
//! the connector reads and writes.

/// Maximum number of results the Mirakl operator API returns per page, and
/// the ceiling for batched shop lookups.
pub const MIRAKL_MAX_RESULTS_PER_PAGE: usize = 100;

/// Mirakl shop additional-field codes used to exchange state with Hyperwallet.
pub mod custom_fields {
    /// Bank-account token minted by Hyperwallet, written back after a
    /// successful create/update.
    pub const HYPERWALLET_BANK_ACCOUNT_TOKEN: &str = "hw-bankaccount-token";

    /// Hyperwallet user token for the seller behind the shop.
    pub const HYPERWALLET_USER_TOKEN: &str = "hw-user-token";

    /// Hyperwallet program the shop is enrolled in.
    pub const HYPERWALLET_PROGRAM: &str = "hw-program";

    /// Flag raised by Mirakl when a seller must go through KYC verification.
    pub const HYPERWALLET_KYC_REQUIRED_PROOF: &str = "hw-kyc-req-proof";

    /// Document selection for proof of business verification.
    pub const HYPERWALLET_KYC_PROOF_OF_BUSINESS: &str = "hw-kyc-proof-of-business";

    /// Document selection for proof of identity verification.
    pub const HYPERWALLET_KYC_PROOF_OF_IDENTITY: &str = "hw-kyc-proof-of-identity";
}
