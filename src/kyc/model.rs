//! KYC document models and proof-type enums.

use crate::clients::hyperwallet::VerificationDocument;
use crate::clients::mirakl::MiraklShop;
use crate::constants::custom_fields;

/// Proof-of-business document selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofOfBusiness {
    Incorporation,
    BusinessRegistration,
    OperatingAgreement,
}

impl ProofOfBusiness {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "INCORPORATION" => Some(Self::Incorporation),
            "BUSINESS_REGISTRATION" => Some(Self::BusinessRegistration),
            "OPERATING_AGREEMENT" => Some(Self::OperatingAgreement),
            _ => None,
        }
    }

    pub fn document_type(&self) -> &'static str {
        match self {
            Self::Incorporation => "INCORPORATION",
            Self::BusinessRegistration => "BUSINESS_REGISTRATION",
            Self::OperatingAgreement => "OPERATING_AGREEMENT",
        }
    }

    /// Mirakl custom fields involved in proof-of-business selection.
    pub fn mirakl_fields() -> Vec<&'static str> {
        vec![custom_fields::HYPERWALLET_KYC_PROOF_OF_BUSINESS]
    }
}

/// Proof-of-identity document selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofOfIdentity {
    GovernmentId,
    Passport,
    DriversLicense,
}

impl ProofOfIdentity {
    pub fn from_field(value: &str) -> Option<Self> {
        match value {
            "GOVERNMENT_ID" => Some(Self::GovernmentId),
            "PASSPORT" => Some(Self::Passport),
            "DRIVERS_LICENSE" => Some(Self::DriversLicense),
            _ => None,
        }
    }

    pub fn document_type(&self) -> &'static str {
        match self {
            Self::GovernmentId => "GOVERNMENT_ID",
            Self::Passport => "PASSPORT",
            Self::DriversLicense => "DRIVERS_LICENSE",
        }
    }

    pub fn mirakl_fields() -> Vec<&'static str> {
        vec![custom_fields::HYPERWALLET_KYC_PROOF_OF_IDENTITY]
    }
}

/// Seller KYC information assembled from a Mirakl shop.
#[derive(Debug, Clone, PartialEq)]
pub struct KycDocumentInfo {
    pub shop_id: String,
    pub user_token: Option<String>,
    pub requires_kyc: bool,
    pub proof_of_identity: Option<ProofOfIdentity>,
    pub proof_of_business: Option<ProofOfBusiness>,
    pub documents: Vec<VerificationDocument>,
}

/// Build the KYC model for a shop from its custom fields. The verification
/// documents mirror the proof selections.
pub fn kyc_document_from_shop(shop: &MiraklShop) -> KycDocumentInfo {
    let requires_kyc = shop
        .additional_field(custom_fields::HYPERWALLET_KYC_REQUIRED_PROOF)
        .map(|value| value == "true")
        .unwrap_or(false);
    let proof_of_identity = shop
        .additional_field(custom_fields::HYPERWALLET_KYC_PROOF_OF_IDENTITY)
        .and_then(ProofOfIdentity::from_field);
    let proof_of_business = shop
        .additional_field(custom_fields::HYPERWALLET_KYC_PROOF_OF_BUSINESS)
        .and_then(ProofOfBusiness::from_field);

    let mut documents = Vec::new();
    if let Some(proof) = proof_of_identity {
        documents.push(VerificationDocument {
            category: "IDENTIFICATION".to_string(),
            document_type: proof.document_type().to_string(),
            file_name: format!("{}-{}.pdf", shop.id, proof.document_type().to_lowercase()),
        });
    }
    if let Some(proof) = proof_of_business {
        documents.push(VerificationDocument {
            category: "BUSINESS".to_string(),
            document_type: proof.document_type().to_string(),
            file_name: format!("{}-{}.pdf", shop.id, proof.document_type().to_lowercase()),
        });
    }

    KycDocumentInfo {
        shop_id: shop.id.clone(),
        user_token: shop
            .additional_field(custom_fields::HYPERWALLET_USER_TOKEN)
            .map(str::to_string),
        requires_kyc,
        proof_of_identity,
        proof_of_business,
        documents,
    }
}
