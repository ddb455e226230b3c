//! # Shop Destination Mapping
//!
//! Maps Mirakl shops to the Hyperwallet routing pair stored in their custom
//! fields: the destination (bank account) token and the program. The mapping
//! is derived, never persisted; it is recomputed on every extraction cycle.

pub mod resolver;

pub use resolver::ShopTokenResolver;

use crate::clients::mirakl::MiraklShop;
use crate::constants::custom_fields;

/// Routing pair for one shop: where Hyperwallet pays out and under which
/// program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopToken {
    pub destination_token: String,
    pub program: String,
}

/// Read the shop's routing pair from its custom fields. Shops missing either
/// the destination token or the program cannot be mapped and yield `None`.
pub fn destination_of(shop: &MiraklShop) -> Option<ShopToken> {
    let destination_token =
        shop.additional_field(custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN)?;
    let program = shop.additional_field(custom_fields::HYPERWALLET_PROGRAM)?;
    Some(ShopToken {
        destination_token: destination_token.to_string(),
        program: program.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mirakl::AdditionalFieldValue;

    fn shop(fields: Vec<AdditionalFieldValue>) -> MiraklShop {
        MiraklShop {
            id: "2000".to_string(),
            name: "shop".to_string(),
            email: "shop@example.com".to_string(),
            currency_iso_code: "EUR".to_string(),
            iso_country_code: "FR".to_string(),
            last_updated_date: None,
            bank_account: None,
            additional_field_values: fields,
        }
    }

    #[test]
    fn shop_with_both_fields_is_mappable() {
        let mapped = destination_of(&shop(vec![
            AdditionalFieldValue::new(custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN, "trm-1"),
            AdditionalFieldValue::new(custom_fields::HYPERWALLET_PROGRAM, "DEFAULT"),
        ]));

        assert_eq!(
            mapped,
            Some(ShopToken {
                destination_token: "trm-1".to_string(),
                program: "DEFAULT".to_string(),
            })
        );
    }

    #[test]
    fn shop_missing_token_or_program_is_excluded() {
        let only_token = shop(vec![AdditionalFieldValue::new(
            custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN,
            "trm-1",
        )]);
        let only_program = shop(vec![AdditionalFieldValue::new(
            custom_fields::HYPERWALLET_PROGRAM,
            "DEFAULT",
        )]);

        assert_eq!(destination_of(&only_token), None);
        assert_eq!(destination_of(&only_program), None);
        assert_eq!(destination_of(&shop(vec![])), None);
    }
}
