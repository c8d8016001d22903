//! Round-trip properties for the instruction wire format.
//!
//! For all valid records, encoding through the instruction wire form and
//! decoding back yields an equal record. The JSON construction path is held
//! to the same standard.

use proptest::prelude::*;

use kycreg_core::model::{CustomerAddress, CustomerRecord, KycDocument, LeiRegistrationStatus};
use kycreg_solana_client::instruction::KycInstruction;
use kycreg_solana_client::constants::{TAG_CREATE_CUSTOMER, TAG_UPDATE_KYC_STATUS};

fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .,-]{0,30}".prop_map(|s| s.trim_end().to_string())
}

fn opt_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{0,20}".prop_map(|s| s.trim().to_string())
}

fn arb_status() -> impl Strategy<Value = LeiRegistrationStatus> {
    prop_oneof![
        Just(LeiRegistrationStatus::Registered),
        Just(LeiRegistrationStatus::Unregistered),
        Just(LeiRegistrationStatus::Pending),
    ]
}

fn arb_swift() -> impl Strategy<Value = String> {
    prop_oneof!["[A-Z0-9]{8}", "[A-Z0-9]{11}"]
}

prop_compose! {
    fn arb_address()(
        address_type in field(),
        address_line1 in field(),
        address_line2 in opt_field(),
        city in field(),
        state in opt_field(),
        country in field(),
        postal_code in opt_field(),
    ) -> CustomerAddress {
        CustomerAddress {
            address_type,
            address_line1,
            address_line2,
            city,
            state,
            country,
            postal_code,
        }
    }
}

prop_compose! {
    fn arb_document()(
        document_id in field(),
        document_type in field(),
        document_name in opt_field(),
        document_transaction_id in opt_field(),
    ) -> KycDocument {
        KycDocument {
            document_id,
            document_type,
            document_name,
            document_transaction_id,
        }
    }
}

prop_compose! {
    fn arb_record()(
        customer_id in "[A-Za-z0-9-]{1,64}",
        names in (field(), field(), field()),
        identity in (arb_status(), "[A-Z0-9]{20}"),
        details in (field(), field(), field(), field()),
        swift_code in arb_swift(),
        flags in (any::<bool>(), any::<bool>()),
        addresses in prop::collection::vec(arb_address(), 0..3),
        kyc_documents in prop::collection::vec(arb_document(), 0..3),
    ) -> CustomerRecord {
        let (legal_name, registration_number, incorporation_country) = names;
        let (lei_registration_status, lei) = identity;
        let (incorporation_date, primary_country_operation, primary_isic_code, entity_type) =
            details;
        let (kyc_status, is_active) = flags;
        CustomerRecord {
            customer_id,
            legal_name,
            registration_number,
            incorporation_country,
            lei_registration_status,
            lei,
            incorporation_date,
            primary_country_operation,
            primary_isic_code,
            entity_type,
            swift_code,
            kyc_status,
            is_active,
            addresses,
            kyc_documents,
        }
    }
}

proptest! {
    #[test]
    fn generated_records_are_valid(record in arb_record()) {
        prop_assert!(record.validate().is_ok());
    }

    #[test]
    fn create_round_trips(record in arb_record()) {
        let bytes = KycInstruction::CreateCustomer(record.clone()).to_bytes().unwrap();
        prop_assert_eq!(bytes[0], TAG_CREATE_CUSTOMER);
        let decoded = KycInstruction::try_from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded, KycInstruction::CreateCustomer(record));
    }

    #[test]
    fn update_round_trips(record in arb_record()) {
        let bytes = KycInstruction::UpdateKycStatus(record.clone()).to_bytes().unwrap();
        prop_assert_eq!(bytes[0], TAG_UPDATE_KYC_STATUS);
        let decoded = KycInstruction::try_from_bytes(&bytes).unwrap();
        prop_assert_eq!(decoded, KycInstruction::UpdateKycStatus(record));
    }

    #[test]
    fn json_construction_round_trips(record in arb_record()) {
        let json = serde_json::to_string(&record).unwrap();
        let parsed = CustomerRecord::from_json(&json).unwrap();
        prop_assert_eq!(parsed, record);
    }
}
