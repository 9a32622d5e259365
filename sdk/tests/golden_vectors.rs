//! Byte-exact regression baselines.

use ledgerkit::crypto::{Hash256, PublicKey, Signature};
use ledgerkit::network::{generate_mosaic_alias_id, generate_namespace_id, Network};
use ledgerkit::{descriptor, Descriptor, Entity, Facade, TestVector};

const SIGNER: &str = "905F7936540C999AE9A07EF10D5DD8356552714DCF2A13B693127A9CDC449DFA";
const SIGNATURE: &str = "84FEEF9899E6C7E30F68CF6307C9D2ABFC74802C4F971BE29293B6A28EC9CA4E\
                         4CA0AB618E96090C39E976E98E6048613EE26E5F90F5092AAB18C8838D4D0C9C";

const SUPPLY_CHANGE_PAYLOAD: &str = "9100000000000000\
    84FEEF9899E6C7E30F68CF6307C9D2ABFC74802C4F971BE29293B6A28EC9CA4E\
    4CA0AB618E96090C39E976E98E6048613EE26E5F90F5092AAB18C8838D4D0C9C\
    905F7936540C999AE9A07EF10D5DD8356552714DCF2A13B693127A9CDC449DFA\
    0000000001984D42\
    E0FEEEEFFEEEEFFE\
    E0711EE7711EE771\
    8869746E9B1A7057\
    0A00000000000000\
    01";

const SUPPLY_CHANGE_HASH: &str =
    "FEFF993397E3D74E9149DB3294AFE1751D6008DF01F07FBC060576C82B80A0AC";

fn supply_change_descriptor() -> Descriptor {
    descriptor! {
        "type" => "mosaic_supply_change_transaction",
        "signer_public_key" => SIGNER.parse::<PublicKey>().unwrap(),
        "signature" => SIGNATURE.parse::<Signature>().unwrap(),
        "fee" => 0xFEEF_EEFE_EFEE_FEE0u64,
        "deadline" => 0x71E7_1E71_E71E_71E0u64,
        "mosaic_id" => 0x5770_1A9B_6E74_6988u64,
        "delta" => 0xAu64,
        "action" => "increase",
    }
}

#[test]
fn mosaic_supply_change_payload() {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let transaction = facade
        .factory()
        .create(&supply_change_descriptor())
        .unwrap();

    assert_eq!(transaction.size(), 145);
    assert_eq!(
        hex::encode_upper(transaction.serialize()),
        SUPPLY_CHANGE_PAYLOAD
    );
}

#[test]
fn mosaic_supply_change_hash() {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let transaction = facade
        .factory()
        .create(&supply_change_descriptor())
        .unwrap();

    assert_eq!(
        facade.hash_transaction(&transaction).unwrap(),
        SUPPLY_CHANGE_HASH.parse::<Hash256>().unwrap()
    );
}

#[test]
fn payload_decodes_to_the_same_transaction() {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let bytes = hex::decode(SUPPLY_CHANGE_PAYLOAD).unwrap();
    let decoded = facade.deserialize_transaction(&bytes).unwrap();

    assert_eq!(decoded.type_name(), "MosaicSupplyChangeTransaction");
    assert_eq!(decoded.fee().unwrap(), 0xFEEF_EEFE_EFEE_FEE0);
    assert_eq!(decoded.serialize(), bytes);
}

#[test]
fn same_descriptor_same_bytes() {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let first = facade.factory().create(&supply_change_descriptor()).unwrap();
    let second = facade.factory().create(&supply_change_descriptor()).unwrap();
    assert_eq!(first.serialize(), second.serialize());
}

#[test]
fn test_vector_record() {
    let facade = Facade::new(Network::symbol_testnet()).unwrap();
    let descriptor = supply_change_descriptor();
    let transaction = facade.factory().create(&descriptor).unwrap();

    let vector = TestVector::new(
        "MosaicSupplyChangeTransactionV1",
        "golden",
        &transaction.serialize(),
        &descriptor,
    );
    assert_eq!(vector.payload, SUPPLY_CHANGE_PAYLOAD);
    assert_eq!(vector.descriptor["signer_public_key"], SIGNER);
    assert_eq!(vector.descriptor["action"], "increase");
}

#[test]
fn well_known_ids() {
    assert_eq!(generate_namespace_id("symbol", 0), 0xA95F_1F8A_9615_9516);
    assert_eq!(
        generate_mosaic_alias_id("symbol.xym").unwrap(),
        0xE74B_99BA_41F4_AFEE
    );
}
