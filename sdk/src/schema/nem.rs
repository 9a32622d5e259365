//! NEM type catalog.
//!
//! NEM entities are length-prefixed all the way down: keys, signatures,
//! hashes and nested structs each carry their own size word. The transaction
//! type is the very first field, so both families peek the tag at offset 0.

use super::{
    array, bytes, count_of, field, reserved, size_of, Catalog, EnumDef, Family, FieldDef, IntType,
    Length, StructDef, TypeDef, Variant,
};

pub static NETWORK_TYPE: EnumDef = EnumDef {
    name: "NetworkType",
    int: IntType::U8,
    values: &[("mainnet", 0x68), ("testnet", 0x98)],
};

pub static TRANSACTION_TYPE: EnumDef = EnumDef {
    name: "TransactionType",
    int: IntType::U32,
    values: &[
        ("transfer", 0x0101),
        ("account_key_link", 0x0801),
        ("multisig_account_modification", 0x1001),
        ("multisig_cosignature", 0x1002),
        ("multisig", 0x1004),
        ("namespace_registration", 0x2001),
        ("mosaic_definition", 0x4001),
        ("mosaic_supply_change", 0x4002),
    ],
};

pub static MOSAIC_SUPPLY_CHANGE_ACTION: EnumDef = EnumDef {
    name: "MosaicSupplyChangeAction",
    int: IntType::U32,
    values: &[("increase", 1), ("decrease", 2)],
};

pub static LINK_ACTION: EnumDef = EnumDef {
    name: "LinkAction",
    int: IntType::U32,
    values: &[("link", 1), ("unlink", 2)],
};

const TRANSACTION_HEADER: &[FieldDef] = &[
    field("type", "TransactionType"),
    field("version", "uint8"),
    reserved("entity_body_reserved_1", "uint16", 0),
    field("network", "NetworkType"),
    field("timestamp", "Timestamp"),
    reserved("signer_public_key_size", "uint32", 32),
    field("signer_public_key", "PublicKey"),
    reserved("signature_size", "uint32", 64),
    field("signature", "Signature"),
    field("fee", "Amount"),
    field("deadline", "Timestamp"),
];

// Same header minus the signature; this is what NEM hashes and signs.
const NON_VERIFIABLE_HEADER: &[FieldDef] = &[
    field("type", "TransactionType"),
    field("version", "uint8"),
    reserved("entity_body_reserved_1", "uint16", 0),
    field("network", "NetworkType"),
    field("timestamp", "Timestamp"),
    reserved("signer_public_key_size", "uint32", 32),
    field("signer_public_key", "PublicKey"),
    field("fee", "Amount"),
    field("deadline", "Timestamp"),
];

pub static NAMESPACE_ID: StructDef = StructDef {
    name: "NamespaceId",
    parts: &[&[
        size_of("name_size", "uint32", "name"),
        bytes("name", Length::Count("name_size")),
    ]],
    defaults: &[],
    validator: None,
};

pub static MOSAIC_ID: StructDef = StructDef {
    name: "MosaicId",
    parts: &[&[
        field("namespace_id", "NamespaceId"),
        size_of("name_size", "uint32", "name"),
        bytes("name", Length::Count("name_size")),
    ]],
    defaults: &[],
    validator: None,
};

const MOSAIC_SUPPLY_CHANGE_BODY: &[FieldDef] = &[
    size_of("mosaic_id_size", "uint32", "mosaic_id"),
    field("mosaic_id", "MosaicId"),
    field("action", "MosaicSupplyChangeAction"),
    field("delta", "Amount"),
];

const ACCOUNT_KEY_LINK_BODY: &[FieldDef] = &[
    field("link_action", "LinkAction"),
    reserved("remote_public_key_size", "uint32", 32),
    field("remote_public_key", "PublicKey"),
];

const COSIGNATURE_BODY: &[FieldDef] = &[
    reserved("multisig_transaction_hash_outer_size", "uint32", 36),
    reserved("multisig_transaction_hash_size", "uint32", 32),
    field("multisig_transaction_hash", "Hash256"),
    reserved("multisig_account_address_size", "uint32", 40),
    field("multisig_account_address", "Address"),
];

const MULTISIG_BODY: &[FieldDef] = &[
    size_of("inner_transaction_size", "uint32", "inner_transaction"),
    field("inner_transaction", "NonVerifiableTransaction"),
    count_of("cosignatures_count", "uint32", "cosignatures"),
    array(
        "cosignatures",
        "SizePrefixedCosignatureV1",
        Length::Count("cosignatures_count"),
    ),
];

pub static MOSAIC_SUPPLY_CHANGE: StructDef = StructDef {
    name: "MosaicSupplyChangeTransactionV1",
    parts: &[TRANSACTION_HEADER, MOSAIC_SUPPLY_CHANGE_BODY],
    defaults: &[("version", 1), ("type", 0x4002)],
    validator: None,
};

pub static NON_VERIFIABLE_MOSAIC_SUPPLY_CHANGE: StructDef = StructDef {
    name: "NonVerifiableMosaicSupplyChangeTransactionV1",
    parts: &[NON_VERIFIABLE_HEADER, MOSAIC_SUPPLY_CHANGE_BODY],
    defaults: &[("version", 1), ("type", 0x4002)],
    validator: None,
};

pub static ACCOUNT_KEY_LINK: StructDef = StructDef {
    name: "AccountKeyLinkTransactionV1",
    parts: &[TRANSACTION_HEADER, ACCOUNT_KEY_LINK_BODY],
    defaults: &[("version", 1), ("type", 0x0801)],
    validator: None,
};

pub static NON_VERIFIABLE_ACCOUNT_KEY_LINK: StructDef = StructDef {
    name: "NonVerifiableAccountKeyLinkTransactionV1",
    parts: &[NON_VERIFIABLE_HEADER, ACCOUNT_KEY_LINK_BODY],
    defaults: &[("version", 1), ("type", 0x0801)],
    validator: None,
};

pub static COSIGNATURE: StructDef = StructDef {
    name: "CosignatureV1",
    parts: &[TRANSACTION_HEADER, COSIGNATURE_BODY],
    defaults: &[("version", 1), ("type", 0x1002)],
    validator: None,
};

pub static NON_VERIFIABLE_COSIGNATURE: StructDef = StructDef {
    name: "NonVerifiableCosignatureV1",
    parts: &[NON_VERIFIABLE_HEADER, COSIGNATURE_BODY],
    defaults: &[("version", 1), ("type", 0x1002)],
    validator: None,
};

pub static SIZE_PREFIXED_COSIGNATURE: StructDef = StructDef {
    name: "SizePrefixedCosignatureV1",
    parts: &[&[
        size_of("cosignature_size", "uint32", "cosignature"),
        field("cosignature", "CosignatureV1"),
    ]],
    defaults: &[],
    validator: None,
};

pub static MULTISIG: StructDef = StructDef {
    name: "MultisigTransactionV1",
    parts: &[TRANSACTION_HEADER, MULTISIG_BODY],
    defaults: &[("version", 1), ("type", 0x1004)],
    validator: None,
};

pub static NON_VERIFIABLE_MULTISIG: StructDef = StructDef {
    name: "NonVerifiableMultisigTransactionV1",
    parts: &[NON_VERIFIABLE_HEADER, MULTISIG_BODY],
    defaults: &[("version", 1), ("type", 0x1004)],
    validator: None,
};

pub static TRANSACTIONS: Family = Family {
    name: "Transaction",
    discriminator: "type",
    tag_offset: 0,
    tag: IntType::U32,
    variants: &[
        Variant {
            name: "mosaic_supply_change_transaction_v1",
            tag: 0x4002,
            def: &MOSAIC_SUPPLY_CHANGE,
        },
        Variant {
            name: "account_key_link_transaction_v1",
            tag: 0x0801,
            def: &ACCOUNT_KEY_LINK,
        },
        Variant {
            name: "cosignature_v1",
            tag: 0x1002,
            def: &COSIGNATURE,
        },
        Variant {
            name: "multisig_transaction_v1",
            tag: 0x1004,
            def: &MULTISIG,
        },
    ],
};

pub static NON_VERIFIABLE_TRANSACTIONS: Family = Family {
    name: "NonVerifiableTransaction",
    discriminator: "type",
    tag_offset: 0,
    tag: IntType::U32,
    variants: &[
        Variant {
            name: "mosaic_supply_change_transaction_v1",
            tag: 0x4002,
            def: &NON_VERIFIABLE_MOSAIC_SUPPLY_CHANGE,
        },
        Variant {
            name: "account_key_link_transaction_v1",
            tag: 0x0801,
            def: &NON_VERIFIABLE_ACCOUNT_KEY_LINK,
        },
        Variant {
            name: "cosignature_v1",
            tag: 0x1002,
            def: &NON_VERIFIABLE_COSIGNATURE,
        },
        Variant {
            name: "multisig_transaction_v1",
            tag: 0x1004,
            def: &NON_VERIFIABLE_MULTISIG,
        },
    ],
};

pub static CATALOG: Catalog = Catalog {
    name: "nem",
    types: &[
        TypeDef::Int {
            name: "uint8",
            int: IntType::U8,
        },
        TypeDef::Int {
            name: "uint16",
            int: IntType::U16,
        },
        TypeDef::Int {
            name: "uint32",
            int: IntType::U32,
        },
        TypeDef::Int {
            name: "uint64",
            int: IntType::U64,
        },
        TypeDef::Int {
            name: "Amount",
            int: IntType::U64,
        },
        TypeDef::Int {
            name: "Timestamp",
            int: IntType::U32,
        },
        TypeDef::Fixed {
            name: "Hash256",
            size: 32,
        },
        TypeDef::Fixed {
            name: "PublicKey",
            size: 32,
        },
        TypeDef::Fixed {
            name: "Signature",
            size: 64,
        },
        TypeDef::Fixed {
            name: "Address",
            size: 40,
        },
        TypeDef::Enum(&NETWORK_TYPE),
        TypeDef::Enum(&TRANSACTION_TYPE),
        TypeDef::Enum(&MOSAIC_SUPPLY_CHANGE_ACTION),
        TypeDef::Enum(&LINK_ACTION),
        TypeDef::Struct(&NAMESPACE_ID),
        TypeDef::Struct(&MOSAIC_ID),
        TypeDef::Struct(&COSIGNATURE),
        TypeDef::Struct(&SIZE_PREFIXED_COSIGNATURE),
        TypeDef::Family(&TRANSACTIONS),
        TypeDef::Family(&NON_VERIFIABLE_TRANSACTIONS),
    ],
    transactions: &TRANSACTIONS,
    embedded: &NON_VERIFIABLE_TRANSACTIONS,
    blocks: None,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn catalog_is_closed() {
        for def in CATALOG.struct_defs() {
            for field in def.fields() {
                let name = match field.ty {
                    FieldType::Named(name) => name,
                    FieldType::Array { element, .. } => element,
                    FieldType::Bytes(_) => continue,
                };
                assert!(CATALOG.find(name).is_some(), "{} -> {name}", def.name);
            }
        }
    }

    #[test]
    fn every_transaction_has_a_non_verifiable_twin() {
        for variant in TRANSACTIONS.variants {
            let twin = NON_VERIFIABLE_TRANSACTIONS.by_tag(variant.tag).unwrap();
            assert_eq!(twin.name, variant.name);
            assert!(twin.def.field("signature").is_none());
            assert!(variant.def.field("signature").is_some());
        }
    }

    #[test]
    fn no_block_family() {
        assert!(CATALOG.blocks.is_none());
    }
}
