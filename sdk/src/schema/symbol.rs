//! Symbol type catalog.
//!
//! Standalone transactions share a 128-byte header, embedded ones a 48-byte
//! header; both carry the same bodies. Blocks reuse the verifiable header
//! with a `BlockType` discriminator.

use super::{
    aligned_array, array, bytes, count_of, entity_size, field, reserved, size_of, sorted_array,
    Catalog, EnumDef, Family, FieldDef, IntType, Length, SortKey, StructDef, TypeDef, Validator,
    Variant,
};
use crate::transaction::metadata::validate_metadata_value;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

pub static NETWORK_TYPE: EnumDef = EnumDef {
    name: "NetworkType",
    int: IntType::U8,
    values: &[("mainnet", 0x68), ("testnet", 0x98)],
};

pub static TRANSACTION_TYPE: EnumDef = EnumDef {
    name: "TransactionType",
    int: IntType::U16,
    values: &[
        ("account_key_link", 0x414C),
        ("node_key_link", 0x424C),
        ("aggregate_complete", 0x4141),
        ("aggregate_bonded", 0x4241),
        ("voting_key_link", 0x4143),
        ("vrf_key_link", 0x4243),
        ("hash_lock", 0x4148),
        ("secret_lock", 0x4152),
        ("secret_proof", 0x4252),
        ("account_metadata", 0x4144),
        ("mosaic_metadata", 0x4244),
        ("namespace_metadata", 0x4344),
        ("mosaic_definition", 0x414D),
        ("mosaic_supply_change", 0x424D),
        ("mosaic_supply_revocation", 0x434D),
        ("multisig_account_modification", 0x4155),
        ("address_alias", 0x424E),
        ("mosaic_alias", 0x434E),
        ("namespace_registration", 0x414E),
        ("account_address_restriction", 0x4150),
        ("account_mosaic_restriction", 0x4250),
        ("account_operation_restriction", 0x4350),
        ("mosaic_address_restriction", 0x4251),
        ("mosaic_global_restriction", 0x4151),
        ("transfer", 0x4154),
    ],
};

pub static BLOCK_TYPE: EnumDef = EnumDef {
    name: "BlockType",
    int: IntType::U16,
    values: &[("nemesis", 0x8043), ("normal", 0x8143), ("importance", 0x8243)],
};

pub static MOSAIC_SUPPLY_CHANGE_ACTION: EnumDef = EnumDef {
    name: "MosaicSupplyChangeAction",
    int: IntType::U8,
    values: &[("decrease", 0), ("increase", 1)],
};

pub static MOSAIC_FLAGS: EnumDef = EnumDef {
    name: "MosaicFlags",
    int: IntType::U8,
    values: &[
        ("none", 0),
        ("supply_mutable", 1),
        ("transferable", 2),
        ("restrictable", 4),
        ("revokable", 8),
    ],
};

pub static NAMESPACE_REGISTRATION_TYPE: EnumDef = EnumDef {
    name: "NamespaceRegistrationType",
    int: IntType::U8,
    values: &[("root", 0), ("child", 1)],
};

pub static ALIAS_ACTION: EnumDef = EnumDef {
    name: "AliasAction",
    int: IntType::U8,
    values: &[("unlink", 0), ("link", 1)],
};

pub static ACCOUNT_RESTRICTION_FLAGS: EnumDef = EnumDef {
    name: "AccountRestrictionFlags",
    int: IntType::U16,
    values: &[
        ("address", 0x0001),
        ("mosaic_id", 0x0002),
        ("transaction_type", 0x0004),
        ("outgoing", 0x4000),
        ("block", 0x8000),
    ],
};

pub static MOSAIC_RESTRICTION_TYPE: EnumDef = EnumDef {
    name: "MosaicRestrictionType",
    int: IntType::U8,
    values: &[
        ("none", 0),
        ("eq", 1),
        ("ne", 2),
        ("lt", 3),
        ("le", 4),
        ("gt", 5),
        ("ge", 6),
    ],
};

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

const TRANSACTION_HEADER: &[FieldDef] = &[
    entity_size("size", "uint32"),
    reserved("verifiable_entity_header_reserved_1", "uint32", 0),
    field("signature", "Signature"),
    field("signer_public_key", "PublicKey"),
    reserved("entity_body_reserved_1", "uint32", 0),
    field("version", "uint8"),
    field("network", "NetworkType"),
    field("type", "TransactionType"),
    field("fee", "Amount"),
    field("deadline", "Timestamp"),
];

const EMBEDDED_HEADER: &[FieldDef] = &[
    entity_size("size", "uint32"),
    reserved("embedded_transaction_header_reserved_1", "uint32", 0),
    field("signer_public_key", "PublicKey"),
    reserved("entity_body_reserved_1", "uint32", 0),
    field("version", "uint8"),
    field("network", "NetworkType"),
    field("type", "TransactionType"),
];

/// Offset of `type` in a standalone transaction or block.
pub const TRANSACTION_TAG_OFFSET: usize = 4 + 4 + 64 + 32 + 4 + 1 + 1;

/// Offset of `type` in an embedded transaction.
pub const EMBEDDED_TAG_OFFSET: usize = 4 + 4 + 32 + 4 + 1 + 1;

// ---------------------------------------------------------------------------
// Shared structs
// ---------------------------------------------------------------------------

pub static UNRESOLVED_MOSAIC: StructDef = StructDef {
    name: "UnresolvedMosaic",
    parts: &[&[
        field("mosaic_id", "UnresolvedMosaicId"),
        field("amount", "Amount"),
    ]],
    defaults: &[],
    validator: None,
};

pub static COSIGNATURE: StructDef = StructDef {
    name: "Cosignature",
    parts: &[&[
        field("version", "uint64"),
        field("signer_public_key", "PublicKey"),
        field("signature", "Signature"),
    ]],
    defaults: &[],
    validator: None,
};

pub static DETACHED_COSIGNATURE: StructDef = StructDef {
    name: "DetachedCosignature",
    parts: &[&[
        field("version", "uint64"),
        field("signer_public_key", "PublicKey"),
        field("signature", "Signature"),
        field("parent_hash", "Hash256"),
    ]],
    defaults: &[],
    validator: None,
};

pub static VRF_PROOF: StructDef = StructDef {
    name: "VrfProof",
    parts: &[&[
        field("gamma", "ProofGamma"),
        field("verification_hash", "ProofVerificationHash"),
        field("scalar", "ProofScalar"),
    ]],
    defaults: &[],
    validator: None,
};

// ---------------------------------------------------------------------------
// Transaction bodies
// ---------------------------------------------------------------------------

const TRANSFER_BODY: &[FieldDef] = &[
    field("recipient_address", "UnresolvedAddress"),
    size_of("message_size", "uint16", "message"),
    count_of("mosaics_count", "uint8", "mosaics"),
    reserved("transfer_transaction_body_reserved_1", "uint32", 0),
    reserved("transfer_transaction_body_reserved_2", "uint8", 0),
    sorted_array(
        "mosaics",
        "UnresolvedMosaic",
        Length::Count("mosaics_count"),
        SortKey::Field("mosaic_id"),
    ),
    bytes("message", Length::Count("message_size")),
];

const MOSAIC_DEFINITION_BODY: &[FieldDef] = &[
    field("id", "MosaicId"),
    field("duration", "BlockDuration"),
    field("nonce", "MosaicNonce"),
    field("flags", "MosaicFlags"),
    field("divisibility", "uint8"),
];

const MOSAIC_SUPPLY_CHANGE_BODY: &[FieldDef] = &[
    field("mosaic_id", "UnresolvedMosaicId"),
    field("delta", "Amount"),
    field("action", "MosaicSupplyChangeAction"),
];

// `duration` and `parent_id` share one slot selected by the registration type
// that follows them.
const NAMESPACE_REGISTRATION_BODY: &[FieldDef] = &[
    field("duration", "BlockDuration").when("registration_type", 0),
    field("parent_id", "NamespaceId").when("registration_type", 1),
    field("id", "NamespaceId"),
    field("registration_type", "NamespaceRegistrationType"),
    size_of("name_size", "uint8", "name"),
    bytes("name", Length::Count("name_size")),
];

const ADDRESS_ALIAS_BODY: &[FieldDef] = &[
    field("namespace_id", "NamespaceId"),
    field("address", "Address"),
    field("alias_action", "AliasAction"),
];

const MOSAIC_ALIAS_BODY: &[FieldDef] = &[
    field("namespace_id", "NamespaceId"),
    field("mosaic_id", "MosaicId"),
    field("alias_action", "AliasAction"),
];

const ACCOUNT_METADATA_BODY: &[FieldDef] = &[
    field("target_address", "UnresolvedAddress"),
    field("scoped_metadata_key", "uint64"),
    field("value_size_delta", "int16"),
    size_of("value_size", "uint16", "value"),
    bytes("value", Length::Count("value_size")),
];

const MOSAIC_METADATA_BODY: &[FieldDef] = &[
    field("target_address", "UnresolvedAddress"),
    field("scoped_metadata_key", "uint64"),
    field("target_mosaic_id", "UnresolvedMosaicId"),
    field("value_size_delta", "int16"),
    size_of("value_size", "uint16", "value"),
    bytes("value", Length::Count("value_size")),
];

const NAMESPACE_METADATA_BODY: &[FieldDef] = &[
    field("target_address", "UnresolvedAddress"),
    field("scoped_metadata_key", "uint64"),
    field("target_namespace_id", "NamespaceId"),
    field("value_size_delta", "int16"),
    size_of("value_size", "uint16", "value"),
    bytes("value", Length::Count("value_size")),
];

const ACCOUNT_ADDRESS_RESTRICTION_BODY: &[FieldDef] = &[
    field("restriction_flags", "AccountRestrictionFlags"),
    count_of("restriction_additions_count", "uint8", "restriction_additions"),
    count_of("restriction_deletions_count", "uint8", "restriction_deletions"),
    reserved("account_restriction_transaction_body_reserved_1", "uint32", 0),
    array(
        "restriction_additions",
        "UnresolvedAddress",
        Length::Count("restriction_additions_count"),
    ),
    array(
        "restriction_deletions",
        "UnresolvedAddress",
        Length::Count("restriction_deletions_count"),
    ),
];

const ACCOUNT_MOSAIC_RESTRICTION_BODY: &[FieldDef] = &[
    field("restriction_flags", "AccountRestrictionFlags"),
    count_of("restriction_additions_count", "uint8", "restriction_additions"),
    count_of("restriction_deletions_count", "uint8", "restriction_deletions"),
    reserved("account_restriction_transaction_body_reserved_1", "uint32", 0),
    sorted_array(
        "restriction_additions",
        "UnresolvedMosaicId",
        Length::Count("restriction_additions_count"),
        SortKey::Value,
    ),
    sorted_array(
        "restriction_deletions",
        "UnresolvedMosaicId",
        Length::Count("restriction_deletions_count"),
        SortKey::Value,
    ),
];

const ACCOUNT_OPERATION_RESTRICTION_BODY: &[FieldDef] = &[
    field("restriction_flags", "AccountRestrictionFlags"),
    count_of("restriction_additions_count", "uint8", "restriction_additions"),
    count_of("restriction_deletions_count", "uint8", "restriction_deletions"),
    reserved("account_restriction_transaction_body_reserved_1", "uint32", 0),
    array(
        "restriction_additions",
        "TransactionType",
        Length::Count("restriction_additions_count"),
    ),
    array(
        "restriction_deletions",
        "TransactionType",
        Length::Count("restriction_deletions_count"),
    ),
];

const MOSAIC_GLOBAL_RESTRICTION_BODY: &[FieldDef] = &[
    field("mosaic_id", "UnresolvedMosaicId"),
    field("reference_mosaic_id", "UnresolvedMosaicId"),
    field("restriction_key", "uint64"),
    field("previous_restriction_value", "uint64"),
    field("new_restriction_value", "uint64"),
    field("previous_restriction_type", "MosaicRestrictionType"),
    field("new_restriction_type", "MosaicRestrictionType"),
];

const MOSAIC_ADDRESS_RESTRICTION_BODY: &[FieldDef] = &[
    field("mosaic_id", "UnresolvedMosaicId"),
    field("restriction_key", "uint64"),
    field("previous_restriction_value", "uint64"),
    field("new_restriction_value", "uint64"),
    field("target_address", "UnresolvedAddress"),
];

const MULTISIG_ACCOUNT_MODIFICATION_BODY: &[FieldDef] = &[
    field("min_removal_delta", "int8"),
    field("min_approval_delta", "int8"),
    count_of("address_additions_count", "uint8", "address_additions"),
    count_of("address_deletions_count", "uint8", "address_deletions"),
    reserved(
        "multisig_account_modification_transaction_body_reserved_1",
        "uint32",
        0,
    ),
    array(
        "address_additions",
        "UnresolvedAddress",
        Length::Count("address_additions_count"),
    ),
    array(
        "address_deletions",
        "UnresolvedAddress",
        Length::Count("address_deletions_count"),
    ),
];

const HASH_LOCK_BODY: &[FieldDef] = &[
    field("mosaic", "UnresolvedMosaic"),
    field("duration", "BlockDuration"),
    field("hash", "Hash256"),
];

const AGGREGATE_BODY: &[FieldDef] = &[
    field("transactions_hash", "Hash256"),
    size_of("payload_size", "uint32", "transactions"),
    reserved("aggregate_transaction_header_reserved_1", "uint32", 0),
    aligned_array(
        "transactions",
        "EmbeddedTransaction",
        Length::Bytes("payload_size"),
        8,
        true,
    ),
    array("cosignatures", "Cosignature", Length::Fill),
];

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

macro_rules! transaction_defs {
    ($(
        $standalone:ident, $embedded:ident, $name:literal, $body:ident, $tag:expr, $validator:expr;
    )*) => {
        $(
            pub static $standalone: StructDef = StructDef {
                name: concat!($name, "Transaction"),
                parts: &[TRANSACTION_HEADER, $body],
                defaults: &[("version", 1), ("type", $tag)],
                validator: $validator,
            };

            pub static $embedded: StructDef = StructDef {
                name: concat!("Embedded", $name, "Transaction"),
                parts: &[EMBEDDED_HEADER, $body],
                defaults: &[("version", 1), ("type", $tag)],
                validator: $validator,
            };
        )*
    };
}

const METADATA_VALIDATOR: Option<Validator> = Some(validate_metadata_value);

transaction_defs! {
    TRANSFER, EMBEDDED_TRANSFER, "Transfer", TRANSFER_BODY, 0x4154, None;
    MOSAIC_DEFINITION, EMBEDDED_MOSAIC_DEFINITION, "MosaicDefinition",
        MOSAIC_DEFINITION_BODY, 0x414D, None;
    MOSAIC_SUPPLY_CHANGE, EMBEDDED_MOSAIC_SUPPLY_CHANGE, "MosaicSupplyChange",
        MOSAIC_SUPPLY_CHANGE_BODY, 0x424D, None;
    NAMESPACE_REGISTRATION, EMBEDDED_NAMESPACE_REGISTRATION, "NamespaceRegistration",
        NAMESPACE_REGISTRATION_BODY, 0x414E, None;
    ADDRESS_ALIAS, EMBEDDED_ADDRESS_ALIAS, "AddressAlias", ADDRESS_ALIAS_BODY, 0x424E, None;
    MOSAIC_ALIAS, EMBEDDED_MOSAIC_ALIAS, "MosaicAlias", MOSAIC_ALIAS_BODY, 0x434E, None;
    ACCOUNT_METADATA, EMBEDDED_ACCOUNT_METADATA, "AccountMetadata",
        ACCOUNT_METADATA_BODY, 0x4144, METADATA_VALIDATOR;
    MOSAIC_METADATA, EMBEDDED_MOSAIC_METADATA, "MosaicMetadata",
        MOSAIC_METADATA_BODY, 0x4244, METADATA_VALIDATOR;
    NAMESPACE_METADATA, EMBEDDED_NAMESPACE_METADATA, "NamespaceMetadata",
        NAMESPACE_METADATA_BODY, 0x4344, METADATA_VALIDATOR;
    ACCOUNT_ADDRESS_RESTRICTION, EMBEDDED_ACCOUNT_ADDRESS_RESTRICTION,
        "AccountAddressRestriction", ACCOUNT_ADDRESS_RESTRICTION_BODY, 0x4150, None;
    ACCOUNT_MOSAIC_RESTRICTION, EMBEDDED_ACCOUNT_MOSAIC_RESTRICTION,
        "AccountMosaicRestriction", ACCOUNT_MOSAIC_RESTRICTION_BODY, 0x4250, None;
    ACCOUNT_OPERATION_RESTRICTION, EMBEDDED_ACCOUNT_OPERATION_RESTRICTION,
        "AccountOperationRestriction", ACCOUNT_OPERATION_RESTRICTION_BODY, 0x4350, None;
    MOSAIC_GLOBAL_RESTRICTION, EMBEDDED_MOSAIC_GLOBAL_RESTRICTION, "MosaicGlobalRestriction",
        MOSAIC_GLOBAL_RESTRICTION_BODY, 0x4151, None;
    MOSAIC_ADDRESS_RESTRICTION, EMBEDDED_MOSAIC_ADDRESS_RESTRICTION,
        "MosaicAddressRestriction", MOSAIC_ADDRESS_RESTRICTION_BODY, 0x4251, None;
    MULTISIG_ACCOUNT_MODIFICATION, EMBEDDED_MULTISIG_ACCOUNT_MODIFICATION,
        "MultisigAccountModification", MULTISIG_ACCOUNT_MODIFICATION_BODY, 0x4155, None;
    HASH_LOCK, EMBEDDED_HASH_LOCK, "HashLock", HASH_LOCK_BODY, 0x4148, None;
}

pub static AGGREGATE_COMPLETE: StructDef = StructDef {
    name: "AggregateCompleteTransaction",
    parts: &[TRANSACTION_HEADER, AGGREGATE_BODY],
    defaults: &[("version", 2), ("type", 0x4141)],
    validator: None,
};

pub static AGGREGATE_BONDED: StructDef = StructDef {
    name: "AggregateBondedTransaction",
    parts: &[TRANSACTION_HEADER, AGGREGATE_BODY],
    defaults: &[("version", 2), ("type", 0x4241)],
    validator: None,
};

macro_rules! variant {
    ($name:literal, $tag:expr, $def:ident) => {
        Variant {
            name: $name,
            tag: $tag,
            def: &$def,
        }
    };
}

pub static TRANSACTIONS: Family = Family {
    name: "Transaction",
    discriminator: "type",
    tag_offset: TRANSACTION_TAG_OFFSET,
    tag: IntType::U16,
    variants: &[
        variant!("transfer_transaction", 0x4154, TRANSFER),
        variant!("mosaic_definition_transaction", 0x414D, MOSAIC_DEFINITION),
        variant!("mosaic_supply_change_transaction", 0x424D, MOSAIC_SUPPLY_CHANGE),
        variant!("namespace_registration_transaction", 0x414E, NAMESPACE_REGISTRATION),
        variant!("address_alias_transaction", 0x424E, ADDRESS_ALIAS),
        variant!("mosaic_alias_transaction", 0x434E, MOSAIC_ALIAS),
        variant!("account_metadata_transaction", 0x4144, ACCOUNT_METADATA),
        variant!("mosaic_metadata_transaction", 0x4244, MOSAIC_METADATA),
        variant!("namespace_metadata_transaction", 0x4344, NAMESPACE_METADATA),
        variant!("account_address_restriction_transaction", 0x4150, ACCOUNT_ADDRESS_RESTRICTION),
        variant!("account_mosaic_restriction_transaction", 0x4250, ACCOUNT_MOSAIC_RESTRICTION),
        variant!("account_operation_restriction_transaction", 0x4350, ACCOUNT_OPERATION_RESTRICTION),
        variant!("mosaic_global_restriction_transaction", 0x4151, MOSAIC_GLOBAL_RESTRICTION),
        variant!("mosaic_address_restriction_transaction", 0x4251, MOSAIC_ADDRESS_RESTRICTION),
        variant!("multisig_account_modification_transaction", 0x4155, MULTISIG_ACCOUNT_MODIFICATION),
        variant!("hash_lock_transaction", 0x4148, HASH_LOCK),
        variant!("aggregate_complete_transaction", 0x4141, AGGREGATE_COMPLETE),
        variant!("aggregate_bonded_transaction", 0x4241, AGGREGATE_BONDED),
    ],
};

pub static EMBEDDED_TRANSACTIONS: Family = Family {
    name: "EmbeddedTransaction",
    discriminator: "type",
    tag_offset: EMBEDDED_TAG_OFFSET,
    tag: IntType::U16,
    variants: &[
        variant!("transfer_transaction", 0x4154, EMBEDDED_TRANSFER),
        variant!("mosaic_definition_transaction", 0x414D, EMBEDDED_MOSAIC_DEFINITION),
        variant!("mosaic_supply_change_transaction", 0x424D, EMBEDDED_MOSAIC_SUPPLY_CHANGE),
        variant!("namespace_registration_transaction", 0x414E, EMBEDDED_NAMESPACE_REGISTRATION),
        variant!("address_alias_transaction", 0x424E, EMBEDDED_ADDRESS_ALIAS),
        variant!("mosaic_alias_transaction", 0x434E, EMBEDDED_MOSAIC_ALIAS),
        variant!("account_metadata_transaction", 0x4144, EMBEDDED_ACCOUNT_METADATA),
        variant!("mosaic_metadata_transaction", 0x4244, EMBEDDED_MOSAIC_METADATA),
        variant!("namespace_metadata_transaction", 0x4344, EMBEDDED_NAMESPACE_METADATA),
        variant!("account_address_restriction_transaction", 0x4150, EMBEDDED_ACCOUNT_ADDRESS_RESTRICTION),
        variant!("account_mosaic_restriction_transaction", 0x4250, EMBEDDED_ACCOUNT_MOSAIC_RESTRICTION),
        variant!("account_operation_restriction_transaction", 0x4350, EMBEDDED_ACCOUNT_OPERATION_RESTRICTION),
        variant!("mosaic_global_restriction_transaction", 0x4151, EMBEDDED_MOSAIC_GLOBAL_RESTRICTION),
        variant!("mosaic_address_restriction_transaction", 0x4251, EMBEDDED_MOSAIC_ADDRESS_RESTRICTION),
        variant!("multisig_account_modification_transaction", 0x4155, EMBEDDED_MULTISIG_ACCOUNT_MODIFICATION),
        variant!("hash_lock_transaction", 0x4148, EMBEDDED_HASH_LOCK),
    ],
};

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

const BLOCK_HEADER: &[FieldDef] = &[
    entity_size("size", "uint32"),
    reserved("verifiable_entity_header_reserved_1", "uint32", 0),
    field("signature", "Signature"),
    field("signer_public_key", "PublicKey"),
    reserved("entity_body_reserved_1", "uint32", 0),
    field("version", "uint8"),
    field("network", "NetworkType"),
    field("type", "BlockType"),
    field("height", "Height"),
    field("timestamp", "Timestamp"),
    field("difficulty", "Difficulty"),
    field("generation_hash_proof", "VrfProof"),
    field("previous_block_hash", "Hash256"),
    field("transactions_hash", "Hash256"),
    field("receipts_hash", "Hash256"),
    field("state_hash", "Hash256"),
    field("beneficiary_address", "Address"),
    field("fee_multiplier", "BlockFeeMultiplier"),
];

const IMPORTANCE_BLOCK_FOOTER: &[FieldDef] = &[
    field("voting_eligible_accounts_count", "uint32"),
    field("harvesting_eligible_accounts_count", "uint64"),
    field("total_voting_balance", "Amount"),
    field("previous_importance_block_hash", "Hash256"),
];

const BLOCK_TRANSACTIONS: &[FieldDef] = &[aligned_array(
    "transactions",
    "Transaction",
    Length::Fill,
    8,
    false,
)];

pub static NEMESIS_BLOCK: StructDef = StructDef {
    name: "NemesisBlock",
    parts: &[BLOCK_HEADER, IMPORTANCE_BLOCK_FOOTER, BLOCK_TRANSACTIONS],
    defaults: &[("version", 1), ("type", 0x8043)],
    validator: None,
};

pub static NORMAL_BLOCK: StructDef = StructDef {
    name: "NormalBlock",
    parts: &[BLOCK_HEADER, BLOCK_TRANSACTIONS],
    defaults: &[("version", 1), ("type", 0x8143)],
    validator: None,
};

pub static IMPORTANCE_BLOCK: StructDef = StructDef {
    name: "ImportanceBlock",
    parts: &[BLOCK_HEADER, IMPORTANCE_BLOCK_FOOTER, BLOCK_TRANSACTIONS],
    defaults: &[("version", 1), ("type", 0x8243)],
    validator: None,
};

pub static BLOCKS: Family = Family {
    name: "Block",
    discriminator: "type",
    tag_offset: TRANSACTION_TAG_OFFSET,
    tag: IntType::U16,
    variants: &[
        variant!("nemesis_block", 0x8043, NEMESIS_BLOCK),
        variant!("normal_block", 0x8143, NORMAL_BLOCK),
        variant!("importance_block", 0x8243, IMPORTANCE_BLOCK),
    ],
};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

macro_rules! int {
    ($name:literal, $int:expr) => {
        TypeDef::Int {
            name: $name,
            int: $int,
        }
    };
}

macro_rules! fixed {
    ($name:literal, $size:expr) => {
        TypeDef::Fixed {
            name: $name,
            size: $size,
        }
    };
}

pub static CATALOG: Catalog = Catalog {
    name: "symbol",
    types: &[
        int!("uint8", IntType::U8),
        int!("uint16", IntType::U16),
        int!("uint32", IntType::U32),
        int!("uint64", IntType::U64),
        int!("int8", IntType::I8),
        int!("int16", IntType::I16),
        int!("Amount", IntType::U64),
        int!("BlockDuration", IntType::U64),
        int!("BlockFeeMultiplier", IntType::U32),
        int!("Difficulty", IntType::U64),
        int!("Height", IntType::U64),
        int!("Timestamp", IntType::U64),
        int!("MosaicId", IntType::U64),
        int!("UnresolvedMosaicId", IntType::U64),
        int!("NamespaceId", IntType::U64),
        int!("MosaicNonce", IntType::U32),
        fixed!("Hash256", 32),
        fixed!("PublicKey", 32),
        fixed!("Signature", 64),
        fixed!("Address", 24),
        fixed!("UnresolvedAddress", 24),
        fixed!("ProofGamma", 32),
        fixed!("ProofVerificationHash", 16),
        fixed!("ProofScalar", 32),
        TypeDef::Enum(&NETWORK_TYPE),
        TypeDef::Enum(&TRANSACTION_TYPE),
        TypeDef::Enum(&BLOCK_TYPE),
        TypeDef::Enum(&MOSAIC_SUPPLY_CHANGE_ACTION),
        TypeDef::Enum(&NAMESPACE_REGISTRATION_TYPE),
        TypeDef::Enum(&ALIAS_ACTION),
        TypeDef::Enum(&MOSAIC_RESTRICTION_TYPE),
        TypeDef::Flags(&MOSAIC_FLAGS),
        TypeDef::Flags(&ACCOUNT_RESTRICTION_FLAGS),
        TypeDef::Struct(&UNRESOLVED_MOSAIC),
        TypeDef::Struct(&COSIGNATURE),
        TypeDef::Struct(&DETACHED_COSIGNATURE),
        TypeDef::Struct(&VRF_PROOF),
        TypeDef::Family(&TRANSACTIONS),
        TypeDef::Family(&EMBEDDED_TRANSACTIONS),
        TypeDef::Family(&BLOCKS),
    ],
    transactions: &TRANSACTIONS,
    embedded: &EMBEDDED_TRANSACTIONS,
    blocks: Some(&BLOCKS),
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn referenced_names(def: &'static StructDef) -> Vec<&'static str> {
        def.fields()
            .map(|field| match field.ty {
                FieldType::Named(name) => name,
                FieldType::Array { element, .. } => element,
                FieldType::Bytes(_) => "uint8",
            })
            .collect()
    }

    #[test]
    fn catalog_is_closed() {
        for def in CATALOG.struct_defs() {
            for name in referenced_names(def) {
                assert!(
                    CATALOG.find(name).is_some(),
                    "{} references unknown type {name}",
                    def.name
                );
            }
        }
    }

    #[test]
    fn tag_offsets_point_at_type() {
        assert_eq!(TRANSACTION_TAG_OFFSET, 110);
        assert_eq!(EMBEDDED_TAG_OFFSET, 46);
    }

    #[test]
    fn variant_tags_match_defaults() {
        for family in [&TRANSACTIONS, &EMBEDDED_TRANSACTIONS, &BLOCKS] {
            for variant in family.variants {
                assert_eq!(
                    variant.def.default_for("type"),
                    Some(variant.tag),
                    "{}",
                    variant.name
                );
            }
        }
    }

    #[test]
    fn variant_tags_are_transaction_types() {
        for variant in TRANSACTIONS.variants {
            let short = variant.name.trim_end_matches("_transaction");
            assert_eq!(TRANSACTION_TYPE.value_of(short), Some(variant.tag));
        }
    }

    #[test]
    fn aggregates_are_not_embeddable() {
        assert!(EMBEDDED_TRANSACTIONS
            .by_name("aggregate_complete_transaction")
            .is_none());
        assert_eq!(AGGREGATE_BONDED.default_for("version"), Some(2));
    }
}
