//! Symbol namespace and mosaic id derivation.
//!
//! Ids are the first eight digest bytes read little-endian. Namespace ids
//! always have the high bit set and mosaic ids never do, so the two id spaces
//! cannot collide.

use crate::config::NAMESPACE_FLAG;
use crate::crypto::sha3_256;
use crate::error::BuildError;

use super::Address;

fn id_from_digest(digest: [u8; 32]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Id of the namespace `name` below `parent` (0 for a root namespace).
pub fn generate_namespace_id(name: &str, parent: u64) -> u64 {
    let mut data = parent.to_le_bytes().to_vec();
    data.extend_from_slice(name.as_bytes());
    id_from_digest(sha3_256(&data)) | NAMESPACE_FLAG
}

/// Id of the mosaic created by `owner` with `nonce`.
pub fn generate_mosaic_id(owner: &Address, nonce: u32) -> u64 {
    let mut data = nonce.to_le_bytes().to_vec();
    data.extend_from_slice(owner.as_bytes());
    id_from_digest(sha3_256(&data)) & !NAMESPACE_FLAG
}

/// Namespace parts may only use lowercase letters, digits, `-` and `_`.
pub fn is_valid_namespace_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Ids of every level of a dotted name, root first.
pub fn generate_namespace_path(fully_qualified_name: &str) -> Result<Vec<u64>, BuildError> {
    let mut path: Vec<u64> = Vec::new();
    for name in fully_qualified_name.split('.') {
        if !is_valid_namespace_name(name) {
            return Err(BuildError::invalid(
                "namespace",
                format!("`{fully_qualified_name}` contains invalid part `{name}`"),
            ));
        }
        let parent = path.last().copied().unwrap_or(0);
        path.push(generate_namespace_id(name, parent));
    }
    Ok(path)
}

/// Id a mosaic alias such as `symbol.xym` resolves through.
pub fn generate_mosaic_alias_id(fully_qualified_name: &str) -> Result<u64, BuildError> {
    let path = generate_namespace_path(fully_qualified_name)?;
    path.last().copied().ok_or_else(|| {
        BuildError::invalid("namespace", "empty namespace path")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PublicKey;
    use crate::network::NetworkFamily;

    #[test]
    fn well_known_namespace_ids() {
        assert_eq!(generate_namespace_id("symbol", 0), 0xA95F_1F8A_9615_9516);
        assert_eq!(
            generate_mosaic_alias_id("symbol.xym").unwrap(),
            0xE74B_99BA_41F4_AFEE
        );
    }

    #[test]
    fn namespace_path_is_chained() {
        let path = generate_namespace_path("symbol.xym").unwrap();
        assert_eq!(path, vec![0xA95F_1F8A_9615_9516, 0xE74B_99BA_41F4_AFEE]);
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(generate_namespace_path("Symbol").is_err());
        assert!(generate_namespace_path("symbol..xym").is_err());
        assert!(!is_valid_namespace_name("a b"));
        assert!(is_valid_namespace_name("my_ns-1"));
    }

    #[test]
    fn mosaic_ids_clear_the_namespace_bit() {
        let owner = Address::from_public_key(
            NetworkFamily::Symbol,
            0x98,
            &PublicKey::from_bytes([9u8; 32]),
        );
        for nonce in 0..32 {
            assert_eq!(generate_mosaic_id(&owner, nonce) & NAMESPACE_FLAG, 0);
        }
        assert_ne!(generate_mosaic_id(&owner, 1), generate_mosaic_id(&owner, 2));
    }
}
