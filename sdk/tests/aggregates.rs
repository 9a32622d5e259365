//! Aggregate binding, cosignatures and embedded ordering.

use ledgerkit::crypto::{KeyPair, PrivateKey};
use ledgerkit::network::Network;
use ledgerkit::transaction::{AggregateAssembler, EmbeddedTransaction};
use ledgerkit::value::Value;
use ledgerkit::{descriptor, Descriptor, Entity, Facade, Transaction};

fn facade() -> Facade {
    Facade::new(Network::symbol_testnet()).unwrap()
}

fn key_pair(facade: &Facade, seed: u8) -> KeyPair {
    facade.key_pair(PrivateKey::from_bytes([seed; 32]))
}

fn transfer(facade: &Facade, signer: &KeyPair, message: &str) -> EmbeddedTransaction {
    facade
        .factory()
        .create_embedded(&descriptor! {
            "type" => "transfer_transaction",
            "signer_public_key" => signer.public_key(),
            "recipient_address" => facade.address(&signer.public_key()),
            "message" => message,
        })
        .unwrap()
}

fn aggregate(facade: &Facade, embedded: &[EmbeddedTransaction]) -> Transaction {
    let mut assembler = AggregateAssembler::complete(facade.factory());
    for transaction in embedded {
        assembler.push(transaction.clone());
    }
    assembler
        .assemble(&descriptor! {
            "signer_public_key" => key_pair(facade, 1).public_key(),
            "fee" => 1_000u64,
            "deadline" => 42u64,
        })
        .unwrap()
}

#[test]
fn embedded_order_changes_the_aggregate_hash() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let a = transfer(&facade, &alice, "first");
    let b = transfer(&facade, &alice, "second");

    let forward = aggregate(&facade, &[a.clone(), b.clone()]);
    let backward = aggregate(&facade, &[b.clone(), a.clone()]);

    assert_ne!(
        facade.hash_embedded_transactions(&[a.clone(), b.clone()]),
        facade.hash_embedded_transactions(&[b, a])
    );
    assert_ne!(
        forward.value().get_bytes("transactions_hash"),
        backward.value().get_bytes("transactions_hash")
    );
    assert_ne!(
        facade.hash_transaction(&forward).unwrap(),
        facade.hash_transaction(&backward).unwrap()
    );
}

#[test]
fn embedded_hash_is_byte_sensitive_and_deterministic() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let a = transfer(&facade, &alice, "payload");
    let b = transfer(&facade, &alice, "payloae");

    let first = facade.hash_embedded_transactions(&[a.clone()]);
    assert_eq!(first, facade.hash_embedded_transactions(&[a.clone()]));
    assert_ne!(first, facade.hash_embedded_transactions(&[b]));
    assert_ne!(first, facade.hash_embedded_transactions(&[a.clone(), a]));
}

#[test]
fn adding_or_removing_embedded_transactions_changes_the_hash() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let a = transfer(&facade, &alice, "a");
    let b = transfer(&facade, &alice, "b");
    let c = transfer(&facade, &alice, "c");
    let d = transfer(&facade, &alice, "d");

    let three = facade.hash_embedded_transactions(&[a.clone(), b.clone(), c.clone()]);
    let appended =
        facade.hash_embedded_transactions(&[a.clone(), b.clone(), c.clone(), d.clone()]);
    let removed_tail = facade.hash_embedded_transactions(&[a.clone(), b.clone()]);
    let removed_head = facade.hash_embedded_transactions(&[b.clone(), c.clone()]);
    let prepended = facade.hash_embedded_transactions(&[d, a, b, c]);

    for other in [appended, removed_tail, removed_head, prepended] {
        assert_ne!(three, other);
    }
}

#[test]
fn repeating_the_odd_tail_keeps_the_merkle_root() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let a = transfer(&facade, &alice, "a");
    let b = transfer(&facade, &alice, "b");
    let c = transfer(&facade, &alice, "c");

    assert_eq!(
        facade.hash_embedded_transactions(&[a.clone(), b.clone(), c.clone()]),
        facade.hash_embedded_transactions(&[a.clone(), b.clone(), c.clone(), c])
    );
    assert_ne!(
        facade.hash_embedded_transactions(&[a.clone(), b.clone()]),
        facade.hash_embedded_transactions(&[a, b.clone(), b])
    );
}

#[test]
fn rebinding_follows_edits() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let mut aggregate = aggregate(&facade, &[transfer(&facade, &alice, "one")]);
    let before = facade.hash_transaction(&aggregate).unwrap();

    let extra = transfer(&facade, &alice, "two");
    let mut embedded: Vec<Value> = aggregate
        .embedded_transactions()
        .into_iter()
        .map(|transaction| Value::Struct(transaction.into_inner()))
        .collect();
    embedded.push(Value::Struct(extra.into_inner()));
    aggregate.set("transactions", Value::Array(embedded)).unwrap();

    facade.bind_aggregate(&mut aggregate).unwrap();
    assert_eq!(aggregate.embedded_transactions().len(), 2);
    assert_ne!(facade.hash_transaction(&aggregate).unwrap(), before);
}

#[test]
fn cosignatures_verify_independently() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let bob = key_pair(&facade, 3);
    let carol = key_pair(&facade, 4);
    let mut aggregate = aggregate(&facade, &[transfer(&facade, &alice, "cosigned")]);
    let hash = facade.hash_transaction(&aggregate).unwrap();

    let from_bob = facade.cosign_transaction(&bob, &aggregate).unwrap();
    let from_carol = facade.cosign_transaction(&carol, &aggregate).unwrap();
    facade.add_cosignature(&mut aggregate, &from_carol).unwrap();
    facade.add_cosignature(&mut aggregate, &from_bob).unwrap();

    // Cosignatures sit outside the hashed range.
    assert_eq!(facade.hash_transaction(&aggregate).unwrap(), hash);
    assert_eq!(
        aggregate.cosignatures().unwrap(),
        vec![from_carol.clone(), from_bob.clone()]
    );

    assert!(facade.verify_cosignature(&aggregate, &from_bob).unwrap());
    assert!(facade.verify_cosignature(&aggregate, &from_carol).unwrap());

    let mut without_carol = aggregate.clone();
    without_carol
        .set(
            "cosignatures",
            Value::Array(vec![Value::Struct(from_bob.to_value())]),
        )
        .unwrap();
    assert!(facade.verify_cosignature(&without_carol, &from_bob).unwrap());

    let mut tampered = from_bob;
    tampered.signer_public_key = carol.public_key();
    assert!(!facade.verify_cosignature(&aggregate, &tampered).unwrap());
}

#[test]
fn detached_cosignature_names_its_parent() {
    let facade = facade();
    let alice = key_pair(&facade, 2);
    let aggregate = aggregate(&facade, &[transfer(&facade, &alice, "detached")]);
    let detached = facade
        .cosign_transaction_detached(&key_pair(&facade, 5), &aggregate)
        .unwrap();

    assert_eq!(detached.parent_hash, facade.hash_transaction(&aggregate).unwrap());
    assert!(facade
        .verify_cosignature(&aggregate, &detached.cosignature())
        .unwrap());
}

#[test]
fn signed_aggregate_with_cosignatures_round_trips() {
    let facade = facade();
    let alice = key_pair(&facade, 1);
    let bob = key_pair(&facade, 3);
    let aggregate = aggregate(
        &facade,
        &[
            transfer(&facade, &alice, "a"),
            transfer(&facade, &bob, "bb"),
            transfer(&facade, &alice, "ccc"),
        ],
    );

    let signed = facade.pipeline(aggregate).run(&alice).unwrap();
    let mut transaction = signed.transaction;
    let cosignature = facade.cosign_transaction(&bob, &transaction).unwrap();
    facade.add_cosignature(&mut transaction, &cosignature).unwrap();

    let bytes = transaction.serialize();
    assert_eq!(bytes.len() % 8, 0);
    let decoded = facade.deserialize_transaction(&bytes).unwrap();
    assert_eq!(decoded, transaction);
    assert_eq!(decoded.embedded_transactions().len(), 3);
    assert_eq!(decoded.cosignatures().unwrap(), vec![cosignature]);
    assert!(facade.verify_transaction(&decoded, &decoded.signature().unwrap()));
}

#[test]
fn aggregate_descriptor_can_nest_plain_descriptors() {
    let facade = facade();
    let aggregate = facade
        .factory()
        .create(&descriptor! {
            "type" => "aggregate_bonded_transaction",
            "transactions" => vec![Descriptor::new()
                .with("type", "mosaic_supply_change_transaction")
                .with("delta", 5u64)
                .with("action", "decrease")],
        })
        .unwrap();

    let embedded = aggregate.embedded_transactions();
    assert_eq!(embedded.len(), 1);
    assert_eq!(embedded[0].type_name(), "EmbeddedMosaicSupplyChangeTransaction");
    // Nested entities inherit the factory network.
    assert_eq!(embedded[0].value().get_unsigned("network"), Some(0x98));
}
