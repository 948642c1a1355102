//! Property tests for the transition engine.
//!
//! These tests use `proptest` to generate random action sequences and verify
//! that the cross-entity invariants hold after every single transition:
//! saga aggregates, the manga ownership counts, ledger accounting, and the
//! history-log/state agreement.

use biblio_engine::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Compressed action generator. Entity ids are drawn from a small range so
/// sequences mix hits (sequential ids start at 1) with guaranteed misses.
#[derive(Debug, Clone)]
enum EngineOp {
    AddBook { pages: u32, saga: Option<u8> },
    ChangeState { id: u64, state: ReadingState },
    Finish { id: u64 },
    Abandon { id: u64 },
    Buy { id: u64 },
    Loan { id: u64 },
    Return { id: u64 },
    DeleteBook { id: u64 },
    AddCollection { total: u32 },
    AddVolume { collection: u64 },
    BuyVolume { collection: u64, volume: u64 },
    ReadVolume { collection: u64, volume: u64 },
    RemoveVolume { collection: u64, volume: u64 },
    BuyWithPoints { id: u64 },
    SwitchMode,
    Scan,
    Search,
}

fn state_strategy() -> impl Strategy<Value = ReadingState> {
    prop_oneof![
        Just(ReadingState::Wishlist),
        Just(ReadingState::ToRead),
        Just(ReadingState::Reading),
        Just(ReadingState::Read),
        Just(ReadingState::Abandoned),
        Just(ReadingState::Purchased),
    ]
}

fn op_strategy() -> impl Strategy<Value = EngineOp> {
    let id = 1..40u64;
    prop_oneof![
        (1..600u32, prop::option::of(0..3u8))
            .prop_map(|(pages, saga)| EngineOp::AddBook { pages, saga }),
        (id.clone(), state_strategy()).prop_map(|(id, state)| EngineOp::ChangeState { id, state }),
        id.clone().prop_map(|id| EngineOp::Finish { id }),
        id.clone().prop_map(|id| EngineOp::Abandon { id }),
        id.clone().prop_map(|id| EngineOp::Buy { id }),
        id.clone().prop_map(|id| EngineOp::Loan { id }),
        id.clone().prop_map(|id| EngineOp::Return { id }),
        id.clone().prop_map(|id| EngineOp::DeleteBook { id }),
        (1..6u32).prop_map(|total| EngineOp::AddCollection { total }),
        id.clone().prop_map(|collection| EngineOp::AddVolume { collection }),
        (id.clone(), id.clone())
            .prop_map(|(collection, volume)| EngineOp::BuyVolume { collection, volume }),
        (id.clone(), id.clone())
            .prop_map(|(collection, volume)| EngineOp::ReadVolume { collection, volume }),
        (id.clone(), id.clone())
            .prop_map(|(collection, volume)| EngineOp::RemoveVolume { collection, volume }),
        id.prop_map(|id| EngineOp::BuyWithPoints { id }),
        Just(EngineOp::SwitchMode),
        Just(EngineOp::Scan),
        Just(EngineOp::Search),
    ]
}

fn to_action(op: EngineOp, tick: i64) -> Action {
    match op {
        EngineOp::AddBook { pages, saga } => Action::AddBook(NewBook {
            title: format!("Libro {tick}"),
            author: "Autor".to_owned(),
            pages,
            state: None,
            saga: saga.map(|s| format!("Saga {s}")),
        }),
        EngineOp::ChangeState { id, state } => Action::ChangeBookState {
            id: EntityId(id),
            state,
            note: None,
        },
        EngineOp::Finish { id } => Action::FinishReading {
            id: EntityId(id),
            date: Some(tick),
            rating: Some(7),
            review: None,
        },
        EngineOp::Abandon { id } => Action::AbandonBook {
            id: EntityId(id),
            note: None,
        },
        EngineOp::Buy { id } => Action::BuyBook {
            id: EntityId(id),
            price: Some(12.0),
            date: Some(tick),
        },
        EngineOp::Loan { id } => Action::LoanBook {
            id: EntityId(id),
            to: "Alguien".to_owned(),
            date: Some(tick),
        },
        EngineOp::Return { id } => Action::ReturnBook { id: EntityId(id) },
        EngineOp::DeleteBook { id } => Action::DeleteBook { id: EntityId(id) },
        EngineOp::AddCollection { total } => Action::AddCollection(NewCollection {
            title: format!("Colección {tick}"),
            total_volumes: total,
            price_per_volume: 8.0,
        }),
        EngineOp::AddVolume { collection } => Action::AddVolume {
            collection_id: EntityId(collection),
            volume: NewVolume {
                number: 1,
                state: None,
            },
        },
        EngineOp::BuyVolume { collection, volume } => Action::BuyVolume {
            collection_id: EntityId(collection),
            volume_id: EntityId(volume),
            date: Some(tick),
        },
        EngineOp::ReadVolume { collection, volume } => Action::ReadVolume {
            collection_id: EntityId(collection),
            volume_id: EntityId(volume),
            date: Some(tick),
            rating: None,
            review: None,
        },
        EngineOp::RemoveVolume { collection, volume } => Action::RemoveVolume {
            collection_id: EntityId(collection),
            volume_id: EntityId(volume),
        },
        EngineOp::BuyWithPoints { id } => Action::BuyBookWithPoints { id: EntityId(id) },
        EngineOp::SwitchMode => Action::SetCurrencyMode(if tick % 2 == 0 {
            CurrencyMode::Money
        } else {
            CurrencyMode::Points
        }),
        EngineOp::Scan => Action::RecordScan {
            code: format!("isbn-{tick}"),
            date: Some(tick),
        },
        EngineOp::Search => Action::RecordSearch {
            term: format!("término {tick}"),
        },
    }
}

/// The cross-entity invariants every settled snapshot must satisfy.
fn assert_invariants(snapshot: &LibrarySnapshot) -> Result<(), TestCaseError> {
    // Saga aggregates agree with the book collection.
    for saga in &snapshot.sagas {
        prop_assert!(saga.count > 0, "zero-member saga survived: {:?}", saga.id);
        prop_assert_eq!(saga.count as usize, saga.book_ids.len());
        let members: Vec<_> = snapshot
            .books
            .iter()
            .filter(|b| b.saga_id == Some(saga.id))
            .collect();
        prop_assert_eq!(members.len(), saga.book_ids.len());
        if saga.is_complete {
            prop_assert!(members.iter().all(|b| b.state == ReadingState::Read));
        }
    }

    // Ledger accounting.
    for balance in [&snapshot.ledger.points, &snapshot.ledger.money] {
        prop_assert!(balance.current >= 0.0);
        prop_assert!(balance.current <= balance.earned);
    }

    // History logs agree with current states.
    for book in &snapshot.books {
        if !book.history.is_empty() {
            prop_assert_eq!(book.history.last_state(), Some(book.state));
        }
    }

    // Collection aggregates agree with a fresh recount.
    for collection in &snapshot.collections {
        let owned = collection
            .volumes
            .iter()
            .filter(|v| volume_is_owned(v))
            .count() as u32;
        prop_assert_eq!(collection.owned_count, owned);
        let read = collection
            .volumes
            .iter()
            .filter(|v| v.state == ReadingState::Read)
            .count() as u32;
        prop_assert_eq!(collection.read_count, read);
        prop_assert_eq!(
            collection.is_complete,
            collection.volumes.len() as u32 == collection.total_volumes
        );
        prop_assert_eq!(
            collection.total_value,
            f64::from(owned) * collection.price_per_volume
        );
        for volume in &collection.volumes {
            prop_assert_eq!(volume.history.last_state(), Some(volume.state));
        }
    }

    // Retention caps.
    prop_assert!(snapshot.scan_history.len() <= SCAN_HISTORY_CAP);
    prop_assert!(snapshot.search_history.len() <= SEARCH_HISTORY_CAP);

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn random_action_sequences_preserve_invariants(
        ops in prop::collection::vec(op_strategy(), 1..60)
    ) {
        let mut engine = Engine::new(SequentialIds::new(), FixedClock(1_000));
        let mut snapshot = LibrarySnapshot::default();

        for (tick, op) in ops.into_iter().enumerate() {
            snapshot = engine.apply(&snapshot, to_action(op, tick as i64));
            assert_invariants(&snapshot)?;
        }
    }

    #[test]
    fn absent_ids_never_change_the_snapshot(
        ops in prop::collection::vec(op_strategy(), 1..20)
    ) {
        let mut engine = Engine::new(SequentialIds::new(), FixedClock(1_000));
        let mut snapshot = LibrarySnapshot::default();
        for (tick, op) in ops.into_iter().enumerate() {
            snapshot = engine.apply(&snapshot, to_action(op, tick as i64));
        }

        // Shift every referenced id far past anything the generator issued.
        let absent = EntityId(999_999);
        let probes = vec![
            Action::DeleteBook { id: absent },
            Action::FinishReading { id: absent, date: Some(0), rating: None, review: None },
            Action::ReadVolume {
                collection_id: absent,
                volume_id: absent,
                date: Some(0),
                rating: None,
                review: None,
            },
            Action::BuyBookWithPoints { id: absent },
        ];
        for probe in probes {
            let next = engine.apply(&snapshot, probe);
            prop_assert_eq!(&next, &snapshot);
        }
    }
}
