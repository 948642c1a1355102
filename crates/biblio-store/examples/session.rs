//! End-to-end session: build a small library through the engine, persist it,
//! and reload it through the integrity-checked store.
//!
//! Run with `cargo run --example session`.

use anyhow::Result;
use biblio_engine::prelude::*;
use biblio_store::{JsonFileStore, SnapshotStore};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::temp_dir().join("biblio-session.json");
    let store = JsonFileStore::new(&path);

    // Resume the previous session if one was saved.
    let mut snapshot = store.load()?.unwrap_or_default();
    let mut engine = SystemEngine::with_system_defaults();

    snapshot = engine.apply(
        &snapshot,
        Action::AddBook(NewBook {
            title: "El nombre del viento".to_owned(),
            author: "Patrick Rothfuss".to_owned(),
            pages: 662,
            saga: Some("Crónica del asesino de reyes".to_owned()),
            ..NewBook::default()
        }),
    );

    let id = snapshot.books.last().map(|b| b.id).unwrap_or(EntityId(0));
    snapshot = engine.apply(
        &snapshot,
        Action::FinishReading {
            id,
            date: None,
            rating: Some(9),
            review: Some("Relectura anual.".to_owned()),
        },
    );

    store.save(&snapshot)?;
    let reloaded = store.load()?.expect("snapshot was just saved");

    tracing::info!(
        path = %path.display(),
        books = reloaded.books.len(),
        sagas = reloaded.sagas.len(),
        points = reloaded.ledger.points.current,
        "session persisted and verified"
    );
    Ok(())
}
