//! Builds (or loads) the rook/bishop magic tables once per process and
//! caches them behind a [`OnceCell`].

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;
use once_cell::sync::OnceCell;

static MAGIC_TABLES: OnceCell<MagicTables> = OnceCell::new();

#[cfg(feature = "load_magic")]
const MAGIC_CACHE_PATH: &str = "magic_tables.bin";

fn search_seed() -> MagicTableSeed {
    #[cfg(feature = "deterministic_magic")]
    {
        MagicTableSeed::Fixed(0x5eed_1234_5678_9abc)
    }
    #[cfg(not(feature = "deterministic_magic"))]
    {
        MagicTableSeed::FromEntropy
    }
}

#[cfg(feature = "load_magic")]
fn build() -> MagicTables {
    use std::fs;

    if let Ok(bytes) = fs::read(MAGIC_CACHE_PATH)
        && let Ok(tables) = bincode::deserialize::<MagicTables>(&bytes)
    {
        return tables;
    }

    let tables = generate_magic_tables(search_seed()).expect("magic number search failed");
    if let Ok(bytes) = bincode::serialize(&tables) {
        let _ = fs::write(MAGIC_CACHE_PATH, bytes);
    }
    tables
}

#[cfg(not(feature = "load_magic"))]
fn build() -> MagicTables {
    generate_magic_tables(search_seed()).expect("magic number search failed")
}

/// Returns the process-wide rook/bishop magic tables, building them on first use.
pub fn load_magic_tables() -> MagicTables {
    MAGIC_TABLES.get_or_init(build).clone()
}
