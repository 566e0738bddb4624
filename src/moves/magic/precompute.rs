//! Generates rook/bishop magic tables from scratch: relevant-occupancy masks,
//! blocker subset enumeration, scan-based reference attacks, and a magic
//! number search per square.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// How to seed the magic-number search's RNG.
#[derive(Debug, Clone, Copy)]
pub enum MagicTableSeed {
    /// Seed from the OS entropy source (a fresh search every run).
    FromEntropy,
    /// A fixed seed, for reproducible tables across runs.
    Fixed(u64),
}

fn rook_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in (1..rank).rev() {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in (1..file).rev() {
        mask |= 1u64 << (rank * 8 + f);
    }
    mask
}

fn bishop_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    let mut r = rank + 1;
    let mut f = file + 1;
    while r < 7 && f < 7 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f += 1;
    }
    let mut r = rank - 1;
    let mut f = file - 1;
    while r > 0 && f > 0 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f -= 1;
    }
    let mut r = rank + 1;
    let mut f = file - 1;
    while r < 7 && f > 0 {
        mask |= 1u64 << (r * 8 + f);
        r += 1;
        f -= 1;
    }
    let mut r = rank - 1;
    let mut f = file + 1;
    while r > 0 && f < 7 {
        mask |= 1u64 << (r * 8 + f);
        r -= 1;
        f += 1;
    }
    mask
}

/// Enumerate every subset of `mask`'s set bits via the carry-rippler trick.
fn blocker_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry<R: rand::RngCore>(
    square: usize,
    mask: u64,
    attack_fn: fn(usize, u64) -> u64,
    rng: &mut R,
) -> Result<MagicEntry, String> {
    let blockers = blocker_subsets(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attack_fn(square, b)).collect();
    let shift = 64 - mask.count_ones();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)
        .map_err(|e| format!("square {square}: {e}"))?;

    let size = 1usize << mask.count_ones();
    let mut table = vec![0u64; size];
    for (b, &attack) in blockers.iter().zip(attacks.iter()) {
        let index = ((b.wrapping_mul(magic)) >> shift) as usize;
        table[index] = attack;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = match seed {
        MagicTableSeed::FromEntropy => StdRng::from_os_rng(),
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
    };

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        let rook_mask = rook_relevant_mask(square);
        rook_entries.push(build_entry(
            square,
            rook_mask,
            rook_attacks_per_square,
            &mut rng,
        )?);

        let bishop_mask = bishop_relevant_mask(square);
        bishop_entries.push(build_entry(
            square,
            bishop_mask,
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_mask_excludes_edges() {
        let mask = rook_relevant_mask(0); // a1
        // a-file ranks 2..7 and rank-1 files 2..7, excluding h1/a8 edges
        assert_eq!(mask.count_ones(), 12);
    }

    #[test]
    fn bishop_mask_excludes_edges() {
        let mask = bishop_relevant_mask(27); // d4, a fully interior square
        assert_eq!(mask.count_ones(), 9);
    }

    #[test]
    fn generated_tables_match_scan_reference() {
        let tables = generate_magic_tables(MagicTableSeed::Fixed(0x45)).unwrap();
        let square = 27;
        let blockers = (1u64 << 19) | (1u64 << 35);
        assert_eq!(
            tables.rook.get_attacks(square, blockers),
            rook_attacks_per_square(square, blockers)
        );
    }
}
