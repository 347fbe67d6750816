//! Random DNA sequences for benchmarking and the command-line driver.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Sequence;

pub const DNA_ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

pub fn random_dna<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Sequence {
    let data = (0..len)
        .map(|_| DNA_ALPHABET[rng.gen_range(0..DNA_ALPHABET.len())])
        .collect::<Vec<u8>>();
    Sequence::from(data)
}

/// Reproducible pair of sequences for a given seed.
pub fn seeded_pair(rows: usize, cols: usize, seed: u64) -> (Sequence, Sequence) {
    let mut rng = StdRng::seed_from_u64(seed);
    let row_seq = random_dna(rows, &mut rng);
    let col_seq = random_dna(cols, &mut rng);
    (row_seq, col_seq)
}
