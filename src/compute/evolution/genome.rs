//! Chromosome encoding and genetic operators.
//!
//! A chromosome is a string of `'0'`/`'1'` characters made of fixed-width
//! genes. Each gene is an unsigned integer `d` read as a heading of `d / 10`
//! degrees. Values are not reduced modulo a full turn, so a 12-bit gene spans
//! 0 to 409.5 degrees.

use std::fmt;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bits per gene.
pub const GENE_WIDTH: usize = 12;

/// Largest value a gene can hold.
pub const MAX_GENE_VALUE: u16 = (1 << GENE_WIDTH) - 1;

/// Widest gene `decode` accepts.
const MAX_DECODE_WIDTH: usize = 32;

/// Chromosome decoding and construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid binary digit {found:?} at bit {offset}")]
    InvalidDigit { offset: usize, found: char },
    #[error("Gene width must be between 1 and 32, got {0}")]
    InvalidGeneWidth(usize),
    #[error("Gene {index} value {value} does not fit in 12 bits")]
    GeneOutOfRange { index: usize, value: u16 },
    #[error("Parents have different gene counts ({left} vs {right})")]
    GeneCountMismatch { left: usize, right: usize },
    #[error("Parents have different lengths ({left} vs {right} bits)")]
    LengthMismatch { left: usize, right: usize },
}

/// A binary-string chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chromosome(String);

impl Chromosome {
    /// Validate that `bits` holds only binary digits.
    pub fn parse(bits: impl Into<String>) -> Result<Self, DecodeError> {
        let bits = bits.into();
        if let Some((offset, found)) = bits.char_indices().find(|(_, c)| !matches!(c, '0' | '1'))
        {
            return Err(DecodeError::InvalidDigit { offset, found });
        }
        Ok(Self(bits))
    }

    /// Encode gene values as zero-padded 12-bit groups.
    pub fn from_genes(values: &[u16]) -> Result<Self, DecodeError> {
        let mut bits = String::with_capacity(values.len() * GENE_WIDTH);
        for (index, &value) in values.iter().enumerate() {
            if value > MAX_GENE_VALUE {
                return Err(DecodeError::GeneOutOfRange { index, value });
            }
            push_gene(&mut bits, value);
        }
        Ok(Self(bits))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of genes, counting a trailing partial gene.
    #[inline]
    pub fn gene_count(&self) -> usize {
        self.0.len().div_ceil(GENE_WIDTH)
    }

    /// Genes by position. The last one is shorter if the length is not a
    /// multiple of [`GENE_WIDTH`].
    pub fn genes(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.0.len())
            .step_by(GENE_WIDTH)
            .map(move |i| &self.0[i..(i + GENE_WIDTH).min(self.0.len())])
    }

    /// Decode into headings in radians.
    pub fn decode(&self) -> Result<Vec<f64>, DecodeError> {
        decode(&self.0, GENE_WIDTH)
    }

    /// Invert one bit. Positions are always ASCII digits.
    fn flip(&mut self, position: usize) {
        let flipped = if self.0.as_bytes()[position] == b'1' {
            "0"
        } else {
            "1"
        };
        self.0.replace_range(position..=position, flipped);
    }
}

impl TryFrom<String> for Chromosome {
    type Error = DecodeError;

    fn try_from(bits: String) -> Result<Self, Self::Error> {
        Self::parse(bits)
    }
}

impl From<Chromosome> for String {
    fn from(chromosome: Chromosome) -> Self {
        chromosome.0
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_gene(bits: &mut String, value: u16) {
    use std::fmt::Write as _;
    // Writing to a String cannot fail
    let _ = write!(bits, "{value:0width$b}", width = GENE_WIDTH);
}

/// Random chromosome of `steps` genes, each uniform in `[0, max_value]`.
///
/// `max_value` is clamped to [`MAX_GENE_VALUE`].
pub fn create_chromosome<R: Rng + ?Sized>(steps: usize, max_value: u16, rng: &mut R) -> Chromosome {
    let max_value = max_value.min(MAX_GENE_VALUE);
    let mut bits = String::with_capacity(steps * GENE_WIDTH);
    for _ in 0..steps {
        push_gene(&mut bits, rng.gen_range(0..=max_value));
    }
    Chromosome(bits)
}

/// Split `bits` into `gene_width` chunks and convert each to radians.
///
/// A trailing chunk shorter than `gene_width` is parsed as-is.
pub fn decode(bits: &str, gene_width: usize) -> Result<Vec<f64>, DecodeError> {
    if gene_width == 0 || gene_width > MAX_DECODE_WIDTH {
        return Err(DecodeError::InvalidGeneWidth(gene_width));
    }

    bits.as_bytes()
        .chunks(gene_width)
        .enumerate()
        .map(|(chunk_idx, chunk)| {
            let mut value = 0u64;
            for (bit_idx, &byte) in chunk.iter().enumerate() {
                let bit = match byte {
                    b'0' => 0,
                    b'1' => 1,
                    _ => {
                        let offset = chunk_idx * gene_width + bit_idx;
                        let found = bits
                            .get(offset..)
                            .and_then(|rest| rest.chars().next())
                            .unwrap_or(byte as char);
                        return Err(DecodeError::InvalidDigit { offset, found });
                    }
                };
                value = (value << 1) | bit;
            }
            Ok(gene_angle(value))
        })
        .collect()
}

/// Heading in radians for a raw gene value.
#[inline]
pub fn gene_angle(value: u64) -> f64 {
    (value as f64 / 10.0).to_radians()
}

/// Uniform gene-level crossover: each gene comes whole from one parent, chosen
/// by a fair coin.
pub fn crossover<R: Rng + ?Sized>(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    rng: &mut R,
) -> Result<Chromosome, DecodeError> {
    if parent_a.gene_count() != parent_b.gene_count() {
        return Err(DecodeError::GeneCountMismatch {
            left: parent_a.gene_count(),
            right: parent_b.gene_count(),
        });
    }
    // Same gene count but a different trailing partial gene
    if parent_a.len() != parent_b.len() {
        return Err(DecodeError::LengthMismatch {
            left: parent_a.len(),
            right: parent_b.len(),
        });
    }

    let mut bits = String::with_capacity(parent_a.len());
    for (gene_a, gene_b) in parent_a.genes().zip(parent_b.genes()) {
        bits.push_str(if rng.gen_bool(0.5) { gene_a } else { gene_b });
    }
    Ok(Chromosome(bits))
}

/// Flip `severity` uniformly chosen bits, with replacement.
///
/// Repeated positions cancel, so at most `severity` bits change.
pub fn mutate<R: Rng + ?Sized>(chromosome: &mut Chromosome, severity: usize, rng: &mut R) {
    if chromosome.is_empty() {
        return;
    }
    for _ in 0..severity {
        let position = rng.gen_range(0..chromosome.len());
        chromosome.flip(position);
    }
}

/// Number of differing bits. Extra bits in the longer chromosome count as
/// differences.
pub fn hamming_distance(a: &Chromosome, b: &Chromosome) -> usize {
    let common = a
        .as_str()
        .bytes()
        .zip(b.as_str().bytes())
        .filter(|(x, y)| x != y)
        .count();
    common + a.len().abs_diff(b.len())
}

/// Random number generator wrapper for genome operations.
#[derive(Clone)]
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RngCore for GenomeRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        let chromosome = Chromosome::from_genes(&[0, 3600, 4095]).unwrap();
        assert_eq!(chromosome.len(), 36);

        let angles = chromosome.decode().unwrap();
        assert_eq!(angles.len(), 3);
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - 360f64.to_radians()).abs() < 1e-12);
        assert!((angles[2] - 409.5f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_decode_short_trailing_chunk() {
        // 12 bits of 1 then "101" = 5
        let angles = decode("111111111111101", 12).unwrap();
        assert_eq!(angles.len(), 2);
        assert!((angles[1] - 0.5f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_decode_rejects_non_binary() {
        let bits = format!("{}2{}", "0".repeat(10), "0".repeat(5));
        assert_eq!(
            decode(&bits, 12),
            Err(DecodeError::InvalidDigit {
                offset: 10,
                found: '2'
            })
        );
        assert_eq!(decode("0101", 0), Err(DecodeError::InvalidGeneWidth(0)));
    }

    #[test]
    fn test_parse_validates() {
        assert!(Chromosome::parse("0101").is_ok());
        assert!(matches!(
            Chromosome::parse("01x1"),
            Err(DecodeError::InvalidDigit { offset: 2, found: 'x' })
        ));
    }

    #[test]
    fn test_from_genes_range() {
        assert_eq!(
            Chromosome::from_genes(&[1, 4096]),
            Err(DecodeError::GeneOutOfRange {
                index: 1,
                value: 4096
            })
        );
        let c = Chromosome::from_genes(&[5]).unwrap();
        assert_eq!(c.as_str(), "000000000101");
    }

    #[test]
    fn test_create_chromosome_shape() {
        let mut rng = GenomeRng::new(42);
        let c = create_chromosome(25, 3600, &mut rng);
        assert_eq!(c.len(), 25 * GENE_WIDTH);
        assert_eq!(c.gene_count(), 25);
        for gene in c.genes() {
            let value = u16::from_str_radix(gene, 2).unwrap();
            assert!(value <= 3600);
        }
    }

    #[test]
    fn test_create_chromosome_deterministic() {
        let a = create_chromosome(10, 3600, &mut GenomeRng::new(7));
        let b = create_chromosome(10, 3600, &mut GenomeRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_identical_parents() {
        let parent = create_chromosome(25, 3600, &mut GenomeRng::new(1));
        let child = crossover(&parent, &parent, &mut GenomeRng::new(2)).unwrap();
        assert_eq!(child, parent);
    }

    #[test]
    fn test_crossover_takes_whole_genes() {
        let zeros = Chromosome::from_genes(&[0; 25]).unwrap();
        let ones = Chromosome::from_genes(&[MAX_GENE_VALUE; 25]).unwrap();
        let child = crossover(&zeros, &ones, &mut GenomeRng::new(3)).unwrap();
        for gene in child.genes() {
            assert!(gene == "000000000000" || gene == "111111111111", "{gene}");
        }
    }

    #[test]
    fn test_crossover_mismatch() {
        let a = Chromosome::from_genes(&[0; 3]).unwrap();
        let b = Chromosome::from_genes(&[0; 4]).unwrap();
        assert_eq!(
            crossover(&a, &b, &mut GenomeRng::new(0)),
            Err(DecodeError::GeneCountMismatch { left: 3, right: 4 })
        );
    }

    #[test]
    fn test_crossover_partial_gene_mismatch() {
        let a = Chromosome::parse("0".repeat(24)).unwrap();
        let b = Chromosome::parse("0".repeat(23)).unwrap();
        assert_eq!(a.gene_count(), b.gene_count());
        assert_eq!(
            crossover(&a, &b, &mut GenomeRng::new(0)),
            Err(DecodeError::LengthMismatch {
                left: 24,
                right: 23
            })
        );
    }

    #[test]
    fn test_mutate_bounded() {
        let mut rng = GenomeRng::new(11);
        for _ in 0..100 {
            let original = create_chromosome(25, 3600, &mut rng);
            let mut mutated = original.clone();
            mutate(&mut mutated, 4, &mut rng);
            assert!(hamming_distance(&original, &mutated) <= 4);
            assert_eq!(mutated.len(), original.len());
        }
    }

    #[test]
    fn test_mutate_single_flip() {
        let original = Chromosome::from_genes(&[0; 2]).unwrap();
        let mut mutated = original.clone();
        mutate(&mut mutated, 1, &mut GenomeRng::new(5));
        assert_eq!(hamming_distance(&original, &mutated), 1);
        assert!(Chromosome::parse(mutated.as_str()).is_ok());
    }

    #[test]
    fn test_mutate_empty_is_noop() {
        let mut empty = Chromosome::parse("").unwrap();
        mutate(&mut empty, 4, &mut GenomeRng::new(0));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_serde_validates() {
        let c: Chromosome = serde_json::from_str("\"0110\"").unwrap();
        assert_eq!(c.as_str(), "0110");
        assert!(serde_json::from_str::<Chromosome>("\"01a0\"").is_err());
    }
}
