//! Evaluated organisms.

use rand::Rng;

use crate::compute::{PixelPoint, Point};
use crate::schema::OrganismSnapshot;

use super::fitness::Landscape;
use super::genome::{Chromosome, DecodeError, crossover, mutate};

/// How a child is produced from two parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breeding {
    /// Uniform gene crossover only.
    Crossover,
    /// Crossover followed by `severity` point flips.
    Mutated { severity: usize },
}

/// One candidate: a chromosome and everything derived from it.
///
/// Organisms never change after construction; selection clones them.
#[derive(Debug, Clone, PartialEq)]
pub struct Organism {
    chromosome: Chromosome,
    rotations: Vec<f64>,
    points: Vec<Point>,
    drawing: Vec<PixelPoint>,
    fitness: u64,
}

impl Organism {
    /// Decode, trace and score a chromosome.
    pub fn from_chromosome(
        chromosome: Chromosome,
        landscape: &Landscape,
    ) -> Result<Self, DecodeError> {
        let rotations = chromosome.decode()?;
        let (traced, fitness) = landscape.evaluate(&rotations);

        Ok(Self {
            chromosome,
            rotations,
            points: traced.points,
            drawing: traced.drawing,
            fitness,
        })
    }

    /// Breed a child from two parents and score it.
    pub fn from_parents<R: Rng + ?Sized>(
        parent_a: &Organism,
        parent_b: &Organism,
        landscape: &Landscape,
        breeding: Breeding,
        rng: &mut R,
    ) -> Result<Self, DecodeError> {
        let mut chromosome = crossover(&parent_a.chromosome, &parent_b.chromosome, rng)?;
        if let Breeding::Mutated { severity } = breeding {
            mutate(&mut chromosome, severity, rng);
        }
        Self::from_chromosome(chromosome, landscape)
    }

    #[inline]
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// Headings in radians, one per gene.
    #[inline]
    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    /// The chain, beginning at the landscape's start.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `points` truncated for rasterization.
    #[inline]
    pub fn drawing(&self) -> &[PixelPoint] {
        &self.drawing
    }

    /// Cost; lower is better.
    #[inline]
    pub fn fitness(&self) -> u64 {
        self.fitness
    }

    /// Final point of the chain.
    #[inline]
    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or_default()
    }

    /// Convert to snapshot for serialization.
    pub fn to_snapshot(&self) -> OrganismSnapshot {
        OrganismSnapshot {
            chromosome: self.chromosome.to_string(),
            rotations: self.rotations.clone(),
            points: self.points.clone(),
            fitness: self.fitness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evolution::genome::{
        GENE_WIDTH, GenomeRng, create_chromosome, hamming_distance,
    };

    #[test]
    fn test_all_zero_chromosome() {
        let landscape = Landscape::default();
        let chromosome = Chromosome::from_genes(&[0; 25]).unwrap();
        let organism = Organism::from_chromosome(chromosome, &landscape).unwrap();

        assert_eq!(organism.rotations(), &[0.0; 25]);
        assert_eq!(organism.points().len(), 26);
        assert_eq!(organism.points()[0], landscape.start);
        assert!((organism.end().x - 2625.0).abs() < 1e-9);
        assert!((organism.end().y - 100.0).abs() < 1e-9);
        assert_eq!(organism.drawing().last(), Some(&PixelPoint { x: 2625, y: 100 }));
        assert_eq!(organism.fitness(), 3_765_625);
    }

    #[test]
    fn test_from_chromosome_is_deterministic() {
        let landscape = Landscape::default();
        let chromosome = create_chromosome(25, 3600, &mut GenomeRng::new(9));
        let a = Organism::from_chromosome(chromosome.clone(), &landscape).unwrap();
        let b = Organism::from_chromosome(chromosome, &landscape).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_crossover_child_genes_from_parents() {
        let landscape = Landscape::default();
        let mut rng = GenomeRng::new(21);
        let a = Organism::from_chromosome(create_chromosome(25, 3600, &mut rng), &landscape)
            .unwrap();
        let b = Organism::from_chromosome(create_chromosome(25, 3600, &mut rng), &landscape)
            .unwrap();

        for _ in 0..20 {
            let child =
                Organism::from_parents(&a, &b, &landscape, Breeding::Crossover, &mut rng).unwrap();
            assert_eq!(child.chromosome().len(), 25 * GENE_WIDTH);
            for ((gc, ga), gb) in child
                .chromosome()
                .genes()
                .zip(a.chromosome().genes())
                .zip(b.chromosome().genes())
            {
                assert!(gc == ga || gc == gb);
            }
        }
    }

    #[test]
    fn test_mutated_child_bounded_by_severity() {
        let landscape = Landscape::default();
        let parent =
            Organism::from_chromosome(create_chromosome(25, 3600, &mut GenomeRng::new(4)), &landscape)
                .unwrap();
        let mut rng = GenomeRng::new(5);
        for _ in 0..50 {
            // Identical parents make the crossover result equal to the parent
            let child = Organism::from_parents(
                &parent,
                &parent,
                &landscape,
                Breeding::Mutated { severity: 4 },
                &mut rng,
            )
            .unwrap();
            assert!(hamming_distance(parent.chromosome(), child.chromosome()) <= 4);
        }
    }

    #[test]
    fn test_parents_untouched() {
        let landscape = Landscape::default();
        let a = Organism::from_chromosome(Chromosome::from_genes(&[0; 5]).unwrap(), &landscape)
            .unwrap();
        let b = Organism::from_chromosome(Chromosome::from_genes(&[900; 5]).unwrap(), &landscape)
            .unwrap();
        let (a_before, b_before) = (a.clone(), b.clone());

        let _ = Organism::from_parents(
            &a,
            &b,
            &landscape,
            Breeding::Mutated { severity: 10 },
            &mut GenomeRng::new(0),
        )
        .unwrap();

        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_snapshot() {
        let organism = Organism::from_chromosome(
            Chromosome::from_genes(&[0, 900]).unwrap(),
            &Landscape::default(),
        )
        .unwrap();
        let snapshot = organism.to_snapshot();
        assert_eq!(snapshot.chromosome.len(), 24);
        assert_eq!(snapshot.points.len(), 3);
        assert_eq!(snapshot.fitness, organism.fitness());
    }
}
