//! Flower genome: sixteen hex nibbles driving every visual trait.
//!
//! Traits read "genes", which are two adjacent nibbles read as a byte. Each
//! gene stands in for what would otherwise be a random draw when drawing a
//! flower, so two flowers with equal genomes look identical.
//!
//! ```text
//! nibble  0 1 | 2 3 | 4 5 | 6 7 | 8 9 | 10 11 | 12 13 | 14 15
//! trait   petal | shuf| base| 2nd | 3rd | grad  | centre| centre
//!         count | fle | hue | hue | col | stop  | size  | colour
//! ```

use std::fmt;

use bevy::color::Color;
use rand::Rng;

use crate::error::{GardenError, Result};
use crate::palette::{self, Hue, Luminosity};

/// Immutable, fully determined trait vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Genome {
    nibbles: [u8; Genome::LENGTH],
}

impl Genome {
    /// Number of nibbles in every genome.
    pub const LENGTH: usize = 16;

    /// Largest petal count any genome produces.
    pub const MAX_PETALS: u32 = 27;

    /// A genome with every nibble drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            nibbles: std::array::from_fn(|_| rng.random_range(0..16)),
        }
    }

    /// Parses up to [`Genome::LENGTH`] hex digits and pads the rest from `rng`.
    ///
    /// ```
    /// # use hex_garden::genome::Genome;
    /// # use rand::SeedableRng;
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    /// let g = Genome::from_encoding("ff80", &mut rng).unwrap();
    /// assert_eq!(g.gene(0), 0xff);
    /// assert_eq!(g.gene(2), 0x80);
    /// assert_eq!(g.to_string().len(), 16);
    /// ```
    pub fn from_encoding<R: Rng + ?Sized>(encoding: &str, rng: &mut R) -> Result<Self> {
        if encoding.chars().count() > Self::LENGTH {
            return Err(GardenError::encoding(encoding, "longer than 16 nibbles"));
        }
        let mut genome = Self::random(rng);
        for (slot, ch) in genome.nibbles.iter_mut().zip(encoding.chars()) {
            let digit = ch
                .to_digit(16)
                .ok_or_else(|| GardenError::encoding(encoding, "contains a non-hex character"))?;
            *slot = digit as u8;
        }
        Ok(genome)
    }

    /// Per-position crossover: every nibble is copied from a parent chosen
    /// uniformly at random for that position.
    pub fn mix<R: Rng + ?Sized>(parents: &[Genome], rng: &mut R) -> Result<Self> {
        if parents.is_empty() {
            return Err(GardenError::EmptyParentSet);
        }
        Ok(Self {
            nibbles: std::array::from_fn(|i| {
                parents[rng.random_range(0..parents.len())].nibbles[i]
            }),
        })
    }

    /// Raw nibble values, each `0..=15`.
    pub fn nibbles(&self) -> &[u8; Self::LENGTH] {
        &self.nibbles
    }

    /// Byte formed by nibbles `index` and `index + 1`.
    ///
    /// # Panics
    ///
    /// If `index > 14`.
    pub fn gene(&self, index: usize) -> u8 {
        debug_assert!(
            index < Self::LENGTH - 1,
            "gene index {index} reads past nibble {}",
            Self::LENGTH - 1
        );
        (self.nibbles[index] << 4) | self.nibbles[index + 1]
    }

    /// [`Genome::gene`] for an untrusted index; `None` past nibble 14.
    pub fn try_gene(&self, index: usize) -> Option<u8> {
        let high = *self.nibbles.get(index)?;
        let low = *self.nibbles.get(index + 1)?;
        Some((high << 4) | low)
    }

    /// [`Genome::gene`] scaled into `[0, 1]`.
    pub fn gene_normal(&self, index: usize) -> f32 {
        f32::from(self.gene(index)) / 255.0
    }

    // ── Phenotype ───────────────────────────────────────────────────

    /// Petals on the flower, `3..=27`.
    pub fn petal_count(&self) -> u32 {
        let count = 3 + (25.0 * self.gene_normal(0)).floor() as u32;
        count.min(Self::MAX_PETALS)
    }

    /// Base, secondary and tertiary colours in a gene-seeded order.
    pub fn petal_colors(&self) -> [Color; 3] {
        let mut colors = [
            self.base_color(),
            self.secondary_color(),
            self.tertiary_color(),
        ];
        palette::seeded_shuffle(&mut colors, self.gene(2));
        colors
    }

    /// Free-hue colour seeded by gene 4.
    pub fn base_color(&self) -> Color {
        palette::random_color(self.gene(4), Hue::Any, Luminosity::Any)
    }

    /// Colour seeded by gene 6 sharing the base colour's hue.
    pub fn secondary_color(&self) -> Color {
        let hue = palette::hue_of(self.base_color());
        palette::random_color(self.gene(6), Hue::Fixed(hue), Luminosity::Any)
    }

    /// White below gene 8 value 64, otherwise a dark colour seeded by it.
    pub fn tertiary_color(&self) -> Color {
        let gene = self.gene(8);
        if gene < 0x40 {
            Color::WHITE
        } else {
            palette::random_color(gene, Hue::Any, Luminosity::Dark)
        }
    }

    /// Gradient stops along a petal, in percent: `[0, 30..=80, 100]`.
    pub fn petal_gradient_stops(&self) -> [u8; 3] {
        let middle = 30 + (50.0 * self.gene_normal(10)).floor() as u8;
        [0, middle, 100]
    }

    /// Radius of the flower centre, `3.0..=6.0`.
    pub fn center_size(&self) -> f32 {
        3.0 + 3.0 * self.gene_normal(12)
    }

    /// Yellow centre below gene 14 value 127, orange from there up.
    pub fn center_color(&self) -> Color {
        let gene = self.gene(14);
        let hue = if gene < 0x7F { Hue::Yellow } else { Hue::Orange };
        palette::random_color(gene, hue, Luminosity::Any)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for nibble in self.nibbles {
            write!(f, "{nibble:x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0x5EED)
    }

    fn exact(encoding: &str) -> Genome {
        assert_eq!(encoding.len(), Genome::LENGTH);
        Genome::from_encoding(encoding, &mut rng()).unwrap()
    }

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn empty_encoding_is_fully_random() {
        let g = Genome::from_encoding("", &mut rng()).unwrap();
        assert_eq!(g.to_string().len(), Genome::LENGTH);
        assert!(g.nibbles().iter().all(|&n| n < 16));
    }

    #[test]
    fn partial_encoding_keeps_prefix() {
        let g = Genome::from_encoding("abc", &mut rng()).unwrap();
        assert_eq!(&g.nibbles()[..3], &[0xa, 0xb, 0xc]);
        assert!(g.to_string().starts_with("abc"));
    }

    #[test]
    fn uppercase_digits_accepted() {
        let g = Genome::from_encoding("FF", &mut rng()).unwrap();
        assert_eq!(g.gene(0), 255);
    }

    #[test]
    fn full_encoding_roundtrips_through_display() {
        let text = "0123456789abcdef";
        assert_eq!(exact(text).to_string(), text);
    }

    #[test]
    fn rejects_non_hex() {
        let err = Genome::from_encoding("12g4", &mut rng()).unwrap_err();
        assert!(matches!(err, GardenError::InvalidEncoding { .. }));
    }

    #[test]
    fn rejects_too_long() {
        let err = Genome::from_encoding("0123456789abcdef0", &mut rng()).unwrap_err();
        assert!(matches!(err, GardenError::InvalidEncoding { .. }));
    }

    #[test]
    fn any_prefix_length_gives_full_genome() {
        let source = "fedcba9876543210";
        let mut r = rng();
        for len in 0..=Genome::LENGTH {
            let g = Genome::from_encoding(&source[..len], &mut r).unwrap();
            assert_eq!(g.to_string().len(), Genome::LENGTH);
            for i in (0..Genome::LENGTH).step_by(2) {
                // u8 already bounds the value; check it matches the nibbles.
                let n = g.nibbles();
                assert_eq!(g.gene(i), n[i] * 16 + n[i + 1]);
            }
        }
    }

    // ── Genes ───────────────────────────────────────────────────────

    #[test]
    fn gene_reads_two_nibbles() {
        let g = exact("00ff7f10000000a0");
        assert_eq!(g.gene(0), 0x00);
        assert_eq!(g.gene(2), 0xff);
        assert_eq!(g.gene(4), 0x7f);
        assert_eq!(g.gene(6), 0x10);
        assert_eq!(g.gene(14), 0xa0);
    }

    #[test]
    fn try_gene_stops_at_last_full_byte() {
        let g = exact("00ff7f10000000a0");
        assert_eq!(g.try_gene(14), Some(0xa0));
        assert_eq!(g.try_gene(15), None);
        assert_eq!(g.try_gene(usize::MAX), None);
    }

    #[test]
    #[should_panic]
    fn gene_past_the_end_panics() {
        exact("00ff7f10000000a0").gene(15);
    }

    #[test]
    fn gene_normal_spans_unit_interval() {
        let g = exact("00ff000000000000");
        assert_eq!(g.gene_normal(0), 0.0);
        assert_eq!(g.gene_normal(2), 1.0);
    }

    // ── Crossover ───────────────────────────────────────────────────

    #[test]
    fn mix_single_parent_is_identity() {
        let mut r = rng();
        let parent = Genome::random(&mut r);
        assert_eq!(Genome::mix(&[parent], &mut r).unwrap(), parent);
    }

    #[test]
    fn mix_empty_fails() {
        assert_eq!(
            Genome::mix(&[], &mut rng()),
            Err(GardenError::EmptyParentSet)
        );
    }

    #[test]
    fn mix_only_copies_parent_nibbles() {
        let a = exact("0000000000000000");
        let b = exact("ffffffffffffffff");
        let c = exact("5555555555555555");
        let mut r = rng();
        for _ in 0..50 {
            let child = Genome::mix(&[a, b, c], &mut r).unwrap();
            for (i, n) in child.nibbles().iter().enumerate() {
                assert!(
                    [a.nibbles()[i], b.nibbles()[i], c.nibbles()[i]].contains(n),
                    "nibble {i} = {n:x} came from no parent"
                );
            }
        }
    }

    #[test]
    fn mix_draws_from_every_parent() {
        let a = exact("0000000000000000");
        let b = exact("ffffffffffffffff");
        let mut r = rng();
        let mut seen = [false; 2];
        for _ in 0..20 {
            let child = Genome::mix(&[a, b], &mut r).unwrap();
            for &n in child.nibbles() {
                seen[usize::from(n == 0xf)] = true;
            }
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn mix_is_reproducible_under_fixed_seed() {
        let mut r = rng();
        let parents = [Genome::random(&mut r), Genome::random(&mut r)];
        let x = Genome::mix(&parents, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        let y = Genome::mix(&parents, &mut ChaCha8Rng::seed_from_u64(9)).unwrap();
        assert_eq!(x, y);
    }

    // ── Phenotype ───────────────────────────────────────────────────

    #[test]
    fn petal_count_bounds_for_every_first_gene() {
        let mut r = rng();
        for byte in 0..=255u8 {
            let g = Genome::from_encoding(&format!("{byte:02x}"), &mut r).unwrap();
            let count = g.petal_count();
            assert!((3..=27).contains(&count), "gene {byte} gave {count} petals");
        }
    }

    #[test]
    fn petal_count_follows_gene() {
        assert_eq!(exact("0000000000000000").petal_count(), 3);
        assert_eq!(exact("8000000000000000").petal_count(), 3 + 12);
        assert_eq!(exact("ff00000000000000").petal_count(), Genome::MAX_PETALS);
    }

    #[test]
    fn tertiary_is_white_for_low_gene() {
        assert_eq!(exact("000000003f000000").tertiary_color(), Color::WHITE);
        assert_ne!(exact("0000000040000000").tertiary_color(), Color::WHITE);
    }

    #[test]
    fn petal_colors_are_a_permutation_of_the_three_colours() {
        let g = exact("1234567890abcdef");
        let colors = g.petal_colors();
        for c in [g.base_color(), g.secondary_color(), g.tertiary_color()] {
            assert!(colors.contains(&c));
        }
        assert_eq!(colors, g.petal_colors(), "shuffle must be seeded");
    }

    #[test]
    fn secondary_shares_base_hue() {
        let g = exact("0000a0b100000000");
        let base = palette::hue_of(g.base_color());
        let secondary = palette::hue_of(g.secondary_color());
        assert!((base - secondary).abs() < 1e-3);
    }

    #[test]
    fn gradient_stops() {
        assert_eq!(exact("0000000000000000").petal_gradient_stops(), [0, 30, 100]);
        assert_eq!(exact("0000000000ff0000").petal_gradient_stops(), [0, 80, 100]);
    }

    #[test]
    fn center_size_range() {
        assert_eq!(exact("0000000000000000").center_size(), 3.0);
        assert_eq!(exact("000000000000ff00").center_size(), 6.0);
    }

    #[test]
    fn center_color_hue_switches_at_127() {
        let yellow = palette::hue_of(exact("000000000000007e").center_color());
        assert!((47.0..=62.0).contains(&yellow));
        let orange = palette::hue_of(exact("000000000000007f").center_color());
        assert!((19.0..=46.0).contains(&orange));
    }
}
