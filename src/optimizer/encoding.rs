/// One binary decision variable: digit `bit` of ingredient `ingredient`'s proportion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitVariable {
    pub ingredient: usize,
    pub bit: usize,
}

impl BitVariable {
    pub fn new(ingredient: usize, bit: usize) -> Self {
        Self { ingredient, bit }
    }

    /// Flattened index into an assignment.
    #[inline]
    pub fn index(self, bits_per_ingredient: usize) -> usize {
        self.ingredient * bits_per_ingredient + self.bit
    }

}

/// Fixed-point binary encoding of a proportion in [0, 1).
///
/// Digit `j` carries weight `2^-(j+1)`, so `K` digits give resolution `2^-K`
/// and a maximum of `1 - 2^-K`.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPoint {
    weights: Vec<f64>,
}

impl FixedPoint {
    pub fn new(bits: usize) -> Self {
        Self {
            weights: (0..bits).map(bit_weight).collect(),
        }
    }

    /// Digits per value.
    #[inline]
    pub fn bits(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn weight(&self, bit: usize) -> f64 {
        self.weights[bit]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Smallest representable step.
    pub fn resolution(&self) -> f64 {
        0.5_f64.powi(self.bits() as i32)
    }

    /// Largest representable value.
    pub fn max_value(&self) -> f64 {
        1.0 - self.resolution()
    }

    /// Decode a digit vector, most significant first.
    pub fn decode(&self, digits: &[bool]) -> f64 {
        digits
            .iter()
            .zip(&self.weights)
            .filter(|(d, _)| **d)
            .fold(0.0, |acc, (_, w)| acc + w)
    }

    /// Digit vector nearest to `value`, clamped to the representable range.
    pub fn encode(&self, value: f64) -> Vec<bool> {
        let bits = self.bits();
        if bits == 0 {
            return Vec::new();
        }
        let scale = (1_u64 << bits) as f64;
        let steps = (value * scale).round().clamp(0.0, scale - 1.0) as u64;
        (0..bits)
            .map(|j| (steps >> (bits - 1 - j)) & 1 == 1)
            .collect()
    }

    /// Decode ingredient `ingredient`'s digits out of a full assignment.
    ///
    /// Digits past the end of `assignment` read as zero.
    pub fn decode_ingredient(&self, assignment: &[bool], ingredient: usize) -> f64 {
        let start = ingredient * self.bits();
        (0..self.bits())
            .filter(|&j| assignment.get(start + j).copied().unwrap_or(false))
            .fold(0.0, |acc, j| acc + self.weights[j])
    }
}

/// Weight of digit `bit`: `2^-(bit+1)`.
#[inline]
pub fn bit_weight(bit: usize) -> f64 {
    0.5_f64.powi(bit as i32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_weights_halve() {
        let fp = FixedPoint::new(4);
        assert_eq!(fp.weights(), &[0.5, 0.25, 0.125, 0.0625]);
        assert_eq!(fp.max_value(), 0.9375);
        assert_eq!(fp.resolution(), 0.0625);
    }

    #[test]
    fn test_decode() {
        let fp = FixedPoint::new(4);
        assert_eq!(fp.decode(&[true, false, true, false]), 0.625);
        assert_eq!(fp.decode(&[false; 4]), 0.0);
        assert_eq!(fp.decode(&[true; 4]), fp.max_value());
    }

    #[test]
    fn test_decode_then_encode_reproduces_bits() {
        let fp = FixedPoint::new(16);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let bits: Vec<bool> = (0..16).map(|_| rng.gen_bool(0.5)).collect();
            assert_eq!(fp.encode(fp.decode(&bits)), bits);
        }
    }

    #[test]
    fn test_encode_rounds_and_clamps() {
        let fp = FixedPoint::new(4);
        // 0.3 * 16 = 4.8 -> 5 -> 0101
        assert_eq!(fp.encode(0.3), vec![false, true, false, true]);
        assert_eq!(fp.encode(1.0), vec![true; 4]);
        assert_eq!(fp.encode(-0.2), vec![false; 4]);
    }

    #[test]
    fn test_decode_ingredient_slices_assignment() {
        let fp = FixedPoint::new(2);
        let assignment = [false, true, true, true];
        assert_eq!(fp.decode_ingredient(&assignment, 0), 0.25);
        assert_eq!(fp.decode_ingredient(&assignment, 1), 0.75);
        assert_eq!(fp.decode_ingredient(&assignment, 2), 0.0);
    }

    #[test]
    fn test_bit_variable_index() {
        assert_eq!(BitVariable::new(3, 5).index(16), 53);
        assert_eq!(BitVariable::new(0, 0).index(16), 0);
    }

    #[test]
    fn test_unset_digits_decode_to_positive_zero() {
        let fp = FixedPoint::new(4);
        assert!(fp.decode(&[false; 4]).is_sign_positive());
        assert!(fp.decode(&[]).is_sign_positive());
        assert!(fp.decode_ingredient(&[true, true, false, false], 1).is_sign_positive());
    }
}
