/// Quadratic objective over binary variables.
///
/// Coefficients live in a dense symmetric matrix over flattened variable
/// indices: the diagonal holds the linear terms, and `(u, v)` and `(v, u)`
/// both hold the full coupling of the pair. Energy is
/// `Σ_v h_v·x_v + Σ_{u<v} J_uv·x_u·x_v`; `offset` is tracked separately and
/// never changes which assignment is best.
#[derive(Debug, Clone, PartialEq)]
pub struct Qubo {
    num_variables: usize,
    coefficients: Vec<f64>,
    offset: f64,
}

/// Size and coefficient range of an objective.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboSummary {
    pub num_variables: usize,
    pub num_interactions: usize,
    pub min_coefficient: f64,
    pub max_coefficient: f64,
    pub offset: f64,
}

impl Qubo {
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            coefficients: vec![0.0; num_variables * num_variables],
            offset: 0.0,
        }
    }

    pub fn empty() -> Self {
        Self::new(0)
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn is_empty(&self) -> bool {
        self.num_variables == 0
    }

    #[inline]
    fn at(&self, u: usize, v: usize) -> usize {
        u * self.num_variables + v
    }

    pub fn add_linear(&mut self, v: usize, bias: f64) {
        let idx = self.at(v, v);
        self.coefficients[idx] += bias;
    }

    /// Add to the coupling of `u` and `v`. A self-pair is linear since `x² = x`.
    pub fn add_interaction(&mut self, u: usize, v: usize, bias: f64) {
        if u == v {
            self.add_linear(v, bias);
            return;
        }
        let (a, b) = (self.at(u, v), self.at(v, u));
        self.coefficients[a] += bias;
        self.coefficients[b] += bias;
    }

    pub fn add_offset(&mut self, constant: f64) {
        self.offset += constant;
    }

    #[inline]
    pub fn linear(&self, v: usize) -> f64 {
        self.coefficients[self.at(v, v)]
    }

    #[inline]
    pub fn interaction(&self, u: usize, v: usize) -> f64 {
        if u == v {
            return 0.0;
        }
        self.coefficients[self.at(u, v)]
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Row `v` of the matrix. Entry `v` is the linear term, the rest are couplings.
    #[inline]
    pub fn row(&self, v: usize) -> &[f64] {
        let start = v * self.num_variables;
        &self.coefficients[start..start + self.num_variables]
    }

    /// Non-zero couplings with `u < v`.
    pub fn interactions(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.num_variables).flat_map(move |u| {
            ((u + 1)..self.num_variables).filter_map(move |v| {
                let j = self.coefficients[self.at(u, v)];
                (j != 0.0).then_some((u, v, j))
            })
        })
    }

    /// Energy of `assignment`, excluding the offset.
    pub fn energy(&self, assignment: &[bool]) -> f64 {
        let on: Vec<usize> = (0..self.num_variables)
            .filter(|&v| assignment.get(v).copied().unwrap_or(false))
            .collect();

        let mut energy = 0.0;
        for (k, &u) in on.iter().enumerate() {
            energy += self.linear(u);
            for &v in &on[k + 1..] {
                energy += self.interaction(u, v);
            }
        }
        energy
    }

    /// `h_v + Σ_{u≠v} J_uv·x_u` for every `v`.
    ///
    /// Flipping `v` from 0 to 1 changes the energy by exactly this field.
    pub fn local_fields(&self, assignment: &[bool]) -> Vec<f64> {
        (0..self.num_variables)
            .map(|v| {
                let row = self.row(v);
                let couplings: f64 = row
                    .iter()
                    .enumerate()
                    .filter(|&(u, _)| u != v && assignment.get(u).copied().unwrap_or(false))
                    .map(|(_, j)| j)
                    .sum();
                row[v] + couplings
            })
            .collect()
    }

    /// Upper bound on the energy change of any single flip.
    pub fn max_flip_delta(&self) -> f64 {
        (0..self.num_variables)
            .map(|v| self.row(v).iter().map(|c| c.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Smallest non-zero coefficient magnitude.
    pub fn min_abs_coefficient(&self) -> Option<f64> {
        self.coefficients
            .iter()
            .map(|c| c.abs())
            .filter(|&c| c > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn summary(&self) -> QuboSummary {
        let mut min_coefficient = 0.0_f64;
        let mut max_coefficient = 0.0_f64;
        let mut num_interactions = 0;

        for v in 0..self.num_variables {
            let h = self.linear(v);
            min_coefficient = min_coefficient.min(h);
            max_coefficient = max_coefficient.max(h);
        }
        for (_, _, j) in self.interactions() {
            num_interactions += 1;
            min_coefficient = min_coefficient.min(j);
            max_coefficient = max_coefficient.max(j);
        }

        QuboSummary {
            num_variables: self.num_variables,
            num_interactions,
            min_coefficient,
            max_coefficient,
            offset: self.offset,
        }
    }
}
