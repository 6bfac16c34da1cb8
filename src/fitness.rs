use crate::search::encoding::Gene;

/// Fixed container size for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// Scores a candidate by how little container area it leaves unused.
///
/// `score = 1 - unused / container_area`, so a candidate that covers the
/// whole container scores 1.0. Candidates whose total area exceeds the
/// container cannot all fit and score 0.0. Placement feasibility is not
/// checked here; a high score can still fail to pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaFitness {
    pub container: Container,
}

impl AreaFitness {
    pub const fn new(container: Container) -> Self {
        Self { container }
    }

    /// Unclamped score; exceeds 1.0 for oversized candidates.
    pub fn raw_score(&self, genes: &[Gene]) -> f64 {
        let capacity = self.container.area();
        let total_area: f64 = genes.iter().map(|g| g.area()).sum();
        let unused_area = capacity - total_area;
        1.0 - unused_area / capacity
    }

    pub fn evaluate(&self, genes: &[Gene]) -> f64 {
        let score = self.raw_score(genes);
        if score > 1.0 {
            0.0
        } else {
            score
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitness() -> AreaFitness {
        AreaFitness::new(Container::new(200.0, 200.0))
    }

    #[test]
    fn score_is_covered_fraction() {
        let genes = [
            Gene::encode(30, 50),
            Gene::encode(30, 50),
            Gene::encode(100, 50),
            Gene::encode(100, 50),
            Gene::encode(100, 30),
            Gene::encode(100, 30),
        ];
        // 19_000 of 40_000
        assert!((fitness().evaluate(&genes) - 0.475).abs() < 1e-12);
        assert!((fitness().evaluate(&[Gene::encode(200, 200)]) - 1.0).abs() < 1e-12);
        assert_eq!(fitness().evaluate(&[]), 0.0);
    }

    #[test]
    fn smaller_total_area_scores_strictly_lower() {
        let larger = [Gene::encode(40, 40), Gene::encode(10, 20)];
        let smaller = [Gene::encode(40, 40), Gene::encode(10, 19)];
        assert!(fitness().evaluate(&smaller) < fitness().evaluate(&larger));
    }

    #[test]
    fn oversized_candidates_score_zero() {
        let genes = [Gene::encode(200, 200), Gene::encode(1, 1)];
        assert!(fitness().raw_score(&genes) > 1.0);
        assert_eq!(fitness().evaluate(&genes), 0.0);
    }
}
