use arcal_core::Real;
use nalgebra::{DMatrix, DVector};

/// Generic nonlinear least-squares problem over dense parameter and
/// residual vectors.
pub trait NllsProblem {
    /// Number of parameters in the optimization vector.
    fn num_params(&self) -> usize;
    /// Number of residual rows in the problem.
    fn num_residuals(&self) -> usize;

    /// Residual vector for the current parameters.
    fn residuals(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Jacobian of the residuals.
    ///
    /// The default implementation uses forward differences; override with
    /// an analytic Jacobian when one is available.
    fn jacobian(&self, x: &DVector<Real>) -> DMatrix<Real> {
        let m = self.num_residuals();
        let n = self.num_params();
        let mut j = DMatrix::zeros(m, n);

        let base = self.residuals(x);
        let eps = 1e-6;

        for k in 0..n {
            let mut x_pert = x.clone();
            x_pert[k] += eps;
            let diff = (self.residuals(&x_pert) - &base) / eps;
            j.set_column(k, &diff);
        }

        j
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Maximum number of solver iterations before termination.
    ///
    /// The LM backend follows the MINPACK convention and interprets this
    /// as a function-evaluation patience of `max_iters * (n + 1)`.
    pub max_iters: usize,
    /// Relative tolerance on the objective (cost) reduction.
    pub ftol: Real,
    /// Orthogonality/gradient tolerance.
    pub gtol: Real,
    /// Relative tolerance on parameter updates.
    pub xtol: Real,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            ftol: 1e-10,
            gtol: 1e-10,
            xtol: 1e-10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SolveReport {
    pub iterations: usize,
    pub final_cost: Real,
    pub converged: bool,
}

pub trait NllsSolverBackend {
    fn solve<P: NllsProblem>(
        &self,
        problem: &P,
        x0: DVector<Real>,
        opts: &SolveOptions,
    ) -> (DVector<Real>, SolveReport);
}
