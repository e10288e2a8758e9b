//! Two-dimensional Gaussian model.
//!
//! [`Gaussian2D`] holds a mean and a 2x2 covariance matrix and keeps the
//! principal axes of the distribution up to date, so views can draw its
//! ellipse directly.

use std::sync::Arc;

use entropic_core::logging::targets;
use entropic_core::{Listener, ListenerId, Model, Notifier};
use parking_lot::RwLock;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
struct GaussianState {
    mean: [f64; 2],
    cov: [[f64; 2]; 2],
    eigenvalues: [f64; 2],
    eigenvectors: [[f64; 2]; 2],
}

impl GaussianState {
    fn new(mean: [f64; 2], cov: [[f64; 2]; 2]) -> Result<Self> {
        if mean.iter().chain(cov.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_gaussian("parameters must be finite"));
        }

        let [[a, b], [c, d]] = cov;
        let trace = a + d;
        let det = a * d - b * c;
        let discriminant = trace * trace - 4.0 * det;
        if discriminant < 0.0 {
            return Err(Error::invalid_gaussian(format!(
                "covariance has complex eigenvalues (discriminant {discriminant})"
            )));
        }

        let root = discriminant.sqrt();
        let e1 = (trace + root) / 2.0;
        let e2 = (trace - root) / 2.0;
        if e2 < 0.0 {
            return Err(Error::invalid_gaussian(format!(
                "covariance has a negative eigenvalue ({e2})"
            )));
        }

        let (v1, v2) = if b == 0.0 && c == 0.0 {
            // Diagonal: the axes are the coordinate axes, larger variance first.
            if a >= d {
                ([1.0, 0.0], [0.0, 1.0])
            } else {
                ([0.0, 1.0], [1.0, 0.0])
            }
        } else if b == 0.0 {
            (unit([e1 - d, c]), unit([e2 - d, c]))
        } else {
            (unit([b, e1 - a]), unit([b, e2 - a]))
        };

        Ok(Self {
            mean,
            cov,
            eigenvalues: [e1, e2],
            eigenvectors: [v1, v2],
        })
    }
}

fn unit(v: [f64; 2]) -> [f64; 2] {
    let magnitude = v[0].hypot(v[1]);
    [v[0] / magnitude, v[1] / magnitude]
}

/// A 2-D Gaussian distribution.
pub struct Gaussian2D {
    state: RwLock<GaussianState>,
    notifier: Notifier,
}

impl Gaussian2D {
    /// Create a Gaussian from its mean and covariance.
    pub fn new(mean: [f64; 2], cov: [[f64; 2]; 2]) -> Result<Self> {
        Ok(Self {
            state: RwLock::new(GaussianState::new(mean, cov)?),
            notifier: Notifier::new("gaussian"),
        })
    }

    /// The standard normal distribution.
    pub fn standard() -> Self {
        Self {
            state: RwLock::new(GaussianState {
                mean: [0.0, 0.0],
                cov: [[1.0, 0.0], [0.0, 1.0]],
                eigenvalues: [1.0, 1.0],
                eigenvectors: [[1.0, 0.0], [0.0, 1.0]],
            }),
            notifier: Notifier::new("gaussian"),
        }
    }

    /// Replace the parameters, recompute the principal axes and notify.
    ///
    /// On error the model keeps its previous parameters.
    pub fn assign(&self, mean: [f64; 2], cov: [[f64; 2]; 2]) -> Result<()> {
        let state = GaussianState::new(mean, cov)?;
        *self.state.write() = state;
        tracing::trace!(
            target: targets::GAUSSIAN,
            ?mean,
            eigenvalues = ?state.eigenvalues,
            "gaussian assigned"
        );
        self.refresh();
        Ok(())
    }

    /// The mean.
    pub fn mean(&self) -> [f64; 2] {
        self.state.read().mean
    }

    /// The covariance matrix.
    pub fn covariance(&self) -> [[f64; 2]; 2] {
        self.state.read().cov
    }

    /// Eigenvalues of the covariance, largest first.
    pub fn eigenvalues(&self) -> [f64; 2] {
        self.state.read().eigenvalues
    }

    /// Unit eigenvectors matching [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> [[f64; 2]; 2] {
        self.state.read().eigenvectors
    }

    /// Standard deviation along each principal axis.
    pub fn axis_lengths(&self) -> [f64; 2] {
        self.eigenvalues().map(f64::sqrt)
    }
}

impl Default for Gaussian2D {
    fn default() -> Self {
        Self::standard()
    }
}

impl Model for Gaussian2D {
    fn add_listener(&self, listener: Arc<dyn Listener>) -> ListenerId {
        self.notifier.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> entropic_core::Result<()> {
        self.notifier.remove_listener(id)
    }

    fn refresh(&self) {
        self.notifier.notify();
    }
}

static_assertions::assert_impl_all!(Gaussian2D: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn approx(a: [f64; 2], b: [f64; 2]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_diagonal() {
        let g = Gaussian2D::new([1.0, 2.0], [[4.0, 0.0], [0.0, 1.0]]).unwrap();
        assert_eq!(g.eigenvalues(), [4.0, 1.0]);
        assert_eq!(g.eigenvectors(), [[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(g.axis_lengths(), [2.0, 1.0]);
        assert_eq!(g.mean(), [1.0, 2.0]);
    }

    #[test]
    fn test_diagonal_sorted_descending() {
        let g = Gaussian2D::new([0.0, 0.0], [[1.0, 0.0], [0.0, 4.0]]).unwrap();
        assert_eq!(g.eigenvalues(), [4.0, 1.0]);
        assert_eq!(g.eigenvectors(), [[0.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    fn test_correlated() {
        let g = Gaussian2D::new([0.0, 0.0], [[2.0, 1.0], [1.0, 2.0]]).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx(g.eigenvalues(), [3.0, 1.0]));
        let [v1, v2] = g.eigenvectors();
        assert!(approx(v1, [s, s]));
        assert!(approx(v2, [s, -s]));
    }

    #[test]
    fn test_rejects_negative_eigenvalue() {
        let err = Gaussian2D::new([0.0, 0.0], [[1.0, 2.0], [2.0, 1.0]]).err().unwrap();
        assert!(matches!(err, Error::InvalidGaussian { .. }));
    }

    #[test]
    fn test_rejects_complex_eigenvalues() {
        assert!(Gaussian2D::new([0.0, 0.0], [[0.0, 1.0], [-1.0, 0.0]]).is_err());
        assert!(Gaussian2D::new([f64::NAN, 0.0], [[1.0, 0.0], [0.0, 1.0]]).is_err());
    }

    #[test]
    fn test_assign_notifies() {
        let g = Gaussian2D::standard();
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();
        g.add_listener(Arc::new(move || *count_clone.lock() += 1));

        g.assign([1.0, 1.0], [[9.0, 0.0], [0.0, 4.0]]).unwrap();
        assert_eq!(*count.lock(), 1);
        assert_eq!(g.axis_lengths(), [3.0, 2.0]);

        assert!(g.assign([0.0, 0.0], [[1.0, 2.0], [2.0, 1.0]]).is_err());
        assert_eq!(*count.lock(), 1);
        assert_eq!(g.covariance(), [[9.0, 0.0], [0.0, 4.0]]);
    }
}
