//! Dense complex tensors with named-axis bookkeeping.
//!
//! A [`QTensor`] wraps an `ndarray` dynamic-rank array of complex
//! amplitudes. Every axis has extent 2. After a [`tensordot`], callers can
//! translate pre-contraction axis ids into post-contraction ones through
//! [`QTensor::new_axis_id`]; the frontier walk in the evaluator relies on
//! this to keep its open-edge table current.
//!
//! Spider tensors carry a `2^((n-2)/4)` normalization and the H-box a
//! `2^(-n/4)` one, chosen so that the arity-2 forms are exactly the
//! identity wire and the unitary Hadamard. Circuit-shaped graphs then
//! evaluate to their textbook matrices without a trailing scale factor.

use ndarray::{Array2, ArrayD, Dimension, IxDyn};
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use alsvid_zx::Phase;

use crate::error::{TensorError, TensorResult};

/// Hard cap on tensor rank: 2^28 amplitudes is already 4 GiB.
pub const MAX_AXES: usize = 28;

/// A dense tensor over qubit axes.
#[derive(Debug, Clone)]
pub struct QTensor {
    data: ArrayD<Complex64>,
    /// Pre- to post-contraction axis translation for the latest operation.
    axis_history: FxHashMap<usize, usize>,
}

impl QTensor {
    /// A rank-0 tensor holding one amplitude.
    pub fn scalar(z: Complex64) -> Self {
        QTensor {
            data: ArrayD::from_elem(IxDyn(&[]), z),
            axis_history: FxHashMap::default(),
        }
    }

    /// The `2n`-axis identity: entry 1 where the first `n` indices equal
    /// the last `n`.
    pub fn identity(n: usize) -> Self {
        let data = ArrayD::from_shape_fn(IxDyn(&vec![2; 2 * n]), |ix| {
            if (0..n).all(|i| ix[i] == ix[n + i]) {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        QTensor { data, axis_history: FxHashMap::default() }
    }

    /// Z spider: diagonal in the computational basis, `T[0…0] = 1`,
    /// `T[1…1] = e^(iφ)`, scaled by `2^((n-2)/4)`.
    pub fn zspider(n: usize, phase: Phase) -> Self {
        let nu = Complex64::new(2f64.powf((n as f64 - 2.0) / 4.0), 0.0);
        let omega = Complex64::from_polar(1.0, phase.to_radians());
        if n == 0 {
            return QTensor::scalar(nu * (Complex64::new(1.0, 0.0) + omega));
        }
        let data = ArrayD::from_shape_fn(IxDyn(&vec![2; n]), |ix| {
            if (0..n).all(|i| ix[i] == 0) {
                nu
            } else if (0..n).all(|i| ix[i] == 1) {
                nu * omega
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        QTensor { data, axis_history: FxHashMap::default() }
    }

    /// X spider: the Z spider conjugated by Hadamards on every leg.
    pub fn xspider(n: usize, phase: Phase) -> Self {
        let nu = 2f64.powf((n as f64 - 2.0) / 4.0) * 2f64.powf(-(n as f64) / 2.0);
        let omega = Complex64::from_polar(1.0, phase.to_radians());
        let data = ArrayD::from_shape_fn(IxDyn(&vec![2; n]), |ix| {
            let parity = ix.slice().iter().sum::<usize>() % 2;
            let sign = if parity == 0 { 1.0 } else { -1.0 };
            (Complex64::new(1.0, 0.0) + omega * sign) * nu
        });
        QTensor { data, axis_history: FxHashMap::default() }
    }

    /// H-box: `T[i…] = e^(iφ·∏i)`, scaled by `2^(-n/4)`. The default phase
    /// π at arity 2 is exactly the Hadamard gate.
    pub fn hbox(n: usize, phase: Phase) -> Self {
        let nu = Complex64::new(2f64.powf(-(n as f64) / 4.0), 0.0);
        let omega = Complex64::from_polar(1.0, phase.to_radians());
        let data = ArrayD::from_shape_fn(IxDyn(&vec![2; n]), |ix| {
            if (0..n).all(|i| ix[i] == 1) { nu * omega } else { nu }
        });
        QTensor { data, axis_history: FxHashMap::default() }
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// The underlying array.
    pub fn data(&self) -> &ArrayD<Complex64> {
        &self.data
    }

    /// Multiply every amplitude by `z`.
    pub fn scale(&mut self, z: Complex64) {
        self.data.mapv_inplace(|a| a * z);
    }

    /// Translate a pre-contraction axis id through the latest operation.
    ///
    /// For the left operand of a [`tensordot`], the key is its original
    /// axis index; for the right operand, it is `left.ndim() + index`.
    pub fn new_axis_id(&self, old: usize) -> usize {
        *self
            .axis_history
            .get(&old)
            .unwrap_or_else(|| panic!("axis {old} was contracted away or never existed"))
    }

    /// Reorder the axes so that old axis `perm[i]` becomes axis `i`.
    pub fn permute(&self, perm: &[usize]) -> TensorResult<QTensor> {
        if perm.len() != self.ndim() {
            return Err(TensorError::AxisMismatch(format!(
                "permutation of length {} for a rank-{} tensor",
                perm.len(),
                self.ndim()
            )));
        }
        let data = ArrayD::from_shape_vec(
            IxDyn(&vec![2; self.ndim()]),
            permuted_flat(&self.data, perm),
        )
        .expect("shape matches element count");
        let axis_history = perm.iter().enumerate().map(|(new, &old)| (old, new)).collect();
        Ok(QTensor { data, axis_history })
    }

    /// Project onto a matrix with the given row (output) and column (input)
    /// axes. Every axis of the tensor must appear exactly once.
    pub fn to_matrix(&self, row_axes: &[usize], col_axes: &[usize]) -> TensorResult<Array2<Complex64>> {
        if row_axes.len() + col_axes.len() != self.ndim() {
            return Err(TensorError::AxisMismatch(format!(
                "{} row + {} col axes for a rank-{} tensor",
                row_axes.len(),
                col_axes.len(),
                self.ndim()
            )));
        }
        let perm: Vec<usize> = row_axes.iter().chain(col_axes).copied().collect();
        let flat = permuted_flat(&self.data, &perm);
        let rows = 1usize << row_axes.len();
        let cols = 1usize << col_axes.len();
        Ok(Array2::from_shape_vec((rows, cols), flat).expect("shape matches element count"))
    }
}

/// Contract `a_axes` of `a` against `b_axes` of `b`.
///
/// The result's axes are `a`'s free axes in order, then `b`'s free axes in
/// order, and its axis history maps both operands' free axes (right-operand
/// keys offset by `a.ndim()`).
pub fn tensordot(a: &QTensor, b: &QTensor, a_axes: &[usize], b_axes: &[usize]) -> TensorResult<QTensor> {
    assert_eq!(a_axes.len(), b_axes.len(), "contraction axis lists must pair up");
    let a_free: Vec<usize> = (0..a.ndim()).filter(|i| !a_axes.contains(i)).collect();
    let b_free: Vec<usize> = (0..b.ndim()).filter(|i| !b_axes.contains(i)).collect();

    let out_ndim = a_free.len() + b_free.len();
    check_axis_budget(out_ndim)?;

    let k = 1usize << a_axes.len();
    let a_perm: Vec<usize> = a_free.iter().chain(a_axes).copied().collect();
    let b_perm: Vec<usize> = b_axes.iter().chain(&b_free).copied().collect();
    let ma = Array2::from_shape_vec(
        (1usize << a_free.len(), k),
        permuted_flat(&a.data, &a_perm),
    )
    .expect("shape matches element count");
    let mb = Array2::from_shape_vec(
        (k, 1usize << b_free.len()),
        permuted_flat(&b.data, &b_perm),
    )
    .expect("shape matches element count");

    let product = ma.dot(&mb);
    let data = ArrayD::from_shape_vec(
        IxDyn(&vec![2; out_ndim]),
        product.into_iter().collect(),
    )
    .expect("shape matches element count");

    let mut axis_history = FxHashMap::default();
    for (pos, &ax) in a_free.iter().enumerate() {
        axis_history.insert(ax, pos);
    }
    for (pos, &bx) in b_free.iter().enumerate() {
        axis_history.insert(a.ndim() + bx, a_free.len() + pos);
    }
    Ok(QTensor { data, axis_history })
}

/// Outer product.
pub fn tensor_product(a: &QTensor, b: &QTensor) -> TensorResult<QTensor> {
    tensordot(a, b, &[], &[])
}

/// `t ⊗ t ⊗ … ⊗ t`, `k` times (the empty product is the scalar 1).
pub fn tensor_product_pow(t: &QTensor, k: usize) -> TensorResult<QTensor> {
    let mut acc = QTensor::scalar(Complex64::new(1.0, 0.0));
    for _ in 0..k {
        acc = tensor_product(&acc, t)?;
    }
    Ok(acc)
}

/// Reject axis counts whose tensors could not be allocated. Failing here,
/// before the allocation, is what turns a would-be abort into a clean
/// resource-exhaustion error.
pub fn check_axis_budget(axes: usize) -> TensorResult<()> {
    if axes > MAX_AXES {
        return Err(TensorError::TooManyAxes { axes, max: MAX_AXES });
    }
    Ok(())
}

/// Flatten under an axis permutation, row-major.
fn permuted_flat(data: &ArrayD<Complex64>, perm: &[usize]) -> Vec<Complex64> {
    data.clone().permuted_axes(perm.to_vec()).iter().copied().collect()
}

// =============================================================================
// Matrix comparison helpers
// =============================================================================

/// Largest elementwise distance between two same-shape matrices.
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Cosine similarity `|⟨a, b⟩| / (‖a‖·‖b‖)`; exactly 1 iff the matrices are
/// proportional by a nonzero complex factor.
pub fn cosine_similarity(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    let inner: Complex64 = a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum();
    let na: f64 = a.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return if na == nb { 1.0 } else { 0.0 };
    }
    inner.norm() / (na * nb)
}

/// Equality up to a global nonzero scalar, with tolerance.
pub fn equivalent_up_to_scalar(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) -> bool {
    a.dim() == b.dim() && cosine_similarity(a, b) >= 1.0 - tol
}
