//! Gate types.

use std::fmt;

use serde::{Deserialize, Serialize};

use alsvid_zx::Phase;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// The gate set the engine consumes and produces: Clifford+T plus exact
/// rational rotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateType {
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around Z by a rational multiple of π.
    Rz(Phase),
    /// Rotation around X by a rational multiple of π.
    Rx(Phase),
    /// Rotation around Y by a rational multiple of π.
    Ry(Phase),
    /// Phase gate `diag(1, e^(iθ))`.
    P(Phase),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Toffoli gate (CCX).
    CCX,
}

impl GateType {
    /// Lowercase gate name.
    pub fn name(&self) -> &'static str {
        match self {
            GateType::H => "h",
            GateType::X => "x",
            GateType::Y => "y",
            GateType::Z => "z",
            GateType::S => "s",
            GateType::Sdg => "sdg",
            GateType::T => "t",
            GateType::Tdg => "tdg",
            GateType::Rz(_) => "rz",
            GateType::Rx(_) => "rx",
            GateType::Ry(_) => "ry",
            GateType::P(_) => "p",
            GateType::CX => "cx",
            GateType::CZ => "cz",
            GateType::Swap => "swap",
            GateType::CCX => "ccx",
        }
    }

    /// Number of operand qubits.
    pub fn num_qubits(&self) -> usize {
        match self {
            GateType::CX | GateType::CZ | GateType::Swap => 2,
            GateType::CCX => 3,
            _ => 1,
        }
    }

    /// The inverse gate.
    pub fn adjoint(&self) -> GateType {
        match self {
            GateType::S => GateType::Sdg,
            GateType::Sdg => GateType::S,
            GateType::T => GateType::Tdg,
            GateType::Tdg => GateType::T,
            GateType::Rz(p) => GateType::Rz(-*p),
            GateType::Rx(p) => GateType::Rx(-*p),
            GateType::Ry(p) => GateType::Ry(-*p),
            GateType::P(p) => GateType::P(-*p),
            other => *other,
        }
    }

    /// True when the gate is Clifford (its ZX form only uses phases with
    /// denominator 1 or 2).
    pub fn is_clifford(&self) -> bool {
        match self {
            GateType::T | GateType::Tdg | GateType::CCX => false,
            GateType::Rz(p) | GateType::Rx(p) | GateType::Ry(p) | GateType::P(p) => p.is_clifford(),
            _ => true,
        }
    }

    /// The canonical Z-axis gate for a phase: Z, S, S†, T, T† when the
    /// angle matches, otherwise a bare rotation.
    pub fn z_rotation(phase: Phase) -> Option<GateType> {
        if phase.is_zero() {
            return None;
        }
        Some(match (phase.numerator(), phase.denominator()) {
            (1, 1) => GateType::Z,
            (1, 2) => GateType::S,
            (-1, 2) => GateType::Sdg,
            (1, 4) => GateType::T,
            (-1, 4) => GateType::Tdg,
            _ => GateType::P(phase),
        })
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateType::Rz(p) | GateType::Rx(p) | GateType::Ry(p) | GateType::P(p) => {
                write!(f, "{}({p})", self.name())
            }
            other => write!(f, "{}", other.name()),
        }
    }
}

/// One gate application: a gate and its operand qubits in order
/// (controls before targets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QCirGate {
    /// Sequential gate id within its circuit.
    pub id: usize,
    /// The gate.
    pub gate: GateType,
    /// Operand qubits.
    pub qubits: Vec<QubitId>,
}

impl fmt::Display for QCirGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.gate)?;
        for (i, q) in self.qubits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjoint_pairs() {
        assert_eq!(GateType::S.adjoint(), GateType::Sdg);
        assert_eq!(GateType::T.adjoint(), GateType::Tdg);
        assert_eq!(GateType::H.adjoint(), GateType::H);
        assert_eq!(
            GateType::Rz(Phase::new(1, 4)).adjoint(),
            GateType::Rz(Phase::new(-1, 4))
        );
    }

    #[test]
    fn test_z_rotation_names() {
        assert_eq!(GateType::z_rotation(Phase::zero()), None);
        assert_eq!(GateType::z_rotation(Phase::pi()), Some(GateType::Z));
        assert_eq!(GateType::z_rotation(Phase::new(1, 2)), Some(GateType::S));
        assert_eq!(GateType::z_rotation(Phase::new(-1, 4)), Some(GateType::Tdg));
        assert_eq!(
            GateType::z_rotation(Phase::new(3, 8)),
            Some(GateType::P(Phase::new(3, 8)))
        );
    }

    #[test]
    fn test_clifford_classification() {
        assert!(GateType::H.is_clifford());
        assert!(GateType::CX.is_clifford());
        assert!(!GateType::T.is_clifford());
        assert!(GateType::Rz(Phase::new(1, 2)).is_clifford());
        assert!(!GateType::Rz(Phase::new(1, 4)).is_clifford());
    }
}
