//! Separation oracles for concrete problem families.
//!
//! These are consumers of the core API: each one maps a domain problem onto
//! the cut contract the drivers understand. The matrix-inequality oracles
//! lean on [`crate::LdltExt`] for feasibility certificates and gradients.

mod lmi;
mod lowpass;
mod profit;
mod qmi;

pub use lmi::{Lmi0Oracle, LmiOracle};
pub use lowpass::LowpassOracle;
pub use profit::{ProfitOracle, ProfitQOracle, ProfitRbOracle};
pub use qmi::QmiOracle;
