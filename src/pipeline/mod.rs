//! Pipeline module - the selection and evaluation stages

pub mod correlation;
pub mod elimination;
pub mod error;
pub mod evaluate;
pub mod loader;
pub mod regression;
pub mod selection;
pub mod split;
pub mod svm;
pub mod target;

pub use correlation::*;
pub use elimination::*;
pub use error::SelectionError;
pub use evaluate::*;
pub use loader::*;
pub use regression::*;
pub use selection::*;
pub use split::*;
pub use svm::{Gamma, KernelType, SupportVectorMachine, SvmConfig};
pub use target::*;
