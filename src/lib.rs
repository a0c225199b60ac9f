//! featsel: Feature Selection Library
//!
//! A library for selecting features in binary classification datasets using
//! correlation filtering and regression p-value backward elimination, and for
//! measuring what the selection costs or gains with an SVM classifier.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
