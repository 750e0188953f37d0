//! To ease access to most frequently used items
//!

pub use crate::io::csv::*;

pub use crate::graph::ops::*;
pub use crate::graph::*;

pub use crate::dominance::*;
pub use crate::listing::*;
pub use crate::skylayers::*;
pub use crate::spatial::*;

pub use crate::skyline::postprocess;
