// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Head to head performance comparison plotting. Two measurement files go
//! in, one line plot of the ratio of their per-size averages comes out.

mod dataset;
mod plot;
mod ratio;

pub use crate::dataset::{mean, Dataset, ParseError, Record};
pub use crate::plot::{RatioPlot, UnsupportedFormat};
pub use crate::ratio::{ratio_series, safe_div, RatioError};
