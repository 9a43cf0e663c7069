// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unable to open {path}: {source}")]
    Open { path: String, source: std::io::Error },
    #[error("unable to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("{path}:{line}: invalid size token: {token:?}")]
    InvalidSize {
        path: String,
        line: usize,
        token: String,
    },
    #[error("{path}:{line}: invalid measurement: {token:?}")]
    InvalidMeasurement {
        path: String,
        line: usize,
        token: String,
    },
    #[error("{path}:{line}: record has no measurements")]
    MissingMeasurements { path: String, line: usize },
}

/// Arithmetic mean of a measurement list. The parser guarantees every
/// record carries at least one measurement.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// One parsed input line: a test size followed by the measurements taken
/// at that size, plus their derived average.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub size: i64,
    pub measurements: Vec<f64>,
    pub average: f64,
}

impl Record {
    pub fn new(size: i64, measurements: Vec<f64>) -> Self {
        let average = mean(&measurements);
        Self {
            size,
            measurements,
            average,
        }
    }
}

/// The records of one measurement file, in file line order.
///
/// Expected line format, whitespace separated:
///
/// ```text
/// n m1 m2 ... m_n
/// ```
///
/// where `n` is the integral test size and `m1..m_n` are measurements
/// convertible to doubles. Whitespace-only lines are skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let name = path.to_string_lossy().into_owned();
        let file = File::open(path).map_err(|e| ParseError::Open {
            path: name.clone(),
            source: e,
        })?;
        let dataset = Self::from_reader(BufReader::new(file), &name)?;
        debug!("{}: {} records", name, dataset.len());
        Ok(dataset)
    }

    pub fn from_reader<R: BufRead>(reader: R, name: &str) -> Result<Self, ParseError> {
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ParseError::Read {
                path: name.to_owned(),
                source: e,
            })?;
            let lineno = index + 1;

            let mut tokens = line.split_whitespace();
            let size = match tokens.next() {
                Some(token) => token.parse::<i64>().map_err(|_| ParseError::InvalidSize {
                    path: name.to_owned(),
                    line: lineno,
                    token: token.to_owned(),
                })?,
                None => continue,
            };

            let mut measurements = Vec::new();
            for token in tokens {
                let value = token
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidMeasurement {
                        path: name.to_owned(),
                        line: lineno,
                        token: token.to_owned(),
                    })?;
                measurements.push(value);
            }

            // the mean of zero measurements is undefined
            if measurements.is_empty() {
                return Err(ParseError::MissingMeasurements {
                    path: name.to_owned(),
                    line: lineno,
                });
            }

            records.push(Record::new(size, measurements));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn sizes(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.size).collect()
    }

    pub fn averages(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.average).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
