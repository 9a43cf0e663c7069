// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Computes a head to head performance comparison between two test runs
//! and plots the ratio of their average measurements.

#[macro_use]
extern crate log;

use std::process;

use clap::{App, Arg};

use ratiograph::{ratio_series, Dataset, RatioPlot};

fn main() {
    let matches = App::new("ratiograph")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plots the ratio of average measurements between two benchmark result files")
        .arg(
            Arg::with_name("f1")
                .value_name("FILE")
                .help("baseline measurement file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("f2")
                .value_name("FILE")
                .help("comparison measurement file")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("output image path, format inferred from the extension")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ylabel")
                .long("ylabel")
                .value_name("TEXT")
                .help("y axis label")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("title")
                .long("title")
                .value_name("TEXT")
                .help("plot title")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("verbosity (stacking)"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let dataset1 = load_or_exit(matches.value_of("f1").unwrap());
    let dataset2 = load_or_exit(matches.value_of("f2").unwrap());

    let comparison = match ratio_series(&dataset1, &dataset2) {
        Ok(series) => series,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let mut plot = RatioPlot::new(comparison);
    if let Some(label) = matches.value_of("ylabel") {
        plot.ylabel(label);
    }
    if let Some(title) = matches.value_of("title") {
        plot.title(title);
    }

    match matches.value_of("output") {
        Some(path) => {
            if let Err(e) = plot.save(path) {
                error!("unable to save plot to {}: {}", path, e);
                process::exit(1);
            }
            info!("saved plot to {}", path);
        }
        None => {
            // without an output path there is no safe way to guess the
            // format, so the plot is discarded
            debug!("no output path given; plot discarded");
        }
    }
}

fn load_or_exit(path: &str) -> Dataset {
    match Dataset::load(path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
