/*
    Multiprop, synchronized parallel orbit propagation
    Copyright (C) 2024 The multiprop developers

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

extern crate log;
extern crate multiprop;
extern crate pretty_env_logger;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use multiprop::io::{parse_utc_epoch, ConfigRepr, PropagationConfig};
use multiprop::parallel::{build_propagators, ParallelPropagation, StepHandler, SyncStep};
use multiprop::time::Epoch;
use multiprop::Spacecraft;
use serde::Serialize;
use std::env::{set_var, var};
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};

const LOG_VAR: &str = "MULTIPROP_LOG";

/// Propagates several spacecraft on one synchronized step schedule and exports every step to CSV.
#[derive(Parser, Debug)]
#[command(name = "multiprop", version, about)]
struct Args {
    /// Configuration files (JSON, or YAML with a .yaml extension), each holding one configuration or a list of them
    #[arg(required = true)]
    configs: Vec<PathBuf>,
    /// Start of the propagation window, in UTC (e.g. 2019-05-01T00:00:00Z)
    #[arg(long)]
    start: String,
    /// End of the propagation window, in UTC. May precede the start to propagate backward.
    #[arg(long)]
    end: String,
    /// Output CSV file
    #[arg(short, long, default_value = "steps.csv")]
    output: PathBuf,
}

#[derive(Serialize)]
struct StepRow {
    epoch: String,
    object: usize,
    x_m: f64,
    y_m: f64,
    z_m: f64,
    vx_m_s: f64,
    vy_m_s: f64,
    vz_m_s: f64,
    mass_kg: f64,
}

/// Writes each synchronized step to a CSV file and tracks the simulated time on a progress bar.
struct CsvExporter {
    wtr: csv::Writer<File>,
    pb: ProgressBar,
    start: Epoch,
    rows: usize,
    /// First write error, which stops the export
    error: Option<csv::Error>,
}

impl CsvExporter {
    fn new(path: &Path, start: Epoch, end: Epoch) -> Result<Self, Box<dyn Error>> {
        let wtr = csv::Writer::from_path(path)?;
        info!("Saving output to {}", path.display());

        let pb = ProgressBar::new((end - start).abs().to_seconds().ceil() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:60.cyan/blue} {pos:>9}/{len:9} s {msg}")?
                .progress_chars("##-"),
        );

        Ok(Self {
            wtr,
            pb,
            start,
            rows: 0,
            error: None,
        })
    }

    fn write(&mut self, epoch: Epoch, states: &[Spacecraft]) {
        if self.error.is_some() {
            return;
        }
        for (object, sc) in states.iter().enumerate() {
            let row = StepRow {
                epoch: format!("{epoch}"),
                object,
                x_m: sc.orbit.x_m,
                y_m: sc.orbit.y_m,
                z_m: sc.orbit.z_m,
                vx_m_s: sc.orbit.vx_m_s,
                vy_m_s: sc.orbit.vy_m_s,
                vz_m_s: sc.orbit.vz_m_s,
                mass_kg: sc.mass_kg,
            };
            if let Err(e) = self.wtr.serialize(row) {
                error!("could not write step at {epoch}: {e}");
                self.error = Some(e);
                return;
            }
            self.rows += 1;
        }
    }
}

impl StepHandler<Spacecraft> for CsvExporter {
    fn init(&mut self, states: &[Spacecraft], _target: Epoch) {
        self.write(self.start, states);
    }

    fn handle_step(&mut self, step: &SyncStep<Spacecraft>) {
        // The start snapshot of an empty window was already written by `init`
        if !(step.is_last && step.epoch == self.start) {
            self.write(step.epoch, &step.states);
        }
        self.pb
            .set_position((step.epoch - self.start).abs().to_seconds() as u64);
    }

    fn finish(&mut self) {
        self.pb.finish_with_message("done");
        if let Err(e) = self.wtr.flush() {
            error!("could not flush the output: {e}");
            if self.error.is_none() {
                self.error = Some(e.into());
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }

    if pretty_env_logger::try_init_custom_env(LOG_VAR).is_err() {
        println!("could not init logger");
    }

    let mut cfgs = Vec::new();
    for path in &args.configs {
        let loaded = PropagationConfig::load_many(path)?;
        info!("Loaded {} configuration(s) from {}", loaded.len(), path.display());
        cfgs.extend(loaded);
    }

    let start = parse_utc_epoch("start", &args.start)?;
    let end = parse_utc_epoch("end", &args.end)?;

    let setups = build_propagators(&cfgs)?;
    let mut exporter = CsvExporter::new(&args.output, start, end)?;

    let mut driver = ParallelPropagation::from_setups(&setups);
    driver.propagate(start, end, &mut exporter)?;

    if let Some(e) = exporter.error.take() {
        return Err(e.into());
    }
    info!("Wrote {} rows to {}", exporter.rows, args.output.display());

    Ok(())
}
