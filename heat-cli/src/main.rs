mod ic;

use clap::Parser;
use heat_core::{Bmi, BmiHeat};
use ic::{IcType, Impulse, generate_ic};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the 2D heat model through its model-control interface")]
struct Args {
    /// JSON parameter file (nRows, nCols, dx, dy, xStart, yStart, alpha).
    /// Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop once model time reaches this value
    #[arg(long, default_value_t = 1.0)]
    until: f64,

    /// Initial temperature field
    #[arg(long, value_enum, default_value_t = IcType::Impulse)]
    ic: IcType,

    /// Hot cell for `--ic impulse`, as `row,col,value`
    #[arg(long, default_value = "3,2,100")]
    impulse: Impulse,

    /// Peak temperature of random initial fields
    #[arg(long, default_value_t = 100.0)]
    amplitude: f64,

    /// RNG seed for random initial fields (reproducibility)
    #[arg(long, default_value_t = 123)]
    seed: u64,

    /// Write meta.json and snapshots.jsonl into this directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Do not print the field at every step
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct MetaRow<'a> {
    component: &'a str,
    var_name: &'a str,
    units: &'a str,
    grid_id: i32,
    grid_type: &'a str,
    shape: &'a [usize],
    spacing: &'a [f64],
    origin: &'a [f64],
    time_step: f64,
    until: f64,
    ic_type: &'a str,
    seed: u64,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    step: u64,
    time: f64,
    values: &'a [f64],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.until.is_finite() {
        return Err("--until must be a finite time".into());
    }

    let mut bmi = BmiHeat::new();
    bmi.initialize(args.config.as_deref())?;

    let var_name = bmi
        .output_var_names()?
        .first()
        .map(|name| name.to_string())
        .ok_or("model exposes no output variables")?;
    let grid = bmi.var_grid(&var_name)?;
    let rank = bmi.grid_rank(grid)?;

    let mut shape = vec![0usize; rank];
    let mut spacing = vec![0.0f64; rank];
    let mut origin = vec![0.0f64; rank];
    bmi.grid_shape(grid, &mut shape)?;
    bmi.grid_spacing(grid, &mut spacing)?;
    bmi.grid_origin(grid, &mut origin)?;
    let (rows, cols) = (shape[0], shape[1]);

    if !args.quiet {
        print_metadata(&bmi, &var_name, grid, &shape, &spacing, &origin)?;
    }

    // Initial condition
    let mut temp = vec![0.0; bmi.grid_size(grid)?];
    bmi.get_value(&var_name, &mut temp)?;
    match args.ic {
        IcType::Impulse => {
            let Impulse { row, col, value } = args.impulse;
            if row >= rows || col >= cols {
                return Err(format!("impulse ({row}, {col}) lies outside the {rows}x{cols} grid").into());
            }
            temp[row * cols + col] = value;
        }
        kind => {
            let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
            for (t, v) in temp.iter_mut().zip(generate_ic(&mut rng, rows, cols, kind)) {
                *t = args.amplitude * v;
            }
        }
    }
    bmi.set_value(&var_name, &temp)?;

    let mut snapshots = match &args.out {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let meta = MetaRow {
                component: bmi.component_name(),
                var_name: &var_name,
                units: bmi.var_units(&var_name)?,
                grid_id: grid,
                grid_type: bmi.grid_type(grid)?,
                shape: &shape,
                spacing: &spacing,
                origin: &origin,
                time_step: bmi.time_step()?,
                until: args.until,
                ic_type: args.ic.as_str(),
                seed: args.seed,
            };
            serde_json::to_writer_pretty(File::create(dir.join("meta.json"))?, &meta)?;
            Some(BufWriter::new(File::create(dir.join("snapshots.jsonl"))?))
        }
        None => None,
    };

    // Advance the model, reporting the field before every step
    let mut step: u64 = 0;
    let mut current_time = bmi.current_time()?;
    while current_time < args.until {
        bmi.get_value(&var_name, &mut temp)?;

        if !args.quiet {
            println!("time = {current_time}");
            println!("temperature =");
            print_field(&temp, cols);
        }
        if let Some(w) = snapshots.as_mut() {
            let row = Snapshot {
                step,
                time: current_time,
                values: &temp,
            };
            serde_json::to_writer(&mut *w, &row)?;
            w.write_all(b"\n")?;
        }

        bmi.update()?;
        step += 1;
        current_time = bmi.current_time()?;
    }

    if let Some(mut w) = snapshots {
        w.flush()?;
    }

    info!(steps = step, time = current_time, "run complete");
    bmi.finalize()?;

    if let Some(dir) = &args.out {
        println!("Wrote snapshots to: {}", dir.display());
    }

    Ok(())
}

fn print_metadata(
    bmi: &BmiHeat,
    var_name: &str,
    grid: i32,
    shape: &[usize],
    spacing: &[f64],
    origin: &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Model name: {}", bmi.component_name());
    println!("Start time: {}", bmi.start_time()?);
    println!("End time: {}", bmi.end_time()?);
    println!("Current time: {}", bmi.current_time()?);
    println!("Time step: {}", bmi.time_step()?);
    match bmi.time_units() {
        Ok(units) => println!("Time unit: {units}"),
        Err(e) if e.is_not_supported() => println!("Time unit: n/a"),
        Err(e) => return Err(e.into()),
    }

    println!("Input variables: ");
    for name in bmi.input_var_names()? {
        println!("- {name}");
    }
    println!("Output variables: ");
    for name in bmi.output_var_names()? {
        println!("- {name}");
    }

    println!("Variable: {var_name}");
    println!("- grid_id: {grid}");
    println!("- grid type: {}", bmi.grid_type(grid)?);
    println!("- grid rank: {}", bmi.grid_rank(grid)?);
    println!("- grid size: {}", bmi.grid_size(grid)?);
    println!("- grid shape:");
    for n in shape {
        println!("  - {n}");
    }
    println!("- grid spacing:");
    for d in spacing {
        println!("  - {d}");
    }
    println!("- grid origin:");
    for o in origin {
        println!("  - {o}");
    }
    println!("- var type: {}", bmi.var_type(var_name)?);
    println!("- var units: {}", bmi.var_units(var_name)?);
    println!("- var itemsize: {}", bmi.var_itemsize(var_name)?);
    println!("- var nbytes: {}", bmi.var_nbytes(var_name)?);
    println!("- var location: {}", bmi.var_location(var_name)?);
    Ok(())
}

fn print_field(values: &[f64], cols: usize) {
    for row in values.chunks(cols.max(1)) {
        let line: String = row.iter().map(|v| format!("{v:7.2}")).collect();
        println!("{line}");
    }
}
