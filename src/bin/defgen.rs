//! Command-line front-end: defgen [--nm PATH] -o OUT.def INPUT...
//!
//! Inputs ending in `.def` are merged as existing export lists; everything
//! else is treated as an object file. Failing inputs are reported and the
//! remaining files still contribute, but the exit status reflects them.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process;

use anyhow::{bail, Context};

use defgen::logging::init_tracing;
use defgen::DefFileBuilder;

fn usage() -> ! {
    eprintln!("Usage: defgen [--nm PATH] -o OUT.def INPUT...");
    eprintln!("  INPUTs ending in .def are merged as existing export lists;");
    eprintln!("  all other INPUTs are parsed as object files.");
    process::exit(2);
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = env::args().skip(1);
    let mut nm_path: Option<String> = None;
    let mut output: Option<String> = None;
    let mut inputs: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--nm" => match args.next() {
                Some(p) => nm_path = Some(p),
                None => usage(),
            },
            "-o" => match args.next() {
                Some(p) => output = Some(p),
                None => usage(),
            },
            "-h" | "--help" => usage(),
            _ => inputs.push(arg),
        }
    }

    let Some(output) = output else { usage() };
    if inputs.is_empty() {
        usage();
    }

    let mut builder = DefFileBuilder::new();
    if let Some(nm) = nm_path {
        builder.set_nm_path(nm);
    }

    let mut failed = 0usize;
    for input in &inputs {
        let result = if input.ends_with(".def") {
            builder.add_definition_file(input)
        } else {
            builder.add_object_file(input)
        };
        if let Err(err) = result {
            eprintln!("defgen: {err}");
            failed += 1;
        }
    }

    let file = File::create(&output).with_context(|| format!("couldn't create '{output}'"))?;
    let mut out = BufWriter::new(file);
    builder
        .write_to(&mut out)
        .with_context(|| format!("couldn't write '{output}'"))?;

    if failed > 0 {
        bail!("{failed} of {} inputs failed", inputs.len());
    }
    Ok(())
}
