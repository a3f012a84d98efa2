use std::process::exit;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Dataset file to normalize and check
    input: String,

    /// Output path, defaults to rewriting the input in place
    output: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = process::run(&args.input, args.output.as_deref()) {
        eprintln!("{e}");
        exit(1);
    }
}
