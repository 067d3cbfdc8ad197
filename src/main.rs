//! Binary entry point for the `bicos` command-line tool.
//!
//! 1. [`parse_args`] processes `argv` into a [`ParsedArgs`] value.
//! 2. [`run`] loads both image sequences, calls [`bicos::match_stereo`],
//!    and writes the resulting disparity map.
//!
//! All heap allocations are released by Rust's RAII; there is no explicit
//! `free` or `goto _cleanup`.

use bicos::cli::args::{parse_args, ParsedArgs};
use bicos::cli::constants::set_display_level;
use bicos::cli::help::print_usage;
use bicos::cli::sequence::{load_sequence, save_disparity, LoadedStack};
use bicos::{displaylevel, match_stereo};

/// Runs the matcher end to end: load both sequences, dispatch by their bit
/// depth, write the disparity map. Returns the process exit code.
fn run(args: ParsedArgs) -> i32 {
    if let Some(jobs) = args.jobs {
        let n = bicos::threadpool::resolve_num_threads(Some(jobs));
        if bicos::threadpool::install_global_pool(n).is_err() {
            displaylevel!(2, "warning: could not set thread count, using rayon's default");
        }
    }

    displaylevel!(3, "loading {}", args.left_folder.display());
    let left = match load_sequence(&args.left_folder) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bicos: {e:#}");
            return 1;
        }
    };

    displaylevel!(3, "loading {}", args.right_folder.display());
    let right = match load_sequence(&args.right_folder) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("bicos: {e:#}");
            return 1;
        }
    };

    let result = match (left, right) {
        (LoadedStack::U8(l), LoadedStack::U8(r)) => match_stereo(&l, &r, &args.config),
        (LoadedStack::U16(l), LoadedStack::U16(r)) => match_stereo(&l, &r, &args.config),
        _ => {
            eprintln!("bicos: left and right sequences have different bit depths");
            return 1;
        }
    };

    let (disp_map, corr) = match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("bicos: {e}");
            return 1;
        }
    };

    if let Err(e) = save_disparity(&args.outfile, &disp_map) {
        eprintln!("bicos: {e:#}");
        return 1;
    }
    displaylevel!(2, "wrote {}", args.outfile.display());

    if let Some(corr) = corr {
        let valid = corr.as_slice().iter().filter(|&&c| c != 0.0).count();
        displaylevel!(3, "{valid} pixels survived NXC agreement");
    }

    0
}

fn main() {
    let argv0 = std::env::args().next().unwrap_or_else(|| "bicos".to_owned());
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let args = match parse_args(argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("bicos: {e}");
            std::process::exit(1);
        }
    };

    if args.exit_early {
        print_usage(&argv0);
        std::process::exit(0);
    }

    set_display_level(args.verbosity);

    let exit_code = run(args);
    std::process::exit(exit_code);
}
