//! Command-line argument parsing.
//!
//! A small hand-rolled parser, in the same style as the teacher's
//! `lz4cli.c` port: a single pass over `argv`, `--long=value` and
//! `--long value` both accepted, first matching branch wins.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::cli::arg_utils::long_command_w_arg;
use crate::config::{Config, SearchVariant, TransformMode};

#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub config: Config,
    pub left_folder: PathBuf,
    pub right_folder: PathBuf,
    pub outfile: PathBuf,
    pub jobs: Option<usize>,
    pub verbosity: u32,
    /// Set by `-h`/`--help`; the caller should print usage and exit 0
    /// without running the matcher.
    pub exit_early: bool,
}

fn parse_f32(flag: &str, value: &str) -> Result<f32> {
    value
        .parse::<f32>()
        .with_context(|| format!("{flag} expects a floating-point value, got '{value}'"))
}

fn parse_usize(flag: &str, value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .with_context(|| format!("{flag} expects a non-negative integer, got '{value}'"))
}

/// Parses `argv` (excluding `argv[0]`) into a [`ParsedArgs`].
pub fn parse_args<I: IntoIterator<Item = String>>(argv: I) -> Result<ParsedArgs> {
    let mut config = Config::default();
    let mut max_lr_diff: Option<u16> = None;
    let mut no_dupes = true;
    let mut positionals: Vec<String> = Vec::new();
    let mut outfile: Option<PathBuf> = None;
    let mut jobs: Option<usize> = None;
    let mut verbosity = 2u32;

    let args: Vec<String> = argv.into_iter().collect();
    let mut i = 0usize;
    while i < args.len() {
        let arg = args[i].as_str();

        let mut take_value = |name: &str, inline: Option<&str>, i: &mut usize| -> Result<String> {
            if let Some(v) = inline {
                return Ok(v.to_owned());
            }
            *i += 1;
            args.get(*i)
                .cloned()
                .with_context(|| format!("{name} expects a value"))
        };

        match arg {
            "-h" | "--help" => {
                return Ok(ParsedArgs {
                    config,
                    left_folder: PathBuf::new(),
                    right_folder: PathBuf::new(),
                    outfile: PathBuf::from("disparity.pgm"),
                    jobs: None,
                    verbosity,
                    exit_early: true,
                });
            }
            "-v" | "--verbose" => {
                verbosity += 1;
            }
            "-m" | "--mode" => {
                let v = take_value("--mode", None, &mut i)?;
                config.mode = match v.as_str() {
                    "full" => TransformMode::Full,
                    "limited" => TransformMode::Limited,
                    other => bail!("--mode expects 'full' or 'limited', got '{other}'"),
                };
            }
            "-t" | "--threshold" => {
                let v = take_value("--threshold", None, &mut i)?;
                config.nxcorr_threshold = Some(parse_f32("--threshold", &v)?);
            }
            "-s" | "--step" => {
                let v = take_value("--step", None, &mut i)?;
                config.subpixel_step = Some(parse_f32("--step", &v)?);
            }
            "--min-variance" => {
                let v = take_value("--min-variance", None, &mut i)?;
                config.min_variance = Some(parse_f32("--min-variance", &v)?);
            }
            "--consistency" => {
                let v = take_value("--consistency", None, &mut i)?;
                max_lr_diff = Some(parse_usize("--consistency", &v)? as u16);
            }
            "--no-dupes" => {
                no_dupes = true;
            }
            "--allow-dupes" => {
                no_dupes = false;
            }
            "-j" | "--jobs" => {
                let v = take_value("--jobs", None, &mut i)?;
                jobs = Some(parse_usize("--jobs", &v)?);
            }
            "-o" | "--outfile" => {
                let v = take_value("--outfile", None, &mut i)?;
                outfile = Some(PathBuf::from(v));
            }
            _ if arg.starts_with("--threshold=") => {
                let v = long_command_w_arg(arg, "--threshold").unwrap();
                config.nxcorr_threshold = Some(parse_f32("--threshold", v)?);
            }
            _ if arg.starts_with("--step=") => {
                let v = long_command_w_arg(arg, "--step").unwrap();
                config.subpixel_step = Some(parse_f32("--step", v)?);
            }
            _ if arg.starts_with("--min-variance=") => {
                let v = long_command_w_arg(arg, "--min-variance").unwrap();
                config.min_variance = Some(parse_f32("--min-variance", v)?);
            }
            _ if arg.starts_with("--mode=") => {
                let v = long_command_w_arg(arg, "--mode").unwrap();
                config.mode = match v {
                    "full" => TransformMode::Full,
                    "limited" => TransformMode::Limited,
                    other => bail!("--mode expects 'full' or 'limited', got '{other}'"),
                };
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                bail!("unrecognized option '{arg}'");
            }
            positional => positionals.push(positional.to_owned()),
        }
        i += 1;
    }

    config.variant = match max_lr_diff {
        Some(max_lr_diff) => SearchVariant::Consistency {
            max_lr_diff,
            no_dupes,
        },
        None => SearchVariant::NoConsistency { no_dupes },
    };

    let left_folder = positionals
        .first()
        .map(PathBuf::from)
        .context("expected at least one input folder")?;
    let right_folder = positionals
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| left_folder.clone());

    Ok(ParsedArgs {
        config,
        left_folder,
        right_folder,
        outfile: outfile.unwrap_or_else(|| PathBuf::from("disparity.pgm")),
        jobs,
        verbosity,
        exit_early: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_owned).collect()
    }

    #[test]
    fn parses_two_positional_folders() {
        let args = parse_args(argv("left right")).unwrap();
        assert_eq!(args.left_folder, PathBuf::from("left"));
        assert_eq!(args.right_folder, PathBuf::from("right"));
    }

    #[test]
    fn single_folder_duplicated_for_right() {
        let args = parse_args(argv("only")).unwrap();
        assert_eq!(args.right_folder, args.left_folder);
    }

    #[test]
    fn threshold_and_mode_flags() {
        let args = parse_args(argv("-t 0.8 -m full left right")).unwrap();
        assert_eq!(args.config.nxcorr_threshold, Some(0.8));
        assert_eq!(args.config.mode, TransformMode::Full);
    }

    #[test]
    fn equals_form_accepted() {
        let args = parse_args(argv("left right --threshold=0.5")).unwrap();
        assert_eq!(args.config.nxcorr_threshold, Some(0.5));
    }

    #[test]
    fn consistency_sets_variant() {
        let args = parse_args(argv("--consistency 3 left right")).unwrap();
        assert!(matches!(
            args.config.variant,
            SearchVariant::Consistency { max_lr_diff: 3, .. }
        ));
    }

    #[test]
    fn help_flag_exits_early_without_positionals() {
        let args = parse_args(argv("-h")).unwrap();
        assert!(args.exit_early);
    }

    #[test]
    fn missing_folder_is_an_error() {
        assert!(parse_args(argv("-v")).is_err());
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse_args(argv("--bogus left right")).is_err());
    }
}
