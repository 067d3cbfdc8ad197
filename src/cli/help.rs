//! Usage text.

use crate::cli::constants::{PROGRAM_NAME, VERSION};

pub fn print_usage(exe_name: &str) {
    println!(
        "{PROGRAM_NAME} {VERSION} — dense stereo disparity from multishot image stacks\n\n\
         Usage: {exe_name} [options] <left-folder> [right-folder]\n\n\
         Each folder holds one camera's image stack as sequentially numbered\n\
         8-bit or 16-bit raw PGM (P5) files, all the same size. If right-folder\n\
         is omitted, left-folder is matched against itself.\n\n\
         Options:\n\
         \x20\x20-m, --mode <full|limited>   descriptor transform mode (default: limited)\n\
         \x20\x20-t, --threshold <f32>       NXC agreement threshold in [-1, 1]; enables stage 4\n\
         \x20\x20-s, --step <f32>            subpixel refinement step in (0, 1]; requires --threshold\n\
         \x20\x20    --min-variance <f32>    reject matches with per-channel variance below this\n\
         \x20\x20    --consistency <u16>     enable left-right consistency, max column round-trip error\n\
         \x20\x20    --no-dupes              reject ambiguous (tied-minimum) matches (default)\n\
         \x20\x20    --allow-dupes           keep the first-seen match even when tied\n\
         \x20\x20-j, --jobs <usize>          worker thread count (default: all logical cores)\n\
         \x20\x20-o, --outfile <path>        output disparity map path (default: disparity.pgm)\n\
         \x20\x20-v, --verbose               increase log verbosity (repeatable)\n\
         \x20\x20-h, --help                  print this message"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_usage_does_not_panic() {
        print_usage("bicos");
    }
}
