//! Raw-PGM (binary P5) image sequence I/O for the CLI boundary.
//!
//! The library core never touches a file or an image codec (§6
//! Non-goals); this module is the thin, deliberately minimal bridge that
//! lets the binary load a folder of frames into an [`InputStack`] and
//! write a [`DispMap`] back out. It supports exactly one format — 8-bit or
//! 16-bit binary PGM, no comments, no whitespace-separated ASCII variant —
//! which is all a synthetic test stack or a `cv::imwrite`-produced
//! calibration capture ever needs.

use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::types::{DispMap, InputStack, INVALID_DISP};

/// A loaded image stack, depth-tagged at runtime since the folder's bit
/// depth isn't known until the first file is parsed.
pub enum LoadedStack {
    U8(InputStack<u8>),
    U16(InputStack<u16>),
}

fn sorted_pgm_paths(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(folder)
        .with_context(|| format!("reading directory {}", folder.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("pgm"))
        .collect();
    paths.sort();
    if paths.len() < 2 {
        bail!(
            "{} contains {} .pgm file(s), need at least 2",
            folder.display(),
            paths.len()
        );
    }
    Ok(paths)
}

struct PgmHeader {
    width: usize,
    height: usize,
    maxval: u32,
}

fn read_pgm_header<R: BufRead>(r: &mut R) -> Result<PgmHeader> {
    let mut magic = [0u8; 2];
    r.read_exact(&mut magic).context("reading PGM magic")?;
    if &magic != b"P5" {
        bail!("not a binary PGM (P5) file");
    }

    let mut fields: Vec<u32> = Vec::with_capacity(3);
    while fields.len() < 3 {
        let mut token = String::new();
        loop {
            let mut byte = [0u8; 1];
            if r.read(&mut byte)? == 0 {
                bail!("truncated PGM header");
            }
            let c = byte[0] as char;
            if c == '#' {
                // comment: consume until end of line
                let mut line = String::new();
                r.read_line(&mut line)?;
                continue;
            }
            if c.is_whitespace() {
                if token.is_empty() {
                    continue;
                }
                break;
            }
            token.push(c);
        }
        fields.push(token.parse().context("parsing PGM header field")?);
    }

    Ok(PgmHeader {
        width: fields[0] as usize,
        height: fields[1] as usize,
        maxval: fields[2],
    })
}

fn read_pgm(path: &Path) -> Result<(PgmHeader, Vec<u8>)> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let header = read_pgm_header(&mut reader)?;

    let bytes_per_sample = if header.maxval > 255 { 2 } else { 1 };
    let mut data = vec![0u8; header.width * header.height * bytes_per_sample];
    reader
        .read_exact(&mut data)
        .with_context(|| format!("reading pixel data from {}", path.display()))?;
    Ok((header, data))
}

/// Loads every `.pgm` file in `folder` (sorted by filename) into an
/// [`InputStack`], choosing `u8` or `u16` from the first file's `maxval`.
/// All frames must share the same dimensions and bit depth.
pub fn load_sequence(folder: &Path) -> Result<LoadedStack> {
    let paths = sorted_pgm_paths(folder)?;

    let (first_header, first_data) = read_pgm(&paths[0])?;
    let width = first_header.width;
    let height = first_header.height;
    let use_u16 = first_header.maxval > 255;

    if use_u16 {
        let mut frames: Vec<Vec<u16>> = Vec::with_capacity(paths.len());
        frames.push(bytes_to_u16(&first_data));
        for path in &paths[1..] {
            let (header, data) = read_pgm(path)?;
            check_dims(&header, width, height, use_u16)?;
            frames.push(bytes_to_u16(&data));
        }
        Ok(LoadedStack::U16(InputStack::new(frames, width, height)?))
    } else {
        let mut frames: Vec<Vec<u8>> = Vec::with_capacity(paths.len());
        frames.push(first_data);
        for path in &paths[1..] {
            let (header, data) = read_pgm(path)?;
            check_dims(&header, width, height, use_u16)?;
            frames.push(data);
        }
        Ok(LoadedStack::U8(InputStack::new(frames, width, height)?))
    }
}

fn check_dims(header: &PgmHeader, width: usize, height: usize, use_u16: bool) -> Result<()> {
    if header.width != width || header.height != height {
        bail!(
            "frame size {}x{} does not match sequence size {}x{}",
            header.width,
            header.height,
            width,
            height
        );
    }
    if (header.maxval > 255) != use_u16 {
        bail!("mixed 8-bit and 16-bit frames within one sequence");
    }
    Ok(())
}

fn bytes_to_u16(data: &[u8]) -> Vec<u16> {
    data.chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

/// Writes a disparity map as a 16-bit binary PGM. Integer disparities are
/// offset by `i16::MAX / 2` so negative values stay representable; invalid
/// pixels write `0`. Subpixel disparities are rounded to the nearest
/// integer before the same encoding.
pub fn save_disparity(path: &Path, map: &DispMap) -> Result<()> {
    let width = map.width();
    let height = map.height();
    let mut out = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;

    write!(out, "P5\n{width} {height}\n65535\n")?;

    let offset: i32 = 1 << 14;
    let samples: Vec<u16> = match map {
        DispMap::Int(m) => m
            .as_slice()
            .iter()
            .map(|&d| {
                if d == INVALID_DISP {
                    0
                } else {
                    (d as i32 + offset).clamp(0, u16::MAX as i32) as u16
                }
            })
            .collect(),
        DispMap::Float(m) => m
            .as_slice()
            .iter()
            .map(|&d| {
                if d.is_nan() {
                    0
                } else {
                    (d.round() as i32 + offset).clamp(0, u16::MAX as i32) as u16
                }
            })
            .collect(),
    };

    let mut buf = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        buf.extend_from_slice(&s.to_be_bytes());
    }
    out.write_all(&buf)?;
    Ok(())
}

/// Writes a `(width, height)`-shaped buffer of arbitrary 8-bit values, used
/// by the e2e/integration tests to synthesize fixture sequences without
/// going through an external image library.
pub fn write_pgm_u8(path: &Path, data: &[u8], width: usize, height: usize) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    write!(f, "P5\n{width} {height}\n255\n")?;
    f.write_all(data)
}
