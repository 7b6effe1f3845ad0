//! Rendering attention weights.
//!
//! Two views of the same `[n_q, n_k]` weights matrix:
//! - [`render_heatmap`]: a labelled text grid for the terminal, one shade glyph per weight.
//! - [`write_pgm`]: an 8-bit grayscale image (plain PGM, `P2`) with black = 0 and white = 1.
//!
//! Rows are queries, columns are keys. Neither function modifies the weights.

use crate::tensor::{Tensor, TensorElem};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Glyphs from weight 0 (blank) to weight 1 (solid).
const SHADES: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

fn intensity<T: TensorElem>(w: T) -> f64 {
    w.to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
}

fn shade(w: f64) -> char {
    let idx = (w * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx.min(SHADES.len() - 1)]
}

/// Renders `weights` as a text heat-map.
///
/// `row_labels` name the queries and `col_labels` the keys; column labels are written
/// vertically under the grid so that long words do not widen it. Missing labels are
/// left blank.
pub fn render_heatmap<T: TensorElem>(
    weights: &Tensor<T, 2>,
    row_labels: &[String],
    col_labels: &[String],
) -> String {
    let label_width = row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();

    for (i, row) in weights.iter_rows().enumerate() {
        let label = row_labels.get(i).map(String::as_str).unwrap_or("");
        let _ = write!(out, "{:>width$} |", label, width = label_width);
        for &w in row {
            let glyph = shade(intensity(w));
            out.push(glyph);
            out.push(glyph);
        }
        out.push_str("|\n");
    }

    let col_chars: Vec<Vec<char>> = col_labels
        .iter()
        .take(weights.cols())
        .map(|l| l.chars().collect())
        .collect();
    let label_height = col_chars.iter().map(Vec::len).max().unwrap_or(0);

    for k in 0..label_height {
        let _ = write!(out, "{:>width$}  ", "", width = label_width);
        for chars in &col_chars {
            out.push(chars.get(k).copied().unwrap_or(' '));
            out.push(' ');
        }
        // Keep lines free of trailing spaces.
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }

    out
}

/// Writes `weights` as a plain-text PGM image.
///
/// Each weight becomes a `cell_size x cell_size` block of pixels. A `cell_size` of zero
/// is treated as one.
pub fn write_pgm<T: TensorElem, W: Write>(
    weights: &Tensor<T, 2>,
    cell_size: usize,
    writer: &mut W,
) -> io::Result<()> {
    let cell = cell_size.max(1);
    let [rows, cols] = *weights.shape();

    writeln!(writer, "P2")?;
    writeln!(writer, "{} {}", cols * cell, rows * cell)?;
    writeln!(writer, "255")?;

    for row in weights.iter_rows() {
        let line: Vec<String> = row
            .iter()
            .flat_map(|&w| {
                let gray = (intensity(w) * 255.0).round() as u8;
                std::iter::repeat_n(gray.to_string(), cell)
            })
            .collect();
        let line = line.join(" ");
        for _ in 0..cell {
            writeln!(writer, "{}", line)?;
        }
    }

    Ok(())
}

/// Writes `weights` as a PGM image to `path`.
pub fn save_pgm<T: TensorElem, P: AsRef<Path>>(
    weights: &Tensor<T, 2>,
    cell_size: usize,
    path: P,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_pgm(weights, cell_size, &mut writer)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_shade_bounds() {
        assert_eq!(shade(0.0), ' ');
        assert_eq!(shade(1.0), '@');
        assert_eq!(shade(0.5), '+');
    }

    #[test]
    fn test_render_heatmap_layout() {
        let w = Tensor::<f64, 2>::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let text = render_heatmap(&w, &labels(&["le", "chat"]), &labels(&["the", "cat"]));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "  le |@@  |");
        assert_eq!(lines[1], "chat |  @@|");
        // Column labels, written vertically
        assert_eq!(lines[2], "      t c");
        assert_eq!(lines[3], "      h a");
        assert_eq!(lines[4], "      e t");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_heatmap_without_labels() {
        let w = Tensor::<f32, 2>::from_rows(&[[0.5, 0.5]]).unwrap();
        let text = render_heatmap(&w, &[], &[]);
        assert_eq!(text, " |++++|\n");
    }

    #[test]
    fn test_write_pgm() {
        let w = Tensor::<f64, 2>::from_rows(&[[0.0, 1.0]]).unwrap();
        let mut buf = Vec::new();
        write_pgm(&w, 2, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "P2\n4 2\n255\n0 0 255 255\n0 0 255 255\n");
    }

    #[test]
    fn test_save_pgm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.pgm");
        let w = Tensor::<f32, 2>::from_rows(&[[0.25, 0.75]]).unwrap();

        save_pgm(&w, 1, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P2\n2 1\n255\n"));
        assert!(text.ends_with("64 191\n"));
    }
}
