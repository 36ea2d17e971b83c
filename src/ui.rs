#![cfg(feature = "std")]
//! Terminal rendering and coordinate input for the CLI front-ends.

use std::fmt::Write as _;

use crate::common::Coord;
use crate::grid::{Cell, Grid};

/// Largest grid dimension addressable with single column letters.
pub const MAX_UI_SIZE: usize = 26;

fn column_letter(x: usize) -> char {
    (b'A' + x as u8) as char
}

/// Format a coordinate as column letter plus 1-based row, e.g. `B7`.
pub fn coord_to_string(at: Coord) -> String {
    format!("{}{}", column_letter(at.x), at.y + 1)
}

/// Parse `B7`-style input against a `width` x `height` grid.
pub fn parse_coord(input: &str, width: usize, height: usize) -> Result<Coord, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty input".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter", col_ch));
    }
    let x = (col_ch as u8 - b'A') as usize;
    if x >= width {
        return Err(format!(
            "Column '{}' out of bounds - must be A-{}",
            col_ch,
            column_letter(width - 1)
        ));
    }
    let row_str: String = chars.collect();
    if row_str.is_empty() {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let row: usize = row_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, height))?;
    if row == 0 || row > height {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, height));
    }
    Ok(Coord::new(x, row - 1))
}

/// Parse `B7 v` / `B7 h` placement input. Orientation defaults to
/// horizontal when omitted.
pub fn parse_placement(input: &str, width: usize, height: usize) -> Result<(Coord, bool), String> {
    let mut parts = input.split_whitespace();
    let at = parse_coord(parts.next().unwrap_or(""), width, height)?;
    let vertical = match parts.next().map(|s| s.to_ascii_lowercase()) {
        None => false,
        Some(o) if o == "h" || o == "horizontal" => false,
        Some(o) if o == "v" || o == "vertical" => true,
        Some(o) => return Err(format!("Unknown orientation '{}' - use h or v", o)),
    };
    if parts.next().is_some() {
        return Err("Too many values - expected e.g. 'A5 v'".to_string());
    }
    Ok((at, vertical))
}

/// Render a grid. With `reveal` unset, unhit ships are drawn as water.
pub fn render_grid(grid: &Grid, reveal: bool) -> String {
    let mut out = String::new();
    out.push_str("    ");
    for x in 0..grid.width() {
        let _ = write!(out, " {}", column_letter(x));
    }
    out.push('\n');
    for y in 0..grid.height() {
        let _ = write!(out, "  {:2}", y + 1);
        for x in 0..grid.width() {
            let ch = match grid.cell(Coord::new(x, y)) {
                Some(Cell::Hit) => 'X',
                Some(Cell::Miss) => 'o',
                Some(Cell::Occupied(_)) if reveal => 'S',
                _ => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    if reveal {
        out.push_str("    Legend: S=Ship  X=Hit  o=Miss  .=Water\n");
    } else {
        out.push_str("    Legend: X=Hit  o=Miss  .=Unknown\n");
    }
    out
}

/// One line per ship with its damage.
pub fn render_fleet_status(grid: &Grid) -> String {
    let mut out = String::new();
    for ship in grid.ships() {
        let status = if ship.is_sunk() { "SUNK" } else { "Active" };
        let _ = writeln!(
            out,
            "      {} ({}): {} [{}/{} hits]",
            ship.name(),
            ship.length(),
            status,
            ship.hit_count(),
            ship.length()
        );
    }
    out
}
