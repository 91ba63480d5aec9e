//! MATLAB Level-5 MAT writer for a single cell array of strings.
//!
//! Layout: 128-byte header, then one `miMATRIX` element of class `mxCELL`
//! (1×N) whose cells are `mxCHAR` row vectors stored as UTF-16 code units.
//! Every data element is padded to an 8-byte boundary; payloads of four
//! bytes or fewer use the compact small-element tag.

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{DateTime, Utc};
use log::info;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::ensure_parent_dir;

/// Variable name the results are stored under.
pub const MAT_VARIABLE: &str = "results";

const HEADER_TEXT_LEN: usize = 116;

const MI_INT8: u32 = 1;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_MATRIX: u32 = 14;

const MX_CELL_CLASS: u32 = 1;
const MX_CHAR_CLASS: u32 = 4;

pub fn export_to_mat(names: &[String], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let bytes = encode_string_cell(MAT_VARIABLE, names, Utc::now())?;
    fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("[Export] {} name(s) written to {} ({} bytes)", names.len(), path.display(), bytes.len());
    Ok(())
}

/// Encodes `values` as a 1×N cell array named `name`.
pub fn encode_string_cell(name: &str, values: &[String], created: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut out = header(created)?;
    let mut cells = Vec::new();
    for v in values {
        cells.extend(char_matrix("", v)?);
    }
    let cols = u32::try_from(values.len()).context("Too many results for a MAT cell array")?;
    out.extend(matrix(MX_CELL_CLASS, [1, cols], name, &cells)?);
    Ok(out)
}

fn header(created: DateTime<Utc>) -> Result<Vec<u8>> {
    let text = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, Created on: {}",
        std::env::consts::OS,
        created.format("%a %b %e %H:%M:%S %Y")
    );
    let mut buf = Vec::with_capacity(128);
    let mut t = text.into_bytes();
    t.resize(HEADER_TEXT_LEN, b' ');
    buf.write_all(&t)?;
    // subsystem data offset
    buf.write_all(&[0u8; 8])?;
    buf.write_u16::<LittleEndian>(0x0100)?;
    buf.write_all(b"IM")?;
    Ok(buf)
}

fn char_matrix(name: &str, value: &str) -> Result<Vec<u8>> {
    let units: Vec<u16> = value.encode_utf16().collect();
    let len = u32::try_from(units.len()).context("String too long for a char array")?;
    let dims = if len == 0 { [0, 0] } else { [1, len] };
    let mut data = Vec::with_capacity(units.len() * 2);
    for u in &units {
        data.write_u16::<LittleEndian>(*u)?;
    }
    let mut payload = Vec::new();
    write_element(&mut payload, MI_UINT16, &data)?;
    matrix(MX_CHAR_CLASS, dims, name, &payload)
}

fn matrix(class: u32, dims: [u32; 2], name: &str, payload: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    let mut flags = Vec::with_capacity(8);
    flags.write_u32::<LittleEndian>(class)?;
    flags.write_u32::<LittleEndian>(0)?;
    write_element(&mut body, MI_UINT32, &flags)?;

    let mut dim_bytes = Vec::with_capacity(8);
    for d in dims {
        dim_bytes.write_i32::<LittleEndian>(i32::try_from(d).context("Dimension exceeds i32")?)?;
    }
    write_element(&mut body, MI_INT32, &dim_bytes)?;

    write_element(&mut body, MI_INT8, name.as_bytes())?;
    body.extend_from_slice(payload);

    let mut out = Vec::with_capacity(body.len() + 8);
    out.write_u32::<LittleEndian>(MI_MATRIX)?;
    out.write_u32::<LittleEndian>(u32::try_from(body.len()).context("Matrix element too large")?)?;
    out.extend(body);
    Ok(out)
}

fn write_element(buf: &mut Vec<u8>, ty: u32, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len()).context("Data element too large")?;
    if data.len() <= 4 {
        buf.write_u32::<LittleEndian>((len << 16) | ty)?;
        buf.write_all(data)?;
        buf.resize(buf.len() + (4 - data.len()), 0);
        return Ok(());
    }
    buf.write_u32::<LittleEndian>(ty)?;
    buf.write_u32::<LittleEndian>(len)?;
    buf.write_all(data)?;
    let pad = (8 - data.len() % 8) % 8;
    buf.resize(buf.len() + pad, 0);
    Ok(())
}
