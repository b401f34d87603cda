//! Reading and writing `.nontips` and `.dims` files.
//!
//! All integers are machine-native endian. A `.nontips` file holds the
//! header (`p`, `nontips`, `arrows`, `mintips`, `maxlength` as `i64`, then
//! the ordering byte), the nontip words (length as `i64`, then one byte per
//! arrow) and the action matrices (`u32` entries, row-major). A `.dims`
//! file holds one `i64` Jennings dimension per arrow.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use modres_field::{is_prime, valuation, MAX_PRIME};
use modres_linalg::DenseMatrix;
use tracing::debug;

use crate::error::GroupError;
use crate::group::Group;
use crate::ordering::PathOrdering;
use crate::path::Word;

/// Largest algebra dimension a `.nontips` file may declare. Each action
/// matrix holds `nontips²` entries.
pub const MAX_NONTIPS: usize = 1 << 14;

/// The fixed-size head of a `.nontips` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Characteristic.
    pub p: u32,
    /// Dimension of the algebra.
    pub nontips: usize,
    /// Number of arrows.
    pub arrows: usize,
    /// Size of the algebra's Gröbner basis.
    pub mintips: usize,
    /// Longest nontip length.
    pub maxlength: usize,
    /// Path ordering.
    pub ordering: PathOrdering,
}

impl Header {
    /// The header describing `group`.
    #[must_use]
    pub fn of(group: &Group) -> Self {
        Self {
            p: group.p(),
            nontips: group.nontips(),
            arrows: group.arrows(),
            mintips: group.mintips(),
            maxlength: group.maxlength(),
            ordering: group.ordering(),
        }
    }

    /// `v` with `nontips == p^v`.
    #[must_use]
    pub fn order_exponent(&self) -> u32 {
        valuation(u64::from(self.p), self.nontips as u64).unwrap_or(0)
    }
}

/// `<stem>.<ext>`, keeping any dots already in the stem.
#[must_use]
pub fn stem_path(stem: &Path, ext: &str) -> PathBuf {
    let mut s = OsString::from(stem.as_os_str());
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn read_i64<R: Read>(reader: &mut R) -> Result<i64, GroupError> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_ne_bytes(buf))
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, GroupError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_ne_bytes(buf))
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, GroupError> {
    usize::try_from(value).map_err(|_| GroupError::malformed(field, value))
}

/// Reads and checks a `.nontips` header.
///
/// # Errors
///
/// Returns `InputMalformed` naming the first field out of range, or an
/// I/O error if the stream is short.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, GroupError> {
    let p = read_i64(reader)?;
    let nontips = read_i64(reader)?;
    let arrows = read_i64(reader)?;
    let mintips = read_i64(reader)?;
    let maxlength = read_i64(reader)?;
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte)?;

    let p_ok = u32::try_from(p)
        .ok()
        .filter(|&q| q <= MAX_PRIME && is_prime(u64::from(q)));
    let Some(p) = p_ok else {
        return Err(GroupError::malformed("p", p));
    };
    let nontips_raw = nontips;
    let nontips = non_negative("nontips", nontips)?;
    if nontips > MAX_NONTIPS || valuation(u64::from(p), nontips as u64).is_none() {
        return Err(GroupError::malformed("nontips", nontips_raw));
    }
    let arrows_raw = arrows;
    let arrows = non_negative("arrows", arrows)?;
    if arrows > usize::from(u8::MAX) || (arrows == 0 && nontips > 1) {
        return Err(GroupError::malformed("arrows", arrows_raw));
    }
    let mintips = non_negative("mintips", mintips)?;
    let maxlength_raw = maxlength;
    let maxlength = non_negative("maxlength", maxlength)?;
    if maxlength >= nontips {
        return Err(GroupError::malformed("maxlength", maxlength_raw));
    }
    let ordering = PathOrdering::from_byte(byte[0])?;

    Ok(Header {
        p,
        nontips,
        arrows,
        mintips,
        maxlength,
        ordering,
    })
}

/// Writes a `.nontips` header.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write_header<W: Write>(writer: &mut W, header: &Header) -> Result<(), GroupError> {
    for value in [
        header.p as usize,
        header.nontips,
        header.arrows,
        header.mintips,
        header.maxlength,
    ] {
        writer.write_all(&(value as i64).to_ne_bytes())?;
    }
    writer.write_all(&[header.ordering.as_byte()])?;
    Ok(())
}

/// Reads the Jennings dimensions of `arrows` arrows.
///
/// # Errors
///
/// Returns `InputMalformed` for a dimension below one.
pub fn load_dimensions<R: Read>(reader: &mut R, arrows: usize) -> Result<Vec<u32>, GroupError> {
    (0..arrows)
        .map(|_| {
            let d = read_i64(reader)?;
            u32::try_from(d)
                .ok()
                .filter(|&d| d > 0)
                .ok_or_else(|| GroupError::malformed("Jennings dimension", d))
        })
        .collect()
}

/// Writes Jennings dimensions.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write_dimensions<W: Write>(writer: &mut W, dims: &[u32]) -> Result<(), GroupError> {
    for &d in dims {
        writer.write_all(&i64::from(d).to_ne_bytes())?;
    }
    Ok(())
}

/// Reads a whole `.nontips` stream. `dims` are the Jennings dimensions
/// and are only consulted for the Jennings ordering.
///
/// # Errors
///
/// Returns `InputMalformed` if the tables contradict the header or do not
/// describe a valid basic algebra.
pub fn read_group<R: Read>(reader: &mut R, dims: &[u32]) -> Result<Group, GroupError> {
    let header = read_header(reader)?;
    if header.ordering.is_weighted() && dims.len() != header.arrows {
        return Err(GroupError::malformed("number of Jennings dimensions", dims.len()));
    }

    let mut words = Vec::new();
    for _ in 0..header.nontips {
        let len = read_i64(reader)?;
        let len = non_negative("word length", len)?;
        if len > header.maxlength {
            return Err(GroupError::malformed("word length", len));
        }
        let mut word = Word::from_elem(0, len);
        reader.read_exact(&mut word)?;
        words.push(word);
    }

    let n = header.nontips;
    let entries = n
        .checked_mul(n)
        .ok_or_else(|| GroupError::malformed("nontips", n))?;
    let mut action = Vec::with_capacity(header.arrows);
    for _ in 0..header.arrows {
        let data = (0..entries).map(|_| read_u32(reader)).collect::<Result<Vec<_>, _>>()?;
        let matrix = DenseMatrix::from_data(data, n, n)
            .ok_or_else(|| GroupError::malformed("action matrix size", n))?;
        action.push(matrix);
    }

    let dims = if header.ordering.is_weighted() { dims.to_vec() } else { Vec::new() };
    let group = Group::new(header.p, header.ordering, dims, words, action, header.mintips)?;
    if group.maxlength() != header.maxlength {
        return Err(GroupError::malformed("maxlength", header.maxlength));
    }
    Ok(group)
}

/// Writes a whole `.nontips` stream.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn write_group<W: Write>(writer: &mut W, group: &Group) -> Result<(), GroupError> {
    write_header(writer, &Header::of(group))?;
    for node in group.paths().iter() {
        writer.write_all(&(node.word.len() as i64).to_ne_bytes())?;
        writer.write_all(&node.word)?;
    }
    for a in 0..group.arrows() {
        let mut buf = Vec::with_capacity(group.nontips() * group.nontips() * 4);
        for &x in group.action(a).data() {
            buf.extend_from_slice(&x.to_ne_bytes());
        }
        writer.write_all(&buf)?;
    }
    Ok(())
}

/// Reads only the header of `<stem>.nontips`, plus `<stem>.dims` for a
/// Jennings ordering.
///
/// # Errors
///
/// See [`read_header`] and [`load_dimensions`].
pub fn open_header(stem: &Path) -> Result<(Header, Option<Vec<u32>>), GroupError> {
    let mut reader = BufReader::new(File::open(stem_path(stem, "nontips"))?);
    let header = read_header(&mut reader)?;
    let dims = if header.ordering.is_weighted() {
        let mut dims_reader = BufReader::new(File::open(stem_path(stem, "dims"))?);
        Some(load_dimensions(&mut dims_reader, header.arrows)?)
    } else {
        None
    };
    Ok((header, dims))
}

/// Loads the group stored under `stem`.
///
/// # Errors
///
/// See [`read_group`].
pub fn load_group(stem: &Path) -> Result<Group, GroupError> {
    let (header, dims) = open_header(stem)?;
    let mut reader = BufReader::new(File::open(stem_path(stem, "nontips"))?);
    let group = read_group(&mut reader, dims.as_deref().unwrap_or(&[]))?;
    debug!(
        stem = %stem.display(),
        p = header.p,
        nontips = header.nontips,
        arrows = header.arrows,
        "loaded basic algebra"
    );
    Ok(group)
}

/// Stores `group` as `<stem>.nontips` (and `<stem>.dims` for Jennings).
///
/// # Errors
///
/// Propagates I/O errors.
pub fn save_group(group: &Group, stem: &Path) -> Result<(), GroupError> {
    let mut writer = BufWriter::new(File::create(stem_path(stem, "nontips"))?);
    write_group(&mut writer, group)?;
    writer.flush()?;
    if group.ordering().is_weighted() {
        let mut writer = BufWriter::new(File::create(stem_path(stem, "dims"))?);
        write_dimensions(&mut writer, group.arrow_dims())?;
        writer.flush()?;
    }
    Ok(())
}
