//! Binary file format for matrices.
//!
//! Layout: the magic bytes, then `p`, `rows` and `cols` as little-endian
//! `u64`, then the entries as little-endian `u32` in row-major order.
//! Equal matrices always serialize to identical bytes.

use std::io::{self, Read, Write};

use crate::dense_matrix::DenseMatrix;

/// Magic bytes opening every matrix file.
pub const MATRIX_MAGIC: [u8; 4] = *b"MRDM";

/// Writes a matrix over F_p.
///
/// # Errors
///
/// Propagates I/O errors from the writer.
pub fn write_matrix<W: Write>(mut writer: W, p: u32, matrix: &DenseMatrix) -> io::Result<()> {
    writer.write_all(&MATRIX_MAGIC)?;
    writer.write_all(&u64::from(p).to_le_bytes())?;
    writer.write_all(&(matrix.num_rows() as u64).to_le_bytes())?;
    writer.write_all(&(matrix.num_cols() as u64).to_le_bytes())?;
    let mut buf = Vec::with_capacity(matrix.data().len() * 4);
    for &x in matrix.data() {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    writer.write_all(&buf)?;
    writer.flush()
}

/// Reads a matrix, returning the characteristic and the entries.
///
/// # Errors
///
/// Returns `InvalidData` for a bad magic, an absurd shape or an entry
/// that is not a residue mod `p`; other I/O errors are propagated.
pub fn read_matrix<R: Read>(mut reader: R) -> io::Result<(u32, DenseMatrix)> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MATRIX_MAGIC {
        return Err(invalid("not a matrix file"));
    }
    let p = u32::try_from(read_u64(&mut reader)?).map_err(|_| invalid("characteristic out of range"))?;
    let rows = usize::try_from(read_u64(&mut reader)?).map_err(|_| invalid("row count out of range"))?;
    let cols = usize::try_from(read_u64(&mut reader)?).map_err(|_| invalid("column count out of range"))?;
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| invalid("matrix shape overflows"))?;

    // the shape is untrusted: grow with the bytes actually read
    let mut data = Vec::new();
    let mut word = [0u8; 4];
    for _ in 0..len {
        reader.read_exact(&mut word)?;
        let x = u32::from_le_bytes(word);
        if x >= p {
            return Err(invalid("entry is not reduced modulo p"));
        }
        data.push(x);
    }
    let matrix = DenseMatrix::from_data(data, rows, cols).ok_or_else(|| invalid("shape mismatch"))?;
    Ok((p, matrix))
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn invalid(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let m = DenseMatrix::from_rows(vec![vec![1, 0, 2]], 3);
        let mut bytes = Vec::new();
        write_matrix(&mut bytes, 3, &m).unwrap();
        assert_eq!(&bytes[..4], b"MRDM");
        assert_eq!(bytes.len(), 4 + 24 + 12);
        let (p, back) = read_matrix(bytes.as_slice()).unwrap();
        assert_eq!(p, 3);
        assert_eq!(back, m);
    }

    #[test]
    fn test_rejects_unreduced_entries() {
        let m = DenseMatrix::from_rows(vec![vec![1, 4]], 2);
        let mut bytes = Vec::new();
        write_matrix(&mut bytes, 5, &m).unwrap();
        // patch p down to 3
        bytes[4] = 3;
        let err = read_matrix(bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_huge_shape_on_short_stream() {
        let mut bytes = MATRIX_MAGIC.to_vec();
        for x in [2u64, 1 << 15, 1 << 15] {
            bytes.extend_from_slice(&x.to_le_bytes());
        }
        bytes.extend_from_slice(&1u32.to_le_bytes());
        let err = read_matrix(bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut bytes = MATRIX_MAGIC.to_vec();
        for x in [2u64, u64::MAX, 2] {
            bytes.extend_from_slice(&x.to_le_bytes());
        }
        let err = read_matrix(bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let err = read_matrix(&b"XXXX"[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
