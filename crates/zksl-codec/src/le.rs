//! Fixed-width little-endian integer encoding, used by every binary layout
//! in this workspace (commitment preimage, anchor payload, account records).

pub fn write_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_u64(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn write_i64(out: &mut Vec<u8>, v: i64) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("buffer too short to read {width}-byte integer at offset {offset}")]
pub struct ReadError {
    pub offset: usize,
    pub width: usize,
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32, ReadError> {
    let slice = buf
        .get(offset..offset + 4)
        .ok_or(ReadError { offset, width: 4 })?;
    Ok(u32::from_le_bytes(slice.try_into().unwrap()))
}

pub fn read_u64(buf: &[u8], offset: usize) -> Result<u64, ReadError> {
    let slice = buf
        .get(offset..offset + 8)
        .ok_or(ReadError { offset, width: 8 })?;
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

pub fn read_i64(buf: &[u8], offset: usize) -> Result<i64, ReadError> {
    let slice = buf
        .get(offset..offset + 8)
        .ok_or(ReadError { offset, width: 8 })?;
    Ok(i64::from_le_bytes(slice.try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 0xdead_beef);
        write_u64(&mut buf, 0x0123_4567_89ab_cdef);
        write_i64(&mut buf, -1);

        assert_eq!(read_u32(&buf, 0).unwrap(), 0xdead_beef);
        assert_eq!(read_u64(&buf, 4).unwrap(), 0x0123_4567_89ab_cdef);
        assert_eq!(read_i64(&buf, 12).unwrap(), -1);
    }

    #[test]
    fn read_past_end_errors() {
        let buf = [0u8; 3];
        assert!(read_u32(&buf, 0).is_err());
    }
}
