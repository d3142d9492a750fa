// src/fs/zip.rs
//
// Minimal zip container codec. Directory structure is carried entirely by
// the '/'-separated entry names; explicit directory records are just entries
// with a trailing '/' and no payload. Reading accepts stored and deflated
// entries; writing always emits stored entries.

use std::io::Read;

use flate2::read::DeflateDecoder;
use flate2::Crc;

use super::types::FsError;

const LOCAL_HEADER_SIG: u32 = 0x0403_4b50;
const CENTRAL_DIR_SIG: u32 = 0x0201_4b50;
const EOCD_SIG: u32 = 0x0605_4b50;

const LOCAL_HEADER_LEN: usize = 30;
const CENTRAL_DIR_LEN: usize = 46;
const EOCD_LEN: usize = 22;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;

/// One archive entry: '/'-separated name plus raw (uncompressed) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ZipEntry {
    /// Entries written with a trailing separator denote directories.
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn corrupt(reason: impl Into<String>) -> FsError {
    FsError::CorruptArchive {
        reason: reason.into(),
    }
}

/// Locate the end-of-central-directory record by scanning backwards over the
/// trailing comment space.
fn find_eocd(bytes: &[u8]) -> Result<usize, FsError> {
    if bytes.len() < EOCD_LEN {
        return Err(corrupt("too short for an end-of-central-directory record"));
    }
    let lower_bound = bytes.len().saturating_sub(EOCD_LEN + u16::MAX as usize);
    let mut pos = bytes.len() - EOCD_LEN;
    loop {
        if read_u32(bytes, pos) == EOCD_SIG {
            return Ok(pos);
        }
        if pos == lower_bound {
            return Err(corrupt("end-of-central-directory record not found"));
        }
        pos -= 1;
    }
}

/// Parse the raw bytes of a zip archive into its entries, in central
/// directory order (the order entries were written).
pub fn parse_archive(bytes: &[u8]) -> Result<Vec<ZipEntry>, FsError> {
    let eocd = find_eocd(bytes)?;
    let entry_count = read_u16(bytes, eocd + 10) as usize;
    let cd_offset = read_u32(bytes, eocd + 16) as usize;

    let mut entries = Vec::with_capacity(entry_count);
    let mut pos = cd_offset;

    for _ in 0..entry_count {
        if pos + CENTRAL_DIR_LEN > bytes.len() || read_u32(bytes, pos) != CENTRAL_DIR_SIG {
            return Err(corrupt("bad central directory entry"));
        }
        let method = read_u16(bytes, pos + 10);
        let crc = read_u32(bytes, pos + 16);
        let compressed_size = read_u32(bytes, pos + 20) as usize;
        let name_len = read_u16(bytes, pos + 28) as usize;
        let extra_len = read_u16(bytes, pos + 30) as usize;
        let comment_len = read_u16(bytes, pos + 32) as usize;
        let local_offset = read_u32(bytes, pos + 42) as usize;

        if pos + CENTRAL_DIR_LEN + name_len > bytes.len() {
            return Err(corrupt("truncated central directory"));
        }
        let name = String::from_utf8_lossy(
            &bytes[pos + CENTRAL_DIR_LEN..pos + CENTRAL_DIR_LEN + name_len],
        )
        .into_owned();

        let data = read_entry_data(bytes, local_offset, method, compressed_size, crc, &name)?;
        entries.push(ZipEntry { name, data });

        pos += CENTRAL_DIR_LEN + name_len + extra_len + comment_len;
    }

    Ok(entries)
}

/// Read and decompress one entry's payload via its local file header.
fn read_entry_data(
    bytes: &[u8],
    local_offset: usize,
    method: u16,
    compressed_size: usize,
    expected_crc: u32,
    name: &str,
) -> Result<Vec<u8>, FsError> {
    if local_offset + LOCAL_HEADER_LEN > bytes.len()
        || read_u32(bytes, local_offset) != LOCAL_HEADER_SIG
    {
        return Err(corrupt(format!("bad local header for '{}'", name)));
    }
    // Name/extra lengths in the local header may differ from the central
    // directory's; the local ones position the payload.
    let name_len = read_u16(bytes, local_offset + 26) as usize;
    let extra_len = read_u16(bytes, local_offset + 28) as usize;
    let data_start = local_offset + LOCAL_HEADER_LEN + name_len + extra_len;

    if data_start + compressed_size > bytes.len() {
        return Err(corrupt(format!("truncated payload for '{}'", name)));
    }
    let raw = &bytes[data_start..data_start + compressed_size];

    let data = match method {
        METHOD_STORED => raw.to_vec(),
        METHOD_DEFLATED => {
            let mut out = Vec::new();
            DeflateDecoder::new(raw)
                .read_to_end(&mut out)
                .map_err(|e| corrupt(format!("deflate error in '{}': {}", name, e)))?;
            out
        }
        other => {
            return Err(FsError::UnsupportedArchive {
                reason: format!("compression method {} in '{}'", other, name),
            })
        }
    };

    let mut crc = Crc::new();
    crc.update(&data);
    if crc.sum() != expected_crc {
        return Err(corrupt(format!("crc mismatch in '{}'", name)));
    }

    Ok(data)
}

/// Serialize entries into a complete archive. Entries are written stored,
/// in the order given, which becomes the archive's intrinsic order.
pub fn build_archive(entries: &[ZipEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::with_capacity(entries.len());

    for entry in entries {
        offsets.push(out.len() as u32);
        let mut crc = Crc::new();
        crc.update(&entry.data);
        write_local_header(&mut out, entry, crc.sum());
        out.extend_from_slice(&entry.data);
    }

    let cd_offset = out.len() as u32;
    for (entry, &offset) in entries.iter().zip(&offsets) {
        let mut crc = Crc::new();
        crc.update(&entry.data);
        write_central_entry(&mut out, entry, crc.sum(), offset);
    }
    let cd_size = out.len() as u32 - cd_offset;

    // End of central directory
    out.extend_from_slice(&EOCD_SIG.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // disk numbers
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length

    out
}

fn write_local_header(out: &mut Vec<u8>, entry: &ZipEntry, crc: u32) {
    out.extend_from_slice(&LOCAL_HEADER_SIG.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&METHOD_STORED.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // dos time/date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra length
    out.extend_from_slice(entry.name.as_bytes());
}

fn write_central_entry(out: &mut Vec<u8>, entry: &ZipEntry, crc: u32, local_offset: u32) {
    out.extend_from_slice(&CENTRAL_DIR_SIG.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version made by
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&METHOD_STORED.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // dos time/date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(entry.name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra length
    out.extend_from_slice(&0u16.to_le_bytes()); // comment length
    out.extend_from_slice(&0u16.to_le_bytes()); // disk number start
    out.extend_from_slice(&0u16.to_le_bytes()); // internal attributes
    out.extend_from_slice(&0u32.to_le_bytes()); // external attributes
    out.extend_from_slice(&local_offset.to_le_bytes());
    out.extend_from_slice(entry.name.as_bytes());
}
