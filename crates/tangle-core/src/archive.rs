use std::io::Read;

use flate2::read::DeflateDecoder;
use thiserror::Error;

use crate::types::{ArchiveEntry, Diagnostic, DiagnosticKind};

const EOCD_SIG: u32 = 0x0605_4b50;
const CENTRAL_SIG: u32 = 0x0201_4b50;
const LOCAL_SIG: u32 = 0x0403_4b50;

/// Fixed size of the end-of-central-directory record, excluding the comment.
const EOCD_LEN: usize = 22;
/// Fixed size of a local file header, excluding name and extra field.
const LOCAL_HEADER_LEN: usize = 30;
/// Fixed size of a central directory record, excluding variable fields.
const CENTRAL_HEADER_LEN: usize = 46;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// Fatal archive failures. Anything listed here aborts the whole
/// extraction with no partial output; per-entry problems are recovered
/// locally and surfaced as warnings instead.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no end-of-central-directory record found")]
    MissingEndOfCentralDirectory,
    #[error("central directory out of bounds (offset {offset}, archive is {len} bytes)")]
    CentralDirectoryOutOfBounds { offset: usize, len: usize },
}

/// Successful extraction output: the surviving entries plus warnings
/// for every entry that had to be dropped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub entries: Vec<ArchiveEntry>,
    pub warnings: Vec<Diagnostic>,
}

/// Parse the container format and yield `(path, content)` pairs.
///
/// The container is walked by hand: backward scan for the
/// end-of-central-directory signature (tolerating a trailing comment of
/// unknown length), then a sequential walk of the central directory.
/// Only the per-entry deflate payloads go through `flate2`.
pub fn extract(buffer: &[u8]) -> Result<Extraction, ArchiveError> {
    let eocd = find_eocd(buffer).ok_or(ArchiveError::MissingEndOfCentralDirectory)?;

    let entry_count = read_u16(buffer, eocd + 10).unwrap_or(0) as usize;
    let cd_offset = read_u32(buffer, eocd + 16).unwrap_or(0) as usize;

    if cd_offset >= buffer.len() && entry_count > 0 {
        return Err(ArchiveError::CentralDirectoryOutOfBounds {
            offset: cd_offset,
            len: buffer.len(),
        });
    }

    let mut out = Extraction::default();
    let mut pos = cd_offset;

    for _ in 0..entry_count {
        let Some(record) = read_central_record(buffer, pos) else {
            // Once a central record is unreadable the following offsets
            // are unreliable; keep what we have.
            out.warnings.push(Diagnostic::new(
                DiagnosticKind::CorruptEntry,
                format!("<central directory @{pos}>"),
                "unreadable central directory record, remaining entries skipped",
            ));
            break;
        };
        pos = record.next_pos;

        // Directory entries are skipped without attempting decompression.
        if record.name.ends_with('/') || record.name.ends_with('\\') {
            continue;
        }

        match read_entry(buffer, &record) {
            Ok(content) => out.entries.push(ArchiveEntry {
                path: record.name.replace('\\', "/"),
                content,
            }),
            Err(warning) => out.warnings.push(warning),
        }
    }

    Ok(out)
}

struct CentralRecord {
    name: String,
    flags: u16,
    method: u16,
    compressed_size: usize,
    uncompressed_size: usize,
    local_offset: usize,
    next_pos: usize,
}

fn read_central_record(buffer: &[u8], pos: usize) -> Option<CentralRecord> {
    if read_u32(buffer, pos)? != CENTRAL_SIG {
        return None;
    }
    let flags = read_u16(buffer, pos + 8)?;
    let method = read_u16(buffer, pos + 10)?;
    let compressed_size = read_u32(buffer, pos + 20)? as usize;
    let uncompressed_size = read_u32(buffer, pos + 24)? as usize;
    let name_len = read_u16(buffer, pos + 28)? as usize;
    let extra_len = read_u16(buffer, pos + 30)? as usize;
    let comment_len = read_u16(buffer, pos + 32)? as usize;
    let local_offset = read_u32(buffer, pos + 42)? as usize;

    let name_start = pos + CENTRAL_HEADER_LEN;
    let name_bytes = buffer.get(name_start..name_start + name_len)?;
    let name = String::from_utf8_lossy(name_bytes).into_owned();

    Some(CentralRecord {
        name,
        flags,
        method,
        compressed_size,
        uncompressed_size,
        local_offset,
        next_pos: name_start + name_len + extra_len + comment_len,
    })
}

/// Locate and decode one entry's payload via its local header.
/// Every failure is local to the entry and reported as a warning.
fn read_entry(buffer: &[u8], record: &CentralRecord) -> Result<String, Diagnostic> {
    let corrupt = |detail: &str| {
        Diagnostic::new(DiagnosticKind::CorruptEntry, record.name.clone(), detail)
    };

    // Encrypted entries (general purpose bit 0) are out of scope.
    if record.flags & 0x0001 != 0 {
        return Err(Diagnostic::new(
            DiagnosticKind::UnsupportedCompression,
            record.name.clone(),
            "encrypted entry",
        ));
    }

    let lfh = record.local_offset;
    if read_u32(buffer, lfh) != Some(LOCAL_SIG) {
        return Err(corrupt("bad local file header signature"));
    }
    let name_len = read_u16(buffer, lfh + 26).ok_or_else(|| corrupt("truncated local header"))?;
    let extra_len = read_u16(buffer, lfh + 28).ok_or_else(|| corrupt("truncated local header"))?;

    let data_start = lfh + LOCAL_HEADER_LEN + name_len as usize + extra_len as usize;
    let data = buffer
        .get(data_start..data_start + record.compressed_size)
        .ok_or_else(|| corrupt("payload extends past end of archive"))?;

    let raw = match record.method {
        METHOD_STORED => data.to_vec(),
        METHOD_DEFLATE => {
            let mut decoded = Vec::new();
            DeflateDecoder::new(data)
                .read_to_end(&mut decoded)
                .map_err(|e| corrupt(&format!("deflate failed: {e}")))?;
            decoded
        }
        other => {
            return Err(Diagnostic::new(
                DiagnosticKind::UnsupportedCompression,
                record.name.clone(),
                format!("compression method {other}"),
            ));
        }
    };

    if raw.len() != record.uncompressed_size {
        return Err(corrupt(&format!(
            "decoded to {} bytes, central directory declares {}",
            raw.len(),
            record.uncompressed_size
        )));
    }

    String::from_utf8(raw).map_err(|_| corrupt("entry is not valid UTF-8"))
}

/// Backward linear scan for the end-of-central-directory signature.
/// Handles trailing archive comments of unknown length.
fn find_eocd(buffer: &[u8]) -> Option<usize> {
    if buffer.len() < EOCD_LEN {
        return None;
    }
    let mut i = buffer.len() - EOCD_LEN;
    loop {
        if read_u32(buffer, i) == Some(EOCD_SIG) {
            return Some(i);
        }
        if i == 0 {
            return None;
        }
        i -= 1;
    }
}

fn read_u16(buffer: &[u8], pos: usize) -> Option<u16> {
    let bytes = buffer.get(pos..pos + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(buffer: &[u8], pos: usize) -> Option<u32> {
    let bytes = buffer.get(pos..pos + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
