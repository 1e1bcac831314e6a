//! Hand-assembled archives for tests. Only the pieces the reader
//! actually consumes are filled in; CRCs stay zero because extraction
//! does not verify them.

use std::io::Write;

pub const LOCAL_SIG: u32 = 0x0403_4b50;
pub const CENTRAL_SIG: u32 = 0x0201_4b50;
pub const EOCD_SIG: u32 = 0x0605_4b50;

pub const METHOD_STORED: u16 = 0;
pub const METHOD_DEFLATE: u16 = 8;

pub struct ZipEntry {
    pub name: String,
    pub content: Vec<u8>,
    pub method: u16,
}

impl ZipEntry {
    pub fn stored(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.as_bytes().to_vec(),
            method: METHOD_STORED,
        }
    }

    pub fn deflated(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.as_bytes().to_vec(),
            method: METHOD_DEFLATE,
        }
    }

    pub fn raw(name: &str, content: &[u8], method: u16) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_vec(),
            method,
        }
    }
}

fn le16(v: u16, out: &mut Vec<u8>) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn le32(v: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Assemble a minimal but structurally valid archive by hand.
pub fn build_zip(entries: &[ZipEntry], comment: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut records = Vec::new();

    for entry in entries {
        let payload = match entry.method {
            METHOD_DEFLATE => {
                let mut enc =
                    flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
                enc.write_all(&entry.content).unwrap();
                enc.finish().unwrap()
            }
            _ => entry.content.clone(),
        };

        let local_offset = buf.len() as u32;
        le32(LOCAL_SIG, &mut buf);
        le16(20, &mut buf); // version needed
        le16(0, &mut buf); // flags
        le16(entry.method, &mut buf);
        le16(0, &mut buf); // mod time
        le16(0, &mut buf); // mod date
        le32(0, &mut buf); // crc (unchecked)
        le32(payload.len() as u32, &mut buf);
        le32(entry.content.len() as u32, &mut buf);
        le16(entry.name.len() as u16, &mut buf);
        le16(0, &mut buf); // extra len
        buf.extend_from_slice(entry.name.as_bytes());
        buf.extend_from_slice(&payload);

        records.push((entry, payload.len() as u32, local_offset));
    }

    let cd_offset = buf.len() as u32;
    for (entry, comp_size, local_offset) in &records {
        le32(CENTRAL_SIG, &mut buf);
        le16(20, &mut buf); // version made by
        le16(20, &mut buf); // version needed
        le16(0, &mut buf); // flags
        le16(entry.method, &mut buf);
        le16(0, &mut buf); // mod time
        le16(0, &mut buf); // mod date
        le32(0, &mut buf); // crc
        le32(*comp_size, &mut buf);
        le32(entry.content.len() as u32, &mut buf);
        le16(entry.name.len() as u16, &mut buf);
        le16(0, &mut buf); // extra len
        le16(0, &mut buf); // comment len
        le16(0, &mut buf); // disk number
        le16(0, &mut buf); // internal attrs
        le32(0, &mut buf); // external attrs
        le32(*local_offset, &mut buf);
        buf.extend_from_slice(entry.name.as_bytes());
    }
    let cd_size = buf.len() as u32 - cd_offset;

    le32(EOCD_SIG, &mut buf);
    le16(0, &mut buf); // disk number
    le16(0, &mut buf); // central directory disk
    le16(records.len() as u16, &mut buf);
    le16(records.len() as u16, &mut buf);
    le32(cd_size, &mut buf);
    le32(cd_offset, &mut buf);
    le16(comment.len() as u16, &mut buf);
    buf.extend_from_slice(comment);

    buf
}
