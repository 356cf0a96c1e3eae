//! KMZ container access

use std::io::{Cursor, Read};

use crate::config::defaults::DOCUMENT_MEMBER;
use crate::error::ExtractError;

/// Read the geospatial document member out of a KMZ payload.
///
/// The payload is read in memory; nothing is written to disk.
pub fn read_document(payload: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(payload))
        .map_err(|e| ExtractError::BadArchive(format!("not a zip archive: {e}")))?;

    let mut member = archive
        .by_name(DOCUMENT_MEMBER)
        .map_err(|e| ExtractError::BadArchive(format!("{DOCUMENT_MEMBER}: {e}")))?;

    let mut xml = Vec::with_capacity(usize::try_from(member.size()).unwrap_or(0));
    member
        .read_to_end(&mut xml)
        .map_err(|e| ExtractError::BadArchive(format!("{DOCUMENT_MEMBER}: {e}")))?;
    Ok(xml)
}
