//! Framing of the cap file stream into GlobalPlatform LOAD blocks
//!
//! The stream is not parsed. It is wrapped as a `C4` load file data block and
//! cut into blocks small enough for a short APDU.

use crate::error::InstallerError;

/// Tag of the load file data block
pub const LOAD_FILE_DATA_BLOCK_TAG: u8 = 0xC4;

/// Payload bytes per LOAD command
pub const LOAD_BLOCK_SIZE: usize = 240;

/// Block numbers are a single byte
pub const MAX_LOAD_BLOCKS: usize = 256;

/// Largest data block one load can carry
pub const MAX_DATA_BLOCK_SIZE: usize = MAX_LOAD_BLOCKS * LOAD_BLOCK_SIZE;

/// One LOAD command worth of data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBlock<'a> {
    pub number: u8,
    pub last: bool,
    pub data: &'a [u8],
}

/// BER-TLV length: short form below 128, then `81 xx` and `82 xx xx`
pub fn ber_length(length: usize) -> Result<Vec<u8>, InstallerError> {
    match length {
        0..=0x7F => Ok(vec![length as u8]),
        0x80..=0xFF => Ok(vec![0x81, length as u8]),
        0x100..=0xFFFF => Ok(vec![0x82, (length >> 8) as u8, length as u8]),
        _ => Err(InstallerError::CapFileTooLarge { size: length }),
    }
}

/// Wrap raw package bytes as a `C4` data block
pub fn load_file_data_block(package: &[u8]) -> Result<Vec<u8>, InstallerError> {
    let length = ber_length(package.len())?;
    let mut block = Vec::with_capacity(1 + length.len() + package.len());
    block.push(LOAD_FILE_DATA_BLOCK_TAG);
    block.extend(length);
    block.extend_from_slice(package);
    Ok(block)
}

/// Split a data block into numbered LOAD blocks, flagging the last one
pub fn load_blocks(data_block: &[u8]) -> Result<Vec<LoadBlock<'_>>, InstallerError> {
    let count = data_block.len().div_ceil(LOAD_BLOCK_SIZE);
    if count > MAX_LOAD_BLOCKS {
        return Err(InstallerError::CapFileTooLarge {
            size: data_block.len(),
        });
    }

    Ok(data_block
        .chunks(LOAD_BLOCK_SIZE)
        .enumerate()
        .map(|(index, data)| LoadBlock {
            number: index as u8,
            last: index + 1 == count,
            data,
        })
        .collect())
}
