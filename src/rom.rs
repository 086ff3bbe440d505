use crate::error::RomError;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Size of one PRG-ROM bank.
pub const ROM_SIZE: usize = 0x4000;

/// CPU address of offset 0; the bank sits at the top of the address space.
pub const ORIGIN: u16 = 0xC000;

/// Reduces a CPU address to an offset inside the bank.
pub const ADDRESS_MASK: u16 = 0x3FFF;

/// Operand high bytes at or above this point address cartridge space.
pub const MAPPED_HIGH_BYTE: u8 = 0x80;

/// A 16K PRG-ROM image mapped at $C000-$FFFF.
pub struct Rom {
    bytes: Vec<u8>,
}

impl Rom {
    /// Wrap an in-memory image, rejecting anything but exactly 16K.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RomError> {
        if bytes.len() != ROM_SIZE {
            return Err(RomError::BadSize {
                actual: bytes.len(),
            });
        }
        Ok(Rom { bytes })
    }

    pub fn load(path: &Path) -> Result<Self, RomError> {
        let mut file = File::open(path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn byte(&self, offset: usize) -> u8 {
        self.bytes[offset]
    }

    /// The byte at `offset`, or `None` past the end of the bank.
    pub fn get(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    /// Little-endian word at `offset`. The caller guarantees `offset + 1` is
    /// inside the bank.
    pub fn word(&self, offset: usize) -> u16 {
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    /// Bank offset addressed by the little-endian word stored at `offset`.
    pub fn target(&self, offset: usize) -> usize {
        to_offset(self.word(offset))
    }

    /// Whether the word at `offset` has a high byte in cartridge space.
    pub fn is_mapped(&self, offset: usize) -> bool {
        self.bytes[offset + 1] >= MAPPED_HIGH_BYTE
    }
}

/// Bank offset of a CPU address, folding the $8000 mirror onto $C000.
pub fn to_offset(address: u16) -> usize {
    (address & ADDRESS_MASK) as usize
}

/// CPU address of a bank offset.
pub fn to_address(offset: usize) -> u16 {
    ORIGIN | (offset as u16 & ADDRESS_MASK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_rejects_wrong_size() {
        match Rom::from_bytes(vec![0; 0x4001]) {
            Err(RomError::BadSize { actual }) => assert_eq!(actual, 0x4001),
            _ => panic!("oversized image accepted"),
        }
        assert!(Rom::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_address_folding() {
        assert_eq!(to_offset(0xC010), 0x0010);
        assert_eq!(to_offset(0x8010), 0x0010);
        assert_eq!(to_offset(0xFFFC), 0x3FFC);
        assert_eq!(to_address(0x3FFC), 0xFFFC);
        assert_eq!(to_address(0), 0xC000);
    }

    #[test]
    fn test_words_are_little_endian() {
        let mut bytes = vec![0; ROM_SIZE];
        bytes[0x3FFC] = 0x34;
        bytes[0x3FFD] = 0xD2;
        let rom = Rom::from_bytes(bytes).unwrap();
        assert_eq!(rom.word(0x3FFC), 0xD234);
        assert_eq!(rom.target(0x3FFC), 0x1234);
        assert!(rom.is_mapped(0x3FFC));
        assert!(!rom.is_mapped(0));
    }
}
