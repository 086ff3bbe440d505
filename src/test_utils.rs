// Test utilities for building synthetic PRG-ROM banks
use crate::rom::{Rom, ROM_SIZE};
use crate::status::StatusMap;
use crate::tracer::Tracer;

pub const NMI: usize = 0x3FFA;
pub const RESET: usize = 0x3FFC;
pub const IRQ: usize = 0x3FFE;

pub struct MockRom {
    pub memory: Vec<u8>,
}

impl MockRom {
    /// A bank of zero bytes (all BRK).
    pub fn new() -> Self {
        Self {
            memory: vec![0u8; ROM_SIZE],
        }
    }

    /// A bank filled with `byte`.
    pub fn filled(byte: u8) -> Self {
        Self {
            memory: vec![byte; ROM_SIZE],
        }
    }

    /// Copy `bytes` in at `offset`.
    pub fn code(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Store a little-endian word at `offset`.
    pub fn word(self, offset: usize, value: u16) -> Self {
        self.code(offset, &value.to_le_bytes())
    }

    /// Point NMI, RESET and IRQ at the given CPU addresses.
    pub fn vectors(self, nmi: u16, reset: u16, irq: u16) -> Self {
        self.word(NMI, nmi).word(RESET, reset).word(IRQ, irq)
    }

    pub fn build(self) -> Rom {
        Rom::from_bytes(self.memory).unwrap()
    }
}

/// Trace from a single offset on a fresh map, the way a pointer slot would.
pub fn trace_from(rom: &Rom, start: usize) -> (StatusMap, bool) {
    let mut map = StatusMap::new(rom.len());
    let advanced = Tracer::new(rom, &mut map).trace(start);
    (map, advanced)
}

/// The coverage invariant: exactly one of code/data on every offset.
pub fn assert_code_xor_data(map: &StatusMap) {
    for (offset, status) in map.iter().enumerate() {
        assert!(
            status.is_code() != status.is_data(),
            "offset {:#06x} is {:?}",
            offset,
            status
        );
    }
}
