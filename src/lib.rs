//! Control-flow tracing disassembler for 16K NES PRG-ROM banks.
//!
//! Starting from the hardware vectors (and any extra code pointer tables),
//! every reachable instruction is traced and each byte of the bank is
//! classified as code, operand, data or pointer. The result is printed as
//! an assembly listing with generated labels.

pub mod config;
pub mod disassembler;
pub mod entry_points;
pub mod error;
pub mod labels;
pub mod listing;
pub mod opcode_tables;
pub mod rom;
pub mod status;
pub mod tracer;

#[cfg(test)]
mod test_utils;


pub use disassembler::{disassemble, Disassembler, Stats};
pub use entry_points::{EntryPoints, PointerTable};
pub use error::{ConfigError, Error, RomError};
pub use listing::{Brackets, Dialect, Listing, Markup};
pub use rom::Rom;
pub use status::{Status, StatusMap};
