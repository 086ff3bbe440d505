//! Per-byte classification state.
//!
//! Every offset of the bank carries exactly one of [`Status::CODE`] or
//! [`Status::DATA`]; the remaining flags decorate it. All mutation goes
//! through [`StatusMap`] so the code/data exclusivity cannot be broken by
//! callers.

use std::fmt;
use std::ops::{BitOr, RangeInclusive};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status(u8);

impl Status {
    pub const CODE: Status = Status(0x01);
    pub const DATA: Status = Status(0x02);
    pub const LABEL: Status = Status(0x04);
    pub const POINTER: Status = Status(0x08);
    /// First byte of a decoded instruction.
    pub const INSTRUCTION: Status = Status(0x10);

    pub const fn contains(self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_code(self) -> bool {
        self.contains(Status::CODE)
    }

    pub fn is_data(self) -> bool {
        self.contains(Status::DATA)
    }

    pub fn is_label(self) -> bool {
        self.contains(Status::LABEL)
    }

    pub fn is_pointer(self) -> bool {
        self.contains(Status::POINTER)
    }

    pub fn is_instruction(self) -> bool {
        self.contains(Status::INSTRUCTION)
    }

    fn insert(&mut self, other: Status) {
        self.0 |= other.0;
    }

    fn remove(&mut self, other: Status) {
        self.0 &= !other.0;
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Status::CODE, "CODE"),
            (Status::DATA, "DATA"),
            (Status::LABEL, "LABEL"),
            (Status::POINTER, "POINTER"),
            (Status::INSTRUCTION, "INSTRUCTION"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "Status({})", set.join(" | "))
    }
}

/// Classification of every byte in the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMap {
    entries: Vec<Status>,
}

impl StatusMap {
    /// A map of `len` offsets, all plain data.
    pub fn new(len: usize) -> Self {
        StatusMap {
            entries: vec![Status::DATA; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, offset: usize) -> Option<Status> {
        self.entries.get(offset).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        self.entries.iter().copied()
    }

    // Out-of-range queries answer false, which lets callers probe
    // neighbourhoods and computed targets without clamping first.

    pub fn is_code(&self, offset: usize) -> bool {
        self.get(offset).is_some_and(Status::is_code)
    }

    pub fn is_data(&self, offset: usize) -> bool {
        self.get(offset).is_some_and(Status::is_data)
    }

    pub fn is_label(&self, offset: usize) -> bool {
        self.get(offset).is_some_and(Status::is_label)
    }

    pub fn is_pointer(&self, offset: usize) -> bool {
        self.get(offset).is_some_and(Status::is_pointer)
    }

    pub fn is_instruction(&self, offset: usize) -> bool {
        self.get(offset).is_some_and(Status::is_instruction)
    }

    /// Data with no decoration at all.
    pub fn is_plain_data(&self, offset: usize) -> bool {
        self.get(offset) == Some(Status::DATA)
    }

    pub fn mark_label(&mut self, offset: usize) {
        self.entries[offset].insert(Status::LABEL);
    }

    /// Claim `length` bytes at `start` as one instruction. Operand bytes lose
    /// any label and instruction-start flag they carried.
    pub fn mark_instruction(&mut self, start: usize, length: usize) {
        let first = &mut self.entries[start];
        first.remove(Status::DATA);
        first.insert(Status::CODE | Status::INSTRUCTION);
        for entry in &mut self.entries[start + 1..start + length] {
            entry.remove(Status::DATA | Status::INSTRUCTION | Status::LABEL);
            entry.insert(Status::CODE);
        }
    }

    /// Overwrite a byte as one half of a code pointer.
    pub fn mark_pointer(&mut self, offset: usize) {
        self.entries[offset] = Status::CODE | Status::POINTER;
    }

    /// Return a span to data. Labels survive so flow targets stay addressable.
    pub fn revert(&mut self, span: RangeInclusive<usize>) {
        for entry in &mut self.entries[span] {
            entry.remove(Status::CODE | Status::INSTRUCTION | Status::POINTER);
            entry.insert(Status::DATA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_is_all_data() {
        let map = StatusMap::new(16);
        assert!((0..16).all(|i| map.is_plain_data(i)));
        assert!(!map.is_data(16));
        assert!(!map.is_code(16));
    }

    #[test]
    fn test_instruction_marking_clears_operand_labels() {
        let mut map = StatusMap::new(8);
        map.mark_label(1);
        map.mark_label(2);
        map.mark_instruction(1, 3);
        assert_eq!(
            map.get(1),
            Some(Status::CODE | Status::INSTRUCTION | Status::LABEL)
        );
        assert_eq!(map.get(2), Some(Status::CODE));
        assert_eq!(map.get(3), Some(Status::CODE));
        assert!(map.is_plain_data(4));
    }

    #[test]
    fn test_revert_keeps_labels_only() {
        let mut map = StatusMap::new(8);
        map.mark_instruction(0, 2);
        map.mark_label(0);
        map.mark_pointer(2);
        map.revert(0..=2);
        assert_eq!(map.get(0), Some(Status::DATA | Status::LABEL));
        assert!(map.is_plain_data(1));
        assert!(map.is_plain_data(2));
    }

    #[test]
    fn test_debug_lists_flags() {
        let status = Status::CODE | Status::POINTER;
        assert_eq!(format!("{:?}", status), "Status(CODE | POINTER)");
    }
}
