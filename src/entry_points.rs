//! Code pointer tables used to seed the tracer.
//!
//! The hardware vectors (NMI, RESET, IRQ) at the top of the bank are always
//! present. Further tables come from the command line, a TOML config or a
//! legacy `offset|count` pointer file.

use crate::error::ConfigError;
use crate::rom::ROM_SIZE;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Offset of the NMI/RESET/IRQ vectors.
pub const VECTOR_OFFSET: usize = 0x3FFA;
pub const VECTOR_COUNT: usize = 3;

/// `count` consecutive little-endian code pointers starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PointerTable {
    pub offset: usize,
    pub count: usize,
}

impl PointerTable {
    pub fn new(offset: usize, count: usize) -> Self {
        PointerTable { offset, count }
    }

    /// The hardware vector table.
    pub fn vectors() -> Self {
        PointerTable::new(VECTOR_OFFSET, VECTOR_COUNT)
    }

    /// Offsets of the low byte of each slot.
    pub fn slots(&self) -> impl Iterator<Item = usize> {
        let offset = self.offset;
        (0..self.count).map(move |slot| offset + slot * 2)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let end = self
            .count
            .checked_mul(2)
            .and_then(|len| len.checked_add(self.offset));
        match end {
            Some(end) if end <= ROM_SIZE => Ok(()),
            _ => Err(ConfigError::TableOutOfRange {
                offset: self.offset,
                count: self.count,
            }),
        }
    }
}

/// Ordered set of pointer tables; caller tables first, vectors last.
#[derive(Debug, Clone, Default)]
pub struct EntryPoints {
    tables: Vec<PointerTable>,
}

impl EntryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a caller-supplied table after checking it lies inside the bank.
    pub fn add(&mut self, table: PointerTable) -> Result<(), ConfigError> {
        table.validate()?;
        debug!(
            "Pointer table at {:#06x}, {} entries",
            table.offset, table.count
        );
        self.tables.push(table);
        Ok(())
    }

    pub fn extend<I>(&mut self, tables: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = PointerTable>,
    {
        for table in tables {
            self.add(table)?;
        }
        Ok(())
    }

    /// Caller tables only.
    pub fn extra(&self) -> &[PointerTable] {
        &self.tables
    }

    /// Every table in seeding order, ending with the hardware vectors.
    pub fn tables(&self) -> impl Iterator<Item = PointerTable> + '_ {
        self.tables
            .iter()
            .copied()
            .chain(std::iter::once(PointerTable::vectors()))
    }
}

/// Parse a number the way the pointer files write them: decimal, `0x`, `#`
/// or `$` hex, or octal with a leading zero. A leading minus is accepted so
/// that negative offsets are reported as out of range rather than as
/// syntax errors.
pub fn parse_number(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'))
        .or_else(|| digits.strip_prefix('$'))
    {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

fn to_table(offset: i64, count: i64) -> Result<PointerTable, ConfigError> {
    match (usize::try_from(offset), usize::try_from(count)) {
        (Ok(offset), Ok(count)) => Ok(PointerTable::new(offset, count)),
        _ => Err(ConfigError::TableOutOfRange {
            offset: offset.max(0) as usize,
            count: count.max(0) as usize,
        }),
    }
}

/// Parse a legacy pointer file. The first line is a header and ignored;
/// every other non-blank line is `offset|count`.
pub fn parse_pointer_file(text: &str) -> Result<Vec<PointerTable>, ConfigError> {
    let mut tables = Vec::new();
    for (index, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parse_error = |message: &str| ConfigError::Parse {
            line: index + 1,
            message: format!("{} in '{}'", message, line),
        };
        let mut parts = line.split('|');
        let offset = parts
            .next()
            .and_then(parse_number)
            .ok_or_else(|| parse_error("bad offset"))?;
        let count = parts
            .next()
            .and_then(parse_number)
            .ok_or_else(|| parse_error("bad count"))?;
        let table = to_table(offset, count)?;
        table.validate()?;
        tables.push(table);
    }
    Ok(tables)
}

pub fn load_pointer_file(path: &Path) -> Result<Vec<PointerTable>, ConfigError> {
    let text = fs::read_to_string(path)?;
    parse_pointer_file(&text)
}

/// Parse an `OFFSET:COUNT` command-line table.
pub fn parse_table_arg(arg: &str) -> Result<PointerTable, ConfigError> {
    let bad = || ConfigError::BadArgument(format!("expected OFFSET:COUNT, got '{}'", arg));
    let (offset, count) = arg.split_once(':').ok_or_else(bad)?;
    let offset = parse_number(offset).ok_or_else(bad)?;
    let count = parse_number(count).ok_or_else(bad)?;
    to_table(offset, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_vectors_always_last() {
        let mut entry_points = EntryPoints::new();
        entry_points.add(PointerTable::new(0x100, 2)).unwrap();
        let tables: Vec<_> = entry_points.tables().collect();
        assert_eq!(
            tables,
            vec![PointerTable::new(0x100, 2), PointerTable::new(0x3FFA, 3)]
        );
    }

    #[test]
    fn test_table_bounds() {
        let mut entry_points = EntryPoints::new();
        assert!(entry_points.add(PointerTable::new(0x3FFE, 1)).is_ok());
        assert!(entry_points.add(PointerTable::new(0x3FFE, 0)).is_ok());
        assert!(matches!(
            entry_points.add(PointerTable::new(0x3FFF, 1)),
            Err(ConfigError::TableOutOfRange {
                offset: 0x3FFF,
                count: 1
            })
        ));
        assert!(entry_points.add(PointerTable::new(0, usize::MAX)).is_err());
        assert_eq!(entry_points.extra().len(), 2);
    }

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("0x1F"), Some(0x1F));
        assert_eq!(parse_number("#1f"), Some(0x1F));
        assert_eq!(parse_number("$C000"), Some(0xC000));
        assert_eq!(parse_number("017"), Some(0o17));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("-4"), Some(-4));
        assert_eq!(parse_number("zz"), None);
    }

    #[test]
    fn test_parse_pointer_file() {
        let text = "offset|count\n0x1F00|4\n\n  128|2  \n";
        let tables = parse_pointer_file(text).unwrap();
        assert_eq!(
            tables,
            vec![PointerTable::new(0x1F00, 4), PointerTable::new(128, 2)]
        );
    }

    #[test]
    fn test_pointer_file_errors() {
        match parse_pointer_file("header\n0x10|x\n") {
            Err(ConfigError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(
            parse_pointer_file("header\n-2|1\n"),
            Err(ConfigError::TableOutOfRange { .. })
        ));
        assert!(matches!(
            parse_pointer_file("header\n0x3FF0|9\n"),
            Err(ConfigError::TableOutOfRange { .. })
        ));
    }

    #[test]
    fn test_table_arg() {
        assert_eq!(
            parse_table_arg("0x200:3").unwrap(),
            PointerTable::new(0x200, 3)
        );
        assert!(parse_table_arg("0x200").is_err());
    }
}
