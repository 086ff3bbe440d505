//! Assembly listing output.
//!
//! A single forward pass over the status map. Pointer runs become `.DW`
//! directives, instruction starts become instruction lines and runs of
//! undecorated data bytes become `.DB` blocks. The plain-text and HTML
//! forms share this one renderer; [`Dialect`] only switches the preamble,
//! line decoration and the bracket glyphs of indirect operands.

use crate::labels::label_name;
use crate::opcode_tables::{opcode, AddressingMode, Opcode};
use crate::rom::{to_offset, Rom, ORIGIN};
use crate::status::StatusMap;
use crate::tracer::branch_target;
use serde::Deserialize;
use std::fmt;

/// Values per `.DB` line.
const DATA_PER_LINE: usize = 16;

/// How far from an unlabelled absolute target a label may be borrowed.
const LABEL_REACH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    #[default]
    Text,
    /// Line breaks become `<BR>`, labels become anchors and links.
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brackets {
    /// `[$1234]`, as NESASM-style assemblers expect.
    #[default]
    Square,
    /// `($1234)`, the MOS syntax.
    Round,
}

impl Brackets {
    fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            Brackets::Square => ("[", "]"),
            Brackets::Round => ("(", ")"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dialect {
    pub markup: Markup,
    pub brackets: Brackets,
}

impl Dialect {
    pub fn text() -> Self {
        Dialect::default()
    }

    pub fn html() -> Self {
        Dialect {
            markup: Markup::Html,
            ..Dialect::default()
        }
    }

    fn is_html(&self) -> bool {
        self.markup == Markup::Html
    }

    fn indent(&self) -> &'static str {
        match self.markup {
            Markup::Text => "    ",
            Markup::Html => "&nbsp;&nbsp;&nbsp;&nbsp;",
        }
    }
}

/// A finished analysis ready to be printed. Use `to_string()` or write it
/// with `{}`.
pub struct Listing<'a> {
    rom: &'a Rom,
    map: &'a StatusMap,
    dialect: Dialect,
}

impl<'a> Listing<'a> {
    pub fn new(rom: &'a Rom, map: &'a StatusMap, dialect: Dialect) -> Self {
        Listing { rom, map, dialect }
    }

    fn newline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dialect.is_html() {
            writeln!(f, "<BR>")
        } else {
            writeln!(f)
        }
    }

    fn label_definition(&self, f: &mut fmt::Formatter<'_>, offset: usize) -> fmt::Result {
        let name = label_name(offset);
        if self.dialect.is_html() {
            write!(f, "<A NAME={}>", name)?;
        }
        write!(f, "{}:", name)?;
        self.newline(f)
    }

    fn label_reference(&self, f: &mut fmt::Formatter<'_>, offset: usize) -> fmt::Result {
        let name = label_name(offset);
        if self.dialect.is_html() {
            write!(f, "<A HREF=\"#{}\">{}</A>", name, name)
        } else {
            write!(f, "{}", name)
        }
    }

    /// Closest label within reach of `target`, preferring the lower side at
    /// equal distance, with the adjustment to add to it.
    fn nearest_label(&self, target: usize) -> Option<(usize, isize)> {
        (1..=LABEL_REACH).find_map(|distance| {
            if target >= distance && self.map.is_label(target - distance) {
                Some((target - distance, distance as isize))
            } else if self.map.is_label(target + distance) {
                Some((target + distance, -(distance as isize)))
            } else {
                None
            }
        })
    }

    fn pointer_run(
        &self,
        f: &mut fmt::Formatter<'_>,
        mut offset: usize,
    ) -> Result<usize, fmt::Error> {
        self.newline(f)?;
        while offset + 1 < self.rom.len() && self.map.is_pointer(offset) {
            write!(f, ".DW ")?;
            let target = self.rom.target(offset);
            if self.map.is_label(target) {
                self.label_reference(f, target)?;
            } else {
                write!(f, "${:04X}", self.rom.word(offset))?;
            }
            self.newline(f)?;
            offset += 2;
        }
        self.newline(f)?;
        Ok(offset)
    }

    fn absolute_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        offset: usize,
        op: &Opcode,
    ) -> fmt::Result {
        let operand = offset + 1;
        let address = self.rom.word(operand);
        if !self.rom.is_mapped(operand) {
            if address >> 8 == 0 && op.wide {
                write!(f, ".W")?;
            }
            return write!(f, " ${:04X}", address);
        }
        write!(f, " ")?;
        let target = to_offset(address);
        if self.map.is_label(target) {
            return self.label_reference(f, target);
        }
        match self.nearest_label(target) {
            Some((label, adjustment)) => {
                self.label_reference(f, label)?;
                write!(f, "{:+}", adjustment)
            }
            None => write!(f, "${:04X}", address),
        }
    }

    fn relative_operand(&self, f: &mut fmt::Formatter<'_>, offset: usize) -> fmt::Result {
        let displacement = self.rom.byte(offset + 1);
        let target = branch_target(offset, displacement);
        write!(f, " ")?;
        if self.map.is_label(target) {
            self.label_reference(f, target)
        } else {
            write!(f, "${:+}", displacement as i8 as isize + 2)
        }
    }

    fn instruction(
        &self,
        f: &mut fmt::Formatter<'_>,
        offset: usize,
    ) -> Result<usize, fmt::Error> {
        let op = opcode(self.rom.byte(offset));
        let length = op.length as usize;
        if length == 0 || offset + length > self.rom.len() {
            return self.orphan(f, offset);
        }
        if self.map.is_label(offset) {
            self.label_definition(f, offset)?;
        }
        let (open, close) = self.dialect.brackets.glyphs();
        let byte = |n: usize| self.rom.byte(offset + n);

        write!(f, "{}{}", self.dialect.indent(), op.mnemonic)?;
        match op.mode {
            AddressingMode::Undefined | AddressingMode::Implied => {}
            AddressingMode::Immediate => write!(f, " #${:02X}", byte(1))?,
            AddressingMode::ZeroPage => write!(f, " ${:02X}", byte(1))?,
            AddressingMode::ZeroPageX => write!(f, " ${:02X},X", byte(1))?,
            AddressingMode::ZeroPageY => write!(f, " ${:02X},Y", byte(1))?,
            AddressingMode::Absolute => self.absolute_operand(f, offset, op)?,
            AddressingMode::AbsoluteX => {
                self.absolute_operand(f, offset, op)?;
                write!(f, ",X")?;
            }
            AddressingMode::AbsoluteY => {
                self.absolute_operand(f, offset, op)?;
                write!(f, ",Y")?;
            }
            AddressingMode::Indirect => {
                write!(f, " {}${:04X}{}", open, self.rom.word(offset + 1), close)?
            }
            AddressingMode::IndirectX => write!(f, " {}${:02X},X{}", open, byte(1), close)?,
            AddressingMode::IndirectY => write!(f, " {}${:02X}{},Y", open, byte(1), close)?,
            AddressingMode::Relative => self.relative_operand(f, offset)?,
        }
        self.newline(f)?;
        if op.flow.is_terminal() {
            self.newline(f)?;
        }
        Ok(offset + length)
    }

    /// A code byte that starts nothing: the remains of an instruction whose
    /// head was claimed by an overlapping one.
    fn orphan(&self, f: &mut fmt::Formatter<'_>, offset: usize) -> Result<usize, fmt::Error> {
        if self.map.is_label(offset) {
            self.label_definition(f, offset)?;
        }
        write!(f, ".DB ${:02X}", self.rom.byte(offset))?;
        self.newline(f)?;
        Ok(offset + 1)
    }

    fn data_block(
        &self,
        f: &mut fmt::Formatter<'_>,
        mut offset: usize,
    ) -> Result<usize, fmt::Error> {
        if self.map.is_label(offset) {
            self.label_definition(f, offset)?;
        }
        write!(f, ".DB ${:02X}", self.rom.byte(offset))?;
        offset += 1;
        let mut values = 1;
        while offset < self.rom.len() && self.map.is_plain_data(offset) {
            if values % DATA_PER_LINE == 0 {
                self.newline(f)?;
                write!(f, ".DB ")?;
            } else {
                write!(f, ",")?;
            }
            write!(f, "${:02X}", self.rom.byte(offset))?;
            offset += 1;
            values += 1;
        }
        self.newline(f)?;
        self.newline(f)?;
        Ok(offset)
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dialect.is_html() {
            writeln!(f, "<HTML>")?;
            writeln!(f, "<BODY>")?;
            writeln!(f, "<FONT FACE=\"Courier\">")?;
        }
        write!(f, ".ORG ${:04X}", ORIGIN)?;
        self.newline(f)?;
        self.newline(f)?;

        let mut offset = 0;
        while offset < self.rom.len() {
            offset = if self.map.is_pointer(offset) && offset + 1 < self.rom.len() {
                self.pointer_run(f, offset)?
            } else if self.map.is_instruction(offset) {
                self.instruction(f, offset)?
            } else if self.map.is_code(offset) {
                self.orphan(f, offset)?
            } else {
                self.data_block(f, offset)?
            };
        }

        write!(f, ".END")?;
        self.newline(f)?;
        if self.dialect.is_html() {
            writeln!(f, "</FONT>")?;
            writeln!(f, "</BODY>")?;
            writeln!(f, "</HTML>")?;
        }
        Ok(())
    }
}
