//! Static 6502 decode table.
//!
//! One entry per opcode byte with the mnemonic, the instruction length in
//! bytes, the addressing mode used when printing the operand and the flow
//! category the tracer dispatches on. A length of zero marks an opcode the
//! tracer must never accept as code.

/// How an instruction's operand bytes are interpreted when printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No printable operand (illegal opcodes, BRK).
    Undefined,
    /// No operand; accumulator forms are printed the same way.
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `JMP (addr)`
    Indirect,
    /// `(zp,X)`
    IndirectX,
    /// `(zp),Y`
    IndirectY,
    /// Signed 8-bit branch displacement.
    Relative,
}

impl AddressingMode {
    /// True for the modes carrying a full 16-bit absolute address.
    pub fn is_absolute(self) -> bool {
        matches!(
            self,
            AddressingMode::Absolute | AddressingMode::AbsoluteX | AddressingMode::AbsoluteY
        )
    }
}

/// What the tracer does after marking an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Falls through to the next instruction.
    Plain,
    /// Falls through; the absolute operand is a data reference worth labelling.
    Reference,
    /// Conditional relative branch: target and fall-through are both live.
    Branch,
    /// `JMP abs`
    Jump,
    /// `JMP (ind)`
    IndirectJump,
    /// `JSR abs`
    Call,
    /// `RTS` / `RTI`
    Return,
    /// Not accepted as code; triggers rollback.
    Invalid,
}

impl Flow {
    /// Instructions after which straight-line execution never continues.
    pub fn is_terminal(self) -> bool {
        matches!(self, Flow::Jump | Flow::IndirectJump | Flow::Return)
    }
}

/// Decode-table entry for a single opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub mnemonic: &'static str,
    /// Total length including the opcode byte; 0 for illegal opcodes.
    pub length: u8,
    pub mode: AddressingMode,
    pub flow: Flow,
    /// The opcode has a zero-page twin, so an absolute operand below $0100
    /// needs a `.W` suffix to assemble back to the same bytes.
    pub wide: bool,
}

const fn op(mnemonic: &'static str, length: u8, mode: AddressingMode, flow: Flow) -> Opcode {
    Opcode {
        mnemonic,
        length,
        mode,
        flow,
        wide: false,
    }
}

const fn wide(mnemonic: &'static str, length: u8, mode: AddressingMode, flow: Flow) -> Opcode {
    Opcode {
        mnemonic,
        length,
        mode,
        flow,
        wide: true,
    }
}

/// Look up the decode-table entry for an opcode byte.
pub fn opcode(byte: u8) -> &'static Opcode {
    &OPCODES[byte as usize]
}

use AddressingMode::*;
use Flow::*;

/// The full table, indexed by opcode byte.
pub static OPCODES: [Opcode; 256] = [
    op("BRK", 1, Undefined, Invalid), // $00
    op("ORA", 2, IndirectX, Plain), // $01
    op("???", 0, Undefined, Invalid), // $02
    op("???", 0, Undefined, Invalid), // $03
    op("???", 0, Undefined, Invalid), // $04
    op("ORA", 2, ZeroPage, Plain), // $05
    op("ASL", 2, ZeroPage, Plain), // $06
    op("???", 0, Undefined, Invalid), // $07
    op("PHP", 1, Implied, Plain), // $08
    op("ORA", 2, Immediate, Plain), // $09
    op("ASL", 1, Implied, Plain), // $0A
    op("???", 0, Undefined, Invalid), // $0B
    op("???", 0, Undefined, Invalid), // $0C
    wide("ORA", 3, Absolute, Reference), // $0D
    wide("ASL", 3, Absolute, Reference), // $0E
    op("???", 0, Undefined, Invalid), // $0F
    op("BPL", 2, Relative, Branch), // $10
    op("ORA", 2, IndirectY, Plain), // $11
    op("???", 0, Undefined, Invalid), // $12
    op("???", 0, Undefined, Invalid), // $13
    op("???", 0, Undefined, Invalid), // $14
    op("ORA", 2, ZeroPageX, Plain), // $15
    op("ASL", 2, ZeroPageX, Plain), // $16
    op("???", 0, Undefined, Invalid), // $17
    op("CLC", 1, Implied, Plain), // $18
    op("ORA", 3, AbsoluteY, Reference), // $19
    op("???", 0, Undefined, Invalid), // $1A
    op("???", 0, Undefined, Invalid), // $1B
    op("???", 0, Undefined, Invalid), // $1C
    wide("ORA", 3, AbsoluteX, Reference), // $1D
    wide("ASL", 3, AbsoluteX, Reference), // $1E
    op("???", 0, Undefined, Invalid), // $1F
    op("JSR", 3, Absolute, Call), // $20
    op("AND", 2, IndirectX, Plain), // $21
    op("???", 0, Undefined, Invalid), // $22
    op("???", 0, Undefined, Invalid), // $23
    op("BIT", 2, ZeroPage, Plain), // $24
    op("AND", 2, ZeroPage, Plain), // $25
    op("ROL", 2, ZeroPage, Plain), // $26
    op("???", 0, Undefined, Invalid), // $27
    op("PLP", 1, Implied, Plain), // $28
    op("AND", 2, Immediate, Plain), // $29
    op("ROL", 1, Implied, Plain), // $2A
    op("???", 0, Undefined, Invalid), // $2B
    wide("BIT", 3, Absolute, Reference), // $2C
    wide("AND", 3, Absolute, Reference), // $2D
    wide("ROL", 3, Absolute, Reference), // $2E
    op("???", 0, Undefined, Invalid), // $2F
    op("BMI", 2, Relative, Branch), // $30
    op("AND", 2, IndirectY, Plain), // $31
    op("???", 0, Undefined, Invalid), // $32
    op("???", 0, Undefined, Invalid), // $33
    op("???", 0, Undefined, Invalid), // $34
    op("AND", 2, ZeroPageX, Plain), // $35
    op("ROL", 2, ZeroPageX, Plain), // $36
    op("???", 0, Undefined, Invalid), // $37
    op("SEC", 1, Implied, Plain), // $38
    op("AND", 3, AbsoluteY, Reference), // $39
    op("???", 0, Undefined, Invalid), // $3A
    op("???", 0, Undefined, Invalid), // $3B
    op("???", 0, Undefined, Invalid), // $3C
    wide("AND", 3, AbsoluteX, Reference), // $3D
    wide("ROL", 3, AbsoluteX, Reference), // $3E
    op("???", 0, Undefined, Invalid), // $3F
    op("RTI", 1, Implied, Return), // $40
    op("EOR", 2, IndirectX, Plain), // $41
    op("???", 0, Undefined, Invalid), // $42
    op("???", 0, Undefined, Invalid), // $43
    op("???", 0, Undefined, Invalid), // $44
    op("EOR", 2, ZeroPage, Plain), // $45
    op("LSR", 2, ZeroPage, Plain), // $46
    op("???", 0, Undefined, Invalid), // $47
    op("PHA", 1, Implied, Plain), // $48
    op("EOR", 2, Immediate, Plain), // $49
    op("LSR", 1, Implied, Plain), // $4A
    op("???", 0, Undefined, Invalid), // $4B
    op("JMP", 3, Absolute, Jump), // $4C
    wide("EOR", 3, Absolute, Reference), // $4D
    wide("LSR", 3, Absolute, Reference), // $4E
    op("???", 0, Undefined, Invalid), // $4F
    op("BVC", 2, Relative, Branch), // $50
    op("EOR", 2, IndirectY, Plain), // $51
    op("???", 0, Undefined, Invalid), // $52
    op("???", 0, Undefined, Invalid), // $53
    op("???", 0, Undefined, Invalid), // $54
    op("EOR", 2, ZeroPageX, Plain), // $55
    op("LSR", 2, ZeroPageX, Plain), // $56
    op("???", 0, Undefined, Invalid), // $57
    op("CLI", 1, Implied, Plain), // $58
    op("EOR", 3, AbsoluteY, Reference), // $59
    op("???", 0, Undefined, Invalid), // $5A
    op("???", 0, Undefined, Invalid), // $5B
    op("???", 0, Undefined, Invalid), // $5C
    wide("EOR", 3, AbsoluteX, Reference), // $5D
    wide("LSR", 3, AbsoluteX, Reference), // $5E
    op("???", 0, Undefined, Invalid), // $5F
    op("RTS", 1, Implied, Return), // $60
    op("ADC", 2, IndirectX, Plain), // $61
    op("???", 0, Undefined, Invalid), // $62
    op("???", 0, Undefined, Invalid), // $63
    op("???", 0, Undefined, Invalid), // $64
    op("ADC", 2, ZeroPage, Plain), // $65
    op("ROR", 2, ZeroPage, Plain), // $66
    op("???", 0, Undefined, Invalid), // $67
    op("PLA", 1, Implied, Plain), // $68
    op("ADC", 2, Immediate, Plain), // $69
    op("ROR", 1, Implied, Plain), // $6A
    op("???", 0, Undefined, Invalid), // $6B
    op("JMP", 3, Indirect, IndirectJump), // $6C
    wide("ADC", 3, Absolute, Reference), // $6D
    wide("ROR", 3, Absolute, Reference), // $6E
    op("???", 0, Undefined, Invalid), // $6F
    op("BVS", 2, Relative, Branch), // $70
    op("ADC", 2, IndirectY, Plain), // $71
    op("???", 0, Undefined, Invalid), // $72
    op("???", 0, Undefined, Invalid), // $73
    op("???", 0, Undefined, Invalid), // $74
    op("ADC", 2, ZeroPageX, Plain), // $75
    op("ROR", 2, ZeroPageX, Plain), // $76
    op("???", 0, Undefined, Invalid), // $77
    op("SEI", 1, Implied, Plain), // $78
    op("ADC", 3, AbsoluteY, Reference), // $79
    op("???", 0, Undefined, Invalid), // $7A
    op("???", 0, Undefined, Invalid), // $7B
    op("???", 0, Undefined, Invalid), // $7C
    wide("ADC", 3, AbsoluteX, Reference), // $7D
    wide("ROR", 3, AbsoluteX, Reference), // $7E
    op("???", 0, Undefined, Invalid), // $7F
    op("???", 0, Undefined, Invalid), // $80
    op("STA", 2, IndirectX, Plain), // $81
    op("???", 0, Undefined, Invalid), // $82
    op("???", 0, Undefined, Invalid), // $83
    op("STY", 2, ZeroPage, Plain), // $84
    op("STA", 2, ZeroPage, Plain), // $85
    op("STX", 2, ZeroPage, Plain), // $86
    op("???", 0, Undefined, Invalid), // $87
    op("DEY", 1, Implied, Plain), // $88
    op("???", 1, Undefined, Invalid), // $89
    op("TXA", 1, Implied, Plain), // $8A
    op("???", 0, Undefined, Invalid), // $8B
    wide("STY", 3, Absolute, Plain), // $8C
    wide("STA", 3, Absolute, Plain), // $8D
    wide("STX", 3, Absolute, Plain), // $8E
    op("???", 0, Undefined, Invalid), // $8F
    op("BCC", 2, Relative, Branch), // $90
    op("STA", 2, IndirectY, Plain), // $91
    op("???", 0, Undefined, Invalid), // $92
    op("???", 0, Undefined, Invalid), // $93
    op("STY", 2, ZeroPageX, Plain), // $94
    op("STA", 2, ZeroPageX, Plain), // $95
    op("STX", 2, ZeroPageY, Plain), // $96
    op("???", 0, Undefined, Invalid), // $97
    op("TYA", 1, Implied, Plain), // $98
    op("STA", 3, AbsoluteY, Plain), // $99
    op("TXS", 1, Implied, Plain), // $9A
    op("???", 0, Undefined, Invalid), // $9B
    op("???", 0, Undefined, Invalid), // $9C
    wide("STA", 3, AbsoluteX, Plain), // $9D
    op("???", 0, Undefined, Invalid), // $9E
    op("???", 0, Undefined, Invalid), // $9F
    op("LDY", 2, Immediate, Plain), // $A0
    op("LDA", 2, IndirectX, Plain), // $A1
    op("LDX", 2, Immediate, Plain), // $A2
    op("???", 0, Undefined, Invalid), // $A3
    op("LDY", 2, ZeroPage, Plain), // $A4
    op("LDA", 2, ZeroPage, Plain), // $A5
    op("LDX", 2, ZeroPage, Plain), // $A6
    op("???", 0, Undefined, Invalid), // $A7
    op("TAY", 1, Implied, Plain), // $A8
    op("LDA", 2, Immediate, Plain), // $A9
    op("TAX", 1, Implied, Plain), // $AA
    op("???", 0, Undefined, Invalid), // $AB
    wide("LDY", 3, Absolute, Reference), // $AC
    wide("LDA", 3, Absolute, Reference), // $AD
    wide("LDX", 3, Absolute, Reference), // $AE
    op("???", 0, Undefined, Invalid), // $AF
    op("BCS", 2, Relative, Branch), // $B0
    op("LDA", 2, IndirectY, Plain), // $B1
    op("???", 0, Undefined, Invalid), // $B2
    op("???", 0, Undefined, Invalid), // $B3
    op("LDY", 2, ZeroPageX, Plain), // $B4
    op("LDA", 2, ZeroPageX, Plain), // $B5
    op("LDX", 2, ZeroPageY, Plain), // $B6
    op("???", 0, Undefined, Invalid), // $B7
    op("CLV", 1, Implied, Plain), // $B8
    op("LDA", 3, AbsoluteY, Reference), // $B9
    op("TSX", 1, Implied, Plain), // $BA
    op("???", 0, Undefined, Invalid), // $BB
    wide("LDY", 3, AbsoluteX, Reference), // $BC
    wide("LDA", 3, AbsoluteX, Reference), // $BD
    wide("LDX", 3, AbsoluteY, Reference), // $BE
    op("???", 0, Undefined, Invalid), // $BF
    op("CPY", 2, Immediate, Plain), // $C0
    op("CMP", 2, IndirectX, Plain), // $C1
    op("???", 0, Undefined, Invalid), // $C2
    op("???", 0, Undefined, Invalid), // $C3
    op("CPY", 2, ZeroPage, Plain), // $C4
    op("CMP", 2, ZeroPage, Plain), // $C5
    op("DEC", 2, ZeroPage, Plain), // $C6
    op("???", 0, Undefined, Invalid), // $C7
    op("INY", 1, Implied, Plain), // $C8
    op("CMP", 2, Immediate, Plain), // $C9
    op("DEX", 1, Implied, Plain), // $CA
    op("???", 0, Undefined, Invalid), // $CB
    wide("CPY", 3, Absolute, Reference), // $CC
    wide("CMP", 3, Absolute, Reference), // $CD
    wide("DEC", 3, Absolute, Plain), // $CE
    op("???", 0, Undefined, Invalid), // $CF
    op("BNE", 2, Relative, Branch), // $D0
    op("CMP", 2, IndirectY, Plain), // $D1
    op("???", 0, Undefined, Invalid), // $D2
    op("???", 0, Undefined, Invalid), // $D3
    op("???", 0, Undefined, Invalid), // $D4
    op("CMP", 2, ZeroPageX, Plain), // $D5
    op("DEC", 2, ZeroPageX, Plain), // $D6
    op("???", 0, Undefined, Invalid), // $D7
    op("CLD", 1, Implied, Plain), // $D8
    op("CMP", 3, AbsoluteY, Reference), // $D9
    op("???", 0, Undefined, Invalid), // $DA
    op("???", 0, Undefined, Invalid), // $DB
    op("???", 0, Undefined, Invalid), // $DC
    wide("CMP", 3, AbsoluteX, Reference), // $DD
    wide("DEC", 3, AbsoluteX, Plain), // $DE
    op("???", 0, Undefined, Invalid), // $DF
    op("CPX", 2, Immediate, Plain), // $E0
    op("SBC", 2, IndirectX, Plain), // $E1
    op("???", 0, Undefined, Invalid), // $E2
    op("???", 0, Undefined, Invalid), // $E3
    op("CPX", 2, ZeroPage, Plain), // $E4
    op("SBC", 2, ZeroPage, Plain), // $E5
    op("INC", 2, ZeroPage, Plain), // $E6
    op("???", 0, Undefined, Invalid), // $E7
    op("INX", 1, Implied, Plain), // $E8
    op("SBC", 2, Immediate, Plain), // $E9
    op("NOP", 1, Implied, Plain), // $EA
    op("???", 0, Undefined, Invalid), // $EB
    wide("CPX", 3, Absolute, Reference), // $EC
    wide("SBC", 3, Absolute, Reference), // $ED
    wide("INC", 3, Absolute, Plain), // $EE
    op("???", 0, Undefined, Invalid), // $EF
    op("BEQ", 2, Relative, Branch), // $F0
    op("SBC", 2, IndirectY, Plain), // $F1
    op("???", 0, Undefined, Invalid), // $F2
    op("???", 0, Undefined, Invalid), // $F3
    op("???", 0, Undefined, Invalid), // $F4
    op("SBC", 2, ZeroPageX, Plain), // $F5
    op("INC", 2, ZeroPageX, Plain), // $F6
    op("???", 0, Undefined, Invalid), // $F7
    op("SED", 1, Implied, Plain), // $F8
    op("SBC", 3, AbsoluteY, Reference), // $F9
    op("???", 0, Undefined, Invalid), // $FA
    op("???", 0, Undefined, Invalid), // $FB
    op("???", 0, Undefined, Invalid), // $FC
    wide("SBC", 3, AbsoluteX, Reference), // $FD
    wide("INC", 3, AbsoluteX, Plain), // $FE
    op("???", 0, Undefined, Invalid), // $FF
];
