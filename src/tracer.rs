use crate::opcode_tables::{opcode, Flow};
use crate::rom::{Rom, ADDRESS_MASK};
use crate::status::{Status, StatusMap};
use log::{debug, trace};

/// After a JSR, words whose high byte reaches this are taken as an inline
/// jump table when the fall-through decodes to garbage.
pub const JUMP_TABLE_HIGH_BYTE: u8 = 0xC0;

/// How far either side of a data reference an existing label absorbs it.
const REFERENCE_SLACK: usize = 3;

/// Bank offset reached by a relative branch at `offset` with the given
/// displacement byte, wrapped into the bank.
pub fn branch_target(offset: usize, displacement: u8) -> usize {
    let next = (offset as u16).wrapping_add(2);
    (next.wrapping_add(displacement as i8 as u16) & ADDRESS_MASK) as usize
}

/// Where a suspended walk resumes once the walk it spawned has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Decode the next instruction.
    Decode,
    /// Probe the next word of an inline jump table. `skip` is the length of
    /// the rejected instruction, added once recovery ends.
    Recover { skip: usize },
    /// The target of the jump-table word at the current offset has been
    /// traced; claim the word as a pointer.
    Claim { skip: usize },
    /// Label the start if warranted and report.
    Finish,
}

/// One straight-line walk.
#[derive(Debug)]
struct Walk {
    start: usize,
    offset: usize,
    /// First offset a rollback may revert: just past the last branch or
    /// call on this walk.
    checkpoint: usize,
    /// The checkpoint was set by a JSR, so an inline jump table may follow.
    after_call: bool,
    phase: Phase,
}

impl Walk {
    fn new(start: usize) -> Self {
        Walk {
            start,
            offset: start,
            checkpoint: start,
            after_call: false,
            phase: Phase::Decode,
        }
    }
}

enum Step {
    Continue,
    /// Suspend the current walk and trace this offset first.
    Descend(usize),
    /// The walk is over; true when it moved past its start.
    Done(bool),
}

/// Marks reachable code in a [`StatusMap`].
///
/// Control transfers are followed depth-first: the target of a branch or
/// call is fully traced before the walk that found it continues, exactly as
/// a recursive descent would, but suspended walks live on a heap stack so
/// arbitrarily deep call chains are safe.
pub struct Tracer<'a> {
    rom: &'a Rom,
    map: &'a mut StatusMap,
    rollbacks: usize,
    recovered_pointers: usize,
    deepest: usize,
}

impl<'a> Tracer<'a> {
    pub fn new(rom: &'a Rom, map: &'a mut StatusMap) -> Self {
        Tracer {
            rom,
            map,
            rollbacks: 0,
            recovered_pointers: 0,
            deepest: 0,
        }
    }

    /// Number of walks cut short by an illegal opcode.
    pub fn rollbacks(&self) -> usize {
        self.rollbacks
    }

    /// Jump-table words recovered after calls.
    pub fn recovered_pointers(&self) -> usize {
        self.recovered_pointers
    }

    /// Largest number of simultaneously suspended walks seen.
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    /// Trace the code reachable from `start`. Returns true when the walk
    /// starting there advanced, false when `start` was already explored or
    /// lands inside another instruction.
    pub fn trace(&mut self, start: usize) -> bool {
        let mut stack = match self.enter(start) {
            Some(walk) => vec![walk],
            None => return false,
        };
        let mut advanced = false;
        while let Some(walk) = stack.last_mut() {
            match self.step(walk) {
                Step::Continue => {}
                Step::Descend(target) => {
                    if let Some(child) = self.enter(target) {
                        stack.push(child);
                        self.deepest = self.deepest.max(stack.len());
                    }
                }
                Step::Done(result) => {
                    stack.pop();
                    advanced = result;
                }
            }
        }
        advanced
    }

    fn enter(&self, start: usize) -> Option<Walk> {
        if self.map.is_code(start) && !self.map.is_instruction(start) {
            debug!("{:#06x} lands inside an instruction, ignored", start);
            return None;
        }
        Some(Walk::new(start))
    }

    fn step(&mut self, walk: &mut Walk) -> Step {
        match walk.phase {
            Phase::Decode => {
                if self.map.is_data(walk.offset) {
                    self.decode(walk)
                } else {
                    walk.phase = Phase::Finish;
                    Step::Continue
                }
            }
            Phase::Recover { skip } => {
                let slot = walk.offset;
                let is_table_word = self.map.is_plain_data(slot)
                    && self
                        .rom
                        .get(slot + 1)
                        .is_some_and(|high| high >= JUMP_TABLE_HIGH_BYTE);
                if is_table_word {
                    walk.phase = Phase::Claim { skip };
                    Step::Descend(self.rom.target(slot))
                } else {
                    walk.offset += skip;
                    walk.phase = Phase::Finish;
                    Step::Continue
                }
            }
            Phase::Claim { skip } => {
                debug!(
                    "Jump table word at {:#06x} -> {:#06x}",
                    walk.offset,
                    self.rom.word(walk.offset)
                );
                self.map.mark_pointer(walk.offset);
                self.map.mark_pointer(walk.offset + 1);
                self.recovered_pointers += 1;
                walk.offset += 2;
                walk.phase = Phase::Recover { skip };
                Step::Continue
            }
            Phase::Finish => {
                if walk.offset != walk.start || self.map.is_code(walk.start) {
                    self.map.mark_label(walk.start);
                }
                Step::Done(walk.offset != walk.start)
            }
        }
    }

    fn decode(&mut self, walk: &mut Walk) -> Step {
        let offset = walk.offset;
        let op = opcode(self.rom.byte(offset));
        let length = op.length as usize;
        if length == 0 || offset + length > self.rom.len() {
            return self.rollback(walk, 0);
        }
        self.map.mark_instruction(offset, length);
        trace!("{:#06x}: {} ({:?})", offset, op.mnemonic, op.flow);

        match op.flow {
            Flow::Plain => {
                walk.offset += length;
                Step::Continue
            }
            Flow::Reference => {
                if op.mode.is_absolute() {
                    self.classify_reference(offset + 1);
                }
                walk.offset += length;
                Step::Continue
            }
            Flow::Branch => {
                let target = branch_target(offset, self.rom.byte(offset + 1));
                walk.offset += length;
                walk.checkpoint = walk.offset;
                walk.after_call = false;
                Step::Descend(target)
            }
            Flow::Jump => {
                walk.offset += length;
                walk.phase = Phase::Finish;
                Step::Descend(self.rom.target(offset + 1))
            }
            Flow::IndirectJump => {
                walk.offset += length;
                walk.phase = Phase::Finish;
                if self.rom.is_mapped(offset + 1) {
                    let pointer = self.rom.target(offset + 1);
                    if pointer + 1 < self.rom.len() {
                        return Step::Descend(self.rom.target(pointer));
                    }
                }
                Step::Continue
            }
            Flow::Call => {
                walk.offset += length;
                walk.checkpoint = walk.offset;
                walk.after_call = true;
                Step::Descend(self.rom.target(offset + 1))
            }
            Flow::Return => {
                walk.offset += length;
                walk.phase = Phase::Finish;
                Step::Continue
            }
            Flow::Invalid => self.rollback(walk, length),
        }
    }

    /// Undo the walk back to its checkpoint after hitting an opcode that is
    /// not code. `length` is how many bytes the rejected opcode claimed.
    fn rollback(&mut self, walk: &mut Walk, length: usize) -> Step {
        let last = walk.offset + length.saturating_sub(1);
        debug!(
            "Illegal opcode ${:02X} at {:#06x}, reverting {:#06x}..={:#06x}",
            self.rom.byte(walk.offset),
            walk.offset,
            walk.checkpoint,
            last
        );
        self.map.revert(walk.checkpoint..=last);
        self.rollbacks += 1;
        walk.offset = walk.checkpoint;
        if walk.after_call {
            walk.phase = Phase::Recover { skip: length };
        } else {
            walk.offset += length;
            walk.phase = Phase::Finish;
        }
        Step::Continue
    }

    /// Label the cartridge address named by the absolute operand at
    /// `operand`, unless it is code or sits right next to an existing data
    /// label.
    fn classify_reference(&mut self, operand: usize) {
        if !self.rom.is_mapped(operand) {
            return;
        }
        let target = self.rom.target(operand);
        if self.map.is_code(target) {
            return;
        }
        let labelled = Status::DATA | Status::LABEL;
        let near_label = (1..=REFERENCE_SLACK).any(|distance| {
            let below = target
                .checked_sub(distance)
                .and_then(|offset| self.map.get(offset));
            let above = self.map.get(target + distance);
            [below, above]
                .into_iter()
                .flatten()
                .any(|status| status.contains(labelled))
        });
        if !near_label {
            self.map.mark_label(target);
        }
    }
}
