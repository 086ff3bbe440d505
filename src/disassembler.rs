use crate::entry_points::EntryPoints;
use crate::labels;
use crate::listing::{Dialect, Listing};
use crate::rom::Rom;
use crate::status::StatusMap;
use crate::tracer::Tracer;
use log::{debug, info};
use std::fmt;

/// Summary of a finished analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub code_bytes: usize,
    pub data_bytes: usize,
    pub instructions: usize,
    pub labels: usize,
    pub pointer_slots: usize,
    pub rollbacks: usize,
    pub recovered_pointers: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "
Code bytes:          {}
Data bytes:          {}
Instructions:        {}
Labels:              {}
Pointer slots:       {}
Rollbacks:           {}
Recovered pointers:  {}
",
            self.code_bytes,
            self.data_bytes,
            self.instructions,
            self.labels,
            self.pointer_slots,
            self.rollbacks,
            self.recovered_pointers
        )
    }
}

/// Owns the image and its classification for one run.
pub struct Disassembler {
    rom: Rom,
    map: StatusMap,
    entry_points: EntryPoints,
    rollbacks: usize,
    recovered_pointers: usize,
}

impl Disassembler {
    pub fn new(rom: Rom, entry_points: EntryPoints) -> Self {
        let map = StatusMap::new(rom.len());
        Disassembler {
            rom,
            map,
            entry_points,
            rollbacks: 0,
            recovered_pointers: 0,
        }
    }

    /// Classify the whole bank: seed the pointer tables, trace from every
    /// pointer and label the code/data boundaries. Each call starts from a
    /// fresh map, so repeated runs give identical results.
    pub fn run(&mut self) -> &StatusMap {
        self.map = StatusMap::new(self.rom.len());

        for table in self.entry_points.tables() {
            for slot in table.slots() {
                self.map.mark_pointer(slot);
                self.map.mark_pointer(slot + 1);
            }
        }

        let mut tracer = Tracer::new(&self.rom, &mut self.map);
        for table in self.entry_points.tables() {
            for slot in table.slots() {
                let entry = self.rom.target(slot);
                debug!(
                    "Tracing pointer at {:#06x} -> {:#06x}",
                    slot,
                    self.rom.word(slot)
                );
                tracer.trace(entry);
            }
        }
        self.rollbacks = tracer.rollbacks();
        self.recovered_pointers = tracer.recovered_pointers();
        debug!("Deepest trace nesting: {}", tracer.deepest());

        labels::resolve(&mut self.map);

        let stats = self.stats();
        info!(
            "Traced {} instructions ({} code bytes, {} data bytes, {} labels)",
            stats.instructions, stats.code_bytes, stats.data_bytes, stats.labels
        );
        &self.map
    }

    pub fn rom(&self) -> &Rom {
        &self.rom
    }

    pub fn map(&self) -> &StatusMap {
        &self.map
    }

    pub fn listing(&self, dialect: Dialect) -> Listing<'_> {
        Listing::new(&self.rom, &self.map, dialect)
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            rollbacks: self.rollbacks,
            recovered_pointers: self.recovered_pointers,
            ..Stats::default()
        };
        for status in self.map.iter() {
            if status.is_code() {
                stats.code_bytes += 1;
            } else {
                stats.data_bytes += 1;
            }
            if status.is_instruction() {
                stats.instructions += 1;
            }
            if status.is_label() {
                stats.labels += 1;
            }
            if status.is_pointer() {
                stats.pointer_slots += 1;
            }
        }
        stats.pointer_slots /= 2;
        stats
    }
}

/// Trace `rom` from `entry_points` and render the listing in one go.
pub fn disassemble(rom: Rom, entry_points: EntryPoints, dialect: Dialect) -> String {
    let mut disassembler = Disassembler::new(rom, entry_points);
    disassembler.run();
    disassembler.listing(dialect).to_string()
}
