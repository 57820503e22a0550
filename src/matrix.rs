//! The module grid: function patterns, zigzag data placement, masking and penalty scoring.

use crate::info::place_format_info;
use crate::version::{EccLevel, Mask, Version};

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

const FINDER_LIKE: [bool; 7] = [true, false, true, true, true, false, true];

/// State of one cell of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Module {
    #[default]
    Unset,
    Light,
    Dark,
}

impl Module {
    pub fn from_dark(isdark: bool) -> Self {
        if isdark {
            Module::Dark
        } else {
            Module::Light
        }
    }

    /// `Unset` reads as light.
    pub fn is_dark(self) -> bool {
        self == Module::Dark
    }

    fn inverted(self) -> Self {
        match self {
            Module::Dark => Module::Light,
            Module::Light => Module::Dark,
            Module::Unset => Module::Unset,
        }
    }
}

/// A square grid of modules with a parallel map of reserved (non-data) cells.
///
/// Cells are stored row-major at `row * size + col`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrMatrix {
    version: Version,
    size: usize,
    modules: Vec<Module>,
    reserved: Vec<bool>,
}

impl QrMatrix {
    /// An all-unset grid with nothing reserved.
    pub fn new(version: Version) -> Self {
        let size = version.size();
        Self {
            version,
            size,
            modules: vec![Module::Unset; size * size],
            reserved: vec![false; size * size],
        }
    }

    /// A grid with finder, separator, timing and alignment patterns drawn and the
    /// format and version areas reserved, ready for data placement.
    pub fn with_function_patterns(version: Version) -> Self {
        let mut result = Self::new(version);
        let size = result.size;
        result.draw_finder_pattern(3, 3);
        result.draw_finder_pattern(3, size - 4);
        result.draw_finder_pattern(size - 4, 3);
        result.draw_timing_patterns();
        result.draw_alignment_patterns();
        result.reserve_format_areas();
        result.reserve_version_areas();
        result
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Module {
        self.modules[self.index(row, col)]
    }

    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_dark()
    }

    pub fn is_reserved(&self, row: usize, col: usize) -> bool {
        self.reserved[self.index(row, col)]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Module]> {
        self.modules.chunks(self.size)
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| m.is_dark()).count()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.size && col < self.size, "Module out of range");
        row * self.size + col
    }

    /// Sets a module and marks it reserved.
    pub(crate) fn set_function(&mut self, row: usize, col: usize, isdark: bool) {
        let idx = self.index(row, col);
        self.modules[idx] = Module::from_dark(isdark);
        self.reserved[idx] = true;
    }

    // 7x7 finder centred on (row, col) plus its light separator, clipped to the grid
    fn draw_finder_pattern(&mut self, row: usize, col: usize) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let r = row as i32 + dy;
                let c = col as i32 + dx;
                if (0..self.size as i32).contains(&r) && (0..self.size as i32).contains(&c) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function(r as usize, c as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        for i in 8..self.size - 8 {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }
    }

    fn draw_alignment_patterns(&mut self) {
        let positions = self.version.alignment_pattern_positions();
        let last = positions.len().saturating_sub(1);
        for (i, &row) in positions.iter().enumerate() {
            for (j, &col) in positions.iter().enumerate() {
                // the three finder corners
                if (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0) {
                    continue;
                }
                for dy in -2i32..=2 {
                    for dx in -2i32..=2 {
                        self.set_function(
                            (row as i32 + dy) as usize,
                            (col as i32 + dx) as usize,
                            dx.abs().max(dy.abs()) != 1,
                        );
                    }
                }
            }
        }
    }

    fn reserve_format_areas(&mut self) {
        let size = self.size;
        for i in 0..9 {
            self.reserve(8, i);
            self.reserve(i, 8);
        }
        for i in 0..8 {
            self.reserve(8, size - 1 - i);
            self.reserve(size - 1 - i, 8);
        }
        self.set_function(size - 8, 8, true);
    }

    fn reserve_version_areas(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let size = self.size;
        for a in size - 11..size - 8 {
            for b in 0..6 {
                self.reserve(a, b);
                self.reserve(b, a);
            }
        }
    }

    // Reserves a cell without overwriting an already drawn function module.
    fn reserve(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        if !self.reserved[idx] {
            self.modules[idx] = Module::Light;
            self.reserved[idx] = true;
        }
    }

    /// Places codeword bits MSB-first in the zigzag scan from the bottom-right
    /// corner, in 2-column strips that skip the vertical timing column.
    /// Data cells left over afterwards (remainder bits) become light.
    /// Returns the number of bits placed.
    pub fn place_data(&mut self, codewords: &[u8]) -> usize {
        let size = self.size;
        let total = codewords.len() * 8;
        let mut i: usize = 0;
        let mut right = size - 1;
        loop {
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..size {
                let row = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let col = right - j;
                    let idx = self.index(row, col);
                    if !self.reserved[idx] && self.modules[idx] == Module::Unset && i < total {
                        let bit = (codewords[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                        self.modules[idx] = Module::from_dark(bit);
                        i += 1;
                    }
                }
            }
            if right < 2 {
                break;
            }
            right -= 2;
        }
        for (m, &res) in self.modules.iter_mut().zip(self.reserved.iter()) {
            if !res && *m == Module::Unset {
                *m = Module::Light;
            }
        }
        i
    }

    /// XORs the mask into every non-reserved cell. Applying twice undoes it.
    pub fn apply_mask(&mut self, mask: Mask) {
        let size = self.size;
        for row in 0..size {
            for col in 0..size {
                let idx = row * size + col;
                if !self.reserved[idx] && mask.inverts(row, col) {
                    self.modules[idx] = self.modules[idx].inverted();
                }
            }
        }
    }

    /// A copy of this pre-mask grid with `mask` applied and format info written.
    pub fn masked(&self, mask: Mask, ecl: EccLevel) -> QrMatrix {
        let mut result = self.clone();
        result.apply_mask(mask);
        place_format_info(&mut result, ecl, mask);
        result
    }

    /// Penalty scores of all eight masks, indexed by mask id.
    pub fn mask_penalties(&self, ecl: EccLevel) -> [u32; 8] {
        let mut result = [0u32; 8];
        for mask in Mask::all() {
            let penalty = self.masked(mask, ecl).penalty_score();
            tracing::trace!(mask = mask.value(), penalty, "evaluated mask");
            result[usize::from(mask.value())] = penalty;
        }
        result
    }

    /// The mask with the lowest penalty; ties go to the lowest id.
    pub fn best_mask(&self, ecl: EccLevel) -> Mask {
        let penalties = self.mask_penalties(ecl);
        let mut best = 0usize;
        for (i, &p) in penalties.iter().enumerate() {
            if p < penalties[best] {
                best = i;
            }
        }
        Mask::new(best as u8)
    }

    /// Sum of the four penalty rules over the whole grid.
    pub fn penalty_score(&self) -> u32 {
        let size = self.size;
        let mut result: u32 = 0;

        let mut line = Vec::with_capacity(size);
        for i in 0..size {
            line.clear();
            line.extend((0..size).map(|j| self.is_dark(i, j)));
            result += line_penalty(&line);
            line.clear();
            line.extend((0..size).map(|j| self.is_dark(j, i)));
            result += line_penalty(&line);
        }

        for row in 0..size - 1 {
            for col in 0..size - 1 {
                let color = self.is_dark(row, col);
                if color == self.is_dark(row, col + 1)
                    && color == self.is_dark(row + 1, col)
                    && color == self.is_dark(row + 1, col + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules, in 5% steps away from 50%
        let dark = self.dark_count() as i64;
        let total = (size * size) as i64;
        let k = (dark * 20 - total * 10).abs() / total;
        result += k as u32 * PENALTY_N4;
        result
    }
}

// Same-color runs of five or more, and finder-like 1:1:3:1:1 sequences.
fn line_penalty(line: &[bool]) -> u32 {
    let mut result: u32 = 0;
    let mut runcolor = false;
    let mut run: u32 = 0;
    for &color in line {
        if color == runcolor && run > 0 {
            run += 1;
            if run == 5 {
                result += PENALTY_N1;
            } else if run > 5 {
                result += 1;
            }
        } else {
            runcolor = color;
            run = 1;
        }
    }
    let finders = line.windows(FINDER_LIKE.len()).filter(|w| *w == FINDER_LIKE).count();
    result + finders as u32 * PENALTY_N3
}
