//! FM channel: four operators wired by one of eight algorithms

use super::operator::{Modulation, Operator, RenderContext};
use super::tables::feedback_radians;

/// Buffer an operator reads from or writes to while a channel renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Buf {
    Out,
    Aux,
}

/// One operator's place in an algorithm
#[derive(Debug, Clone, Copy)]
struct Slot {
    input: Option<Buf>,
    output: Buf,
    mix: bool,
}

const fn write(input: Option<Buf>, output: Buf) -> Slot {
    Slot {
        input,
        output,
        mix: false,
    }
}

const fn mix(input: Option<Buf>, output: Buf) -> Slot {
    Slot {
        input,
        output,
        mix: true,
    }
}

use Buf::{Aux, Out};

/// Operator wiring for algorithms 0-7, operators in logical order 1-4
const ALGORITHMS: [[Slot; 4]; 8] = [
    // 1 -> 2 -> 3 -> 4
    [write(None, Out), write(Some(Out), Out), write(Some(Out), Out), write(Some(Out), Out)],
    // (1 + 2) -> 3 -> 4
    [write(None, Out), mix(None, Out), write(Some(Out), Out), write(Some(Out), Out)],
    // (1 + (2 -> 3)) -> 4
    [write(None, Out), write(None, Aux), mix(Some(Aux), Out), write(Some(Out), Out)],
    // ((1 -> 2) + 3) -> 4
    [write(None, Out), write(Some(Out), Out), mix(None, Out), write(Some(Out), Out)],
    // (1 -> 2) + (3 -> 4)
    [write(None, Out), write(Some(Out), Out), write(None, Aux), mix(Some(Aux), Out)],
    // 1 -> (2 + 3 + 4)
    [write(None, Aux), write(Some(Aux), Out), mix(Some(Aux), Out), mix(Some(Aux), Out)],
    // (1 -> 2) + 3 + 4
    [write(None, Out), write(Some(Out), Out), mix(None, Out), mix(None, Out)],
    // 1 + 2 + 3 + 4
    [write(None, Out), mix(None, Out), mix(None, Out), mix(None, Out)],
];

#[derive(Debug, Clone)]
pub struct Channel {
    bank: u8,
    slot: u8,
    algorithm: u8,
    feedback: u8,
    fnumber: u16,
    block: u8,
    mix_left: bool,
    mix_right: bool,
    operators: [Operator; 4],
    mono: Vec<f64>,
    aux: Vec<f64>,
}

impl Channel {
    pub fn new(bank: u8, slot: u8) -> Self {
        Self {
            bank,
            slot,
            algorithm: 0,
            feedback: 0,
            fnumber: 0,
            block: 0,
            mix_left: false,
            mix_right: false,
            operators: Default::default(),
            mono: Vec::new(),
            aux: Vec::new(),
        }
    }

    /// 1-based channel number as printed on datasheets (CH1-CH6)
    pub fn number(&self) -> u8 {
        self.bank * 3 + self.slot + 1
    }

    pub fn algorithm(&self) -> u8 {
        self.algorithm
    }

    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    pub fn fnumber(&self) -> u16 {
        self.fnumber
    }

    pub fn block(&self) -> u8 {
        self.block
    }

    pub fn mix_left(&self) -> bool {
        self.mix_left
    }

    pub fn mix_right(&self) -> bool {
        self.mix_right
    }

    pub fn operator(&self, index: usize) -> &Operator {
        &self.operators[index & 3]
    }

    pub fn operator_mut(&mut self, index: usize) -> &mut Operator {
        &mut self.operators[index & 3]
    }

    pub fn operators(&self) -> &[Operator; 4] {
        &self.operators
    }

    /// Latch F-number and block from the frequency registers and retune every operator
    pub fn set_frequency(&mut self, fnumber: u16, block: u8, clock: u32) {
        self.fnumber = fnumber & 0x7ff;
        self.block = block & 7;
        for op in &mut self.operators {
            op.update_frequency(self.fnumber, self.block, clock);
        }
    }

    /// Retune one operator after a detune/multiple write
    pub fn update_operator_frequency(&mut self, index: usize, clock: u32) {
        let (fnumber, block) = (self.fnumber, self.block);
        self.operators[index & 3].update_frequency(fnumber, block, clock);
    }

    pub fn set_algorithm_feedback(&mut self, data: u8) {
        self.algorithm = data & 7;
        self.feedback = (data >> 3) & 7;
        log::debug!(
            "[CH{}] algo={} feedback={}",
            self.number(),
            self.algorithm,
            self.feedback
        );
    }

    pub fn set_output(&mut self, left: bool, right: bool) {
        self.mix_left = left;
        self.mix_right = right;
    }

    /// Key operators on (Attack) or off (Release); bit `i` of `mask` drives operator `i`
    pub fn key(&mut self, mask: u8) {
        for (i, op) in self.operators.iter_mut().enumerate() {
            op.key(mask & (1 << i) != 0);
        }
    }

    /// Render the channel into `left` and `right`, which must be the same length
    pub fn render(&mut self, ctx: &RenderContext, left: &mut [f64], right: &mut [f64]) {
        let len = left.len();
        self.render_mono(ctx, len);

        if self.mix_left {
            left.copy_from_slice(&self.mono);
        } else {
            left.fill(0.0);
        }
        if self.mix_right {
            right.copy_from_slice(&self.mono);
        } else {
            right.fill(0.0);
        }
    }

    /// Render `len` samples of the algorithm's mono output into the channel's scratch buffer
    pub fn render_mono(&mut self, ctx: &RenderContext, len: usize) -> &[f64] {
        self.mono.clear();
        self.mono.resize(len, 0.0);
        self.aux.clear();
        self.aux.resize(len, 0.0);

        let feedback = feedback_radians(self.feedback);
        let wiring = &ALGORITHMS[self.algorithm as usize];
        for (i, slot) in wiring.iter().enumerate() {
            let fb = if i == 0 { feedback } else { 0.0 };
            let op = &mut self.operators[i];
            match (slot.input, slot.output) {
                (None, Out) => op.process(ctx, Modulation::None, &mut self.mono, slot.mix, fb),
                (None, Aux) => op.process(ctx, Modulation::None, &mut self.aux, slot.mix, fb),
                (Some(Out), Out) => {
                    op.process(ctx, Modulation::InPlace, &mut self.mono, slot.mix, fb)
                }
                (Some(Aux), Aux) => {
                    op.process(ctx, Modulation::InPlace, &mut self.aux, slot.mix, fb)
                }
                (Some(Aux), Out) => {
                    op.process(ctx, Modulation::From(&self.aux), &mut self.mono, slot.mix, fb)
                }
                (Some(Out), Aux) => {
                    op.process(ctx, Modulation::From(&self.mono), &mut self.aux, slot.mix, fb)
                }
            }
        }
        &self.mono
    }
}
