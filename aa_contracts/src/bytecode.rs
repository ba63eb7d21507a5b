//! Linear EVM disassembly, enough to read the immediates of `PUSHn` instructions.
//!
//! Creation code is walked from the first byte through the runtime code and metadata. Data
//! after the last instruction is decoded as instructions too; callers only look at pushes.

pub const PUSH0: u8 = 0x5f;
pub const PUSH1: u8 = 0x60;
pub const PUSH4: u8 = 0x63;
pub const PUSH32: u8 = 0x7f;

/// Number of immediate bytes following `opcode`.
pub fn immediate_size(opcode: u8) -> usize {
    match opcode {
        PUSH1..=PUSH32 => (opcode - PUSH1) as usize + 1,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub offset: usize,
    pub opcode: u8,
    /// Shorter than [`immediate_size`] only when the code ends mid-push.
    pub immediate: &'a [u8],
}

impl Instruction<'_> {
    pub fn is_push(&self) -> bool {
        (PUSH1..=PUSH32).contains(&self.opcode)
    }
}

#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    code: &'a [u8],
    offset: usize,
}

pub fn instructions(code: &[u8]) -> Instructions<'_> {
    Instructions { code, offset: 0 }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Instruction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset;
        let opcode = *self.code.get(offset)?;
        let start = offset + 1;
        let end = (start + immediate_size(opcode)).min(self.code.len());
        self.offset = end;
        Some(Instruction {
            offset,
            opcode,
            immediate: &self.code[start..end],
        })
    }
}

/// Values pushed by every complete `PUSH0`..`PUSHn` with `n <= width`, left-padded with zeros
/// to `width` bytes. The compiler drops leading zero bytes, so a selector such as
/// `0x009b90af` is pushed with `PUSH3`.
pub fn push_words(code: &[u8], width: usize) -> impl Iterator<Item = Vec<u8>> + '_ {
    instructions(code)
        .filter(|ins| ins.opcode == PUSH0 || ins.is_push())
        .filter(move |ins| {
            let size = immediate_size(ins.opcode);
            size <= width && ins.immediate.len() == size
        })
        .map(move |ins| {
            let mut word = vec![0u8; width - ins.immediate.len()];
            word.extend_from_slice(ins.immediate);
            word
        })
}
