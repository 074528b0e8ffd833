//! Typed operand stream and the directive vocabulary of format strings.
//!
//! A format string is plain text in which a handful of upper-case letters
//! are directives. Each directive pulls a fixed, ordered list of operands
//! from the argument stream:
//!
//! | char | directive  | operands                               |
//! |------|------------|----------------------------------------|
//! | `A`  | ALU op     | `Alu`                                  |
//! | `R`  | register   | `Reg`, `IndexReg`, displacement (`i8`) |
//! | `P`  | reg pair   | `RegPair`, `IndexReg`                  |
//! | `N`  | imm8       | `u8`                                   |
//! | `W`  | imm16      | `u16`                                  |
//! | `C`  | condition  | `Condition`                            |
//! | `D`  | rel target | `i32`                                  |
//! | `L`  | block ld   | `BlockLd`                              |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};
use crate::names::{Alu, BlockLd, Condition, IndexReg, Reg, RegPair};

/// One operand of the argument stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arg {
    Alu(Alu),
    Reg(Reg),
    IndexReg(IndexReg),
    /// Signed displacement of an indexed memory operand.
    Disp(i8),
    RegPair(RegPair),
    U8(u8),
    U16(u16),
    Cond(Condition),
    /// Resolved relative jump target.
    Rel(i32),
    BlockLd(BlockLd),
}

/// Payload-free tag of an [`Arg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Alu,
    Reg,
    IndexReg,
    Disp,
    RegPair,
    U8,
    U16,
    Cond,
    Rel,
    BlockLd,
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Alu(_) => ArgKind::Alu,
            Arg::Reg(_) => ArgKind::Reg,
            Arg::IndexReg(_) => ArgKind::IndexReg,
            Arg::Disp(_) => ArgKind::Disp,
            Arg::RegPair(_) => ArgKind::RegPair,
            Arg::U8(_) => ArgKind::U8,
            Arg::U16(_) => ArgKind::U16,
            Arg::Cond(_) => ArgKind::Cond,
            Arg::Rel(_) => ArgKind::Rel,
            Arg::BlockLd(_) => ArgKind::BlockLd,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::Alu => "ALU operation",
            ArgKind::Reg => "register",
            ArgKind::IndexReg => "index register",
            ArgKind::Disp => "displacement",
            ArgKind::RegPair => "register pair",
            ArgKind::U8 => "8-bit immediate",
            ArgKind::U16 => "16-bit immediate",
            ArgKind::Cond => "condition",
            ArgKind::Rel => "relative target",
            ArgKind::BlockLd => "block transfer",
        })
    }
}

impl From<Alu> for Arg {
    fn from(v: Alu) -> Self {
        Arg::Alu(v)
    }
}

impl From<Reg> for Arg {
    fn from(v: Reg) -> Self {
        Arg::Reg(v)
    }
}

impl From<IndexReg> for Arg {
    fn from(v: IndexReg) -> Self {
        Arg::IndexReg(v)
    }
}

impl From<i8> for Arg {
    fn from(v: i8) -> Self {
        Arg::Disp(v)
    }
}

impl From<RegPair> for Arg {
    fn from(v: RegPair) -> Self {
        Arg::RegPair(v)
    }
}

impl From<u8> for Arg {
    fn from(v: u8) -> Self {
        Arg::U8(v)
    }
}

impl From<u16> for Arg {
    fn from(v: u16) -> Self {
        Arg::U16(v)
    }
}

impl From<Condition> for Arg {
    fn from(v: Condition) -> Self {
        Arg::Cond(v)
    }
}

impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        Arg::Rel(v)
    }
}

impl From<BlockLd> for Arg {
    fn from(v: BlockLd) -> Self {
        Arg::BlockLd(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Alu,
    Reg,
    RegPair,
    Imm8,
    Imm16,
    Cond,
    Rel,
    BlockLd,
}

impl Directive {
    pub fn from_char(c: char) -> Option<Directive> {
        Some(match c {
            'A' => Directive::Alu,
            'R' => Directive::Reg,
            'P' => Directive::RegPair,
            'N' => Directive::Imm8,
            'W' => Directive::Imm16,
            'C' => Directive::Cond,
            'D' => Directive::Rel,
            'L' => Directive::BlockLd,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Directive::Alu => 'A',
            Directive::Reg => 'R',
            Directive::RegPair => 'P',
            Directive::Imm8 => 'N',
            Directive::Imm16 => 'W',
            Directive::Cond => 'C',
            Directive::Rel => 'D',
            Directive::BlockLd => 'L',
        }
    }

    /// Operands consumed by this directive, in stream order.
    pub fn signature(self) -> &'static [ArgKind] {
        match self {
            Directive::Alu => &[ArgKind::Alu],
            Directive::Reg => &[ArgKind::Reg, ArgKind::IndexReg, ArgKind::Disp],
            Directive::RegPair => &[ArgKind::RegPair, ArgKind::IndexReg],
            Directive::Imm8 => &[ArgKind::U8],
            Directive::Imm16 => &[ArgKind::U16],
            Directive::Cond => &[ArgKind::Cond],
            Directive::Rel => &[ArgKind::Rel],
            Directive::BlockLd => &[ArgKind::BlockLd],
        }
    }
}

/// Iterates the directives of a format string with their byte offsets.
pub fn directives(fmt: &str) -> impl Iterator<Item = (usize, Directive)> + '_ {
    fmt.char_indices()
        .filter_map(|(off, c)| Directive::from_char(c).map(|d| (off, d)))
}

/// Cursor over the argument stream with typed accessors.
///
/// Each accessor is told which directive, at which byte offset of the
/// format string, is asking; both only feed the error value.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    rest: std::slice::Iter<'a, Arg>,
}

macro_rules! next_arg {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&mut self, directive: Directive, offset: usize) -> Result<$ty> {
            match self.take(directive, offset, ArgKind::$variant)? {
                Arg::$variant(v) => Ok(*v),
                other => Err(mismatch(directive, offset, ArgKind::$variant, other)),
            }
        }
    };
}

impl<'a> Args<'a> {
    pub fn new(args: &'a [Arg]) -> Self {
        Self { rest: args.iter() }
    }

    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    fn take(&mut self, directive: Directive, offset: usize, expected: ArgKind) -> Result<&'a Arg> {
        self.rest.next().ok_or(FormatError::MissingArgument {
            directive: directive.as_char(),
            offset,
            expected,
        })
    }

    next_arg!(next_alu, Alu, Alu);
    next_arg!(next_reg, Reg, Reg);
    next_arg!(next_index_reg, IndexReg, IndexReg);
    next_arg!(next_disp, Disp, i8);
    next_arg!(next_reg_pair, RegPair, RegPair);
    next_arg!(next_u8, U8, u8);
    next_arg!(next_u16, U16, u16);
    next_arg!(next_cond, Cond, Condition);
    next_arg!(next_rel, Rel, i32);
    next_arg!(next_block_ld, BlockLd, BlockLd);

    /// Fails if operands are left over once the format string is done.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            count => Err(FormatError::TrailingArguments { count }),
        }
    }
}

fn mismatch(directive: Directive, offset: usize, expected: ArgKind, found: &Arg) -> FormatError {
    FormatError::ArgumentMismatch {
        directive: directive.as_char(),
        offset,
        expected,
        found: found.kind(),
    }
}

/// Checks the whole argument list against the directive sequence of `fmt`.
///
/// Succeeds exactly when every directive finds operands of the expected
/// kinds in order and no operand is left over.
pub fn validate(fmt: &str, args: &[Arg]) -> Result<()> {
    let mut rest = args.iter();
    for (offset, d) in directives(fmt) {
        for &expected in d.signature() {
            let found = rest.next().ok_or(FormatError::MissingArgument {
                directive: d.as_char(),
                offset,
                expected,
            })?;
            if found.kind() != expected {
                return Err(mismatch(d, offset, expected, found));
            }
        }
    }
    match rest.len() {
        0 => Ok(()),
        count => Err(FormatError::TrailingArguments { count }),
    }
}

/// A format string paired with an argument list already known to match it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instr {
    fmt: String,
    args: Vec<Arg>,
}

impl Instr {
    pub fn new(fmt: impl Into<String>, args: Vec<Arg>) -> Result<Self> {
        let fmt = fmt.into();
        validate(&fmt, &args)?;
        Ok(Self { fmt, args })
    }

    pub fn format_str(&self) -> &str {
        &self.fmt
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

impl<'de> Deserialize<'de> for Instr {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            fmt: String,
            #[serde(default)]
            args: Vec<Arg>,
        }

        let raw = Raw::deserialize(de)?;
        Instr::new(raw.fmt, raw.args).map_err(serde::de::Error::custom)
    }
}
