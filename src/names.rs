//! Fixed display names for the Z80 operand and opcode enumerations.
//!
//! Every enumeration is closed and every mapping is an exhaustive `match`,
//! so there is no "unknown value" path anywhere in this module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseNameError;

/// 8-bit register operand, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reg {
    B,
    C,
    D,
    E,
    H,
    L,
    /// Memory at `hl`, or at `ix+d`/`iy+d` under an index prefix.
    #[serde(rename = "(hl)")]
    AtHl,
    A,
}

impl Reg {
    pub const ALL: [Reg; 8] = [
        Reg::B,
        Reg::C,
        Reg::D,
        Reg::E,
        Reg::H,
        Reg::L,
        Reg::AtHl,
        Reg::A,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Reg::B => "b",
            Reg::C => "c",
            Reg::D => "d",
            Reg::E => "e",
            Reg::H => "h",
            Reg::L => "l",
            Reg::AtHl => "(hl)",
            Reg::A => "a",
        }
    }
}

/// Selects plain `hl` addressing or one of the index registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexReg {
    #[default]
    Hl,
    Ix,
    Iy,
}

impl IndexReg {
    pub const ALL: [IndexReg; 3] = [IndexReg::Hl, IndexReg::Ix, IndexReg::Iy];

    pub fn name(self) -> &'static str {
        match self {
            IndexReg::Hl => "hl",
            IndexReg::Ix => "ix",
            IndexReg::Iy => "iy",
        }
    }

    pub fn is_indexed(self) -> bool {
        self != IndexReg::Hl
    }
}

/// 16-bit register pair operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegPair {
    Bc,
    De,
    Hl,
    Sp,
}

impl RegPair {
    pub const ALL: [RegPair; 4] = [RegPair::Bc, RegPair::De, RegPair::Hl, RegPair::Sp];

    /// Name of the pair under the given index context. Only `hl` is
    /// replaced by the index register; the other pairs never change.
    pub fn name(self, irp: IndexReg) -> &'static str {
        match self {
            RegPair::Bc => "bc",
            RegPair::De => "de",
            RegPair::Hl => irp.name(),
            RegPair::Sp => "sp",
        }
    }
}

/// ALU operation selected by bits 3..5 of the arithmetic opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alu {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl Alu {
    pub const ALL: [Alu; 8] = [
        Alu::Add,
        Alu::Adc,
        Alu::Sub,
        Alu::Sbc,
        Alu::And,
        Alu::Xor,
        Alu::Or,
        Alu::Cp,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Alu::Add => "add",
            Alu::Adc => "adc",
            Alu::Sub => "sub",
            Alu::Sbc => "sbc",
            Alu::And => "and",
            Alu::Xor => "xor",
            Alu::Or => "or",
            Alu::Cp => "cp",
        }
    }

    /// Operations written with an explicit accumulator, as in `add a,b`.
    pub fn is_two_operand(self) -> bool {
        matches!(self, Alu::Add | Alu::Adc | Alu::Sbc)
    }
}

/// Block transfer instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockLd {
    Ldi,
    Ldd,
    Ldir,
    Lddr,
}

impl BlockLd {
    pub const ALL: [BlockLd; 4] = [BlockLd::Ldi, BlockLd::Ldd, BlockLd::Ldir, BlockLd::Lddr];

    pub fn mnemonic(self) -> &'static str {
        match self {
            BlockLd::Ldi => "ldi",
            BlockLd::Ldd => "ldd",
            BlockLd::Ldir => "ldir",
            BlockLd::Lddr => "lddr",
        }
    }
}

/// Branch condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Nz,
    Z,
    Nc,
    C,
    Po,
    Pe,
    P,
    M,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::Nz,
        Condition::Z,
        Condition::Nc,
        Condition::C,
        Condition::Po,
        Condition::Pe,
        Condition::P,
        Condition::M,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Condition::Nz => "nz",
            Condition::Z => "z",
            Condition::Nc => "nc",
            Condition::C => "c",
            Condition::Po => "po",
            Condition::Pe => "pe",
            Condition::P => "p",
            Condition::M => "m",
        }
    }
}

/// Reinterprets a raw displacement byte as a signed offset.
pub fn sign_extend8(d: u8) -> i8 {
    d as i8
}

fn parse_name<T: Copy>(
    all: &[T],
    name_of: impl Fn(T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T, ParseNameError> {
    all.iter()
        .copied()
        .find(|&v| name_of(v) == s)
        .ok_or_else(|| ParseNameError {
            kind,
            name: s.to_string(),
        })
}

impl FromStr for Reg {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&Reg::ALL, Reg::name, "register", s)
    }
}

impl FromStr for IndexReg {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&IndexReg::ALL, IndexReg::name, "index register", s)
    }
}

impl FromStr for RegPair {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&RegPair::ALL, |rp| rp.name(IndexReg::Hl), "register pair", s)
    }
}

impl FromStr for Alu {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&Alu::ALL, Alu::mnemonic, "ALU operation", s)
    }
}

impl FromStr for BlockLd {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&BlockLd::ALL, BlockLd::mnemonic, "block transfer", s)
    }
}

impl FromStr for Condition {
    type Err = ParseNameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_name(&Condition::ALL, Condition::name, "condition", s)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for IndexReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Unindexed; use `RegPair::name` for the ix/iy overlay.
impl fmt::Display for RegPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(IndexReg::Hl))
    }
}

impl fmt::Display for Alu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for BlockLd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_operand_alu_set() {
        let two: Vec<Alu> = Alu::ALL.into_iter().filter(|k| k.is_two_operand()).collect();
        assert_eq!(two, vec![Alu::Add, Alu::Adc, Alu::Sbc]);
    }

    #[test]
    fn hl_pair_follows_index_context() {
        assert_eq!(RegPair::Hl.name(IndexReg::Hl), "hl");
        assert_eq!(RegPair::Hl.name(IndexReg::Ix), "ix");
        assert_eq!(RegPair::Hl.name(IndexReg::Iy), "iy");
        for irp in IndexReg::ALL {
            assert_eq!(RegPair::Bc.name(irp), "bc");
            assert_eq!(RegPair::De.name(irp), "de");
            assert_eq!(RegPair::Sp.name(irp), "sp");
        }
    }

    #[test]
    fn names_parse_back() {
        for r in Reg::ALL {
            assert_eq!(r.name().parse::<Reg>().unwrap(), r);
        }
        for cc in Condition::ALL {
            assert_eq!(cc.to_string().parse::<Condition>().unwrap(), cc);
        }
        for k in BlockLd::ALL {
            assert_eq!(k.mnemonic().parse::<BlockLd>().unwrap(), k);
        }
        assert_eq!("sbc".parse::<Alu>().unwrap(), Alu::Sbc);
        assert_eq!("sp".parse::<RegPair>().unwrap(), RegPair::Sp);
        assert_eq!("iy".parse::<IndexReg>().unwrap(), IndexReg::Iy);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "ix".parse::<RegPair>().unwrap_err();
        assert_eq!(err.kind, "register pair");
        assert_eq!(err.name, "ix");
        assert!("hl".parse::<Reg>().is_err());
    }

    #[test]
    fn serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&Reg::AtHl).unwrap(), "\"(hl)\"");
        assert_eq!(serde_json::to_string(&Condition::Po).unwrap(), "\"po\"");
        let k: Alu = serde_json::from_str("\"xor\"").unwrap();
        assert_eq!(k, Alu::Xor);
    }

    #[test]
    fn sign_extend_displacement_byte() {
        assert_eq!(sign_extend8(0x05), 5);
        assert_eq!(sign_extend8(0xfd), -3);
        assert_eq!(sign_extend8(0x80), -128);
    }
}
