use pretty_assertions::assert_eq;

use z80_disasm::{format_line, Arg, IndexReg, Reg, RegPair};

fn reg(r: Reg, irp: IndexReg, d: i8) -> String {
    format_line("R", &[Arg::Reg(r), Arg::IndexReg(irp), Arg::Disp(d)]).unwrap()
}

fn pair(rp: RegPair, irp: IndexReg) -> String {
    format_line("P", &[Arg::RegPair(rp), Arg::IndexReg(irp)]).unwrap()
}

#[test]
fn plain_registers_ignore_index_context() {
    for r in Reg::ALL.into_iter().filter(|&r| r != Reg::AtHl) {
        for irp in IndexReg::ALL {
            for d in [i8::MIN, -3, 0, 5, i8::MAX] {
                assert_eq!(reg(r, irp, d), r.name());
            }
        }
    }
}

#[test]
fn h_and_l_are_not_overlaid() {
    assert_eq!(reg(Reg::H, IndexReg::Ix, 4), "h");
    assert_eq!(reg(Reg::L, IndexReg::Iy, -4), "l");
}

#[test]
fn memory_operand_unindexed_is_hl() {
    for d in [i8::MIN, -1, 0, 1, i8::MAX] {
        assert_eq!(reg(Reg::AtHl, IndexReg::Hl, d), "(hl)");
    }
}

#[test]
fn memory_operand_indexed_has_signed_displacement() {
    assert_eq!(reg(Reg::AtHl, IndexReg::Ix, -3), "(ix-3)");
    assert_eq!(reg(Reg::AtHl, IndexReg::Iy, 5), "(iy+5)");
    assert_eq!(reg(Reg::AtHl, IndexReg::Ix, 0), "(ix+0)");
    assert_eq!(reg(Reg::AtHl, IndexReg::Iy, i8::MIN), "(iy-128)");
    assert_eq!(reg(Reg::AtHl, IndexReg::Ix, i8::MAX), "(ix+127)");
}

#[test]
fn hl_pair_takes_index_register() {
    assert_eq!(pair(RegPair::Hl, IndexReg::Hl), "hl");
    assert_eq!(pair(RegPair::Hl, IndexReg::Ix), "ix");
    assert_eq!(pair(RegPair::Hl, IndexReg::Iy), "iy");
}

#[test]
fn other_pairs_ignore_index_context() {
    for rp in [RegPair::Bc, RegPair::De, RegPair::Sp] {
        for irp in IndexReg::ALL {
            assert_eq!(pair(rp, irp), rp.to_string());
        }
    }
}

#[test]
fn raw_displacement_byte_sign_extends() {
    let d = z80_disasm::sign_extend8(0xfd);
    assert_eq!(reg(Reg::AtHl, IndexReg::Ix, d), "(ix-3)");
}
