//! Format-string interpreter turning decoded operands into instruction text.
//!
//! The decode layer describes an instruction as a short format string such
//! as `"ld R,R"` plus the operands its directives consume (see
//! [`crate::args`]). Literal characters are copied as they are, directives
//! are replaced by operand text, and the finished line is handed to an
//! [`OutputSink`] once.

use crate::args::{validate, Arg, Args, Directive, Instr};
use crate::buffer::{LineBuf, OutputBuf};
use crate::error::Result;
use crate::names::Reg;

/// Receives each finished line.
pub trait OutputSink {
    fn on_output(&mut self, line: &str);
}

impl<F: FnMut(&str)> OutputSink for F {
    fn on_output(&mut self, line: &str) {
        self(line)
    }
}

/// Keeps the most recent line only.
impl OutputSink for String {
    fn on_output(&mut self, line: &str) {
        self.clear();
        self.push_str(line);
    }
}

impl OutputSink for Vec<String> {
    fn on_output(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Renders `fmt` into `out` in one left-to-right pass.
///
/// Operands are checked as they are consumed, so on error `out` may hold a
/// partial line. [`format_to`] validates up front instead.
pub fn format_into<const N: usize>(fmt: &str, args: &[Arg], out: &mut OutputBuf<N>) -> Result<()> {
    let mut args = Args::new(args);
    for (offset, c) in fmt.char_indices() {
        match Directive::from_char(c) {
            Some(d) => render_operand(d, offset, &mut args, out)?,
            None => out.push(c)?,
        }
    }
    args.finish()
}

fn render_operand<const N: usize>(
    d: Directive,
    offset: usize,
    args: &mut Args<'_>,
    out: &mut OutputBuf<N>,
) -> Result<()> {
    match d {
        Directive::Alu => {
            let k = args.next_alu(d, offset)?;
            out.push_str(k.mnemonic())?;
            if k.is_two_operand() {
                out.push_str(" a,")?;
            }
        }
        Directive::Reg => {
            let r = args.next_reg(d, offset)?;
            let irp = args.next_index_reg(d, offset)?;
            let disp = args.next_disp(d, offset)?;
            // Only the memory operand takes the index register; h and l
            // stay h and l under a prefix here.
            if r != Reg::AtHl || !irp.is_indexed() {
                out.push_str(r.name())?;
            } else {
                out.push('(')?;
                out.push_str(irp.name())?;
                out.push_disp(disp.into())?;
                out.push(')')?;
            }
        }
        Directive::RegPair => {
            let rp = args.next_reg_pair(d, offset)?;
            let irp = args.next_index_reg(d, offset)?;
            out.push_str(rp.name(irp))?;
        }
        Directive::Imm8 => out.push_u8(args.next_u8(d, offset)?)?,
        Directive::Imm16 => out.push_u16(args.next_u16(d, offset)?)?,
        Directive::Cond => out.push_str(args.next_cond(d, offset)?.name())?,
        Directive::Rel => {
            let target = args.next_rel(d, offset)?;
            out.push('$')?;
            out.push_disp(target)?;
        }
        Directive::BlockLd => out.push_str(args.next_block_ld(d, offset)?.mnemonic())?,
    }
    Ok(())
}

/// Formats one instruction and passes the line to `sink`.
///
/// The argument list is checked against the whole format string before
/// anything is rendered. `sink` is called exactly once on success and never
/// on error.
pub fn format_to<S: OutputSink + ?Sized>(fmt: &str, args: &[Arg], sink: &mut S) -> Result<()> {
    let mut out = LineBuf::new();
    let rendered = validate(fmt, args)
        .and_then(|()| format_into(fmt, args, &mut out))
        .and_then(|()| out.terminate());
    if let Err(err) = rendered {
        tracing::debug!(%err, format = fmt, "rejected instruction format");
        return Err(err);
    }
    tracing::trace!(line = out.as_str(), format = fmt, "formatted instruction");
    sink.on_output(out.as_str());
    Ok(())
}

/// Formats one instruction into an owned string.
pub fn format_line(fmt: &str, args: &[Arg]) -> Result<String> {
    let mut line = String::new();
    format_to(fmt, args, &mut line)?;
    Ok(line)
}

impl Instr {
    pub fn emit<S: OutputSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        format_to(self.format_str(), self.args(), sink)
    }

    pub fn render(&self) -> Result<String> {
        format_line(self.format_str(), self.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::names::{Alu, IndexReg, RegPair};

    #[test]
    fn literals_only() {
        assert_eq!(format_line("exx", &[]).unwrap(), "exx");
        assert_eq!(format_line("ex (sp),hl", &[]).unwrap(), "ex (sp),hl");
    }

    #[test]
    fn sink_called_once_per_line() {
        let mut calls = 0;
        let mut seen = String::new();
        let mut sink = |line: &str| {
            calls += 1;
            seen = line.to_string();
        };
        format_to("push P", &[Arg::from(RegPair::Hl), Arg::from(IndexReg::Iy)], &mut sink).unwrap();
        assert_eq!(calls, 1);
        assert_eq!(seen, "push iy");
    }

    #[test]
    fn sink_not_called_on_error() {
        let mut lines: Vec<String> = Vec::new();
        let err = format_to("A", &[Arg::U8(1)], &mut lines).unwrap_err();
        assert!(matches!(err, FormatError::ArgumentMismatch { directive: 'A', .. }));
        assert!(lines.is_empty());
    }

    #[test]
    fn format_into_small_buffer_overflows() {
        let mut out = OutputBuf::<8>::new();
        let args = [Arg::Alu(Alu::Add), Arg::U8(0xff)];
        let err = format_into("AN", &args, &mut out).unwrap_err();
        assert_eq!(err, FormatError::Overflow { capacity: 8, needed: 10 });
        assert_eq!(out.as_str(), "add a,");
    }

    #[test]
    fn format_into_reports_surplus() {
        let mut out = LineBuf::new();
        let err = format_into("nop", &[Arg::U8(0)], &mut out).unwrap_err();
        assert_eq!(err, FormatError::TrailingArguments { count: 1 });
    }
}
