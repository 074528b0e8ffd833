pub mod args;
pub mod buffer;
pub mod disasm;
pub mod error;
pub mod names;

pub use args::{validate, Arg, ArgKind, Directive, Instr};
pub use buffer::{LineBuf, OutputBuf, LINE_CAPACITY};
pub use disasm::{format_into, format_line, format_to, OutputSink};
pub use error::{FormatError, ParseNameError};
pub use names::{sign_extend8, Alu, BlockLd, Condition, IndexReg, Reg, RegPair};
