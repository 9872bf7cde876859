//! Parser for duet tokens → instructions.
//!
//! Only the opcode and the operand count are checked here. Operand tokens
//! are stored verbatim and resolved by the VM when they execute.

use crate::error::AsmError;
use duet_common::{Instruction, Opcode};

/// Parse the tokens of a single line into an instruction.
///
/// Returns `Ok(None)` for blank lines (empty token list).
pub(crate) fn parse_line(
    tokens: &[&str],
    line_num: usize,
) -> Result<Option<Instruction>, AsmError> {
    let Some((&mnemonic, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let expected = opcode.arity();
    if args.len() < expected {
        return Err(AsmError::MissingArgument {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected,
        });
    }
    if let Some(extra) = args.get(expected) {
        return Err(AsmError::UnexpectedToken {
            line: line_num,
            token: extra.to_string(),
        });
    }

    let instr = if expected == 1 {
        Instruction::unary(opcode, args[0])
    } else {
        Instruction::binary(opcode, args[0], args[1])
    };
    Ok(Some(instr))
}
