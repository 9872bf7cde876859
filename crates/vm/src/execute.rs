//! Single-step execution and opcode dispatch.

use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::machine::{Channel, StepResult, VM};
use crate::pipe::PipeError;
use crate::registers::Registers;
use duet_common::{Instruction, Opcode};

impl<'a> VM<'a> {
    /// Execute the instruction at the current pc.
    ///
    /// Every executed instruction bumps its opcode counter, including a
    /// `rcv` that comes back [`StepResult::Blocked`]. The pc then moves to
    /// the next instruction, or by the jump offset for a taken jump; a
    /// blocked `rcv` leaves it in place. A [`StepResult::Halted`] step
    /// executes nothing and changes nothing. [`StepResult::Recovered`] is
    /// terminal: every later call is `Halted`.
    pub fn execute_one(&mut self) -> Result<StepResult, RuntimeError> {
        if self.recovered {
            return Ok(StepResult::Halted);
        }
        let program = self.program;
        let Some(instr) = program.get(self.pc) else {
            return Ok(StepResult::Halted);
        };
        let at = self.pc as usize;
        trace!(pc = self.pc, %instr, "step");

        let mut next = self.pc + 1;
        let result = match instr.opcode {
            Opcode::Set => self.exec_arith(instr, at, |_, v| Ok(v))?,
            Opcode::Add => self.exec_arith(instr, at, |r, v| Ok(r.wrapping_add(v)))?,
            Opcode::Sub => self.exec_arith(instr, at, |r, v| Ok(r.wrapping_sub(v)))?,
            Opcode::Mul => self.exec_arith(instr, at, |r, v| Ok(r.wrapping_mul(v)))?,
            Opcode::Mod => self.exec_arith(instr, at, |r, v| {
                if v == 0 {
                    Err(RuntimeError::DivisionByZero { at })
                } else {
                    // Truncated remainder: the sign follows the dividend.
                    Ok(r.wrapping_rem(v))
                }
            })?,
            Opcode::Snd => self.exec_snd(instr, at)?,
            Opcode::Rcv => self.exec_rcv(instr, at)?,
            Opcode::Jgz => {
                if self.registers.resolve(&instr.arg1, at)? > 0 {
                    next = self.pc.saturating_add(self.registers.resolve(instr.arg2(), at)?);
                }
                StepResult::Continued
            }
            Opcode::Jnz => {
                if self.registers.resolve(&instr.arg1, at)? != 0 {
                    next = self.pc.saturating_add(self.registers.resolve(instr.arg2(), at)?);
                }
                StepResult::Continued
            }
        };

        match result {
            StepResult::Halted => {}
            StepResult::Blocked => self.op_counts.record(instr.opcode),
            StepResult::Continued => {
                self.op_counts.record(instr.opcode);
                self.pc = next;
            }
            StepResult::Recovered(_) => {
                self.op_counts.record(instr.opcode);
                self.pc = next;
                self.recovered = true;
            }
        }
        Ok(result)
    }

    /// `op a b`: `reg[a] := f(reg[a], value(b))`.
    fn exec_arith<F>(
        &mut self,
        instr: &Instruction,
        at: usize,
        f: F,
    ) -> Result<StepResult, RuntimeError>
    where
        F: FnOnce(i64, i64) -> Result<i64, RuntimeError>,
    {
        let reg = Registers::target(&instr.arg1, at)?;
        let value = self.registers.resolve(instr.arg2(), at)?;
        let updated = f(self.registers.get(reg), value)?;
        self.registers.set(reg, updated);
        Ok(StepResult::Continued)
    }

    fn exec_snd(&mut self, instr: &Instruction, at: usize) -> Result<StepResult, RuntimeError> {
        let value = self.registers.resolve(&instr.arg1, at)?;
        match &mut self.channel {
            Channel::Plain { last_played } => {
                *last_played = value;
                Ok(StepResult::Continued)
            }
            Channel::Piped {
                outbox,
                inbox,
                sent,
            } => match outbox.push_unless(value, || inbox.writer_stuck()) {
                Ok(()) => {
                    *sent += 1;
                    Ok(StepResult::Continued)
                }
                Err(PipeError::Disconnected) => {
                    debug!(pc = at, value, "peer hung up before receiving");
                    Ok(StepResult::Halted)
                }
                Err(PipeError::Deadlock) => {
                    debug!(pc = at, value, "send deadlock");
                    Err(RuntimeError::SendDeadlock { at })
                }
            },
        }
    }

    fn exec_rcv(&mut self, instr: &Instruction, at: usize) -> Result<StepResult, RuntimeError> {
        match &self.channel {
            Channel::Plain { last_played } => {
                if self.registers.resolve(&instr.arg1, at)? != 0 {
                    debug!(pc = at, value = *last_played, "recovered");
                    Ok(StepResult::Recovered(*last_played))
                } else {
                    Ok(StepResult::Continued)
                }
            }
            Channel::Piped { inbox, .. } => {
                let reg = Registers::target(&instr.arg1, at)?;
                match inbox.try_pop() {
                    Ok(Some(value)) => {
                        self.registers.set(reg, value);
                        Ok(StepResult::Continued)
                    }
                    Ok(None) => Ok(StepResult::Blocked),
                    Err(_) => {
                        debug!(pc = at, "inbox drained and peer gone");
                        Ok(StepResult::Halted)
                    }
                }
            }
        }
    }
}
