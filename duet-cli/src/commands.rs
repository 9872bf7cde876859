//! CLI command implementations.

use std::fs;
use std::path::Path;

use duet_common::{Opcode, Program, Register};
use duet_vm::{DuetConfig, RuntimeError};

/// Run plain mode and print the recovered value.
pub fn solo(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    match duet_vm::solo(&program).map_err(runtime_error)? {
        Some(value) => println!("{value}"),
        None => println!("no value recovered"),
    }
    Ok(())
}

/// Run two instances and print instance 1's send count.
pub fn duet(path: &Path, capacity: usize, id_register: Register, all: bool) -> Result<(), i32> {
    let program = read_program(path)?;
    let config = DuetConfig::default()
        .with_pipe_capacity(capacity)
        .with_id_register(id_register);

    let report = duet_vm::run_duet(&program, &config).map_err(runtime_error)?;

    if all {
        for inst in &report.instances {
            println!("instance {}: sent {} ({})", inst.id, inst.sent, inst.exit);
        }
    } else {
        println!("{}", report.sent_by_one());
    }
    Ok(())
}

/// Run plain mode and print per-opcode execution counts.
pub fn profile(path: &Path, opcode: Option<Opcode>) -> Result<(), i32> {
    let program = read_program(path)?;
    let profile = duet_vm::profile(&program).map_err(runtime_error)?;

    if let Some(op) = opcode {
        println!("{}", profile.op_counts.get(op));
        return Ok(());
    }

    for (op, count) in profile.op_counts.iter() {
        println!("{op} {count}");
    }
    if let Some(value) = profile.recovered {
        println!("recovered {value}");
    }
    Ok(())
}

/// Load a program and report its instruction count.
pub fn check(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    println!("OK: {} ({} instructions)", path.display(), program.len());
    Ok(())
}

/// Print a program in canonical text form.
pub fn disassemble(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    print!("{}", duet_assembler::disassemble(&program));
    Ok(())
}

fn read_program(path: &Path) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        1
    })?;

    duet_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}

fn runtime_error(e: RuntimeError) -> i32 {
    eprintln!("runtime error: {e}");
    3
}
