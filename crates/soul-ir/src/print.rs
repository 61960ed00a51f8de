//! Deterministic textual dump of a `Module`, mirroring `soul_ast::stringify`'s
//! hand-rolled-not-derived approach to a fixed, testable text format.

use std::fmt::Write as _;

use soul_ast::Value;

use crate::ir::{BasicBlock, Function, Instruction, InstructionKind, Module};

pub fn ir_to_text(module: &Module) -> String {
    let mut out = String::new();
    for (i, function) in module.functions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_function(&mut out, function);
    }
    out
}

fn write_function(out: &mut String, function: &Function) {
    let params = function
        .parameter_types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "fn @{}({}) :: {} {{", function.name, params, function.return_type);
    for block in &function.basic_blocks {
        write_block(out, block);
    }
    out.push_str("}\n");
}

fn write_block(out: &mut String, block: &BasicBlock) {
    let _ = writeln!(out, "#{}:", block.label);
    for instr in &block.instructions {
        let _ = writeln!(out, "  {}", instruction_line(instr));
    }
    let successors = block
        .successors
        .iter()
        .map(|b| format!("#{}", b.0))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  ; successors: [{successors}]");
}

fn instruction_line(instr: &Instruction) -> String {
    let (name, operands) = instruction_operands(&instr.kind);
    format!("%{} = {}({}) :: {}", instr.version, name, operands, instr.ty)
}

fn value_literal(value: &Value) -> String {
    match value {
        Value::Unknown => "__unknown__".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::I64(i) => i.to_string(),
        Value::F64(f) => f.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Char(c) => format!("'{c}'"),
    }
}

fn instruction_operands(kind: &InstructionKind) -> (&'static str, String) {
    match kind {
        InstructionKind::Unreachable => ("Unreachable", String::new()),
        InstructionKind::Noop => ("Noop", String::new()),
        InstructionKind::Const(v) => ("Const", value_literal(v)),
        InstructionKind::Cast(a) => ("Cast", format!("%{}", a.0)),
        InstructionKind::Jump(b) => ("Jump", format!("#{}", b.0)),
        InstructionKind::JumpIf { cond, then_block, else_block } => (
            "JumpIf",
            format!("%{}, #{}, #{}", cond.0, then_block.0, else_block.0),
        ),
        InstructionKind::Not(a) => ("Not", format!("%{}", a.0)),
        InstructionKind::Add(a, b) => ("Add", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Sub(a, b) => ("Sub", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Mul(a, b) => ("Mul", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Div(a, b) => ("Div", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Mod(a, b) => ("Mod", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Equal(a, b) => ("Equal", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::NotEqual(a, b) => ("NotEqual", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Greater(a, b) => ("Greater", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::GreaterEqual(a, b) => ("GreaterEqual", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Less(a, b) => ("Less", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::LessEqual(a, b) => ("LessEqual", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::And(a, b) => ("And", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Or(a, b) => ("Or", format!("%{}, %{}", a.0, b.0)),
        InstructionKind::Phi(identifier) => ("Phi", identifier.clone()),
        InstructionKind::Upsilon { identifier, value, .. } => {
            ("Upsilon", format!("{identifier}, %{}", value.0))
        }
        InstructionKind::Argument(index) => ("Argument", index.to_string()),
        InstructionKind::Return(value) => (
            "Return",
            value.map(|v| format!("%{}", v.0)).unwrap_or_default(),
        ),
        InstructionKind::Call { name, args } => {
            let mut operands = name.clone();
            for arg in args {
                operands.push_str(", %");
                operands.push_str(&arg.0.to_string());
            }
            ("Call", operands)
        }
    }
}
