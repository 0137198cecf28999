// Copyright 2026 the Intcode Engine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = "Code generator for the `intcode_engine` opcode table.\n\n\
          This is a std-only build tool crate. It is not shipped as part of the core VM.\n"]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
struct Spec {
    version: u32,
    opcodes: Vec<OpcodeSpec>,
}

#[derive(Deserialize, Clone)]
struct OpcodeSpec {
    name: String,
    mnemonic: String,
    code: i64,
    doc: String,
    operands: Vec<String>,
}

fn sort_and_validate_ops(ops: &mut [OpcodeSpec]) -> Result<()> {
    ops.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.name.cmp(&b.name)));

    for op in ops.iter() {
        if !(0..=99).contains(&op.code) {
            bail!(
                "opcode {} has code {} outside the two-decimal-digit range",
                op.name,
                op.code
            );
        }
        if op.operands.len() > 3 {
            bail!("opcode {} declares more than three operands", op.name);
        }
    }

    for w in ops.windows(2) {
        if w[0].code == w[1].code {
            bail!(
                "duplicate opcode code {}: {} and {}",
                w[0].code,
                w[0].name,
                w[1].name
            );
        }
        if w[0].name == w[1].name {
            bail!("duplicate opcode name '{}'", w[0].name);
        }
    }
    Ok(())
}

fn validate_operand_access(ops: &[OpcodeSpec]) -> Result<()> {
    for op in ops {
        for (ix, access) in op.operands.iter().enumerate() {
            match access.as_str() {
                "read" => {}
                // The resolver only ever treats the final operand as a
                // destination, so the table must agree.
                "write" => {
                    if ix != op.operands.len() - 1 {
                        bail!(
                            "opcode {} has a write operand in non-final position {}",
                            op.name,
                            ix
                        );
                    }
                }
                other => bail!("unknown operand access '{}' for opcode {}", other, op.name),
            }
        }
    }
    Ok(())
}

fn access_rust(access: &str) -> &'static str {
    match access {
        "write" => "OperandAccess::Write",
        _ => "OperandAccess::Read",
    }
}

fn generate(spec: Spec) -> Result<String> {
    if spec.version != 1 {
        bail!("unsupported opcodes.json version {}", spec.version);
    }

    let mut ops = spec.opcodes;
    sort_and_validate_ops(&mut ops)?;
    validate_operand_access(&ops)?;

    let mut out = String::new();
    out.push_str("// Copyright 2026 the Intcode Engine Authors\n");
    out.push_str("// SPDX-License-Identifier: Apache-2.0 OR MIT\n\n");
    out.push_str("// @generated by intcode_codegen. Do not edit by hand.\n\n");

    out.push_str("/// Operand access for the opcode table.\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq)]\n");
    out.push_str("pub enum OperandAccess {\n");
    out.push_str("    /// The operand is resolved to a value.\n");
    out.push_str("    Read,\n");
    out.push_str("    /// The operand is resolved to a destination address.\n");
    out.push_str("    Write,\n");
    out.push_str("}\n\n");

    out.push_str("/// Instruction opcodes, keyed by the low two decimal digits of an\n");
    out.push_str("/// instruction word.\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("pub enum Opcode {\n");
    for op in &ops {
        let _ = writeln!(out, "    /// `{}`", op.doc);
        let _ = writeln!(out, "    {} = {},", op.name, op.code);
    }
    out.push_str("}\n\n");

    out.push_str("impl Opcode {\n");

    out.push_str("    /// Parses an opcode from its low-two-digit code value.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub fn from_code(code: i64) -> Option<Self> {\n");
    out.push_str("        match code {\n");
    for op in &ops {
        let _ = writeln!(out, "            {} => Some(Self::{}),", op.code, op.name);
    }
    out.push_str("            _ => None,\n");
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// Returns the instruction mnemonic.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn mnemonic(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for op in &ops {
        let _ = writeln!(out, "            Self::{} => \"{}\",", op.name, op.mnemonic);
    }
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// Returns the per-operand access schema, one entry per operand in\n");
    out.push_str("    /// program order.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn operands(self) -> &'static [OperandAccess] {\n");
    out.push_str("        match self {\n");
    for op in &ops {
        if op.operands.len() >= 3 {
            let _ = writeln!(out, "            Self::{} => &[", op.name);
            for access in &op.operands {
                let _ = writeln!(out, "                {},", access_rust(access));
            }
            out.push_str("            ],\n");
        } else {
            let entries: Vec<&'static str> =
                op.operands.iter().map(|a| access_rust(a)).collect();
            let _ = writeln!(
                out,
                "            Self::{} => &[{}],",
                op.name,
                entries.join(", ")
            );
        }
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    Ok(out)
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map_or_else(|| manifest_dir().join("opcodes.json"), PathBuf::from);
    let output = args.next().map_or_else(
        || manifest_dir().join("../intcode_engine/src/opcodes_gen.rs"),
        PathBuf::from,
    );

    let text = fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let spec: Spec = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", input.display()))?;
    let generated = generate(spec)?;

    write_if_changed(&output, &generated)?;
    Ok(())
}

fn write_if_changed(path: &Path, contents: &str) -> Result<()> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
