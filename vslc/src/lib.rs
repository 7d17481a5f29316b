// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod compiler;

use compiler::{CompileError, CompilerOptions, CompilerPipeline};

/// Compiles the tree stored at `file_name` with default options and
/// returns the assembly text.
pub fn compile_file(file_name: &str) -> Result<String, CompileError> {
    let mut comp = CompilerPipeline::new(CompilerOptions::default());
    Ok(comp.compile_file(file_name)?.assembly)
}
