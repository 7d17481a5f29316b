// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fs;

use thiserror::Error;
use vslc_ast::dump::dump_tree;
use vslc_ast::reader::{read_tree, ReadError};
use vslc_codegen::errors::CodegenError;
use vslc_codegen::X86Generator;
use vslc_ctx::{CompilerCtx, CompilerCtxBuilder};
use vslc_sema::errors::BindError;
use vslc_sema::NameBinder;
use vslc_simplify::TreeSimplifier;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tree: {0}")]
    Read(#[from] ReadError),

    #[error("name binding failed: {0}")]
    Bind(#[from] BindError),

    #[error("code generation failed: {0}")]
    Codegen(#[from] CodegenError),
}

/// Knobs of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub fold_constants: bool,

    /// Keep a dump of the simplified tree.
    pub dump_tree: bool,

    /// Keep a listing of every declared symbol.
    pub dump_symtab: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            fold_constants: true,
            dump_tree: false,
            dump_symtab: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct CompilerOptionsBuilder {
    options: CompilerOptions,
}

impl CompilerOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold_constants(mut self, fold: bool) -> Self {
        self.options.fold_constants = fold;
        self
    }

    pub fn dump_tree(mut self, dump: bool) -> Self {
        self.options.dump_tree = dump;
        self
    }

    pub fn dump_symtab(mut self, dump: bool) -> Self {
        self.options.dump_symtab = dump;
        self
    }

    pub fn build(self) -> CompilerOptions {
        self.options
    }
}

/// What a compilation produced.
#[derive(Debug, Clone, Default)]
pub struct CompilationOutput {
    pub assembly: String,

    pub tree_dump: Option<String>,

    pub symtab_dump: Option<String>,
}

/// Runs simplification, name binding and code generation over one tree.
#[derive(Debug)]
pub struct CompilerPipeline {
    /// Symbols and strings of the most recent compilation.
    pub ctx: CompilerCtx,
    options: CompilerOptions,
}

impl CompilerPipeline {
    pub fn new(options: CompilerOptions) -> Self {
        Self {
            ctx: CompilerCtxBuilder::new().build(),
            options,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn compile_file(&mut self, path: &str) -> Result<CompilationOutput, CompileError> {
        let source = fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.to_string(),
            source,
        })?;
        self.compile_source(&source)
    }

    /// Compiles a tree given in dump format.
    pub fn compile_source(&mut self, source: &str) -> Result<CompilationOutput, CompileError> {
        self.ctx = CompilerCtxBuilder::new().build();

        let root = read_tree(source)?;
        tracing::debug!(nodes = root.count_nodes(), "tree read");

        let mut simplifier = TreeSimplifier::new(self.options.fold_constants);
        let mut root = simplifier.simplify(root);
        let stats = simplifier.stats();
        tracing::debug!(
            flattened = stats.flattened,
            collapsed = stats.collapsed,
            folded = stats.folded,
            nodes = root.count_nodes(),
            "tree simplified"
        );
        let tree_dump = self.options.dump_tree.then(|| dump_tree(&root));

        NameBinder::new(&mut self.ctx).bind(&mut root)?;
        tracing::debug!(
            symbols = self.ctx.symbols.symbols().len(),
            strings = self.ctx.strings.len(),
            "names bound"
        );
        let symtab_dump = self.options.dump_symtab.then(|| self.ctx.symbols.dump());

        let assembly = X86Generator::new(&self.ctx).generate(&root)?.render();
        Ok(CompilationOutput {
            assembly,
            tree_dump,
            symtab_dump,
        })
    }
}
