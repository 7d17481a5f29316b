// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use vslc_ast::{Node, NodeData, NodeKind};
use vslc_ctx::CompilerCtx;
use vslc_symbol::{Symbol, PARAM_BASE_OFFSET, STORAGE_UNIT};

use crate::errors::{BindError, BindResult};

/// Attaches a symbol to every name in the tree and moves string literals
/// into the string pool.
///
/// Scopes open at the function list, at each function and at each block,
/// so the lexical depth of a symbol is 0 for functions, 1 for parameters
/// and 2 or more for locals.
pub struct NameBinder<'ctx> {
    ctx: &'ctx mut CompilerCtx,
}

impl<'ctx> NameBinder<'ctx> {
    pub fn new(ctx: &'ctx mut CompilerCtx) -> Self {
        Self { ctx }
    }

    pub fn bind(&mut self, node: &mut Node) -> BindResult<()> {
        match node.kind {
            NodeKind::FunctionList => self.bind_function_list(node),
            NodeKind::Function => self.bind_function(node),
            NodeKind::Block => self.bind_block(node),
            NodeKind::Variable => self.bind_reference(node),
            NodeKind::Text => self.intern_text(node),
            _ => self.bind_children(node),
        }
    }

    fn bind_children(&mut self, node: &mut Node) -> BindResult<()> {
        for child in node.children.iter_mut().flatten() {
            self.bind(child)?;
        }
        Ok(())
    }

    /// Runs `bind` inside a fresh scope. The scope is closed even when
    /// binding fails so the table stays balanced.
    fn scoped(
        &mut self,
        node: &mut Node,
        bind: impl FnOnce(&mut Self, &mut Node) -> BindResult<()>,
    ) -> BindResult<()> {
        self.ctx.symbols.scope_enter();
        let result = bind(self, node);
        self.ctx.symbols.scope_exit();
        result
    }

    fn bind_function_list(&mut self, node: &mut Node) -> BindResult<()> {
        self.scoped(node, |binder, list| {
            // every function is visible to every body, including earlier ones
            for func in list.children.iter_mut().flatten() {
                let name = function_name(func)?;
                let id = binder.ctx.symbols.insert(&name, Symbol::function(&name));
                if let Some(name_node) = func.child_mut(0) {
                    name_node.binding = Some(id);
                }
            }
            binder.bind_children(list)
        })
    }

    fn bind_function(&mut self, node: &mut Node) -> BindResult<()> {
        if node.arity() != 3 {
            return Err(BindError::MalformedNode {
                kind: node.kind,
                reason: "expected name, parameters and body",
            });
        }

        self.scoped(node, |binder, func| {
            let mut params = vec![];
            if let Some(list) = func.children[1].as_mut() {
                collect_variables(list, &mut params);
            }

            // the last argument is pushed last and sits right above the
            // return address
            let count = params.len() as i32;
            for (n, param) in params.into_iter().enumerate() {
                let name = ident(param)?;
                let offset = PARAM_BASE_OFFSET + STORAGE_UNIT * (count - n as i32);
                let id = binder.ctx.symbols.insert(&name, Symbol::parameter(&name, offset));
                param.binding = Some(id);
            }
            tracing::debug!(
                function = func.child(0).and_then(|n| n.data.as_ident()),
                params = count,
                "bound function parameters"
            );

            match func.children[2].as_mut() {
                Some(body) => binder.bind(body),
                None => Err(BindError::MalformedNode {
                    kind: NodeKind::Function,
                    reason: "missing body",
                }),
            }
        })
    }

    fn bind_block(&mut self, node: &mut Node) -> BindResult<()> {
        self.scoped(node, |binder, block| {
            let mut locals = vec![];
            if let Some(decls) = block.children.first_mut().and_then(Option::as_mut) {
                collect_variables(decls, &mut locals);
            }

            for (n, local) in locals.into_iter().enumerate() {
                let name = ident(local)?;
                let offset = -STORAGE_UNIT * (n as i32 + 1);
                let id = binder.ctx.symbols.insert(&name, Symbol::local(&name, offset));
                local.binding = Some(id);
            }

            for stmt in block.children.iter_mut().skip(1).flatten() {
                binder.bind(stmt)?;
            }
            Ok(())
        })
    }

    fn bind_reference(&mut self, node: &mut Node) -> BindResult<()> {
        let name = ident(node)?;
        match self.ctx.symbols.lookup(&name) {
            Some(id) => {
                node.binding = Some(id);
                Ok(())
            }
            None => Err(BindError::UndeclaredVariable(name)),
        }
    }

    fn intern_text(&mut self, node: &mut Node) -> BindResult<()> {
        match std::mem::take(&mut node.data) {
            NodeData::Text(literal) => {
                let idx = self.ctx.strings.insert(literal);
                node.data = NodeData::StrIdx(idx);
                Ok(())
            }
            // already interned by an earlier run
            data @ NodeData::StrIdx(_) => {
                node.data = data;
                Ok(())
            }
            data => {
                node.data = data;
                Err(BindError::MalformedNode {
                    kind: NodeKind::Text,
                    reason: "literal has no text",
                })
            }
        }
    }
}

/// Binds `root` against the symbols and strings of `ctx`.
pub fn bind_names(ctx: &mut CompilerCtx, root: &mut Node) -> BindResult<()> {
    NameBinder::new(ctx).bind(root)
}

fn ident(node: &Node) -> BindResult<String> {
    match node.data.as_ident() {
        Some(name) if node.kind == NodeKind::Variable => Ok(name.to_string()),
        _ => Err(BindError::MalformedNode {
            kind: node.kind,
            reason: "expected an identifier",
        }),
    }
}

fn function_name(func: &Node) -> BindResult<String> {
    if func.kind != NodeKind::Function {
        return Err(BindError::MalformedNode {
            kind: NodeKind::FunctionList,
            reason: "element is not a function",
        });
    }
    match func.child(0) {
        Some(name) => ident(name),
        None => Err(BindError::MalformedNode {
            kind: NodeKind::Function,
            reason: "missing name",
        }),
    }
}

/// Variables declared under `node`, in source order.
fn collect_variables<'n>(node: &'n mut Node, out: &mut Vec<&'n mut Node>) {
    if node.kind == NodeKind::Variable {
        out.push(node);
        return;
    }
    for child in node.children.iter_mut().flatten() {
        collect_variables(child, out);
    }
}
