//! BEGIN/END block structure of a templated file.
//!
//! A file is parsed into a chain of nodes. Each node holds a run of plain
//! lines optionally followed by one block; the block's body is itself a
//! chain, rendered once per value of the block's placeholder.
//!
//! ```text
//! header                    node 0: [header]      block A -> node 1
//! {{@A # BEGIN@}}             node 1: [row {{@A@}}]
//! row {{@A@}}               node 2: [footer]      (node 0 -> node 2)
//! {{@A # END@}}
//! footer
//! ```
//!
//! Nodes live in an arena and refer to each other by index. The parent
//! index points at the node owning the enclosing block; it is only needed
//! to match END markers while parsing.

use crate::constants::MAX_BLOCK_NESTING;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::placeholder::grammar::{parse_marker, MarkerKind};
use crate::placeholder::Definitions;

use super::context::Context;
use super::substitute::substitute;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    placeholder: String,
    body: NodeId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    lines: Vec<String>,
    block: Option<Block>,
    next: Option<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockTree {
    nodes: Vec<Node>,
}

impl BlockTree {
    /// Parses the lines of one file.
    ///
    /// Marker lines carrying other text are reported as warnings; the extra
    /// text is dropped. Unbalanced markers are errors and no tree is
    /// produced.
    pub fn parse<'l, I>(lines: I, diagnostics: &Diagnostics) -> Result<Self>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut tree = BlockTree { nodes: vec![Node::default()] };
        let mut cursor = ROOT;
        let mut depth = 0;

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            let marker = parse_marker(line);

            if let Some(marker) = marker.as_ref().filter(|marker| marker.extraneous) {
                diagnostics.warn(format!(
                    "Line {line_number} holds more than the {:?} of placeholder \"{}\", everything else is ignored: {line}",
                    marker.kind, marker.name
                ));
            }

            match marker {
                Some(marker) if marker.kind == MarkerKind::End => {
                    cursor = tree.close(cursor, marker.name, line_number)?;
                    depth -= 1;
                }
                marker => {
                    if tree.nodes[cursor].block.is_some() {
                        cursor = tree.push_sibling(cursor);
                    }
                    match marker {
                        Some(marker) => {
                            depth += 1;
                            if depth > MAX_BLOCK_NESTING {
                                return Err(Error::NestingTooDeep {
                                    name: marker.name.to_string(),
                                    line: line_number,
                                    limit: MAX_BLOCK_NESTING,
                                });
                            }
                            cursor = tree.open(cursor, marker.name);
                        }
                        None => tree.nodes[cursor].lines.push(line.to_string()),
                    }
                }
            }
        }

        match tree.owner_placeholder(cursor) {
            Some(name) => Err(Error::UnterminatedBlock { name: name.to_string() }),
            None => Ok(tree),
        }
    }

    fn open(&mut self, cursor: NodeId, placeholder: &str) -> NodeId {
        let body = self.push(Node { parent: Some(cursor), ..Node::default() });
        self.nodes[cursor].block = Some(Block { placeholder: placeholder.to_string(), body });
        body
    }

    fn close(&self, cursor: NodeId, placeholder: &str, line: usize) -> Result<NodeId> {
        let unmatched = || Error::UnmatchedEnd { name: placeholder.to_string(), line };
        let owner = self.nodes[cursor].parent.ok_or_else(unmatched)?;
        match &self.nodes[owner].block {
            Some(block) if block.placeholder == placeholder => Ok(owner),
            Some(block) => Err(Error::MismatchedEnd {
                expected: block.placeholder.clone(),
                found: placeholder.to_string(),
                line,
            }),
            None => Err(unmatched()),
        }
    }

    fn push_sibling(&mut self, cursor: NodeId) -> NodeId {
        let sibling =
            self.push(Node { parent: self.nodes[cursor].parent, ..Node::default() });
        self.nodes[cursor].next = Some(sibling);
        sibling
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn owner_placeholder(&self, node: NodeId) -> Option<&str> {
        let owner = self.nodes[node].parent?;
        self.nodes[owner].block.as_ref().map(|block| block.placeholder.as_str())
    }

    /// Placeholders governing a block, in document order.
    pub fn block_placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_placeholders(ROOT, &mut names);
        names
    }

    fn collect_placeholders<'t>(&'t self, start: NodeId, names: &mut Vec<&'t str>) {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = &self.nodes[id];
            if let Some(block) = &node.block {
                names.push(block.placeholder.as_str());
                self.collect_placeholders(block.body, names);
            }
            current = node.next;
        }
    }

    /// Renders the whole tree, every output line terminated by `\n`.
    pub fn render(
        &self,
        definitions: &Definitions,
        context: &Context,
        diagnostics: &Diagnostics,
    ) -> String {
        let mut output = String::new();
        self.render_chain(ROOT, definitions, context, diagnostics, &mut output);
        output
    }

    fn render_chain(
        &self,
        start: NodeId,
        definitions: &Definitions,
        context: &Context,
        diagnostics: &Diagnostics,
        output: &mut String,
    ) {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = &self.nodes[id];
            for line in &node.lines {
                output.push_str(&substitute(line, definitions, context, diagnostics));
                output.push('\n');
            }
            if let Some(block) = &node.block {
                self.render_block(block, definitions, context, diagnostics, output);
            }
            current = node.next;
        }
    }

    fn render_block(
        &self,
        block: &Block,
        definitions: &Definitions,
        context: &Context,
        diagnostics: &Diagnostics,
        output: &mut String,
    ) {
        let Some(definition) = definitions.get(&block.placeholder) else {
            diagnostics.error(Error::UndeclaredBlockPlaceholder {
                name: block.placeholder.clone(),
            });
            return;
        };
        if let Some(err) = definition.unclassified_error() {
            diagnostics.error(err);
            return;
        }

        for value in definition.space().values() {
            let scoped = context.with(&block.placeholder, value);
            self.render_chain(block.body, definitions, &scoped, diagnostics, output);
        }
    }
}
