//! Symbol Tree Builder — tokens to a hierarchical symbol arena.
//!
//! A single pass over the token stream keeps a stack of open frames:
//!
//! ```text
//! Root ─ Block(IF) ─ Call(SUM) ─ Group
//!             │
//!             └─ active branch (THEN/ELSEIF/ELSE/WHEN)
//! ```
//!
//! New constructs attach to the *attachment point* of the stack: the active
//! branch of the innermost block, the innermost call or LOD expression, or
//! the root. Parenthesized groups are transparent.
//!
//! Nothing here fails. Unterminated constructs simply stay open, stray
//! closers become `syntax-error` diagnostics, and an END without an open
//! block is attached as a plain keyword for the validator to report.

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{
    Diagnostic, DiagnosticCategory, DocumentSnapshot, LineIndex, Span, TextRange, TextSize,
};
use crate::parser::keywords::keyword_text;
use crate::parser::{SyntaxKind, Token, tokenize};

use super::symbol::{ArgumentSymbol, Symbol, SymbolId, SymbolKind, SymbolTree};

/// Name of the LOD expression written with bare braces, `{ MAX([Date]) }`.
pub const TABLE_SCOPED_LOD: &str = "TABLE";

/// Build the symbol tree for a document snapshot.
pub fn build(snapshot: &DocumentSnapshot) -> (SymbolTree, Vec<Diagnostic>) {
    build_text(&snapshot.text)
}

/// Build the symbol tree for raw calculation text.
pub fn build_text(text: &str) -> (SymbolTree, Vec<Diagnostic>) {
    Builder::new(text).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Root,
    Block,
    Call,
    Lod,
    Group,
}

/// Condition text still being collected for an IF, ELSEIF or CASE.
#[derive(Debug, Clone, Copy)]
struct PendingCondition {
    owner: SymbolId,
    start: TextSize,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    symbol: SymbolId,
    active_branch: Option<SymbolId>,
    condition: Option<PendingCondition>,
    /// Index of the opening `(` or `{` token.
    open_token: usize,
    /// First token of the call argument being collected.
    arg_start: usize,
}

impl Frame {
    fn new(kind: FrameKind, symbol: SymbolId, open_token: usize) -> Self {
        Self {
            kind,
            symbol,
            active_branch: None,
            condition: None,
            open_token,
            arg_start: open_token + 1,
        }
    }
}

/// A run of plain tokens waiting to become one FreeText symbol.
#[derive(Debug, Clone, Copy)]
struct FreeTextRun {
    parent: SymbolId,
    range: TextRange,
}

struct Builder<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    comments: Vec<TextRange>,
    next_comment: usize,
    pos: usize,
    line_index: LineIndex<'a>,
    tree: SymbolTree,
    frames: Vec<Frame>,
    free_text: Option<FreeTextRun>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Builder<'a> {
    fn new(text: &'a str) -> Self {
        let scanned = tokenize(text);
        let tree = SymbolTree::new();
        let root = Frame::new(FrameKind::Root, tree.root(), 0);
        Self {
            text,
            tokens: scanned.tokens,
            comments: scanned.comments,
            next_comment: 0,
            pos: 0,
            line_index: LineIndex::new(text),
            tree,
            frames: vec![root],
            free_text: None,
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> (SymbolTree, Vec<Diagnostic>) {
        while let Some(token) = self.tokens.get(self.pos).copied() {
            self.flush_comments_before(token.offset());
            match token.kind {
                SyntaxKind::EOF => break,
                SyntaxKind::IF_KW | SyntaxKind::CASE_KW => self.open_block(token),
                SyntaxKind::THEN_KW
                | SyntaxKind::ELSEIF_KW
                | SyntaxKind::ELSE_KW
                | SyntaxKind::WHEN_KW => self.branch(token),
                SyntaxKind::END_KW => self.end(token),
                SyntaxKind::IDENT => self.identifier(token),
                SyntaxKind::FIELD_REF => self.field(token),
                SyntaxKind::L_PAREN => {
                    self.plain(token);
                    let parent = self.attach_point();
                    self.frames
                        .push(Frame::new(FrameKind::Group, parent, self.pos));
                }
                SyntaxKind::R_PAREN => self.close_paren(token),
                SyntaxKind::L_BRACE => self.open_lod(token),
                SyntaxKind::R_BRACE => self.close_lod(token),
                SyntaxKind::COMMA => self.comma(token),
                SyntaxKind::UNEXPECTED => self.unexpected(token),
                _ => self.plain(token),
            }
            self.pos += 1;
        }
        self.finish()
    }

    // =====================================================================
    // STACK
    // =====================================================================

    /// Where the next construct is attached.
    fn attach_point(&self) -> SymbolId {
        for frame in self.frames.iter().rev() {
            match frame.kind {
                FrameKind::Group => continue,
                FrameKind::Block => return frame.active_branch.unwrap_or(frame.symbol),
                _ => return frame.symbol,
            }
        }
        self.tree.root()
    }

    /// Plain tokens inside a call's parentheses belong to its arguments.
    fn in_call_arguments(&self) -> bool {
        self.frames
            .iter()
            .rev()
            .find(|f| f.kind != FrameKind::Group)
            .is_some_and(|f| f.kind == FrameKind::Call)
    }

    fn nearest(&self, kinds: &[FrameKind]) -> Option<usize> {
        self.frames.iter().rposition(|f| kinds.contains(&f.kind))
    }

    /// Close every frame above `index` as unterminated, ending them before
    /// the current token.
    fn close_frames_above(&mut self, index: usize) {
        while self.frames.len() > index + 1 {
            if let Some(frame) = self.frames.pop() {
                let until = self.pos;
                self.finish_frame(frame, until, false);
            }
        }
    }

    /// Finalize a frame whose tokens end at `until` (exclusive). `closed`
    /// means the token at `until - 1` is its own closing delimiter.
    fn finish_frame(&mut self, frame: Frame, until: usize, closed: bool) {
        let end = self.end_before(until);
        match frame.kind {
            FrameKind::Call => {
                let inner_end = if closed { until - 1 } else { until };
                let last = self.argument_between(frame.arg_start, inner_end);
                if let Some(call) = self.tree.get_mut(frame.symbol) {
                    call.range = TextRange::new(call.range.start(), end.max(call.range.start()));
                    // `F()` has no arguments; `F(1,)` ends with an empty one.
                    if !call.arguments.is_empty() || frame.arg_start < inner_end {
                        call.arguments.push(last);
                    }
                }
                self.refresh_span(frame.symbol);
            }
            FrameKind::Lod => {
                if let Some(lod) = self.tree.get_mut(frame.symbol) {
                    lod.range = TextRange::new(lod.range.start(), end.max(lod.range.start()));
                }
                self.refresh_span(frame.symbol);
            }
            FrameKind::Block => {
                let upto = self
                    .tokens
                    .get(until)
                    .map(|t| t.offset())
                    .unwrap_or_else(|| TextSize::of(self.text));
                self.finish_condition(frame.condition, upto);
                trace!(block = %self.tree[frame.symbol].name, "block left open");
            }
            FrameKind::Group | FrameKind::Root => {}
        }
    }

    /// End offset of the last token before index `until`.
    fn end_before(&self, until: usize) -> TextSize {
        until
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.range.end())
            .unwrap_or_default()
    }

    // =====================================================================
    // SYMBOLS
    // =====================================================================

    fn span(&self, range: TextRange) -> Span {
        self.line_index.span(range)
    }

    fn refresh_span(&mut self, id: SymbolId) {
        if let Some(range) = self.tree.get(id).map(|s| s.range) {
            let span = self.span(range);
            if let Some(symbol) = self.tree.get_mut(id) {
                symbol.span = span;
            }
        }
    }

    fn add_symbol(
        &mut self,
        kind: SymbolKind,
        name: impl Into<SmolStr>,
        range: TextRange,
        parent: SymbolId,
    ) -> SymbolId {
        let symbol = Symbol::new(kind, name, range, self.span(range));
        self.tree.alloc(symbol, parent)
    }

    fn slice(&self, range: TextRange) -> &'a str {
        &self.text[range]
    }

    fn keyword_name(token: Token<'_>) -> SmolStr {
        keyword_text(token.kind)
            .map(SmolStr::new_static)
            .unwrap_or_else(|| SmolStr::new(token.text.to_ascii_uppercase()))
    }

    fn finish_condition(&mut self, pending: Option<PendingCondition>, upto: TextSize) {
        let Some(pending) = pending else { return };
        let upto = upto.max(pending.start);
        let condition = self.slice(TextRange::new(pending.start, upto)).trim();
        if let Some(owner) = self.tree.get_mut(pending.owner) {
            owner.detail = Some(SmolStr::new(condition));
        }
    }

    // =====================================================================
    // TRIVIA AND PLAIN TEXT
    // =====================================================================

    fn flush_comments_before(&mut self, offset: TextSize) {
        while let Some(&range) = self.comments.get(self.next_comment) {
            if range.start() >= offset {
                break;
            }
            self.next_comment += 1;
            self.flush_free_text();
            let parent = self.attach_point();
            let id = self.add_symbol(SymbolKind::Comment, "COMMENT", range, parent);
            let text = SmolStr::new(self.slice(range));
            if let Some(comment) = self.tree.get_mut(id) {
                comment.detail = Some(text);
            }
        }
    }

    fn plain(&mut self, token: Token<'_>) {
        if self.in_call_arguments() {
            return;
        }
        let parent = self.attach_point();
        match &mut self.free_text {
            Some(run) if run.parent == parent => {
                run.range = run.range.cover(token.range);
            }
            _ => {
                self.flush_free_text();
                self.free_text = Some(FreeTextRun {
                    parent,
                    range: token.range,
                });
            }
        }
    }

    fn flush_free_text(&mut self) {
        let Some(run) = self.free_text.take() else { return };
        let raw = self.slice(run.range);
        let id = self.add_symbol(
            SymbolKind::FreeText,
            raw.to_uppercase(),
            run.range,
            run.parent,
        );
        if let Some(symbol) = self.tree.get_mut(id) {
            symbol.detail = Some(SmolStr::new(raw));
        }
    }

    fn unexpected(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let message = if token.text.starts_with("/*") {
            "Unterminated block comment".to_string()
        } else if token.text.starts_with('"') || token.text.starts_with('\'') {
            "Unterminated string literal".to_string()
        } else if token.text.starts_with('[') {
            format!("Unterminated field reference '{}'", token.text)
        } else {
            format!("Unexpected character '{}'", token.text)
        };
        self.syntax_error(token.range, message);
    }

    fn syntax_error(&mut self, range: TextRange, message: String) {
        let span = self.span(range);
        self.diagnostics.push(Diagnostic::error(
            DiagnosticCategory::SyntaxError,
            range,
            span,
            message,
        ));
    }

    // =====================================================================
    // BLOCKS
    // =====================================================================

    fn open_block(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let parent = self.attach_point();
        let id = self.add_symbol(
            SymbolKind::Keyword,
            Self::keyword_name(token),
            token.range,
            parent,
        );
        let mut frame = Frame::new(FrameKind::Block, id, self.pos);
        frame.condition = Some(PendingCondition {
            owner: id,
            start: token.range.end(),
        });
        self.frames.push(frame);
        trace!(block = %self.tree[id].name, depth = self.frames.len(), "opened block");
    }

    fn branch(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let name = Self::keyword_name(token);

        let Some(index) = self.nearest(&[FrameKind::Block]) else {
            // Branch keyword with no block around it.
            let parent = self.attach_point();
            self.add_symbol(SymbolKind::Keyword, name, token.range, parent);
            return;
        };

        self.close_frames_above(index);
        let pending = self.frames[index].condition.take();
        self.finish_condition(pending, token.offset());

        let block = self.frames[index].symbol;
        let id = self.add_symbol(SymbolKind::Keyword, name, token.range, block);
        let frame = &mut self.frames[index];
        frame.active_branch = Some(id);
        if token.kind == SyntaxKind::ELSEIF_KW {
            frame.condition = Some(PendingCondition {
                owner: id,
                start: token.range.end(),
            });
        }
    }

    fn end(&mut self, token: Token<'_>) {
        self.flush_free_text();

        let Some(index) = self.nearest(&[FrameKind::Block]) else {
            // Unmatched END; the validator reports it.
            let parent = self.attach_point();
            self.add_symbol(SymbolKind::Keyword, "END", token.range, parent);
            return;
        };

        self.close_frames_above(index);
        let Some(frame) = self.frames.pop() else { return };
        self.finish_condition(frame.condition, token.offset());

        let parent = self.tree[frame.symbol]
            .parent
            .unwrap_or_else(|| self.tree.root());
        let end = self.add_symbol(SymbolKind::Keyword, "END", token.range, parent);
        if let Some(block) = self.tree.get_mut(frame.symbol) {
            block.end = Some(end);
        }
        trace!(block = %self.tree[frame.symbol].name, "closed block");
    }

    // =====================================================================
    // CALLS, GROUPS, LOD EXPRESSIONS
    // =====================================================================

    fn identifier(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let parent = self.attach_point();
        let name = SmolStr::new(token.text.to_ascii_uppercase());

        let next = self.tokens.get(self.pos + 1).copied();
        match next {
            Some(paren) if paren.kind == SyntaxKind::L_PAREN => {
                let range = token.range.cover(paren.range);
                let id = self.add_symbol(SymbolKind::FunctionCall, name, range, parent);
                self.pos += 1;
                self.frames.push(Frame::new(FrameKind::Call, id, self.pos));
            }
            _ => {
                self.add_symbol(SymbolKind::Variable, name, token.range, parent);
            }
        }
    }

    fn close_paren(&mut self, token: Token<'_>) {
        let Some(index) = self.nearest(&[FrameKind::Call, FrameKind::Group]) else {
            self.flush_free_text();
            self.syntax_error(token.range, "Unmatched ')'".to_string());
            return;
        };

        self.close_frames_above(index);
        let Some(frame) = self.frames.pop() else { return };
        match frame.kind {
            FrameKind::Call => {
                self.flush_free_text();
                self.finish_frame(frame, self.pos + 1, true);
            }
            _ => self.plain(token),
        }
    }

    fn open_lod(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let parent = self.attach_point();
        let open = self.pos;

        let keyword = self.tokens.get(self.pos + 1).copied().filter(|t| t.kind.is_lod());
        let name = keyword
            .map(Self::keyword_name)
            .unwrap_or_else(|| SmolStr::new_static(TABLE_SCOPED_LOD));
        let id = self.add_symbol(SymbolKind::LodExpression, name, token.range, parent);
        self.frames.push(Frame::new(FrameKind::Lod, id, open));

        let Some(keyword) = keyword else { return };
        self.pos += 1;

        // The dimension list is kept as raw text, up to the `:` separator.
        let header_start = keyword.range.end();
        while let Some(next) = self.tokens.get(self.pos + 1).copied() {
            match next.kind {
                SyntaxKind::COLON => {
                    self.pos += 1;
                    let header = self.slice(TextRange::new(header_start, next.offset())).trim();
                    if let Some(lod) = self.tree.get_mut(id) {
                        lod.detail = Some(SmolStr::new(header));
                    }
                    return;
                }
                SyntaxKind::R_BRACE | SyntaxKind::EOF => break,
                _ => self.pos += 1,
            }
        }
        let header_end = self.end_before(self.pos + 1).max(header_start);
        let header = self.slice(TextRange::new(header_start, header_end)).trim();
        if let Some(lod) = self.tree.get_mut(id) {
            lod.detail = Some(SmolStr::new(header));
        }
    }

    fn close_lod(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let Some(index) = self.nearest(&[FrameKind::Lod]) else {
            self.syntax_error(token.range, "Unmatched '}'".to_string());
            return;
        };

        self.close_frames_above(index);
        if let Some(frame) = self.frames.pop() {
            self.finish_frame(frame, self.pos + 1, true);
        }
    }

    /// A comma directly inside a call's parentheses ends one argument.
    ///
    /// Strings and field references are single tokens, so commas inside
    /// them never get here. Commas inside a nested group or LOD expression
    /// belong to that construct.
    fn comma(&mut self, token: Token<'_>) {
        let owner = self
            .frames
            .iter()
            .rposition(|f| f.kind != FrameKind::Block)
            .filter(|&i| self.frames[i].kind == FrameKind::Call);
        if let Some(index) = owner {
            let frame = self.frames[index];
            let argument = self.argument_between(frame.arg_start, self.pos);
            if let Some(call) = self.tree.get_mut(frame.symbol) {
                call.arguments.push(argument);
            }
            self.frames[index].arg_start = self.pos + 1;
        }
        self.plain(token);
    }

    /// The argument made of tokens `start..stop`, empty when that run is.
    fn argument_between(&self, start: usize, stop: usize) -> ArgumentSymbol {
        let boundary = self.end_before(start);
        let range = if start < stop {
            match (self.tokens.get(start), self.tokens.get(stop - 1)) {
                (Some(first), Some(last)) => Some(first.range.cover(last.range)),
                _ => None,
            }
        } else {
            None
        };
        self.argument(range, boundary)
    }

    fn argument(&self, range: Option<TextRange>, boundary: TextSize) -> ArgumentSymbol {
        let range = range.unwrap_or_else(|| TextRange::empty(boundary));
        ArgumentSymbol {
            text: SmolStr::new(self.slice(range).trim()),
            range,
        }
    }

    // =====================================================================
    // FIELDS
    // =====================================================================

    fn field(&mut self, token: Token<'_>) {
        self.flush_free_text();
        let next = self.tokens.get(self.pos + 1).copied();
        let after = self.tokens.get(self.pos + 2).copied();

        // `[Name]:` opening a line at root level names the calculation.
        let starts_line = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_none_or(|prev| prev.line < token.line);
        if self.frames.len() == 1
            && starts_line
            && next.is_some_and(|t| t.kind == SyntaxKind::COLON)
        {
            let colon = next.map(|t| t.range).unwrap_or(token.range);
            let root = self.tree.root();
            self.add_symbol(
                SymbolKind::CalculationName,
                field_name(token.text),
                token.range.cover(colon),
                root,
            );
            self.pos += 1;
            return;
        }

        let parent = self.attach_point();
        let qualified = match (next, after) {
            (Some(dot), Some(second))
                if dot.kind == SyntaxKind::DOT && second.kind == SyntaxKind::FIELD_REF =>
            {
                Some(second)
            }
            _ => None,
        };
        if let Some(second) = qualified {
            let range = token.range.cover(second.range);
            if field_name(token.text) == "PARAMETERS" {
                self.add_symbol(
                    SymbolKind::ParameterReference,
                    field_name(second.text),
                    range,
                    parent,
                );
            } else {
                let qualifier = field_name(token.text);
                let name = format!("{}.{}", qualifier, field_name(second.text));
                let id = self.add_symbol(SymbolKind::FieldReference, name, range, parent);
                if let Some(field) = self.tree.get_mut(id) {
                    field.detail = Some(qualifier);
                }
            }
            self.pos += 2;
            return;
        }

        self.add_symbol(
            SymbolKind::FieldReference,
            field_name(token.text),
            token.range,
            parent,
        );
    }

    // =====================================================================
    // END OF INPUT
    // =====================================================================

    fn finish(mut self) -> (SymbolTree, Vec<Diagnostic>) {
        self.flush_comments_before(TextSize::of(self.text) + TextSize::from(1));
        self.flush_free_text();
        self.pos = self.tokens.len().saturating_sub(1);
        self.close_frames_above(0);
        (self.tree, self.diagnostics)
    }
}

/// Canonical name of a `[bracketed]` field token.
fn field_name(token_text: &str) -> SmolStr {
    let inner = token_text
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(token_text);
    SmolStr::new(inner.trim().to_uppercase())
}
