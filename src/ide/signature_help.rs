//! Signature help for the call enclosing the cursor.

use std::sync::Arc;

use crate::base::TextSize;
use crate::hir::FunctionTable;
use crate::parser::{SyntaxKind, tokenize};

/// Signature of the innermost enclosing call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHelp {
    /// Uppercase function name.
    pub name: Arc<str>,
    /// Full syntax line, e.g. `LEFT(string, number)`.
    pub label: Arc<str>,
    pub documentation: Option<Arc<str>>,
    pub parameters: Vec<Arc<str>>,
    /// Index of the argument under the cursor.
    pub active_parameter: u32,
}

/// An open `(` or `{` seen before the cursor.
struct OpenDelimiter {
    call: Option<String>,
    commas: u32,
}

/// Get signature help at a byte offset.
///
/// Returns `None` outside any call, or when the call is not in the table.
pub fn signature_help(text: &str, offset: TextSize, table: &FunctionTable) -> Option<SignatureHelp> {
    let scanned = tokenize(text);
    let tokens = &scanned.tokens;
    let mut stack: Vec<OpenDelimiter> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.range.end() > offset || token.kind == SyntaxKind::EOF {
            break;
        }
        match token.kind {
            SyntaxKind::L_PAREN => {
                let call = i
                    .checked_sub(1)
                    .map(|j| &tokens[j])
                    .filter(|prev| prev.kind == SyntaxKind::IDENT)
                    .map(|prev| prev.text.to_ascii_uppercase());
                stack.push(OpenDelimiter { call, commas: 0 });
            }
            SyntaxKind::L_BRACE => stack.push(OpenDelimiter {
                call: None,
                commas: 0,
            }),
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACE => {
                stack.pop();
            }
            SyntaxKind::COMMA => {
                if let Some(top) = stack.last_mut() {
                    top.commas += 1;
                }
            }
            _ => {}
        }
    }

    let open = stack.iter().rev().find(|d| d.call.is_some())?;
    let signature = table.get(open.call.as_deref()?)?;

    let parameters: Vec<Arc<str>> = signature.parameters().into_iter().map(Arc::from).collect();
    let active_parameter = match signature.max {
        // variadic tails keep highlighting the last parameter
        None if !parameters.is_empty() => open.commas.min(parameters.len() as u32 - 1),
        _ => open.commas,
    };

    Some(SignatureHelp {
        name: Arc::from(signature.name.as_str()),
        label: Arc::from(signature.syntax.as_str()),
        documentation: (!signature.description.is_empty())
            .then(|| Arc::from(signature.description.as_str())),
        parameters,
        active_parameter,
    })
}
