//! Backtick code spans and blocks.
//!
//! The fence follows the N+1 rule: an opening run of `K` backticks is closed
//! only by a later run of exactly `K`. Runs of any other length are content,
//! which is how code containing backticks is written:
//!
//! ```text
//! ``a ` b``        one inline span containing a single backtick
//! ```x `````y```   a block; the five-backtick run is content
//! ```

use super::Scanned;
use crate::token::TokenKind;
use crate::warning::{IssueKind, Warning};

/// Fences of this length or longer make a block instead of an inline span.
pub const BLOCK_FENCE: usize = 3;

pub fn scan_code<'a>(input: &'a str, at: usize, warnings: &mut Vec<Warning>) -> Scanned<'a> {
    let bytes = input.as_bytes();
    let fence = run_length(bytes, at);
    let after_open = at + fence;

    if after_open == bytes.len() {
        warnings.push(
            Warning::new(
                TokenKind::CodeInline,
                IssueKind::MalformedCodeSequence,
                input,
                at,
                format!("a run of {fence} backtick(s) with no content"),
            )
            .with_suggestion("escape the backticks with `\\``"),
        );
        return Scanned::text(input, at, fence);
    }

    if let Some(close_end) = find_closing_run(bytes, after_open, fence) {
        let kind = kind_for(fence);
        return Scanned::new(kind, input, at, close_end - at);
    }

    let closer = "`".repeat(fence);
    if fence < BLOCK_FENCE {
        warnings.push(
            Warning::new(
                TokenKind::CodeInline,
                IssueKind::UnclosedTag,
                input,
                at,
                format!("no closing run of exactly {fence} backtick(s)"),
            )
            .with_suggestion(format!("close the code span with {closer}")),
        );
        Scanned::text(input, at, fence)
    } else {
        warnings.push(
            Warning::new(
                TokenKind::CodeBlock,
                IssueKind::UnclosedTag,
                input,
                at,
                format!("code block fenced with {fence} backticks is never closed"),
            )
            .with_suggestion(format!("close the code block with {closer}")),
        );
        Scanned::new(TokenKind::CodeBlock, input, at, bytes.len() - at)
    }
}

fn kind_for(fence: usize) -> TokenKind {
    if fence >= BLOCK_FENCE {
        TokenKind::CodeBlock
    } else {
        TokenKind::CodeInline
    }
}

/// Number of consecutive backticks starting at `at`.
pub fn run_length(bytes: &[u8], at: usize) -> usize {
    bytes[at..].iter().take_while(|&&b| b == b'`').count()
}

/// End offset of the first run of exactly `fence` backticks at or after `from`.
fn find_closing_run(bytes: &[u8], from: usize, fence: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run = run_length(bytes, i);
        if run == fence {
            return Some(i + run);
        }
        i += run;
    }
    None
}
