//! Splitting long PRIVMSG/NOTICE payloads into wire-sized chunks.
//!
//! The server relays our messages with our full prefix prepended, so the
//! budget for the text part is whatever remains of the 512-byte line once
//! `:prefix COMMAND target :` and the CRLF terminator are accounted for.

/// Maximum length of an IRC line, terminator included (RFC 2812).
pub const MAX_LINE_LEN: usize = 512;

/// Bytes available for text in a `COMMAND target :text` line relayed with
/// `prefix` as its origin.
pub fn line_budget(prefix: &str, command: &str, target: &str) -> usize {
    // ":" prefix " " command " " target " :" text "\r\n"
    let overhead = 1 + prefix.len() + 1 + command.len() + 1 + target.len() + 2 + 2;
    MAX_LINE_LEN.saturating_sub(overhead)
}

/// Split `text` into chunks that each fit in `budget` bytes.
///
/// Text is first split on newlines (a trailing CR on each line is dropped),
/// empty lines are skipped, and each remaining line is cut into maximal
/// chunks that never split a multi-byte character. Chunks keep their
/// original order. Empty input yields no chunks.
///
/// A chunk may exceed `budget` only when a single character is wider than
/// the budget, so that splitting always makes progress.
pub fn split_text(text: &str, budget: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        split_line(line, budget, &mut chunks);
    }
    chunks
}

fn split_line<'a>(mut line: &'a str, budget: usize, out: &mut Vec<&'a str>) {
    while !line.is_empty() {
        if line.len() <= budget {
            out.push(line);
            return;
        }

        let mut cut = budget;
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // Budget narrower than the next character: take it whole.
            cut = line.chars().next().map_or(line.len(), char::len_utf8);
        }

        let (head, tail) = line.split_at(cut);
        out.push(head);
        line = tail;
    }
}
