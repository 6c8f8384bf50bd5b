use tracing::debug;

/// A slice of the filter string together with the byte offset it starts at.
///
/// Tokens carry no kind tag: whether `eq` is an operator or a value depends
/// entirely on where the parser is when it reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Keyword comparison used for `and`, `or` and the grouping characters.
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Splits a filter string into tokens.
///
/// Never fails. A single quote flips the lexer in and out of literal mode and
/// stays part of the token; outside literals whitespace separates tokens and
/// `(`, `)`, `,` become tokens of their own. An unterminated quote swallows
/// the rest of the input.
///
/// ```
/// use odata_syntax::tokenize;
///
/// let tokens: Vec<_> = tokenize("(name eq 'a b')").iter().map(|t| t.text).collect();
/// assert_eq!(tokens, ["(", "name", "eq", "'a b'", ")"]);
/// ```
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (idx, ch) in input.char_indices() {
        if ch == '\'' {
            in_quotes = !in_quotes;
        }

        if !in_quotes && is_separator(ch) {
            flush(input, &mut start, idx, &mut tokens);
        } else if !in_quotes && is_punctuation(ch) {
            flush(input, &mut start, idx, &mut tokens);
            tokens.push(Token {
                text: &input[idx..idx + ch.len_utf8()],
                offset: idx,
            });
        } else {
            start.get_or_insert(idx);
        }
    }
    flush(input, &mut start, input.len(), &mut tokens);

    debug!(tokens = ?tokens.iter().map(|t| t.text).collect::<Vec<_>>(), "tokenize");
    tokens
}

fn flush<'a>(input: &'a str, start: &mut Option<usize>, end: usize, tokens: &mut Vec<Token<'a>>) {
    if let Some(begin) = start.take() {
        tokens.push(Token {
            text: &input[begin..end],
            offset: begin,
        });
    }
}

/// Whitespace that separates tokens.
///
/// Non-breaking spaces (U+00A0, U+2007, U+202F) and NEL (U+0085) are token
/// content; the information separators U+001C..=U+001F split tokens.
fn is_separator(ch: char) -> bool {
    match ch {
        '\u{1C}'..='\u{1F}' => true,
        '\u{85}' | '\u{A0}' | '\u{2007}' | '\u{202F}' => false,
        _ => ch.is_whitespace(),
    }
}

fn is_punctuation(ch: char) -> bool {
    matches!(ch, '(' | ')' | ',')
}
