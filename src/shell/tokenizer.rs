//! Command line tokenizer
//!
//! Splits a raw input line into words:
//! 1. Whitespace separates words; runs of whitespace collapse
//! 2. `"`, `'` and `` ` `` quote; inside one quote kind the others are literal
//! 3. A backslash in front of a quote character keeps it literal
//! 4. Backslashes are dropped from the finished words
//! 5. An unterminated quote runs to the end of the line
//!
//! Tokenizing never fails.

/// Characters that open and close a quoted section
const QUOTES: [char; 3] = ['"', '\'', '`'];

struct Lexer {
    tokens: Vec<String>,
    buffer: String,
    /// Quote kind currently open
    quote: Option<char>,
    /// The current word contained a quoted section (so `""` yields a word)
    quoted: bool,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            buffer: String::new(),
            quote: None,
            quoted: false,
        }
    }

    fn feed(&mut self, c: char) {
        if QUOTES.contains(&c) {
            if self.buffer.ends_with('\\') {
                self.buffer.push(c);
                return;
            }
            match self.quote {
                None => {
                    self.quote = Some(c);
                    self.quoted = true;
                }
                Some(open) if open == c => self.quote = None,
                Some(_) => self.buffer.push(c),
            }
        } else if c.is_whitespace() && self.quote.is_none() {
            self.flush();
        } else {
            self.buffer.push(c);
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() || self.quoted {
            let word = std::mem::take(&mut self.buffer);
            self.tokens.push(word.replace('\\', ""));
        }
        self.quoted = false;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.tokens
    }
}

/// Tokenize a raw command line.
///
/// A blank line yields exactly `[""]`, which callers read as "no command".
/// Token 0 is always the command name.
pub fn tokenize(line: &str) -> Vec<String> {
    if line.trim().is_empty() {
        return vec![String::new()];
    }

    let mut lexer = Lexer::new();
    for c in line.chars() {
        lexer.feed(c);
    }

    let tokens = lexer.finish();
    if tokens.is_empty() {
        vec![String::new()]
    } else {
        tokens
    }
}
