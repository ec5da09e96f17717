//! Separator-based tokenizing shared by the document codec and the shell

/// Default token separator
pub const SEPARATOR: char = ' ';

/// Split `input` on `separator`.
///
/// Every separator closes the current token, so leading and repeated
/// separators yield empty tokens. The last segment is kept only when it is
/// non-empty, which means a trailing separator is absorbed.
pub fn split(input: &str, separator: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();

    for c in input.chars() {
        if c == separator {
            tokens.push(std::mem::take(&mut token));
        } else {
            token.push(c);
        }
    }

    if !token.is_empty() {
        tokens.push(token);
    }

    tokens
}

/// Split on the default separator
pub fn split_default(input: &str) -> Vec<String> {
    split(input, SEPARATOR)
}
