use snafu::Snafu;

/// Splits a command line into arguments.
///
/// Whitespace separates arguments unless it is inside single or double quotes. Quotes are
/// removed, and quoted text glued to unquoted text stays in the same argument, so
/// `say"hello world"` is the single argument `sayhello world`. `""` produces an empty
/// argument.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                let token = current.get_or_insert_with(String::new);
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == c {
                        closed = true;
                        break;
                    }
                    token.push(inner);
                }
                if !closed {
                    return UnterminatedQuoteSnafu { quote: c }.fail();
                }
            }
            c if c.is_whitespace() => {
                if let Some(token) = current.take() {
                    tokens.push(token);
                }
            }
            c => current.get_or_insert_with(String::new).push(c),
        }
    }

    if let Some(token) = current {
        tokens.push(token);
    }
    Ok(tokens)
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TokenizeError {
    #[snafu(display("Unterminated {} quote", quote))]
    UnterminatedQuote { quote: char },
}
