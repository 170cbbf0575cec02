use once_cell::sync::Lazy;
use regex::Regex;

// A token is a run of non-whitespace, non-quote characters, or a double-quoted span.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[^\s"]+|"([^"]*)""#).unwrap());

/// Splits a command line into tokens. Quotes are stripped from quoted spans;
/// there is no escape sequence for a literal quote.
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN
        .captures_iter(line)
        .map(|captures| match captures.get(1) {
            Some(quoted) => quoted.as_str().to_string(),
            None => captures[0].to_string(),
        })
        .collect()
}

/// Removes `prefix` and surrounding whitespace from a chat message, or returns
/// None if the message is not addressed to the dispatcher.
pub fn strip_prefix<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message.strip_prefix(prefix).map(str::trim)
}
