// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line argument tokenization.
//!
//! Splits a raw option string into tokens on unquoted whitespace. Quote
//! characters are preserved verbatim in the tokens, they only suppress
//! splitting. This matches how the executed tool receives the arguments,
//! not shell unquoting.

/// Split a raw option string into argument tokens.
///
/// Runs of whitespace (including newlines) separate tokens outside quotes.
/// A single- or double-quoted run may contain the other quote character and
/// embedded whitespace. An unterminated quote consumes the remainder of the
/// input into the current token. This function never fails.
pub fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    current.push(c);
                    quote = Some(c);
                } else if c.is_whitespace() {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t \n ").is_empty());
    }

    #[test]
    fn test_plain_tokens() {
        assert_eq!(tokenize("-Xmx512m -Dfoo=bar"), vec!["-Xmx512m", "-Dfoo=bar"]);
    }

    #[test]
    fn test_newlines_separate_tokens() {
        assert_eq!(tokenize("a\nb\r\n  c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quotes_preserved_and_whitespace_kept() {
        let tokens = tokenize("param1 param2 param4=\"/path/to/my file.log\" 'var\"foo var\"foo'");
        assert_eq!(
            tokens,
            vec![
                "param1",
                "param2",
                "param4=\"/path/to/my file.log\"",
                "'var\"foo var\"foo'",
            ]
        );
    }

    #[test]
    fn test_other_quote_character_is_literal() {
        assert_eq!(tokenize("\"it's here\""), vec!["\"it's here\""]);
        assert_eq!(tokenize("'say \"hi\"'"), vec!["'say \"hi\"'"]);
    }

    #[test]
    fn test_unterminated_quote_takes_rest() {
        assert_eq!(tokenize("a \"b c d"), vec!["a", "\"b c d"]);
        assert_eq!(tokenize("'x y"), vec!["'x y"]);
    }

    #[test]
    fn test_quote_inside_token() {
        assert_eq!(
            tokenize("-Dpath=\"C:\\Program Files\\Java\""),
            vec!["-Dpath=\"C:\\Program Files\\Java\""]
        );
    }
}
