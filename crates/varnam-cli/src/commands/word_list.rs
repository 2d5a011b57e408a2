//! Plain-text inputs for bulk learning and training.
//!
//! Word lists hold one word per line. Training files hold
//! `pattern<TAB>word` (or space separated) pairs. Blank lines and lines
//! starting with `#` are ignored.

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WordListError {
    #[error("line {line}: expected `pattern<TAB>word`, got {content:?}")]
    MalformedPair { line: usize, content: String },
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

pub fn parse_words(text: &str) -> Vec<String> {
    content_lines(text).map(|(_, l)| l.to_string()).collect()
}

pub fn parse_pairs(text: &str) -> Result<Vec<(String, String)>, WordListError> {
    content_lines(text)
        .map(|(line, l)| {
            let mut parts = l.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(pattern), Some(word), None) => Ok((pattern.to_string(), word.to_string())),
                _ => Err(WordListError::MalformedPair {
                    line,
                    content: l.to_string(),
                }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_skip_blank_and_comments() {
        let text = "# seed words\nമലയാളം\n\n  കോളേജ്  \n";
        assert_eq!(parse_words(text), vec!["മലയാളം", "കോളേജ്"]);
    }

    #[test]
    fn pairs_accept_tabs_and_spaces() {
        let text = "india\tഇന്ത്യ\ncollege  കോളേജ്\n";
        let pairs = parse_pairs(text).unwrap();
        assert_eq!(pairs[0], ("india".to_string(), "ഇന്ത്യ".to_string()));
        assert_eq!(pairs[1].0, "college");
    }

    #[test]
    fn pairs_report_line_number() {
        let text = "india\tഇന്ത്യ\n# note\nbroken\n";
        assert_eq!(
            parse_pairs(text),
            Err(WordListError::MalformedPair {
                line: 3,
                content: "broken".to_string()
            })
        );
    }
}
