//! Reader and writer for `.properties` text
//!
//! Follows the usual properties-file rules:
//!
//! - `#` and `!` start comment lines
//! - keys end at the first unescaped `=`, `:` or whitespace
//! - a line ending in an odd number of backslashes continues on the next line
//! - `\t`, `\n`, `\r`, `\f`, `\uXXXX` and `\<char>` escapes
//!
//! A key that appears twice keeps its last value.

use std::fmt::Write as _;

/// A malformed line in properties text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Parse properties text into key/value pairs in file order.
pub fn parse(content: &str) -> Result<Vec<(String, String)>, SyntaxError> {
    let mut entries = Vec::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line = index + 1;
        let trimmed = raw.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        entries.push((unescape(key, line)?, unescape(value, line)?));
    }

    Ok(entries)
}

/// Render key/value pairs as properties text that [`parse`] reads back
/// unchanged.
pub fn to_string<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        let _ = writeln!(out, "{}={}", escape(key, true), escape(value, false));
    }
    out
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

fn ends_with_continuation(line: &str) -> bool {
    let slashes = line.chars().rev().take_while(|&c| c == '\\').count();
    slashes % 2 == 1
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start_matches(is_blank)),
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let rest = rest
        .strip_prefix(['=', ':'])
        .map(|r| r.trim_start_matches(is_blank))
        .unwrap_or(rest);
    (&line[..key_end], rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => out.push(unescape_unicode(&mut chars, line)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Decode the code unit after a `\u`. A high surrogate must be followed by
/// a `\u` low surrogate and the pair becomes one character.
fn unescape_unicode(chars: &mut std::str::Chars<'_>, line: usize) -> Result<char, SyntaxError> {
    let high = read_code_unit(chars, line)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(high).ok_or_else(|| SyntaxError {
            line,
            message: format!("unpaired surrogate '\\u{high:04X}'"),
        });
    }

    let unpaired = || SyntaxError {
        line,
        message: format!("unpaired surrogate '\\u{high:04X}'"),
    };
    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(unpaired());
    }
    let low = read_code_unit(chars, line)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return Err(unpaired());
    }
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)).ok_or_else(unpaired)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32, SyntaxError> {
    let hex: String = chars.by_ref().take(4).collect();
    (hex.len() == 4)
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .ok_or_else(|| SyntaxError {
            line,
            message: format!("malformed \\uxxxx encoding '\\u{hex}'"),
        })
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_separators() {
        let parsed = parse("a=1\nb: 2\nc 3\nd   =   4\ne\t:five").unwrap();
        assert_eq!(
            parsed,
            pairs(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "five")])
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let content = "# comment\n\n   ! also comment\nwhirr.provider=aws-ec2\n";
        assert_eq!(parse(content).unwrap(), pairs(&[("whirr.provider", "aws-ec2")]));
    }

    #[test]
    fn test_value_keeps_separators_after_the_first() {
        let parsed = parse("fs.default.name=hdfs://10.0.0.1:8020").unwrap();
        assert_eq!(parsed, pairs(&[("fs.default.name", "hdfs://10.0.0.1:8020")]));
    }

    #[test]
    fn test_line_continuation() {
        let content = "whirr.instance-templates=1 hadoop-namenode+hadoop-jobtracker,\\\n    \
                       3 hadoop-datanode+hadoop-tasktracker\n";
        let parsed = parse(content).unwrap();
        assert_eq!(
            parsed[0].1,
            "1 hadoop-namenode+hadoop-jobtracker,3 hadoop-datanode+hadoop-tasktracker"
        );
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let parsed = parse("path=C:\\\\\nnext=1").unwrap();
        assert_eq!(parsed, pairs(&[("path", "C:\\"), ("next", "1")]));
    }

    #[test]
    fn test_escapes() {
        let parsed = parse("key\\ with\\=eq=tab\\there \\u00e9").unwrap();
        assert_eq!(parsed, pairs(&[("key with=eq", "tab\there é")]));
    }

    #[test]
    fn test_key_without_value() {
        assert_eq!(parse("empty\nalso=").unwrap(), pairs(&[("empty", ""), ("also", "")]));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(parse("a=1\r\nb=2\r\n").unwrap(), pairs(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_malformed_unicode_escape_reports_line() {
        let err = parse("ok=1\nbad=\\u12").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("malformed"));
    }

    #[test]
    fn test_surrogate_pair_becomes_one_character() {
        let parsed = parse("smile=\\uD83D\\uDE00!\nlower=\\ud83d\\ude00").unwrap();
        assert_eq!(parsed, pairs(&[("smile", "\u{1F600}!"), ("lower", "\u{1F600}")]));
    }

    #[test]
    fn test_unpaired_surrogate_is_rejected() {
        for content in ["a=\\uD83D", "a=\\uD83Dx", "a=\\uD83D\\u0041", "a=\\uDE00"] {
            let err = parse(content).unwrap_err();
            assert!(err.message.contains("surrogate"), "{content}: {err}");
        }
    }

    #[test]
    fn test_to_string_escapes_special_characters() {
        let text = to_string([("#key: x", " leading"), ("multi", "a\nb")]);
        assert_eq!(text, "\\#key\\:\\ x=\\ leading\nmulti=a\\nb\n");
    }

    proptest! {
        #[test]
        fn test_written_properties_parse_back(
            entries in proptest::collection::btree_map("[ -~\t\n]{1,16}", "[ -~\t\n\u{e9}]{0,24}", 0..8)
        ) {
            let text = to_string(entries.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            let parsed: std::collections::BTreeMap<String, String> =
                parse(&text).unwrap().into_iter().collect();
            prop_assert_eq!(parsed, entries);
        }
    }
}
