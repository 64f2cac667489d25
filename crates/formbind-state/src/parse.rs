//! Parsing of human-authored path strings such as `"a.b[2].c"`.
//!
//! `.` separates object keys and `[...]` holds an array index or a computed
//! key. Parsing is total: malformed pieces are dropped, never reported as
//! errors.

use crate::{Path, Seg};

/// Parse a dotted/bracketed path string into a [`Path`].
///
/// Dot-delimited pieces are always keys. Bracket content becomes an index
/// when it is an integer (negative integers included), a key when it has no
/// digits at all, and is dropped when it mixes digits with anything else.
///
/// # Examples
///
/// ```
/// use formbind_state::{parse_path, path};
///
/// assert_eq!(parse_path("a.b.c"), path!("a", "b", "c"));
/// assert_eq!(parse_path("a[1].c"), path!("a", 1, "c"));
/// assert_eq!(parse_path("a[-1].c"), path!("a", -1, "c"));
/// assert_eq!(parse_path("a[0a].c"), path!("a", "c"));
/// assert!(parse_path("").is_empty());
/// ```
pub fn parse_path(input: &str) -> Path {
    let mut path = Path::root();
    let mut piece = String::new();
    let mut chars = input.char_indices();

    while let Some((pos, c)) = chars.next() {
        match c {
            '.' => flush_key(&mut path, &mut piece),
            '[' => {
                flush_key(&mut path, &mut piece);
                let after = pos + 1;
                match input[after..].find(']') {
                    Some(len) => {
                        let content = &input[after..after + len];
                        match classify_bracket(content) {
                            Some(seg) => path.push(seg),
                            None => tracing::trace!(
                                input,
                                content,
                                "dropping unusable bracket segment"
                            ),
                        }
                        // Skip the content and the closing bracket.
                        for _ in input[after..after + len + 1].chars() {
                            chars.next();
                        }
                    }
                    None => {
                        tracing::trace!(input, "dropping unterminated bracket segment");
                        // Resume at the next dot, if any.
                        while let Some((_, next)) = chars.clone().next() {
                            if next == '.' {
                                break;
                            }
                            chars.next();
                        }
                    }
                }
            }
            _ => piece.push(c),
        }
    }
    flush_key(&mut path, &mut piece);

    path
}

/// Parse an optional path string; `None` yields the empty path.
pub fn parse_path_opt(input: Option<&str>) -> Path {
    input.map(parse_path).unwrap_or_default()
}

fn flush_key(path: &mut Path, piece: &mut String) {
    if !piece.is_empty() {
        path.push(Seg::Key(std::mem::take(piece)));
    }
}

fn classify_bracket(content: &str) -> Option<Seg> {
    if content.is_empty() {
        return None;
    }

    if let Some(inner) = strip_quotes(content) {
        return (!inner.is_empty()).then(|| Seg::key(inner));
    }

    if is_integer(content) {
        // Overflowing integers are noise like any other malformed number.
        return content.parse::<i64>().ok().map(Seg::Index);
    }

    if content.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(Seg::key(content))
}

fn strip_quotes(content: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        content
            .strip_prefix(q)
            .and_then(|rest| rest.strip_suffix(q))
    })
}

fn is_integer(content: &str) -> bool {
    let digits = content.strip_prefix('-').unwrap_or(content);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
