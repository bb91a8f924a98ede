//! Heuristic post-patch validation
//!
//! This is not a parser. It counts bracket pairs outside of comments and string
//! literals and compares the totals before and after a patch. A patch that
//! changes the balance almost certainly broke the file; one that keeps it may
//! still be wrong.

const PAIRS: [(char, char, &str); 3] = [('(', ')', "parentheses"), ('{', '}', "braces"), ('[', ']', "brackets")];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

/// Net open-minus-close count for each bracket kind
pub fn delimiter_balance(source: &str) -> [i64; 3] {
    let mut balance = [0i64; 3];
    let mut state = Scan::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = Scan::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Scan::BlockComment;
                }
                '"' | '\'' | '`' => state = Scan::Str(c),
                _ => {
                    for (i, (open, close, _)) in PAIRS.iter().enumerate() {
                        if c == *open {
                            balance[i] += 1;
                        } else if c == *close {
                            balance[i] -= 1;
                        }
                    }
                }
            },
            Scan::LineComment => {
                if c == '\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Scan::Code;
                }
            }
            Scan::Str(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    state = Scan::Code;
                }
            }
        }
    }

    balance
}

/// Caveats for every bracket kind whose balance differs between the two texts
pub fn compare_delimiters(before: &str, after: &str) -> Vec<String> {
    let before = delimiter_balance(before);
    let after = delimiter_balance(after);

    PAIRS
        .iter()
        .enumerate()
        .filter(|(i, _)| before[*i] != after[*i])
        .map(|(i, (_, _, name))| {
            format!(
                "unbalanced {} after patch (net {} before, {} after)",
                name, before[i], after[i]
            )
        })
        .collect()
}
