//! JSON-with-comments preprocessing.

/// Turn JSONC text into plain JSON.
///
/// Line (`//`) and block (`/* */`) comments are replaced with whitespace so
/// that line and column numbers in parse errors still point at the original
/// text. Trailing commas before `}` or `]` are dropped. String literals are
/// left untouched, including any comment markers inside them. An unterminated
/// block comment is kept as is, so the JSON parser rejects it.
#[must_use]
pub fn strip_jsonc(input: &str) -> String {
    remove_trailing_commas(&remove_comments(input))
}

fn remove_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                chars.next();
                out.push_str("  ");
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    out.push(if next == '\r' { '\r' } else { ' ' });
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut raw = String::from("/*");
                let mut blanked = String::from("  ");
                let mut previous = '\0';
                let mut terminated = false;
                for next in chars.by_ref() {
                    raw.push(next);
                    if previous == '*' && next == '/' {
                        blanked.push(' ');
                        terminated = true;
                        break;
                    }
                    blanked.push(if next == '\n' || next == '\r' { next } else { ' ' });
                    previous = next;
                }
                out.push_str(if terminated { &blanked } else { &raw });
            }
            _ => out.push(c),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                out.push(' ');
                continue;
            }
        }
        out.push(c);
    }

    out
}
