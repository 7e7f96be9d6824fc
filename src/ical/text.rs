//! RFC 5545 content-line handling: unfolding, folding, text escaping and the
//! `NAME;PARAM=value:VALUE` tokenizer.

/// Maximum octets per physical line on output, excluding the CRLF.
const FOLD_WIDTH: usize = 75;

/// Join folded physical lines into logical lines.
///
/// A line starting with a space or horizontal tab continues the previous one;
/// the single leading whitespace character is dropped. Both CRLF and bare LF
/// line endings are accepted. Empty lines are skipped.
pub fn unfold_lines(input: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in input.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    lines
}

/// Fold a logical line into CRLF-separated physical lines of at most 75 octets.
///
/// Splits only on character boundaries so multi-byte UTF-8 stays intact.
pub fn fold_line(line: &str) -> String {
    if line.len() <= FOLD_WIDTH {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + line.len() / FOLD_WIDTH * 3);
    let mut width = FOLD_WIDTH;
    let mut rest = line;
    while rest.len() > width {
        let mut cut = width;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n ");
        rest = &rest[cut..];
        // continuation lines carry the leading space
        width = FOLD_WIDTH - 1;
    }
    out.push_str(rest);
    out
}

/// Escape a TEXT value: backslash, semicolon, comma and newline.
///
/// `\r\n` and a lone `\r` count as one newline, so no raw CR reaches the
/// content line.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push_str("\\n");
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Reverse of [`escape_text`]. `\N` is accepted as a newline too; unknown
/// escapes are kept verbatim.
pub fn unescape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(c @ ('\\' | ';' | ',')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a multi-valued TEXT property on commas that are not escaped.
pub fn split_unescaped(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            current.push(ch);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if ch == separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);
    parts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Upper-cased parameter name.
    pub name: String,
    /// Value with surrounding double quotes removed.
    pub value: String,
}

/// One logical content line split into name, parameters and raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Upper-cased property name.
    pub name: String,
    pub params: Vec<Param>,
    /// Value exactly as written, still escaped.
    pub value: String,
}

impl ContentLine {
    /// First parameter called `name`, compared case-insensitively.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Tokenize one unfolded line.
///
/// Quoted parameter values may contain `;`, `:` and `,`. Returns `None` for
/// lines without a value separator or with an unterminated quote.
pub fn parse_content_line(line: &str) -> Option<ContentLine> {
    let name_end = line.find([';', ':'])?;
    let name = line[..name_end].trim().to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }

    let mut params = Vec::new();
    let mut rest = &line[name_end..];
    loop {
        if let Some(value) = rest.strip_prefix(':') {
            return Some(ContentLine {
                name,
                params,
                value: value.to_string(),
            });
        }

        let after = rest.strip_prefix(';')?;
        let name_len = after.find(['=', ';', ':'])?;
        let param_name = after[..name_len].trim().to_ascii_uppercase();
        if !after[name_len..].starts_with('=') {
            params.push(Param {
                name: param_name,
                value: String::new(),
            });
            rest = &after[name_len..];
            continue;
        }

        let mut pos = name_len + 1;
        let mut value = String::new();
        loop {
            if after[pos..].starts_with('"') {
                let close = pos + 1 + after[pos + 1..].find('"')?;
                value.push_str(&after[pos + 1..close]);
                pos = close + 1;
            } else {
                let end = after[pos..]
                    .find([',', ';', ':'])
                    .map_or(after.len(), |i| pos + i);
                value.push_str(&after[pos..end]);
                pos = end;
            }
            if after[pos..].starts_with(',') {
                value.push(',');
                pos += 1;
                continue;
            }
            break;
        }

        params.push(Param {
            name: param_name,
            value,
        });
        rest = &after[pos..];
    }
}

/// Unfold and tokenize a whole document, dropping lines that don't tokenize.
pub fn content_lines(input: &str) -> Vec<ContentLine> {
    unfold_lines(input)
        .iter()
        .filter_map(|line| parse_content_line(line))
        .collect()
}
