//! RFC 3676 `format=flowed` reflow.

const SIGNATURE_SEPARATOR: &str = "-- ";

/// Joins soft-broken lines back into paragraphs.
///
/// A line ending in a space continues on the next line of the same quote
/// depth. With `delsp` that space is padding and is dropped; without it the
/// space stays and separates the joined words. Space-stuffing is undone and
/// the signature separator is always a hard break.
pub fn reflow(text: &str, delsp: bool) -> String {
    let mut out: Vec<String> = Vec::new();
    // quote depth of the paragraph still open for continuation
    let mut open: Option<usize> = None;

    for raw_line in text.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let depth = line.bytes().take_while(|b| *b == b'>').count();
        let body = &line[depth..];
        let body = body.strip_prefix(' ').unwrap_or(body);

        let soft = body.ends_with(' ') && body != SIGNATURE_SEPARATOR;
        let body = if soft && delsp {
            &body[..body.len() - 1]
        } else {
            body
        };

        match out.last_mut() {
            Some(current) if open == Some(depth) => current.push_str(body),
            Some(_) | None => out.push(quote_prefix(depth) + body),
        }
        open = soft.then_some(depth);
    }

    out.join("\n")
}

fn quote_prefix(depth: usize) -> String {
    if depth == 0 {
        String::new()
    } else {
        ">".repeat(depth) + " "
    }
}
