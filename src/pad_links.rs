/// Find the first markdown link target in `line` that starts with `prefix`.
///
/// The line is split on `(`; a fragment qualifies when it starts with the
/// prefix and is closed by a `)` within the same fragment. The target is the
/// text up to that first `)` and may not contain whitespace.
pub fn find_link_in_line(line: &str, prefix: &str) -> Option<String> {
    line.split('(')
        .filter(|candidate| candidate.starts_with(prefix))
        .find_map(|candidate| {
            candidate
                .split_once(')')
                .map(|(link, _)| link)
                .filter(|link| !link.chars().any(char::is_whitespace))
                .map(ToString::to_string)
        })
}

/// First qualifying link in a whole document, scanning lines in order.
pub fn resolve_first_link(text: &str, prefix: &str) -> Option<String> {
    text.lines().find_map(|line| find_link_in_line(line, prefix))
}

/// First whitespace separated token of a free-text line that starts with `http`.
pub fn first_http_token(line: &str) -> Option<&str> {
    line.split_whitespace().find(|token| token.starts_with("http"))
}

/// Inner text of a `<title>` line of an html page.
pub fn title_from_line(line: &str) -> Option<String> {
    line.strip_prefix("<title>").map(|title| {
        title
            .strip_suffix("</title>")
            .unwrap_or(title)
            .to_string()
    })
}
