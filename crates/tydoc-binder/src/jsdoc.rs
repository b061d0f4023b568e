/// Summary and `@param` descriptions of one JSDoc block.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedJsDoc {
    /// Text before the first tag, with line breaks kept.
    pub summary: Option<String>,
    /// `(name, description)` pairs in tag order.
    pub parameters: Vec<(String, String)>,
}

impl ParsedJsDoc {
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Description given to parameter `name`, empty when undocumented.
    pub fn parameter(&self, name: &str) -> &str {
        self.parameters
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, description)| description.as_str())
            .unwrap_or_default()
    }
}

/// Parse a JSDoc block (without comment delimiters).
///
/// Only the summary and `@param` tags matter to the symbol graph; every other
/// tag ends the summary and is otherwise ignored.
pub fn parse_jsdoc(raw: &str) -> ParsedJsDoc {
    let mut summary_lines = Vec::new();
    let mut parameters = Vec::new();
    let mut in_summary = true;
    let mut in_param = false;

    for line in normalize_lines(raw) {
        if let Some(rest) = line.strip_prefix('@') {
            in_summary = false;
            let (tag, payload) = split_tag_payload(rest);
            in_param = tag == "param";
            if in_param {
                parameters.extend(parse_param(payload));
            }
        } else if in_summary {
            summary_lines.push(line);
        } else if in_param && !line.is_empty() {
            // continuation of a multi-line @param
            if let Some((_, description)) = parameters.last_mut() {
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str(&line);
            }
        }
    }

    ParsedJsDoc {
        summary: compose_summary(summary_lines),
        parameters,
    }
}

fn normalize_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.trim().to_string()
        })
        .collect()
}

fn compose_summary(lines: Vec<String>) -> Option<String> {
    let summary = lines
        .into_iter()
        .skip_while(|line| line.is_empty())
        .collect::<Vec<_>>();
    let summary = summary.join("\n").trim().to_string();
    (!summary.is_empty()).then_some(summary)
}

fn split_tag_payload(input: &str) -> (&str, &str) {
    let mut parts = input.splitn(2, char::is_whitespace);
    let tag = parts.next().unwrap_or("");
    let payload = parts.next().unwrap_or("").trim();
    (tag, payload)
}

fn parse_param(payload: &str) -> Option<(String, String)> {
    let rest = skip_type_hint(payload);
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next()?.trim();
    // `[name=default]` marks an optional parameter
    let name = name.trim_matches(|c| c == '[' || c == ']');
    let name = name.split('=').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    let description = parts
        .next()
        .map(|description| description.trim().trim_start_matches("- ").trim())
        .unwrap_or_default();
    Some((name.to_string(), description.to_string()))
}

fn skip_type_hint(payload: &str) -> &str {
    let trimmed = payload.trim();
    match trimmed.strip_prefix('{').and_then(|stripped| stripped.split_once('}')) {
        Some((_, rest)) => rest.trim(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_summary_and_params() {
        let doc = parse_jsdoc(
            "*\n * Moves the point.\n * Second line.\n *\n * @param dx - horizontal offset\n * @param {number} dy vertical\n *   offset\n * @returns nothing\n",
        );
        assert_eq!(doc.summary(), "Moves the point.\nSecond line.");
        assert_eq!(doc.parameter("dx"), "horizontal offset");
        assert_eq!(doc.parameter("dy"), "vertical offset");
        assert_eq!(doc.parameter("missing"), "");
    }

    #[test]
    fn optional_param_brackets_are_stripped() {
        let doc = parse_jsdoc("* @param [scale=1] factor");
        assert_eq!(doc.parameters, vec![("scale".to_string(), "factor".to_string())]);
        assert!(doc.summary.is_none());
    }

    #[test]
    fn text_after_other_tags_is_not_summary() {
        let doc = parse_jsdoc("* Intro\n * @deprecated use other\n * trailing");
        assert_eq!(doc.summary(), "Intro");
    }
}
