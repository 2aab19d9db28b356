//! Document parser: dependency line, fenced code blocks, input and expected-output
//! regions, and memory directives.
//!
//! Every pattern is evaluated independently against the full text. A region that is
//! missing yields an empty value, never an error.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Tag written after the opening fence, trimmed but not normalized.
    pub language: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub libraries: Vec<String>,
    pub code_blocks: Vec<CodeBlock>,
    pub inputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("valid pattern"))
        }
    };
}

pattern!(dependency_re, r"(?s)Libraries or dependencies:(.*?)(?:\r?\n[ \t]*\r?\n|\z)");
pattern!(code_re, r"(?s)```(.*?)\n(.*?)```");
pattern!(input_re, r"(?s)@@@(.*?)@@@");
pattern!(expected_re, r"(?s)Expected output:(.*?)(?:###|\z)");
pattern!(
    memory_re,
    r"CommonMemory:\s*(?:add:\s*(\w+)\s*->\s*(.*)|rm:\s*(\w+))"
);

/// Extract libraries, code blocks, inputs and expected output. Pure.
pub fn parse(text: &str) -> ParsedDocument {
    let doc = ParsedDocument {
        libraries: parse_libraries(text),
        code_blocks: parse_code_blocks(text),
        inputs: parse_inputs(text),
        expected_output: parse_expected_output(text),
    };
    debug!(
        libraries = doc.libraries.len(),
        code_blocks = doc.code_blocks.len(),
        inputs = doc.inputs.len(),
        expected_output = doc.expected_output.is_some(),
        "parsed document"
    );
    doc
}

pub fn parse_libraries(text: &str) -> Vec<String> {
    dependency_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .split(',')
                .map(str::trim)
                .filter(|lib| !lib.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_code_blocks(text: &str) -> Vec<CodeBlock> {
    code_re()
        .captures_iter(text)
        .map(|c| CodeBlock {
            language: c[1].trim().to_string(),
            source: c[2].trim().to_string(),
        })
        .collect()
}

/// Lines of the first `@@@ ... @@@` region; blank content yields no lines.
pub fn parse_inputs(text: &str) -> Vec<String> {
    let Some(body) = input_re().captures(text).and_then(|c| c.get(1)) else {
        return Vec::new();
    };
    let body = body.as_str().trim();
    if body.is_empty() {
        return Vec::new();
    }
    body.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

pub fn parse_expected_output(text: &str) -> Option<String> {
    expected_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Apply every `CommonMemory: add:` / `CommonMemory: rm:` directive to `store`
/// in the order they appear. Returns the number of directives applied.
pub fn apply_memory_directives(text: &str, store: &mut MemoryStore) -> usize {
    let mut applied = 0;
    for c in memory_re().captures_iter(text) {
        match (c.get(1), c.get(2), c.get(3)) {
            (Some(key), Some(value), _) => store.add(key.as_str(), value.as_str().trim()),
            (_, _, Some(key)) => {
                store.remove(key.as_str());
            }
            _ => continue,
        }
        applied += 1;
    }
    debug!(applied, facts = store.len(), "applied memory directives");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    Libraries or dependencies: requests, flask

    Code:
    ```python
    import requests
    print("Hello, World!")
    ```
    @@@ Hello, World! @@@

    CommonMemory: add: user_language -> Python
    CommonMemory: add: user_prefers_framework -> Django
    CommonMemory: rm: user_language
    "#;

    #[test]
    fn dependency_line_is_split_and_trimmed() {
        assert_eq!(
            parse_libraries("Libraries or dependencies: requests, flask\n\n"),
            vec!["requests", "flask"]
        );
        assert_eq!(
            parse_libraries("Libraries or dependencies: numpy , , pandas"),
            vec!["numpy", "pandas"]
        );
    }

    #[test]
    fn dependency_region_stops_at_blank_line() {
        let text = "Libraries or dependencies: a,\n b\n\nc, d\n";
        assert_eq!(parse_libraries(text), vec!["a", "b"]);
    }

    #[test]
    fn missing_regions_are_empty() {
        let doc = parse("just some prose without any markers");
        assert_eq!(doc, ParsedDocument::default());
    }

    #[test]
    fn code_blocks_in_document_order() {
        let text = "```python\nprint(1)\n```\ntext\n```JavaScript \nconsole.log(2)\n```\n```python\nprint(3)\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], CodeBlock { language: "python".into(), source: "print(1)".into() });
        assert_eq!(blocks[1].language, "JavaScript");
        assert_eq!(blocks[1].source, "console.log(2)");
        assert_eq!(blocks[2].source, "print(3)");
    }

    #[test]
    fn unterminated_fence_is_ignored() {
        assert!(parse_code_blocks("```python\nprint('never closed')\n").is_empty());
    }

    #[test]
    fn input_region_splits_lines() {
        assert_eq!(parse_inputs("@@@\na\nb\n@@@"), vec!["a", "b"]);
        assert_eq!(parse_inputs("@@@ Hello, World! @@@"), vec!["Hello, World!"]);
        assert!(parse_inputs("@@@   @@@").is_empty());
        assert!(parse_inputs("no inputs").is_empty());
    }

    #[test]
    fn only_first_input_region_is_used() {
        assert_eq!(parse_inputs("@@@1@@@ and @@@2@@@"), vec!["1"]);
    }

    #[test]
    fn expected_output_between_label_and_sentinel() {
        let text = "Expected output:\n  Hello, World!\n###\ntrailing";
        assert_eq!(parse_expected_output(text).as_deref(), Some("Hello, World!"));
        assert_eq!(parse_expected_output("Expected output: 42").as_deref(), Some("42"));
        assert_eq!(parse_expected_output("nothing here"), None);
    }

    #[test]
    fn memory_directives_apply_in_line_order() {
        let mut store = MemoryStore::new();
        let text = "CommonMemory: add: k -> one\nprose\nCommonMemory: rm: k\nCommonMemory: add: k -> two\n";
        assert_eq!(apply_memory_directives(text, &mut store), 3);
        assert_eq!(store.get("k"), Some("two"));
    }

    #[test]
    fn sample_document() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.libraries, vec!["requests", "flask"]);
        assert_eq!(doc.code_blocks.len(), 1);
        assert_eq!(doc.code_blocks[0].language, "python");
        assert!(doc.code_blocks[0].source.ends_with(r#"print("Hello, World!")"#));
        assert_eq!(doc.inputs, vec!["Hello, World!"]);

        let mut store = MemoryStore::new();
        apply_memory_directives(SAMPLE, &mut store);
        assert_eq!(store.get("user_language"), None);
        assert_eq!(store.get("user_prefers_framework"), Some("Django"));
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse(SAMPLE), parse(SAMPLE));
    }
}
