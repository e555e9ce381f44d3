// src/core/languages/java.rs
use regex::Regex;

use crate::config::BodyMode;
use crate::error::Result;
use super::LanguageParser;
use crate::core::api_method::RawDeclaration;
use crate::core::source_unit::SourceUnit;

/// Java scanner working on raw text with regular expressions
pub struct JavaParser {
    package_regex: Regex,
    import_regex: Regex,
    public_class_regex: Regex,
    /// Everything up to and including the opening brace of the body
    method_header_regex: Regex,
    body_mode: BodyMode,
}

impl JavaParser {
    pub fn new(body_mode: BodyMode) -> Result<Self> {
        Ok(Self {
            package_regex: Regex::new(&java_classes(r"package\s+([^;]+);"))?,
            import_regex: Regex::new(&java_classes(r"import\s+([^;]+);"))?,
            public_class_regex: Regex::new(&java_classes(r"public\s+class\s+\w+"))?,
            method_header_regex: Regex::new(&java_classes(
                r"public\s+(?:<[^>]+>\s+)?(\S+)\s+(\S+)\s*\(([^)]*)\)\s*\{",
            ))?,
            body_mode,
        })
    }
}

impl LanguageParser for JavaParser {
    fn extract_unit(&self, content: &str) -> SourceUnit {
        let package_name = self
            .package_regex
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());

        let mut imports: Vec<String> = Vec::new();
        for caps in self.import_regex.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                let import = m.as_str();
                if !imports.iter().any(|seen| seen == import) {
                    imports.push(import.to_string());
                }
            }
        }

        SourceUnit {
            package_name,
            imports,
            is_public_class: self.public_class_regex.is_match(content),
        }
    }

    fn scan_declarations(&self, content: &str) -> Vec<RawDeclaration> {
        let mut declarations = Vec::new();
        let mut pos = 0;

        while let Some(caps) = self.method_header_regex.captures_at(content, pos) {
            let (Some(header), Some(return_type), Some(name), Some(params)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                break;
            };

            // `public static ...` never starts a declaration, but a later
            // position may, so retry one byte on
            if is_static_header(header.as_str()) {
                pos = header.start() + 1;
                continue;
            }

            match capture_body(content, header.end(), self.body_mode) {
                Some((body, end)) => {
                    declarations.push(RawDeclaration {
                        return_type: return_type.as_str().trim().to_string(),
                        method_name: name.as_str().trim().to_string(),
                        parameters: params.as_str().trim().to_string(),
                        body: body.trim().to_string(),
                    });
                    pos = end;
                }
                None => pos = header.start() + 1,
            }
        }

        declarations
    }

    fn file_extensions(&self) -> &[&str] {
        &["java"]
    }

    fn language_name(&self) -> &str {
        "java"
    }
}

/// Java whitespace: ASCII only, no NBSP or other Unicode spaces
const JAVA_SPACE: &str = r"[ \t\n\x0B\x0C\r]";
const JAVA_NON_SPACE: &str = r"[^ \t\n\x0B\x0C\r]";
const JAVA_WORD: &str = r"[A-Za-z0-9_]";

/// Rewrite `\s`, `\S` and `\w` to the ASCII classes Java source patterns mean;
/// the regex crate's shorthands are Unicode-aware
fn java_classes(pattern: &str) -> String {
    pattern
        .replace(r"\s", JAVA_SPACE)
        .replace(r"\S", JAVA_NON_SPACE)
        .replace(r"\w", JAVA_WORD)
}

fn is_java_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// True when the word after `public` is the `static` modifier
fn is_static_header(header: &str) -> bool {
    header
        .strip_prefix("public")
        .map(|rest| rest.trim_start_matches(is_java_space))
        .and_then(|rest| rest.strip_prefix("static"))
        .is_some_and(|rest| rest.starts_with(is_java_space))
}

/// Body text starting at `start` (just past the `{`) and the offset after its closing `}`
fn capture_body(content: &str, start: usize, mode: BodyMode) -> Option<(&str, usize)> {
    let rest = &content[start..];
    match mode {
        BodyMode::Truncating => {
            let close = rest.find('}')?;
            Some((&rest[..close], start + close + 1))
        }
        BodyMode::Balanced => {
            let mut depth = 1usize;
            for (idx, ch) in rest.char_indices() {
                match ch {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some((&rest[..idx], start + idx + 1));
                        }
                    }
                    _ => {}
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(content: &str, mode: BodyMode) -> Vec<RawDeclaration> {
        JavaParser::new(mode).unwrap().scan_declarations(content)
    }

    #[test]
    fn test_extract_unit() {
        let parser = JavaParser::new(BodyMode::Truncating).unwrap();
        let content = r#"package com.acme.tools;

import java.io.File;
import com.acme.Widget;
import java.io.File;

public class Foo {}
"#;
        let unit = parser.extract_unit(content);
        assert_eq!(unit.package_name.as_deref(), Some("com.acme.tools"));
        assert_eq!(unit.imports, vec!["java.io.File", "com.acme.Widget"]);
        assert!(unit.is_public_class);
    }

    #[test]
    fn test_extract_unit_without_package() {
        let parser = JavaParser::new(BodyMode::Truncating).unwrap();
        let unit = parser.extract_unit("class Hidden { void run() {} }");
        assert_eq!(unit.package_name, None);
        assert!(unit.imports.is_empty());
        assert!(!unit.is_public_class);
    }

    #[test]
    fn test_scan_simple_method() {
        let decls = scan(
            "public class Foo { public String bar(String x) { return x; } }",
            BodyMode::Truncating,
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].return_type, "String");
        assert_eq!(decls[0].method_name, "bar");
        assert_eq!(decls[0].parameters, "String x");
        assert_eq!(decls[0].body, "return x;");
    }

    #[test]
    fn test_static_methods_are_not_scanned() {
        let content = r#"public class Util {
    public static int twice(int x) { return x * 2; }
    public int once(int x) { return x; }
}"#;
        let decls = scan(content, BodyMode::Truncating);
        let names: Vec<&str> = decls.iter().map(|d| d.method_name.as_str()).collect();
        assert_eq!(names, vec!["once"]);
    }

    #[test]
    fn test_generic_method_prefix_is_consumed() {
        let decls = scan(
            "public <T> T first(T[] items) { return items[0]; }",
            BodyMode::Truncating,
        );
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].return_type, "T");
        assert_eq!(decls[0].method_name, "first");
    }

    #[test]
    fn test_truncating_body_stops_at_first_brace() {
        let content = "public int abs(int x) { if (x < 0) { return -x; } return x; }";
        let decls = scan(content, BodyMode::Truncating);
        assert_eq!(decls[0].body, "if (x < 0) { return -x;");
    }

    #[test]
    fn test_balanced_body_keeps_nested_blocks() {
        let content = "public int abs(int x) { if (x < 0) { return -x; } return x; }";
        let decls = scan(content, BodyMode::Balanced);
        assert_eq!(decls[0].body, "if (x < 0) { return -x; } return x;");
    }

    #[test]
    fn test_unclosed_balanced_body_is_dropped() {
        let decls = scan("public void run() { while (true) {", BodyMode::Balanced);
        assert!(decls.is_empty());
    }

    #[test]
    fn test_unclosed_truncating_body_is_dropped() {
        let decls = scan("public void run() { x();", BodyMode::Truncating);
        assert!(decls.is_empty());
    }

    #[test]
    fn test_non_ascii_letters_are_not_word_characters() {
        let parser = JavaParser::new(BodyMode::Truncating).unwrap();
        assert!(!parser.extract_unit("public class Ñand {}").is_public_class);
        assert!(parser.extract_unit("public class Nand {}").is_public_class);
    }

    #[test]
    fn test_non_breaking_space_does_not_separate_tokens() {
        assert!(scan("public\u{00A0}int a() { }", BodyMode::Truncating).is_empty());
        assert_eq!(scan("public int a() { }", BodyMode::Truncating).len(), 1);
        assert!(!is_static_header("public\u{00A0}static void run() {"));
    }

    #[test]
    fn test_declarations_keep_source_order() {
        let content = r#"public class Foo {
    public void b() { }
    public void a() { }
    public void c(int n) { n++; }
}"#;
        let names: Vec<String> = scan(content, BodyMode::Truncating)
            .into_iter()
            .map(|d| d.method_name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_static_header_detection() {
        assert!(is_static_header("public static void run() {"));
        assert!(is_static_header("public\n\tstatic\tint x() {"));
        assert!(!is_static_header("public staticky() {"));
        assert!(!is_static_header("public void run() {"));
    }
}
