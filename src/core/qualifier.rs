// src/core/qualifier.rs
use crate::config::GenericSplit;

use super::source_unit::ImportTable;

/// Standard library simple names and their canonical qualified forms
const KNOWN_TYPES: &[(&str, &str)] = &[
    ("String", "java.lang.String"),
    ("Integer", "java.lang.Integer"),
    ("Boolean", "java.lang.Boolean"),
    ("Long", "java.lang.Long"),
    ("Double", "java.lang.Double"),
    ("Float", "java.lang.Float"),
    ("Short", "java.lang.Short"),
    ("Byte", "java.lang.Byte"),
    ("Character", "java.lang.Character"),
    ("Object", "java.lang.Object"),
    ("List", "java.util.List"),
    ("Map", "java.util.Map"),
    ("Set", "java.util.Set"),
    ("HashMap", "java.util.HashMap"),
    ("ArrayList", "java.util.ArrayList"),
    ("LinkedList", "java.util.LinkedList"),
    ("HashSet", "java.util.HashSet"),
    ("TreeSet", "java.util.TreeSet"),
    ("Queue", "java.util.Queue"),
    ("Deque", "java.util.Deque"),
    ("Collection", "java.util.Collection"),
    ("Iterator", "java.util.Iterator"),
    ("Enumeration", "java.util.Enumeration"),
    ("BigDecimal", "java.math.BigDecimal"),
    ("BigInteger", "java.math.BigInteger"),
    ("Date", "java.util.Date"),
    ("Calendar", "java.util.Calendar"),
    ("Optional", "java.util.Optional"),
];

const PRIMITIVES: &[&str] = &[
    "int", "long", "float", "double", "boolean", "char", "byte", "short", "void",
];

/// Resolves bare type tokens against a file's package and imports.
///
/// Resolution order: generic arguments, array element, already-qualified
/// names, the standard library table, imports, primitives, the enclosing
/// package, and finally the token itself.
pub struct TypeQualifier<'a> {
    package_name: Option<&'a str>,
    imports: &'a ImportTable,
    generic_split: GenericSplit,
}

impl<'a> TypeQualifier<'a> {
    pub fn new(
        package_name: Option<&'a str>,
        imports: &'a ImportTable,
        generic_split: GenericSplit,
    ) -> Self {
        Self {
            package_name,
            imports,
            generic_split,
        }
    }

    pub fn qualify(&self, token: &str) -> String {
        if let Some(open) = token.find('<') {
            return self.qualify_generic(token, open);
        }

        if let Some(element) = token.strip_suffix("[]") {
            return format!("{}[]", self.qualify(element));
        }

        if token.contains('.') {
            return token.to_string();
        }

        if let Some(qualified) = known_type(token) {
            return qualified.to_string();
        }

        if let Some(qualified) = self.imports.resolve(token) {
            return qualified.to_string();
        }

        if PRIMITIVES.contains(&token) {
            return token.to_string();
        }

        match self.package_name {
            Some(package) => format!("{}.{}", package, token),
            None => token.to_string(),
        }
    }

    /// `Base<A,B>` becomes `Base'<A',B'>`; anything after the last `>` is dropped
    fn qualify_generic(&self, token: &str, open: usize) -> String {
        let base = &token[..open];
        let close = token
            .rfind('>')
            .filter(|&close| close > open)
            .unwrap_or(token.len());
        let arguments = &token[open + 1..close];

        let qualified_args: Vec<String> = self
            .split_arguments(arguments)
            .into_iter()
            .map(|arg| self.qualify(arg.trim()))
            .collect();

        format!("{}<{}>", self.qualify(base.trim()), qualified_args.join(","))
    }

    fn split_arguments<'t>(&self, arguments: &'t str) -> Vec<&'t str> {
        match self.generic_split {
            GenericSplit::Naive => split_naive(arguments),
            GenericSplit::DepthAware => split_top_level(arguments),
        }
    }
}

fn known_type(token: &str) -> Option<&'static str> {
    KNOWN_TYPES
        .iter()
        .find(|(simple, _)| *simple == token)
        .map(|(_, qualified)| *qualified)
}

/// Plain comma split; trailing empty pieces are dropped but one piece always remains
fn split_naive(arguments: &str) -> Vec<&str> {
    let mut pieces: Vec<&str> = arguments.split(',').collect();
    while pieces.len() > 1 && pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    pieces
}

fn split_top_level(arguments: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in arguments.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&arguments[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(&arguments[start..]);
    pieces
}
