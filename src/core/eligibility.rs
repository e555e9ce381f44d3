// src/core/eligibility.rs
//! Gates applied to scanned declarations.
//!
//! A declaration must first be safe to qualify: anything touching generics,
//! varargs or placeholder types is dropped before an [`ApiMethod`] exists.
//! The public API check then runs on the finished record.

use std::fmt;

use super::api_method::{ApiMethod, RawDeclaration};

/// Types too vague to report
const AMBIGUOUS_TYPES: &[&str] = &["Object", "java.lang.Object", "T"];

/// Package segments marking non-public code
const INTERNAL_SEGMENTS: &[&str] = &["internal", "impl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    GenericReturn,
    GenericSignature,
    GenericParameter,
    Varargs,
    AmbiguousReturn,
    AmbiguousParameter,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::GenericReturn => "generic return type",
            SkipReason::GenericSignature => "generic method signature",
            SkipReason::GenericParameter => "generic parameter type",
            SkipReason::Varargs => "varargs parameter",
            SkipReason::AmbiguousReturn => "ambiguous return type",
            SkipReason::AmbiguousParameter => "ambiguous parameter type",
        };
        f.write_str(text)
    }
}

fn has_angle(text: &str) -> bool {
    text.contains('<') || text.contains('>')
}

fn normalize(type_name: &str) -> &str {
    type_name.strip_prefix("final").map_or(type_name, |rest| {
        if rest.starts_with(char::is_whitespace) {
            rest.trim_start()
        } else {
            type_name
        }
    })
}

/// Why a declaration cannot be qualified, or `None` when it can
pub fn skip_reason(decl: &RawDeclaration) -> Option<SkipReason> {
    let params = decl.parameter_tokens();

    if params
        .iter()
        .map(|(type_name, _)| normalize(type_name))
        .any(|t| has_angle(t) || t == "T")
    {
        return Some(SkipReason::GenericParameter);
    }

    if has_angle(&decl.return_type) || decl.return_type == "T" {
        return Some(SkipReason::GenericReturn);
    }

    if has_angle(&decl.method_name) {
        return Some(SkipReason::GenericSignature);
    }

    if has_angle(&decl.parameters) {
        return Some(SkipReason::GenericParameter);
    }

    if decl.parameters.contains("...") {
        return Some(SkipReason::Varargs);
    }

    if params
        .iter()
        .any(|(type_name, _)| AMBIGUOUS_TYPES.contains(&normalize(type_name)))
    {
        return Some(SkipReason::AmbiguousParameter);
    }

    if AMBIGUOUS_TYPES.contains(&normalize(&decl.return_type)) {
        return Some(SkipReason::AmbiguousReturn);
    }

    None
}

/// Public class, non-internal package and no leading underscore
pub fn is_public_api(method: &ApiMethod) -> bool {
    if !method.is_public_class {
        return false;
    }

    if let Some(package) = method.package_name.as_deref() {
        if is_internal_package(package) {
            return false;
        }
    }

    !method.method_name.starts_with('_')
}

fn is_internal_package(package: &str) -> bool {
    INTERNAL_SEGMENTS.iter().any(|segment| {
        package.contains(&format!(".{}.", segment)) || package.ends_with(&format!(".{}", segment))
    })
}
