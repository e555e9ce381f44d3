// src/core/api_method.rs
use std::fmt;

use serde::Serialize;

use super::eligibility;

/// A method header and body matched in raw text, before any filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeclaration {
    pub return_type: String,
    pub method_name: String,
    /// Parameter list text between the parentheses, trimmed
    pub parameters: String,
    /// Body text between the braces, trimmed
    pub body: String,
}

impl RawDeclaration {
    /// `(type, name)` pairs: the last two whitespace-separated tokens of each
    /// comma-separated parameter. Parameters with fewer than two tokens are skipped.
    pub fn parameter_tokens(&self) -> Vec<(&str, &str)> {
        if self.parameters.is_empty() {
            return Vec::new();
        }

        self.parameters
            .split(',')
            .filter_map(|param| {
                let parts: Vec<&str> = param.split_whitespace().collect();
                match parts.as_slice() {
                    [.., type_name, name] => Some((*type_name, *name)),
                    _ => None,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// A qualified method record ready for the eligibility check and the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiMethod {
    /// Taken from the source file name, not the class declaration
    pub class_name: String,
    pub method_name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub body: String,
    pub package_name: Option<String>,
    pub is_public_class: bool,
}

impl ApiMethod {
    /// `ReturnType name(ParamType1, ParamType2)`
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect();
        format!("{} {}({})", self.return_type, self.method_name, types.join(", "))
    }

    pub fn is_public_api(&self) -> bool {
        eligibility::is_public_api(self)
    }

    /// Package as printed in reports, with `null` for the default package
    pub fn package_display(&self) -> &str {
        self.package_name.as_deref().unwrap_or("null")
    }
}

/// Detailed form listing parameter names and the computed visibility
impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect();

        writeln!(
            f,
            "<{}: {} {}({})>",
            self.class_name,
            self.return_type,
            self.method_name,
            params.join(", ")
        )?;
        writeln!(f, "Package: {}", self.package_display())?;
        writeln!(f, "Is Public API: {}", self.is_public_api())?;
        writeln!(f, "Content:\n{}", self.body)?;
        writeln!(f, "---")
    }
}
