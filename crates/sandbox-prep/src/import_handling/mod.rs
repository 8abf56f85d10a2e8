//! Import handling for sandboxed files
//!
//! Imports are handled as text. Each file's code is split into its import
//! header and its body, the header is merged with generated imports, and the
//! merged text is unified so every module specifier appears once.
//!
//! The grammar is line oriented: an import must sit on a single line and
//! belong to the header at the top of the file. Only
//! `import { a, b } from '...'` statements take part in unification; default,
//! namespace and side-effect imports are carried through verbatim.

mod cross_file;

use std::{collections::BTreeSet, sync::LazyLock};

use indexmap::IndexMap;
use regex::Regex;

pub use cross_file::generate_import_functions;

use crate::types::SandboxedCode;

/// A single-line static import, with or without bindings.
static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s*(?:[^'"()]*?\s*from\s*)?['"][^'"]+['"]\s*;?\s*$"#)
        .expect("import line pattern is valid")
});

/// `import { names } from 'specifier'`, optionally followed by `;`.
static NAMED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+\{([^}]+)\}\s+from\s+['"]([^'"]+)['"]\s*(;)?"#)
        .expect("named import pattern is valid")
});

/// A body partitioned into its import header and the remaining statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitCode {
    pub imports: String,
    pub code_without_imports: String,
}

impl From<SplitCode> for SandboxedCode {
    fn from(split: SplitCode) -> Self {
        Self {
            imports: split.imports,
            code_without_imports: split.code_without_imports,
        }
    }
}

/// Separate the import header of `code` from everything else.
///
/// The header is the run of import lines (and blank lines) at the top of the
/// file. Anything after the first other line stays in the body, so text
/// inside multi-line literals is never mistaken for an import.
pub fn split_code_imports(code: &str) -> SplitCode {
    let mut lines = code.lines().peekable();
    let mut imports = Vec::new();
    while let Some(line) =
        lines.next_if(|line| line.trim().is_empty() || IMPORT_LINE.is_match(line))
    {
        if !line.trim().is_empty() {
            imports.push(line);
        }
    }

    SplitCode {
        imports: imports.join("\n"),
        code_without_imports: lines.collect::<Vec<_>>().join("\n"),
    }
}

/// Merge named imports per module specifier.
///
/// Specifiers keep the order in which they were first seen; bindings are
/// deduplicated and sorted. Text the named-import pattern does not match is
/// appended verbatim after the merged statements.
pub fn unify_imports(imports: &str) -> String {
    let mut import_map: IndexMap<&str, BTreeSet<&str>> = IndexMap::new();

    for captures in NAMED_IMPORT.captures_iter(imports) {
        let (Some(names), Some(specifier)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let bindings = import_map.entry(specifier.as_str()).or_default();
        bindings.extend(
            names
                .as_str()
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        );
    }

    let mut output = String::new();
    for (specifier, bindings) in &import_map {
        let bindings: Vec<&str> = bindings.iter().copied().collect();
        output.push_str(&format!(
            "import {{ {} }} from '{}'\n",
            bindings.join(", "),
            specifier
        ));
    }

    let remaining = NAMED_IMPORT.replace_all(imports, "");
    output.push_str(remaining.trim());

    output.trim().to_owned()
}
