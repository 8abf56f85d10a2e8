//! Imports that let sibling files see the entry file's functions.

use log::debug;

use crate::{error::TransformError, parser::parse_module, visitors::ExportCollector};

/// One `import { name } from '<module_path>'` line per function exported by
/// `code`.
///
/// Statements are not merged here; [`super::unify_imports`] does that once
/// they are combined with the file's own imports.
pub fn generate_import_functions(code: &str, module_path: &str) -> Result<String, TransformError> {
    let parsed = parse_module(code)?;
    let exported = ExportCollector::analyze(&parsed.module);
    debug!("Entry exports {} function(s): {exported:?}", exported.len());

    Ok(exported
        .iter()
        .map(|name| format!("import {{ {name} }} from '{module_path}'"))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_one_import_per_exported_function() {
        let imports = generate_import_functions(
            "export function saludar() {}\nexport function despedir() {}\nfunction privada() {}\n",
            "./main",
        )
        .expect("valid code");

        assert_eq!(
            imports,
            "import { saludar } from './main'\nimport { despedir } from './main'"
        );
    }

    #[test]
    fn test_no_exports_means_no_imports() {
        let imports = generate_import_functions("const a = 1\n", "./main").expect("valid code");
        assert_eq!(imports, "");
    }
}
