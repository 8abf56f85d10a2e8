//! Turns a failed file into the script that reports it inside the sandbox.
//!
//! The generated file replaces the whole batch: it clears the terminal,
//! names the failing file, shows a code frame of the original source, logs
//! the message and hands the error to `window.onerror` so the host page can
//! observe it.

use serde_json::{Value, json};

use crate::{
    code_frame::{CodeFrameOptions, code_frame_columns},
    types::{SandboxFile, SandboxedCode},
};

pub const ERROR_DISPLAY_IMPORTS: &str =
    "import { Terminal } from '@es-js/terminal'; import { tiza } from '@es-js/tiza';";

/// Build the error-display file for `file`.
///
/// A file without an error is returned unchanged.
pub fn print_error(file: &SandboxFile) -> SandboxFile {
    let Some(error) = &file.error else {
        return file.clone();
    };

    let frame = code_frame_columns(
        &file.content,
        error.line,
        Some(error.column),
        &CodeFrameOptions::default().with_message(error.message.as_str()),
    );
    let frame = escape_template_literal(&escape_html(&frame));

    let message = js_string(&error.message);
    let error_object = json!({
        "message": error.message,
        "line": error.line,
        "column": error.column,
        "stack": error.stack,
    });

    let code_without_imports = format!(
        r#"
Terminal.clear()

Terminal.escribir(`Error en el archivo ${{tiza.fondoAzul50.azul800({name})}}:`)

Terminal.escribir(`<pre>{frame}</pre>`)

console.error({message})

window.onerror({message}, null, {line}, {column}, {error_object})"#,
        name = js_string(&file.name),
        line = error.line,
        column = error.column,
    );

    SandboxFile {
        sandboxed: Some(SandboxedCode {
            imports: ERROR_DISPLAY_IMPORTS.to_owned(),
            code_without_imports,
        }),
        ..file.clone()
    }
}

/// Escape `code` so it can sit inside a JavaScript template literal.
pub fn escape_template_literal(code: &str) -> String {
    code.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// JSON string literal, which is also a valid JavaScript string literal.
fn js_string(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}
