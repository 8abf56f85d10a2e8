use pretty_assertions::assert_eq;
use sandbox_prep::{
    ProcessSandboxedCodeOptions, SandboxConfig, SandboxFile, SandboxFileError, SandboxOutcome,
    config::{IMPORT_ESJS_PRUEBA, IMPORT_ESJS_TERMINAL},
    error_report::ERROR_DISPLAY_IMPORTS,
    host::{FILES_COMPILED_ACTION, HostMessage},
    process_and_deliver, process_sandboxed_files,
};

fn js_file(name: &str, js: &str) -> SandboxFile {
    SandboxFile::new(name, js).with_compiled_js(js)
}

fn prepared(outcome: SandboxOutcome) -> Vec<SandboxFile> {
    match outcome {
        SandboxOutcome::Done(files) => files,
        SandboxOutcome::Failed(file) => panic!("batch failed unexpectedly: {:?}", file.error),
    }
}

fn imports_of(file: &SandboxFile) -> &str {
    &file.sandboxed.as_ref().unwrap().imports
}

fn body_of(file: &SandboxFile) -> &str {
    &file.sandboxed.as_ref().unwrap().code_without_imports
}

#[test]
fn test_entry_functions_are_imported_by_siblings() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "function saludar() { return 1 }"),
            js_file("utils", "saludar()"),
        ],
        &SandboxConfig::default(),
    ));

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "main");
    assert!(
        body_of(&files[0]).contains("export function saludar()"),
        "{}",
        body_of(&files[0])
    );
    assert_eq!(imports_of(&files[0]), IMPORT_ESJS_PRUEBA);

    assert_eq!(files[1].name, "utils");
    assert_eq!(imports_of(&files[1]), "import { saludar } from './main'");
    assert!(body_of(&files[1]).contains("saludar()"));
}

#[test]
fn test_flagged_entry_is_imported_by_its_own_name() {
    let mut entry = js_file("principal", "function saludar() {}");
    entry.main = true;
    let files = prepared(process_sandboxed_files(
        &[js_file("utils", "saludar()"), entry],
        &SandboxConfig::default(),
    ));

    let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["principal", "utils"]);
    assert_eq!(
        imports_of(&files[1]),
        "import { saludar } from './principal'"
    );
}

#[test]
fn test_import_text_inside_template_literal_is_kept() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "const a = 1"),
            js_file("utils", "const s = `\nimport x from 'y'\n`\nmostrar(s)"),
        ],
        &SandboxConfig::default(),
    ));

    assert_eq!(imports_of(&files[1]), "");
    let body = body_of(&files[1]);
    assert!(body.contains("`\nimport x from 'y'\n`"), "{body}");
    assert!(body.contains("mostrar(s)"), "{body}");
}

#[test]
fn test_entry_is_moved_first() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("b", "1"),
            js_file("main", "2"),
            js_file("a", "3"),
        ],
        &SandboxConfig::default(),
    ));

    let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, vec!["main", "b", "a"]);
}

#[test]
fn test_missing_entry_is_treated_as_empty() {
    let files = prepared(process_sandboxed_files(
        &[js_file("utils", "mostrar(1)")],
        &SandboxConfig::default(),
    ));

    assert_eq!(files[0].name, "main");
    assert_eq!(body_of(&files[0]), "");
    assert_eq!(files[1].name, "utils");
    assert_eq!(imports_of(&files[1]), "");
}

#[test]
fn test_tests_file_gets_assertion_helper() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "function sumar(a, b) { return a + b }"),
            js_file("main.test", "prueba('suma', () => sumar(1, 2))"),
            js_file("utils", "sumar(1, 2)"),
        ],
        &SandboxConfig::default(),
    ));

    assert_eq!(
        imports_of(&files[1]),
        format!("import {{ sumar }} from './main'\n{IMPORT_ESJS_PRUEBA}")
    );
    assert!(!imports_of(&files[2]).contains("@es-js/prueba"));
}

#[test]
fn test_terminal_import_follows_usage() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "Terminal.escribir('hola')"),
            js_file("con_terminal", "Terminal.limpiar()"),
            js_file("sin_terminal", "console.log(1)"),
        ],
        &SandboxConfig::default(),
    ));

    assert_eq!(
        imports_of(&files[0]),
        format!("{IMPORT_ESJS_TERMINAL}\n{IMPORT_ESJS_PRUEBA}")
    );
    assert_eq!(imports_of(&files[1]), IMPORT_ESJS_TERMINAL);
    assert_eq!(imports_of(&files[2]), "");
}

#[test]
fn test_own_imports_are_unified_with_generated_ones() {
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "function saludar() {}"),
            js_file(
                "utils",
                "import { b } from './lib'\nimport { a, b } from './lib'\nsaludar(a, b)",
            ),
        ],
        &SandboxConfig::default(),
    ));

    assert_eq!(
        imports_of(&files[1]),
        "import { saludar } from './main'\nimport { a, b } from './lib'"
    );
    assert!(!body_of(&files[1]).contains("import"));
}

#[test]
fn test_loop_protection_applies_to_every_file() {
    let config = SandboxConfig::default().with_options(ProcessSandboxedCodeOptions {
        infinite_loop_protection: true,
        ..ProcessSandboxedCodeOptions::default()
    });
    let files = prepared(process_sandboxed_files(
        &[
            js_file("main", "while (true) {}"),
            js_file("utils", "for (;;) {}"),
        ],
        &config,
    ));

    for file in &files {
        let body = body_of(file);
        assert!(body.contains("_wmloopvar"), "{body}");
        assert!(
            body.contains("window._handleInfiniteLoopException(new Error(\"Bucle infinito\"))"),
            "{body}"
        );
        assert!(body.contains("> 5000"), "{body}");
    }
}

#[test]
fn test_entry_syntax_error_fails_the_batch() {
    let outcome = process_sandboxed_files(
        &[
            js_file("main", "function (\n"),
            js_file("utils", "mostrar(1)"),
        ],
        &SandboxConfig::default(),
    );

    assert!(outcome.is_failed());
    let error = outcome.error().unwrap();
    assert_eq!(error.line, 1);
    assert!(error.stack.starts_with("SyntaxError: "), "{}", error.stack);
    assert!(error.stack.contains("at main:1:"), "{}", error.stack);

    let files = outcome.into_files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "main");
    assert_eq!(imports_of(&files[0]), ERROR_DISPLAY_IMPORTS);
    assert!(body_of(&files[0]).contains("Terminal.clear()"));
}

#[test]
fn test_sibling_error_stops_processing() {
    let outcome = process_sandboxed_files(
        &[
            js_file("main", "function saludar() {}"),
            js_file("roto", "const = 2"),
            js_file("despues", "saludar()"),
        ],
        &SandboxConfig::default(),
    );

    let SandboxOutcome::Failed(file) = &outcome else {
        panic!("batch should fail");
    };
    assert_eq!(file.name, "roto");
    assert!(file.sandboxed.is_none());

    let files = outcome.into_files();
    assert_eq!(files.len(), 1);
    assert!(body_of(&files[0]).contains("azul800(\"roto\")"));
}

#[test]
fn test_upstream_error_wins_before_processing() {
    let upstream = SandboxFileError {
        message: "Se esperaba una expresion".to_owned(),
        line: 3,
        column: 5,
        stack: "SyntaxError: Se esperaba una expresion\n    at utils:3:5".to_owned(),
    };
    let outcome = process_sandboxed_files(
        &[
            js_file("main", "function (\n"),
            SandboxFile::new("utils", "a\nb\nc = ;").with_error(upstream.clone()),
        ],
        &SandboxConfig::default(),
    );

    assert_eq!(outcome.error(), Some(&upstream));
    let files = outcome.into_files();
    assert_eq!(files[0].name, "utils");
    assert!(body_of(&files[0]).contains("null, 3, 5,"));
}

#[test]
fn test_processing_is_deterministic() {
    let batch = [
        js_file("main", "function uno() {}\nfunction dos() {}"),
        js_file("utils", "import { x } from './x'\nuno(); dos(x)"),
    ];
    let config = SandboxConfig::default().with_options(ProcessSandboxedCodeOptions {
        infinite_loop_protection: true,
        pre_format: true,
        ..ProcessSandboxedCodeOptions::default()
    });

    assert_eq!(
        process_sandboxed_files(&batch, &config),
        process_sandboxed_files(&batch, &config)
    );
}

#[test]
fn test_delivery_posts_only_successful_batches() {
    let config = SandboxConfig::default();
    let mut channel: Vec<HostMessage> = Vec::new();

    let files = process_and_deliver(&[js_file("main", "mostrar(1)")], &config, &mut channel)
        .expect("in-memory channel");
    assert_eq!(channel.len(), 1);
    assert_eq!(channel[0].action, FILES_COMPILED_ACTION);
    assert_eq!(channel[0].files_compiled, files);

    let files = process_and_deliver(&[js_file("main", "const = ")], &config, &mut channel)
        .expect("in-memory channel");
    assert_eq!(channel.len(), 1);
    assert_eq!(files.len(), 1);
    assert!(files[0].error.is_some());
}
