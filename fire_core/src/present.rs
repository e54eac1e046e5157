//! Presentation layer: result lines and usage text.

use std::io::{self, Write};
use std::path::Path;

use crate::registry::Registry;
use crate::symbol::{Kind, Symbol};
use crate::value::Value;

/// Results joined by single spaces, `None` when there is nothing to print.
pub fn render_results(values: &[Value]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
    Some(rendered.join(" "))
}

/// Base name of the raw argument at index 0.
pub fn program_name<S: AsRef<str>>(args: &[S]) -> String {
    let Some(first) = args.first() else {
        return String::new();
    };
    let raw = first.as_ref();
    Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw)
        .to_owned()
}

/// Usage text listing every command of `registry` with its parameter types.
///
/// A function registry produces `Usage:  prog i64 i64`. A method registry
/// produces a `Usage:  prog` header followed by one `prog name types...`
/// line per command, sorted by name. When any command is documented, every
/// line ends with ` -> <doc>`.
pub fn render_usage(program: &str, registry: &Registry<'_>) -> String {
    match registry.kind() {
        Kind::Function => {
            let mut line = format!("Usage:  {program}");
            if let Some(symbol) = registry.function() {
                push_params(&mut line, symbol);
            }
            line.push('\n');
            line
        }
        Kind::Method => {
            let documented = registry.has_docs();
            let mut text = format!("Usage:  {program}\n");
            for symbol in registry.symbols() {
                text.push_str(program);
                text.push(' ');
                text.push_str(symbol.name());
                push_params(&mut text, symbol);
                if documented {
                    text.push_str(" -> ");
                    text.push_str(symbol.documentation());
                }
                text.push('\n');
            }
            text
        }
    }
}

fn push_params(out: &mut String, symbol: &Symbol<'_>) {
    for tag in symbol.param_types() {
        out.push(' ');
        out.push_str(tag.as_str());
    }
}

/// Writes result lines and usage text to an output sink.
pub struct Presenter<'o> {
    out: Box<dyn Write + 'o>,
}

impl<'o> Presenter<'o> {
    pub fn new(out: impl Write + 'o) -> Self {
        Self { out: Box::new(out) }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn results(&mut self, values: &[Value]) -> io::Result<()> {
        if let Some(line) = render_results(values) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    pub fn usage(&mut self, program: &str, registry: &Registry<'_>) -> io::Result<()> {
        self.out.write_all(render_usage(program, registry).as_bytes())?;
        self.out.flush()
    }
}
