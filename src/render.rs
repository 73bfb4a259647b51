// Plain-text rendering of the form: inputs, labels, per-field errors, the
// technologies controls, the submit control and the output area.

use crate::form::{FieldBinding, FormContext, InputKind};
use crate::validation::FieldPath;
use std::fmt::Write;

const INDENT: &str = "  ";

fn input_tag(kind: InputKind) -> &'static str {
    match kind {
        InputKind::File => "file",
        InputKind::Text => "text",
        InputKind::Email => "email",
        InputKind::Password => "password",
        InputKind::Number => "number",
    }
}

fn write_field(out: &mut String, binding: &FieldBinding, depth: usize) -> std::fmt::Result {
    let pad = INDENT.repeat(depth);
    let value = match binding.kind {
        InputKind::Password => "*".repeat(binding.value.chars().count()),
        InputKind::File if binding.value.is_empty() => "(no file selected)".to_string(),
        _ => binding.value.clone(),
    };
    writeln!(out, "{pad}{}", binding.label)?;
    writeln!(out, "{pad}{INDENT}[{}] {}", input_tag(binding.kind), value)?;
    if let Some(error) = &binding.error {
        writeln!(out, "{pad}{INDENT}! {error}")?;
    }
    Ok(())
}

/// Render the whole form, including the output area.
pub fn render_form(form: &FormContext) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_form(&mut out, form);
    out
}

fn write_form(out: &mut String, form: &FormContext) -> std::fmt::Result {
    for path in [FieldPath::Avatar, FieldPath::Name, FieldPath::Email, FieldPath::Password] {
        if let Ok(binding) = form.binding(path) {
            write_field(out, &binding, 0)?;
        }
    }

    writeln!(out, "Technologies [+ Add]")?;
    for (index, (key, _)) in form.techs().iter().enumerate() {
        writeln!(out, "{INDENT}#{} ({key})", index + 1)?;
        for path in [FieldPath::tech_title(index), FieldPath::tech_knowledge(index)] {
            if let Ok(binding) = form.binding(path) {
                write_field(out, &binding, 2)?;
            }
        }
        writeln!(out, "{INDENT}{INDENT}[- Remove]")?;
    }
    if let Some(error) = form.errors().message(&FieldPath::Techs) {
        writeln!(out, "{INDENT}! {error}")?;
    }

    writeln!(out, "[ Save ]")?;
    writeln!(out)?;
    writeln!(out, "Output:")?;
    if !form.output().is_empty() {
        writeln!(out, "{}", form.output())?;
    }
    Ok(())
}
