use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::decode::{Decoded, FieldValue};

// Gap between the longest field name and the value column.
const NAME_GAP: usize = 5;

/// Render one certificate's decoded fields as an aligned table, followed by
/// any warnings. Colorization is decided entirely by the sink: an ANSI
/// stream gets colors, a no-color buffer (or redirected stdout) gets plain
/// text, so output is deterministic under test.
pub fn render(out: &mut dyn WriteColor, decoded: &Decoded) -> Result<()> {
    let padding = decoded
        .fields
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0)
        + NAME_GAP;

    for field in &decoded.fields {
        write!(out, "{:<padding$}", format!("{}:", field.name))?;
        match &field.value {
            FieldValue::Single(value) => {
                write_value(out, field.name, value)?;
                writeln!(out)?;
            }
            FieldValue::Multi(values) => {
                if values.is_empty() {
                    writeln!(out)?;
                    continue;
                }
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(out, "{:padding$}", "")?;
                    }
                    write_value(out, field.name, value)?;
                    writeln!(out)?;
                }
            }
        }
    }

    if !decoded.warnings.is_empty() {
        writeln!(out)?;
        for warning in &decoded.warnings {
            writeln!(out, "warning: {}", warning)?;
        }
    }
    Ok(())
}

fn write_value(out: &mut dyn WriteColor, name: &str, value: &str) -> Result<()> {
    let color = match name {
        "CN" | "Subject" => Some(Color::Blue),
        "Validity" if value.starts_with("valid") => Some(Color::Green),
        "Validity" if value.starts_with("expired") => Some(Color::Red),
        _ => None,
    };
    match color {
        Some(color) => {
            out.set_color(ColorSpec::new().set_fg(Some(color)))?;
            write!(out, "{}", value)?;
            out.reset()?;
        }
        None => write!(out, "{}", value)?,
    }
    Ok(())
}
