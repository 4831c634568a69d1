use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ContentsOutput<'a> {
    file: &'a str,
    line_count: usize,
    lines: &'a [String],
}

pub fn render_contents(file: &str, lines: &[String], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let out = ContentsOutput {
                file,
                line_count: lines.len(),
                lines,
            };
            let mut json = serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string());
            json.push('\n');
            json
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["LINE", file]);
            for (idx, line) in lines.iter().enumerate() {
                table.add_row(vec![(idx + 1).to_string(), line.clone()]);
            }
            format!("{table}\n")
        }
        OutputFormat::Pretty => {
            let mut out = format!("The contents of {file} obtained from the server are:\n\n");
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            out
        }
        OutputFormat::Raw => {
            let mut out = String::new();
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out
        }
    }
}

pub fn print_contents(file: &str, lines: &[String], format: OutputFormat) {
    let rendered = render_contents(file, lines, format);
    let mut out = std::io::stdout().lock();
    let _ = out.write_all(rendered.as_bytes());
    let _ = out.flush();
}
