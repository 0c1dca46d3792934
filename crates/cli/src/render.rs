//! Plain-text and JSON rendering of inspection outcomes.

use png_info_parser::{DisplayRecord, GenerationInfo, Outcome};

use crate::config::View;

const RULE_WIDTH: usize = 40;
const NO_SD_INFO: &str = "(no Stable Diffusion information found)";

pub fn render(outcome: &Outcome, view: View) -> anyhow::Result<String> {
    if view == View::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(outcome)?));
    }
    Ok(match outcome {
        Outcome::Display(record) => render_record(record, view),
        Outcome::Error(err) => format!("{}\n", err.message),
    })
}

fn render_record(record: &DisplayRecord, view: View) -> String {
    let mut out = String::new();
    push_field(&mut out, "Dimensions", &record.dimensions);
    push_field(&mut out, "File size", &record.file_size);
    push_field(&mut out, "File name", &record.file_name);
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    match view {
        View::Sd => push_generation(&mut out, &record.generation),
        _ => push_block(&mut out, "tEXt", &record.general_info),
    }
    out
}

fn push_generation(out: &mut String, info: &GenerationInfo) {
    if info.is_empty() {
        push_block(out, "SD info", NO_SD_INFO);
        return;
    }
    if !info.prompt.is_empty() {
        push_block(out, "Prompt", &info.prompt);
    }
    if !info.negative_prompt.is_empty() {
        push_block(out, "Negative Prompt", &info.negative_prompt);
    }
    if !info.trailing_parameters.is_empty() {
        push_block(out, "Parameters", &info.trailing_parameters);
    }
    if !info.others.is_empty() {
        push_block(out, "Other tEXt info", &info.others_text());
    }
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("{label:<12}{value}\n"));
}

fn push_block(out: &mut String, label: &str, text: &str) {
    out.push_str(&format!("== {label} ==\n{text}\n"));
}
