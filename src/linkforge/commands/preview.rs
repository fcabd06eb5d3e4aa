use crate::commands::{CmdMessage, CmdResult};
use crate::request::LinkRequest;
use std::path::Path;

const SOURCE_PLACEHOLDER: &str = "<Source Path>";
const PARENT_PLACEHOLDER: &str = "<Parent Dir>";
const NAME_PLACEHOLDER: &str = "<Link Name>";

/// The `mklink` command equivalent to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPreview {
    pub command: String,
    /// False while any field was left empty and shows a placeholder. Not copyable then.
    pub complete: bool,
}

pub fn render(request: &LinkRequest) -> CommandPreview {
    let source = request.source.trim();
    let display_source = if source.is_empty() {
        SOURCE_PLACEHOLDER.to_string()
    } else {
        format!("\"{}\"", source)
    };

    let display_link = match request.link_path() {
        Some(path) => format!("\"{}\"", path.display()),
        None => {
            let parent = non_empty_or(request.parent.trim(), PARENT_PLACEHOLDER);
            let name = non_empty_or(request.name.trim(), NAME_PLACEHOLDER);
            format!("\"{}\"", Path::new(parent).join(name).display())
        }
    };

    let complete = !source.is_empty() && request.link_path().is_some();
    let command = format!("mklink /J {} {}", display_link, display_source);
    CommandPreview { command, complete }
}

pub fn run(request: &LinkRequest) -> CmdResult {
    let preview = render(request);
    let mut result = CmdResult::default();
    if !preview.complete {
        result.add_message(CmdMessage::info(
            "Fill in source, parent and name to get a usable command.",
        ));
    }
    result.with_preview(preview)
}

fn non_empty_or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
