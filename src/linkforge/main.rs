use clap::Parser;
use colored::*;
use linkforge::api::{CmdMessage, ConfigAction, LinkForgeApi, Location, MessageLevel};
use linkforge::clipboard::copy_to_clipboard;
use linkforge::commands::LinkForgePaths;
use linkforge::config::LinkForgeConfig;
use linkforge::elevation;
use linkforge::error::Result;
use linkforge::explorer::open_in_file_manager;
use linkforge::model::HistoryEntry;
use linkforge::paths;
use linkforge::request::LinkRequest;
use linkforge::store::fs_backend::FsBackend;
use linkforge::store::HistoryStore;
use linkforge::validity::Severity;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands, LinkFields};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: LinkForgeApi<FsBackend>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Create { fields, dry_run }) => handle_create(&mut ctx, fields, dry_run),
        Some(Commands::Preview { fields, copy }) => handle_preview(&ctx, fields, copy),
        Some(Commands::History { invalid, json }) => handle_history(&ctx, invalid, json),
        Some(Commands::Check { link, source }) => handle_check(&ctx, &link, &source),
        Some(Commands::Path { index, source }) => handle_path(&ctx, index, source),
        Some(Commands::Open { index, source }) => handle_open(&ctx, index, source),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_history(&ctx, false, false),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

fn init_context() -> Result<AppContext> {
    let data_dir = paths::data_dir()?;

    let config = LinkForgeConfig::load_or_default(&data_dir);

    let backend = FsBackend::new(data_dir.clone()).with_file_name(&config.history_file);
    let history = HistoryStore::open(backend);
    let can_create = elevation::can_create(config.require_admin);
    debug!(
        "history at {}, {} record(s), can_create={}",
        history.location().display(),
        history.len(),
        can_create
    );

    let api = LinkForgeApi::new(history, LinkForgePaths { data_dir }, can_create);
    Ok(AppContext { api })
}

/// Builds a request from `--from N` (if any) with explicit fields taking precedence.
fn build_request(ctx: &AppContext, fields: LinkFields) -> Result<LinkRequest> {
    let mut request = match fields.from {
        Some(index) => ctx.api.request_from_history(index)?,
        None => LinkRequest::default(),
    };
    if let Some(source) = fields.source {
        request.source = source;
    }
    if let Some(parent) = fields.parent {
        request.parent = parent;
    }
    if let Some(name) = fields.name {
        request.name = name;
    }
    Ok(request)
}

fn handle_create(ctx: &mut AppContext, fields: LinkFields, dry_run: bool) -> Result<()> {
    let request = build_request(ctx, fields)?;
    let result = ctx.api.create_link(&request, dry_run)?;
    if let Some(preview) = &result.preview {
        println!("{}", preview.command);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_preview(ctx: &AppContext, fields: LinkFields, copy: bool) -> Result<()> {
    let request = build_request(ctx, fields)?;
    let result = ctx.api.preview(&request);
    let Some(preview) = &result.preview else {
        return Ok(());
    };

    println!("{}", preview.command);
    print_messages(&result.messages);

    if copy {
        if !preview.complete {
            print_messages(&[CmdMessage::warning(
                "Fill in source, parent and name before copying.",
            )]);
        } else if let Err(e) = copy_to_clipboard(&preview.command) {
            eprintln!("{} {}", "Warning:".yellow(), e);
        } else {
            print_messages(&[CmdMessage::success("Command copied to clipboard.")]);
        }
    }
    Ok(())
}

fn handle_history(ctx: &AppContext, only_invalid: bool, json: bool) -> Result<()> {
    let result = ctx.api.history(only_invalid);
    if json {
        println!("{}", serde_json::to_string_pretty(&result.listed)?);
        return Ok(());
    }
    print_history(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_check(ctx: &AppContext, link: &str, source: &str) -> Result<()> {
    let result = ctx.api.check(Path::new(link), Path::new(source));
    if let Some(validity) = &result.validity {
        let label = validity.label();
        let colored_label = match validity.severity() {
            Severity::Success => label.green(),
            Severity::Invalid => label.yellow(),
            Severity::Error => label.red(),
        };
        println!("{} {}", validity.code(), colored_label);
    }
    print_messages(&result.messages);
    Ok(())
}

fn location(source: bool) -> Location {
    if source {
        Location::Source
    } else {
        Location::Link
    }
}

fn handle_path(ctx: &AppContext, index: usize, source: bool) -> Result<()> {
    let result = ctx.api.locate(index, location(source), false)?;
    for path in &result.paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_open(ctx: &AppContext, index: usize, source: bool) -> Result<()> {
    let result = ctx.api.locate(index, location(source), true)?;
    for path in &result.paths {
        open_in_file_manager(path)?;
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            for (key, value) in config.entries() {
                println!("{} = {}", key, value);
            }
        }
        println!(
            "{}",
            format!("# history: {}", ctx.api.history_location().display()).dimmed()
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for msg in messages {
        match msg.level {
            MessageLevel::Info => println!("{}", msg.content.dimmed()),
            MessageLevel::Success => println!("{}", msg.content.green()),
            MessageLevel::Warning => println!("{}", msg.content.yellow()),
            MessageLevel::Error => println!("{}", msg.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 110;
const STATUS_WIDTH: usize = 27;
const TIME_WIDTH: usize = 16;

fn print_history(entries: &[HistoryEntry]) {
    for entry in entries {
        let idx_str = format!("{:>3}. ", entry.index);

        let (marker, label) = match entry.status.severity() {
            Severity::Success => ("✔".green(), entry.status.label().green()),
            Severity::Invalid => ("✘".yellow(), entry.status.label().yellow()),
            Severity::Error => ("✘".red(), entry.status.label().red()),
        };
        let label_width = entry.status.label().width();
        let label_padding = STATUS_WIDTH.saturating_sub(label_width + 2);

        let pair = format!(
            "{}  ->  {}",
            or_placeholder(&entry.record.link),
            or_placeholder(&entry.record.source)
        );
        let fixed_width = idx_str.width() + STATUS_WIDTH + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let pair_display = truncate_to_width(&pair, available);
        let padding = available.saturating_sub(pair_display.width());

        let time_ago = match entry.record.created_at_parsed() {
            Some(created) => format_time_ago(created),
            None => format!("{:>width$}", entry.record.created_at, width = TIME_WIDTH),
        };

        println!(
            "{}{} {}{}{}{}{}",
            idx_str,
            marker,
            label,
            " ".repeat(label_padding),
            pair_display,
            " ".repeat(padding),
            time_ago.dimmed()
        );
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        "?"
    } else {
        value
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(created: chrono::NaiveDateTime) -> String {
    let now = chrono::Local::now().naive_local();
    let duration = now.signed_duration_since(created);

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
