//! Log output for the binary: `env_logger` with highlighted build notices.

use std::io::Write;

use env_logger::fmt::style::{AnsiColor, Style};

const BUILDING: Style = AnsiColor::Green.on_default();
const SKIPPING: Style = AnsiColor::Yellow.on_default();
const OS: Style = AnsiColor::Cyan.on_default();
const ARCH: Style = AnsiColor::Magenta.on_default();

/// Install the global logger. `RUST_LOG` overrides the `info` default.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = buf.default_level_style(record.level());
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{timestamp} {level}{:<5}{level:#}] {}",
                record.level(),
                style_notice(&record.args().to_string())
            )
        })
        .init();
}

/// Highlight the verb and the `os/arch` pair of a `building`/`skipping` notice.
///
/// Other messages come back unchanged. Escapes are stripped again by
/// `env_logger` when stderr is not a terminal.
pub fn style_notice(message: &str) -> String {
    let (verb, verb_style, rest) = if let Some(rest) = message.strip_prefix("building ") {
        ("building", BUILDING, rest)
    } else if let Some(rest) = message.strip_prefix("skipping ") {
        ("skipping", SKIPPING, rest)
    } else {
        return message.to_string();
    };

    let (platform, tail) = rest.split_once(' ').unwrap_or((rest, ""));
    let Some((os, arch)) = platform.split_once('/') else {
        return message.to_string();
    };

    let mut styled = format!("{verb_style}{verb}{verb_style:#} {OS}{os}{OS:#}/{ARCH}{arch}{ARCH:#}");
    if !tail.is_empty() {
        styled.push(' ');
        styled.push_str(tail);
    }
    styled
}
