use std::io::IsTerminal;
use std::sync::OnceLock;

static DEBUG: OnceLock<bool> = OnceLock::new();
static ANSI: OnceLock<bool> = OnceLock::new();

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
            $crate::log::_debug(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log::_info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log::_error(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log::_warn(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! question {
    ($($arg:tt)*) => {
        $crate::log::_question(format!($($arg)*))
    };
}

pub fn init(verbose: bool) {
    let ansi = if std::env::var("NO_COLOR").is_ok() {
        false
    } else if std::env::var("FORCE_COLOR").is_ok() {
        true
    } else {
        std::io::stderr().is_terminal()
    };
    console::set_colors_enabled(ansi);
    console::set_colors_enabled_stderr(ansi);
    let _ = ANSI.set(ansi);

    let debug = verbose || cfg!(debug_assertions) || std::env::var("DEBUG").is_ok();
    let _ = DEBUG.set(debug);
}

// Both flags fall back to plain, quiet output when `init` never ran (unit tests).
fn ansi() -> bool {
    ANSI.get().copied().unwrap_or(false)
}

fn debug_enabled() -> bool {
    DEBUG.get().copied().unwrap_or(false)
}

fn tag(tag: &str, color: console::Color) -> String {
    if ansi() {
        console::style(tag).fg(color).bold().force_styling(true).to_string()
    } else {
        tag.to_string()
    }
}

pub fn _debug(message: String) {
    if debug_enabled() {
        eprintln!("{} {}", tag("D)", console::Color::Color256(8)), message);
    }
}

pub fn _info(message: String) {
    eprintln!("{} {}", tag("i)", console::Color::Blue), message);
}

pub fn _error(message: String) {
    eprintln!("{} {}", tag("X)", console::Color::Red), message);
}

pub fn _warn(message: String) {
    eprintln!("{} {}", tag("!)", console::Color::Yellow), message);
}

pub fn _question(message: String) -> String {
    format!("{} {}", tag("?)", console::Color::Color256(8)), message)
}

/// Forwards one output channel of an external tool to the debug log, line by line.
pub fn tool_output(tool: &str, channel: &str, output: &str) {
    if output.trim().is_empty() || !debug_enabled() {
        return;
    }
    for line in output.lines() {
        _debug(format!("[{} {}] {}", tool, channel, console::strip_ansi_codes(line)));
    }
}
