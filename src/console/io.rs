use std::io::{self, Write};

use colored::Colorize;

/// Print a line ending in `\r\n` so output stays aligned while the
/// terminal is in raw mode (the keyboard controller keeps it there for the
/// lifetime of the process).
pub fn println(text: &str) {
    print!("{}\r\n", text);
}

pub fn flush() {
    let _ = io::stdout().flush();
}

/// Clear the terminal and home the cursor.
pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
    flush();
}

pub fn print_error(text: &str) {
    println(&format!("{}  {}", "ERR".red().bold(), text));
}

pub fn print_info(text: &str) {
    println(&format!("{}   {}", "::".cyan().bold(), text));
}
