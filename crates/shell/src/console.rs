use std::io::Write;

use colored::{ColoredString, Colorize};

use shoply_agent::runtime::ToolTraceEntry;

const PANEL_WIDTH_LIMIT: usize = 96;

/// Renders the chat surface: bordered panels for the assistant, dimmed
/// tool traces, plain prompts for the user.
#[derive(Default)]
pub struct Console;

impl Console {
    pub fn banner(&self) {
        self.print_panel("Welcome to the AI Shopping Assistant!", &|text| text.green().bold());
        println!(
            "Type your product request (e.g., 'I need running shoes', 'show me all products', \
             'wireless headphones under $100')."
        );
        println!("Type 'exit' or 'quit' to end the chat.");
        println!();
    }

    pub fn prompt(&self) {
        print!("{} ", "You:".cyan().bold());
        let _ = std::io::stdout().flush();
    }

    pub fn thinking(&self) {
        println!("{}", "Agent thinking...".magenta().bold());
    }

    pub fn agent_reply(&self, text: &str) {
        self.print_panel(&format!("Agent: {text}"), &|text| text.green());
    }

    pub fn tool_trace(&self, entries: &[ToolTraceEntry]) {
        for entry in entries {
            println!("{}", format!("Tool Call: {}({})", entry.tool, entry.arguments).dimmed());
            println!("{}", format!("Tool Output: {}", pretty_json(&entry.output)).dimmed());
        }
    }

    pub fn error(&self, message: &str) {
        self.print_panel(&format!("Error: {message}"), &|text| text.red().bold());
    }

    pub fn goodbye(&self) {
        self.print_panel("Thank you for using the Shopping Assistant. Goodbye!", &|text| {
            text.yellow().bold()
        });
    }

    fn print_panel(&self, text: &str, paint: &dyn Fn(&str) -> ColoredString) {
        let (width, lines) = panel_content(text, PANEL_WIDTH_LIMIT);

        println!("{}", paint(&format!("╭{}╮", "─".repeat(width + 2))));
        for line in &lines {
            let padding = " ".repeat(width - line.chars().count());
            println!("{} {line}{padding} {}", paint("│"), paint("│"));
        }
        println!("{}", paint(&format!("╰{}╯", "─".repeat(width + 2))));
    }
}

fn panel_content(text: &str, limit: usize) -> (usize, Vec<String>) {
    let lines = wrap_text(text, limit);
    let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    (width, lines)
}

/// Lines within the limit keep their spacing; only overlong lines are
/// re-flowed on word boundaries.
fn wrap_text(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut wrapped = Vec::new();

    for raw_line in text.split('\n') {
        let line = raw_line.trim_end();
        if line.chars().count() <= limit {
            wrapped.push(line.to_owned());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if current.is_empty() {
                current = place_word(word, word_len, limit, &mut wrapped);
            } else if current_len + 1 + word_len <= limit {
                current.push(' ');
                current.push_str(word);
            } else {
                wrapped.push(std::mem::take(&mut current));
                current = place_word(word, word_len, limit, &mut wrapped);
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }

    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

/// Words longer than the limit are hard-broken; the final chunk becomes the
/// new current line.
fn place_word(word: &str, word_len: usize, limit: usize, wrapped: &mut Vec<String>) -> String {
    if word_len <= limit {
        return word.to_owned();
    }

    let chars: Vec<char> = word.chars().collect();
    let mut chunks: Vec<String> =
        chars.chunks(limit).map(|chunk| chunk.iter().collect()).collect();
    let last = chunks.pop().unwrap_or_default();
    wrapped.extend(chunks);
    last
}

fn pretty_json(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| raw.to_owned())
}
