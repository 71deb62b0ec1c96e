use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented terminal input.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and wait for one trimmed line; `None` at end of input.
    pub async fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        self.next_line().await
    }

    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

/// Whether the input asks to leave the current screen.
pub fn is_quit(input: &str) -> bool {
    matches!(input, "q" | "quit" | "exit")
}

/// Parse a 1-based menu choice.
pub fn choice(input: &str, count: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

pub fn rule() {
    println!("{}", "─".repeat(60));
}
