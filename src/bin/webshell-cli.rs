//! webshell CLI - drive the terminal engine from a native stdin/stdout
//!
//! Same tokenizer, registry, built-ins and history as the browser build,
//! minus the keyboard router. `exit` or EOF quits.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use webshell::shell::{Config, EditableSurface, OutputSink, Selection, Stream, Terminal};

/// Prints lines as they are emitted
struct StdioSink;

impl OutputSink for StdioSink {
    fn append(&mut self, stream: Stream, text: &str) {
        match stream {
            Stream::Stdout => println!("{}", text),
            Stream::Stderr => eprintln!("{}", text),
        }
    }

    fn clear(&mut self) {
        // ANSI clear screen, cursor home
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }
}

/// Holds the rendered prompt; nothing reads it back
#[derive(Default)]
struct LineBuffer {
    value: String,
    selection: Selection,
}

impl EditableSurface for LineBuffer {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(json) => match Config::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("webshell: {}", e);
                std::process::exit(2);
            }
        },
        None => Config::default(),
    };
    let prompt = config.prompt_region();

    let mut term = Terminal::new(config).with_output(Rc::new(RefCell::new(StdioSink)));
    if let Err(e) = term.init(&mut LineBuffer::default()) {
        eprintln!("webshell: {}", e);
        std::process::exit(1);
    }

    println!("webshell v{} (native)", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for available commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut status = 0;

    loop {
        print!("{}", prompt);
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(['\r', '\n']);
                if matches!(line.trim(), "exit" | "quit") {
                    break;
                }
                status = term.execute(line).status_code;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    std::process::exit(status);
}
