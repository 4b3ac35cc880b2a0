use crate::memory::Addr;
use crate::simulator::utils::report::View;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
  Step(u32), // Step N instructions
  Quit,
  Continue,
  Examine { addr: Addr, count: usize, view: View },
}

const HELP: &str = "Use Enter to step, 'si N' to step N times, 'c' to continue, 'x ADDR N' / 'xb ADDR N' to examine words / bytes, 'q' to quit";

fn parse_number(s: &str) -> std::result::Result<u64, String> {
  let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    Some(hex) => u64::from_str_radix(hex, 16),
    None => s.parse::<u64>(),
  };
  parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}

/// Parse one shell line. An empty line steps once.
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
  let mut parts = line.split_whitespace();
  let cmd = match parts.next() {
    None => return Ok(Command::Step(1)),
    Some(cmd) => cmd,
  };
  let args: Vec<&str> = parts.collect();

  match cmd {
    "q" => Ok(Command::Quit),
    "c" => Ok(Command::Continue),
    "si" => {
      let n = args.first().ok_or("'si' requires a number, e.g., 'si 100'")?;
      match n.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Command::Step(n)),
        Ok(_) => Err("step count must be greater than 0".to_string()),
        Err(e) => Err(format!("invalid number '{}': {}", n, e)),
      }
    }
    "x" | "xb" => {
      if args.len() != 2 {
        return Err(format!("usage: {} ADDR N", cmd));
      }
      let addr = parse_number(args[0])?;
      let count = parse_number(args[1])? as usize;
      let view = if cmd == "x" { View::Word } else { View::Byte };
      Ok(Command::Examine { addr, count, view })
    }
    other => Err(format!("Unknown command: '{}'. {}", other, HELP)),
  }
}

pub struct Shell {
  editor: DefaultEditor,
}

impl Shell {
  pub fn new() -> Result<Self> {
    let editor = DefaultEditor::new().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(Self { editor })
  }

  pub fn read_command(&mut self) -> Result<Command> {
    loop {
      match self.editor.readline("(g233) ") {
        Ok(line) => {
          let trimmed = line.trim();
          if !trimmed.is_empty() {
            let _ = self.editor.add_history_entry(trimmed);
          }
          match parse_command(trimmed) {
            Ok(cmd) => return Ok(cmd),
            Err(msg) => eprintln!("Error: {}", msg),
          }
        }
        // Ctrl-C / Ctrl-D: quit
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(Command::Quit),
        Err(e) => return Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_step() {
    assert_eq!(parse_command(""), Ok(Command::Step(1)));
    assert_eq!(parse_command("si 100"), Ok(Command::Step(100)));
    assert!(parse_command("si").is_err());
    assert!(parse_command("si 0").is_err());
    assert!(parse_command("si abc").is_err());
  }

  #[test]
  fn test_parse_examine() {
    assert_eq!(
      parse_command("x 0x2000 8"),
      Ok(Command::Examine {
        addr: 0x2000,
        count: 8,
        view: View::Word
      })
    );
    assert_eq!(
      parse_command("xb 16384 0x4"),
      Ok(Command::Examine {
        addr: 0x4000,
        count: 4,
        view: View::Byte
      })
    );
    assert!(parse_command("x 0x2000").is_err());
    assert!(parse_command("x zz 1").is_err());
  }

  #[test]
  fn test_parse_misc() {
    assert_eq!(parse_command("q"), Ok(Command::Quit));
    assert_eq!(parse_command("c"), Ok(Command::Continue));
    assert!(parse_command("run").is_err());
  }
}
