#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;

use surgical_console::Terminal;
use surgical_core::FIELDS;

/// Feeds canned answers and records prompts and messages in order.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    pub output: Vec<String>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: answers.into_iter().map(Into::into).collect(),
            output: Vec::new(),
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    /// The most recently printed records table.
    pub fn last_table(&self) -> Option<&str> {
        self.output
            .iter()
            .rev()
            .find(|line| line.starts_with("DATE") || line.as_str() == "(no records)")
            .map(String::as_str)
    }

    pub fn unanswered(&self) -> usize {
        self.input.len()
    }
}

impl Terminal for ScriptedTerminal {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.output.push(prompt.to_string());
        Ok(self.input.pop_front())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push(line.to_string());
        Ok(())
    }
}

/// One answer per form field in descriptor order; keys not listed are left
/// blank. Repeating a key models a re-prompt after invalid input.
pub fn form_answers(answers: &[(&str, &str)]) -> Vec<String> {
    let mut out = Vec::new();
    for spec in &FIELDS {
        let given: Vec<String> = answers
            .iter()
            .filter(|(key, _)| *key == spec.key)
            .map(|(_, value)| value.to_string())
            .collect();
        if given.is_empty() {
            out.push(String::new());
        } else {
            out.extend(given);
        }
    }
    out
}

pub fn login_answers() -> Vec<String> {
    vec!["admin".to_string(), "admin".to_string()]
}
