//! User interface implementations

#[cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::deps::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using indicatif
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Bold => style(message).bold().to_string(),
            MessageStyle::Cyan => style(message).cyan().to_string(),
            MessageStyle::Yellow => style(message).yellow().to_string(),
            MessageStyle::Warning => style(message).yellow().bold().to_string(),
            MessageStyle::Error => style(message).red().bold().to_string(),
            MessageStyle::Success => style(message).green().bold().to_string(),
        };
        println!("{styled}");
    }

    fn is_interactive(&self) -> bool {
        atty::is(atty::Stream::Stdin)
    }

    fn prompt_input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        use dialoguer::{theme::ColorfulTheme, Input};

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt);

        if let Some(default_val) = default {
            input = input.default(default_val.to_string());
        }

        input
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to get input: {}", e))
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

// Test implementations for mocking

/// Test UI implementation that captures output
#[cfg(test)]
pub struct TestUserInterface {
    pub output: Arc<Mutex<Vec<String>>>,
    pub styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    pub prompt_responses: Arc<Mutex<Vec<String>>>,
    pub interactive: bool,
}

#[cfg(test)]
impl TestUserInterface {
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Vec::new())),
            styled_output: Arc::new(Mutex::new(Vec::new())),
            prompt_responses: Arc::new(Mutex::new(Vec::new())),
            interactive: false,
        }
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn with_prompt_response(self, response: &str) -> Self {
        self.prompt_responses
            .lock()
            .unwrap()
            .push(response.to_string());
        self
    }

    pub fn get_output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        self.styled_output.lock().unwrap().clone()
    }

    /// Messages printed through the warning channel.
    pub fn warnings(&self) -> Vec<String> {
        self.styled_output
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, style)| *style == MessageStyle::Warning)
            .map(|(msg, _)| msg.clone())
            .collect()
    }
}

#[cfg(test)]
impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        Box::new(TestProgressIndicator)
    }

    fn print(&self, message: &str) {
        self.output.lock().unwrap().push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Add to both styled output and regular output for easier testing
        self.styled_output
            .lock()
            .unwrap()
            .push((message.to_string(), style));
        self.output.lock().unwrap().push(message.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn prompt_input(&self, _prompt: &str, default: Option<&str>) -> Result<String> {
        if let Some(response) = self.prompt_responses.lock().unwrap().pop() {
            return Ok(response);
        }
        Ok(default.unwrap_or("test-value").to_string())
    }
}

#[cfg(test)]
struct TestProgressIndicator;

#[cfg(test)]
impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, _message: &str) {}

    fn finish_and_clear(&self) {}
}
