use colored::*;

use crate::gate::BatchValidation;
use crate::permissions::FeatureModule;
use crate::registry::ActionTemplate;

/// Console handles terminal output with colored formatting
pub struct Console {
    allowed_color: Color,
    denied_color: Color,
    accent_color: Color,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self {
            allowed_color: Color::Green,
            denied_color: Color::Red,
            accent_color: Color::Cyan,
        }
    }

    /// Print a section header
    pub fn print_header(&self, title: &str) {
        println!("{}", title.color(self.accent_color).bold());
        println!("{}", "-".repeat(60).bright_black());
    }

    /// Print the outcome of a batch validation
    ///
    /// `needs_confirmation` is consulted for each allowed action.
    pub fn print_batch<F>(&self, batch: &BatchValidation, needs_confirmation: F)
    where
        F: Fn(&crate::core::AgentAction) -> bool,
    {
        self.print_header(&format!(
            "Allowed ({}/{})",
            batch.valid.len(),
            batch.len()
        ));
        for action in &batch.valid {
            let marker = if needs_confirmation(action) {
                " (confirmation required)".yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "{} {}{}",
                "✓".color(self.allowed_color),
                action.summary(),
                marker
            );
        }
        println!();

        self.print_header(&format!("Denied ({}/{})", batch.invalid.len(), batch.len()));
        for denied in &batch.invalid {
            println!(
                "{} {}",
                "✗".color(self.denied_color),
                denied.action.summary()
            );
            println!("    {}", denied.reason.bright_black());
        }
    }

    /// Print available features
    pub fn print_features(&self, features: &[FeatureModule]) {
        self.print_header("Available features");
        if features.is_empty() {
            println!("{}", "(none)".bright_black());
        }
        for feature in features {
            println!("  {}", feature.as_str().color(self.allowed_color));
        }
    }

    /// Print action templates
    pub fn print_templates<'a>(&self, templates: impl IntoIterator<Item = &'a ActionTemplate>) {
        self.print_header("Action templates");
        for template in templates {
            println!(
                "  {:<28} {:<14} {}",
                template.id.color(self.accent_color).bold(),
                template.action_type.as_str(),
                template.description
            );
        }
    }

    /// Print an error message
    pub fn print_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
