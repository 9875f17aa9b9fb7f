//! `quill rules` command implementation.

use std::path::PathBuf;

use clap::Args;
use quill_config::Config;
use quill_segmenter::MarkupRule;

use crate::error::CliError;
use crate::output::Output;
use crate::render::rule_style;

/// Arguments for the rules command.
#[derive(Args)]
pub(crate) struct RulesArgs {
    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

impl RulesArgs {
    /// Execute the rules command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let rules = config.segment_config().rules;

        if rules.is_empty() {
            output.warning("No markup rules configured");
            return Ok(());
        }

        let colored = !self.no_color && console::colors_enabled();
        for rule in &rules {
            output.content(&describe_rule(rule, colored));
        }

        Ok(())
    }
}

/// One-line description: swatch, id, name, markers and color.
fn describe_rule(rule: &MarkupRule, colored: bool) -> String {
    let sample = format!("{}sample{}", rule.start, rule.end);
    let swatch = if colored {
        rule_style(rule).apply_to(&sample).to_string()
    } else {
        sample
    };
    let color = if rule.color.is_empty() {
        "-"
    } else {
        rule.color.as_str()
    };
    format!("{swatch}  [{}] {} ({color})", rule.id, rule.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_describe_rule_plain() {
        let rule = MarkupRule::new("1", "\"", "\"")
            .with_name("Speech")
            .with_color("#2563eb");
        assert_eq!(
            describe_rule(&rule, false),
            "\"sample\"  [1] Speech (#2563eb)"
        );
    }

    #[test]
    fn test_describe_rule_without_color() {
        let rule = MarkupRule::new("ooc", "((", "))");
        assert_eq!(describe_rule(&rule, false), "((sample))  [ooc] ooc (-)");
    }

    #[test]
    fn test_describe_rule_colored() {
        let rule = MarkupRule::new("2", "*", "*").with_color("#e11d48");
        let described = describe_rule(&rule, true);
        assert!(described.contains('\u{1b}'));
        assert_eq!(
            console::strip_ansi_codes(&described),
            "*sample*  [2] 2 (#e11d48)"
        );
    }
}
