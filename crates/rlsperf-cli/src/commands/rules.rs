//! `rlsperf rules` - list the expanded rule sequence.

use anyhow::{Context, Result};
use std::fmt::{self, Write as _};

use rlsperf_core::RewriteConfig;
use rlsperf_rewrite::RuleSet;

pub fn run(config: &RewriteConfig) -> Result<()> {
    let rules = RuleSet::from_config(config).context("Invalid rewrite configuration")?;
    print!("{}", render(&rules).context("Failed to render rules")?);
    Ok(())
}

fn render(rules: &RuleSet) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Mode: {}", rules.mode())?;
    for (i, rule) in rules.rules().iter().enumerate() {
        writeln!(out, "{:>2}. {:<7} {}", i + 1, rule.kind().to_string(), rule)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rlsperf_core::FunctionTarget;

    #[test]
    fn test_render_custom_rules() {
        let config = RewriteConfig {
            targets: vec![FunctionTarget::new("auth.uid()", "(select auth.uid())")],
            ..RewriteConfig::default()
        };
        let rules = RuleSet::from_config(&config).unwrap();

        assert_eq!(
            render(&rules).unwrap(),
            "Mode: compat\n 1. wrap    auth.uid() -> (select auth.uid())\n"
        );
    }

    #[test]
    fn test_render_default_rules() {
        let rules = RuleSet::from_config(&RewriteConfig::default()).unwrap();
        let text = render(&rules).unwrap();

        assert_eq!(text.lines().count(), 8);
        assert!(text.contains(" 3. literal CREATE OR REPLACE FUNCTION public.(select public.get_auth_role())"));
    }
}
