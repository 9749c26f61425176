//! Terminal detection for choosing fancy or plain output

use std::io::IsTerminal;

/// Environment variables that mark a CI run
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "BUILDKITE",
    "JENKINS_URL",
    "TF_BUILD",
];

/// How output should be rendered for this invocation
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    auto_yes: bool,
    stdout_reserved: bool,
}

impl UiContext {
    /// Inspect stdio and the environment
    pub fn detect() -> Self {
        let on_tty = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        let in_ci = CI_VARS.iter().any(|var| std::env::var_os(var).is_some());
        Self {
            interactive: on_tty && !in_ci,
            auto_yes: false,
            stdout_reserved: false,
        }
    }

    /// Plain output, prompts answered with their defaults
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
            stdout_reserved: false,
        }
    }

    /// Answer every confirmation with yes (`--yes`)
    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    /// Keep stdout for the command's result; status lines go to stderr
    pub fn with_stdout_reserved(mut self) -> Self {
        self.stdout_reserved = true;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners, progress bars and cliclack framing
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Write one plain status line
    pub(super) fn emit(&self, line: &str) {
        if self.stdout_reserved {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}
