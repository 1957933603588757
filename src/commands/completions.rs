//! Shell completions command

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::CompletionsArgs;
use crate::error::Result;

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut std::io::stdout().lock());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "modfetch", out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_completions_all_shells() {
        for shell in [
            Shell::Bash,
            Shell::Elvish,
            Shell::Fish,
            Shell::PowerShell,
            Shell::Zsh,
        ] {
            let script = generate(shell);
            assert!(script.contains("modfetch"), "{shell} completions mention the binary");
        }
    }

    #[test]
    fn test_completions_include_subcommands() {
        let script = generate(Shell::Bash);
        assert!(script.contains("install"));
        assert!(script.contains("cache"));
    }

    #[test]
    fn test_completions_run() {
        let args = CompletionsArgs { shell: Shell::Zsh };
        assert!(run(args).is_ok());
    }
}
