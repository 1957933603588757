use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    modfetch completions --shell bash > ~/.bash_completion.d/modfetch\n\n\
                  Generate zsh completions:\n    modfetch completions --shell zsh > ~/.zfunc/_modfetch\n\n\
                  Generate fish completions:\n    modfetch completions --shell fish > ~/.config/fish/completions/modfetch.fish\n\n\
                  Generate PowerShell completions:\n    modfetch completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub shell: Shell,
}
