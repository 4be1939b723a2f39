use clap::{Command, ValueEnum};
use clap_complete::{Shell as CompleteShell, generate};
use std::io;

#[derive(ValueEnum, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

/// Generate shell integration for the specified shell
pub fn generate_shell_integration(shell: Shell) {
    match shell {
        Shell::Bash => print_bash_integration(),
        Shell::Zsh => print_zsh_integration(),
        Shell::Fish => print_fish_integration(),
    }
}

/// Generate native shell completions using clap
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    let clap_shell = match shell {
        Shell::Bash => CompleteShell::Bash,
        Shell::Zsh => CompleteShell::Zsh,
        Shell::Fish => CompleteShell::Fish,
    };

    generate(
        clap_shell,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn print_bash_integration() {
    println!(
        r#"# Grove shell integration for Bash
# This wraps the grove binary with a shell function that can change directories.
# The bare invocation prints the selected worktree path on stdout; the wrapper
# captures it and cds there, since a child process cannot move its parent.

grove() {{
    if [ $# -eq 0 ]; then
        local result
        result=$(grove-bin) || return $?
        if [ -n "$result" ]; then
            cd "$result" || return 1
        fi
    else
        grove-bin "$@"
    fi
}}

# Load clap-generated completions for the wrapped binary
if command -v grove-bin >/dev/null 2>&1; then
    eval "$(grove-bin completions bash 2>/dev/null)"
fi"#
    );
}

fn print_zsh_integration() {
    println!(
        r#"# Grove shell integration for Zsh
# This wraps the grove binary with a shell function that can change directories.

grove() {{
    if [ $# -eq 0 ]; then
        local result
        result=$(grove-bin) || return $?
        if [ -n "$result" ]; then
            cd "$result" || return 1
        fi
    else
        grove-bin "$@"
    fi
}}

# Load clap-generated completions for the wrapped binary
if command -v grove-bin >/dev/null 2>&1; then
    eval "$(grove-bin completions zsh 2>/dev/null)"
fi"#
    );
}

fn print_fish_integration() {
    println!(
        r#"# Grove shell integration for Fish
# This wraps the grove binary with a shell function that can change directories.

function grove
    if test (count $argv) -eq 0
        set -l result (grove-bin)
        or return $status
        if test -n "$result"
            cd $result
            or return 1
        end
    else
        grove-bin $argv
    end
end

# Load clap-generated completions for the wrapped binary
if command -v grove-bin >/dev/null 2>&1
    grove-bin completions fish 2>/dev/null | source
end"#
    );
}
