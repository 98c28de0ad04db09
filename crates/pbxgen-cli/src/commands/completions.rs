use super::EXIT_SUCCESS;
use clap::{Command, CommandFactory};
use clap_complete::Shell;
use std::io::Write;

pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    clap_complete::generate(shell, cmd, "pbxgen", out);
}

#[allow(clippy::unnecessary_wraps)]
pub fn run<C: CommandFactory>(shell: Shell) -> Result<u8, String> {
    write_completions(shell, &mut C::command(), &mut std::io::stdout());
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_completions_name_the_binary() {
        let mut cmd = Command::new("pbxgen").subcommand(Command::new("generate"));
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut cmd, &mut buf);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("pbxgen"));
        assert!(text.contains("generate"));
    }
}
