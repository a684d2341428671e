use anyhow::Result;
use clirunner_shell::{CommandExecutor, CommandRequest, ProcessCommandExecutor, ShellKind};

fn main() -> Result<()> {
    let command = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let command = if command.is_empty() {
        "echo hello".to_string()
    } else {
        command
    };

    let request = CommandRequest::new(command, ShellKind::detect(false));
    let output = ProcessCommandExecutor::new().execute(&request)?;

    println!("source: {:?}, exit: {:?}", output.source, output.exit_code);
    print!("{}", output.text);
    Ok(())
}
