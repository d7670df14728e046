//! The interactive shell the user is dropped into once the tree exists.

use crate::config::Settings;
use crate::env::Environment;
use crate::error::ReplayError;
use crate::external::ExternalCommand;
use std::path::Path;

/// `PS1` that shows the working directory relative to `root`, with `/` for the root itself.
pub fn prompt(root: &Path) -> String {
    format!(
        r"$(pwd | sed s%^{root}%% | sed s_^\$_/_) \$ ",
        root = root.display()
    )
}

/// The two lines printed before handing over, framed by blank lines.
pub fn banner(root: &Path) -> String {
    format!(
        "\nAbout to drop you into a pretend shell (you're actually under {})\nrun `exit` when you're done\n\n",
        root.display()
    )
}

/// Environment for the shell: everything from `base`, started in `root`, with the prompt overridden.
pub fn shell_environment(base: &Environment, root: &Path) -> Environment {
    let mut env = base.rooted_at(root);
    env.set_var("PS1", prompt(root));
    env
}

/// Resolve the configured shell program in `env`.
pub fn interactive_shell(
    settings: &Settings,
    env: &Environment,
) -> Result<ExternalCommand, ReplayError> {
    let args: Vec<&str> = settings.shell_args.iter().map(String::as_str).collect();
    ExternalCommand::resolve(env, &settings.shell, &args)
        .ok_or_else(|| ReplayError::ShellNotFound(settings.shell.clone()))
}
