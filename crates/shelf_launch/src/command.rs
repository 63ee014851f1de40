use std::process::Stdio;

use log::{debug, warn};
use tokio::process::Command;

use crate::plan::LaunchPlan;

impl LaunchPlan {
    /// Builds the process described by this plan, or `None` if the plan has
    /// nothing to run.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        let (program, args) = self.argv.split_first()?;

        let mut command = Command::new(program);

        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(&self.env)
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            match dir.is_dir() {
                true => {
                    command.current_dir(dir);
                }
                false => warn!(
                    "Working directory {} does not exist, keeping the current one",
                    dir.display()
                ),
            }
        }

        debug!("Running command: {:?}", command.as_std());

        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use crate::{plan::LaunchPlan, runtime::RuntimeKind};

    fn plan(argv: &[&str]) -> LaunchPlan {
        LaunchPlan {
            runtime: RuntimeKind::Native,
            prefix: None,
            initialize_prefix: false,
            env: [("WINEDEBUG".to_owned(), "-all".to_owned())]
                .into_iter()
                .collect::<IndexMap<_, _>>(),
            working_dir: Some(std::env::temp_dir()),
            file_dir: None,
            command_line: argv.join(" "),
            argv: argv.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn command_from_plan() {
        let command = plan(&["umu-run", "/games/My Game/game.exe", "-x"])
            .command()
            .unwrap();
        let command = command.as_std();

        assert_eq!(command.get_program(), "umu-run");
        assert_eq!(
            command.get_args().collect::<Vec<_>>(),
            ["/games/My Game/game.exe", "-x"]
        );
        assert_eq!(
            command.get_envs().collect::<Vec<_>>(),
            [(OsStr::new("WINEDEBUG"), Some(OsStr::new("-all")))]
        );
        assert_eq!(command.get_current_dir(), Some(std::env::temp_dir().as_path()));
    }

    #[test]
    fn nothing_to_run() {
        assert!(plan(&[]).command().is_none());
    }
}
