use shelf_cfg::LaunchWrapper;

use crate::template::{render, substitute, words, FileParts, Placeholder};

/// Nests `inner` into `wrappers`, the first wrapper ending up outermost.
///
/// A bare `{file}` argument of a wrapper is replaced with the arguments built so
/// far. Inside a larger or quoted argument, as in `sh -c "{file}"`, it becomes the
/// rendered command line instead. A wrapper not referencing `{file}` gets the
/// command appended. Other file placeholders refer to `file`. Wrappers with an
/// empty path are skipped.
#[must_use]
pub fn compose(
    inner: Vec<String>,
    wrappers: &[LaunchWrapper],
    file: Option<&FileParts>,
) -> Vec<String> {
    let token = Placeholder::File.token();

    wrappers.iter().rev().fold(inner, |command, wrapper| {
        let path = wrapper.path.trim();
        if path.is_empty() {
            return command;
        }

        let words = words(&wrapper.args);
        let nests = words.iter().any(|w| w.text.contains(token));
        let command_line = render(&command);

        let mut argv = vec![path.to_owned()];
        for word in words {
            match word.text == token && !word.quoted {
                true => argv.extend(command.iter().cloned()),
                false => argv.push(substitute(&word.text, file, &command_line)),
            }
        }

        if !nests {
            argv.extend(command);
        }

        argv
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use shelf_cfg::LaunchWrapper;

    use super::compose;
    use crate::template::FileParts;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn nests_first_wrapper_outermost() {
        let wrappers = [
            LaunchWrapper::new("W1").with_args("--outer {file}"),
            LaunchWrapper::new("W2").with_args("--inner {file} --after"),
        ];

        assert_eq!(
            compose(argv(&["C", "arg"]), &wrappers, None),
            ["W1", "--outer", "W2", "--inner", "C", "arg", "--after"]
        );
    }

    #[test]
    fn appends_when_no_file_placeholder() {
        let wrappers = [LaunchWrapper::new("gamescope").with_args("-f --")];

        assert_eq!(
            compose(argv(&["emu", "rom"]), &wrappers, None),
            ["gamescope", "-f", "--", "emu", "rom"]
        );
    }

    #[test]
    fn skips_empty_paths_and_keeps_wrapper_paths_whole() {
        let wrappers = [
            LaunchWrapper::new("  "),
            LaunchWrapper::new("/opt/my tools/run"),
        ];

        assert_eq!(
            compose(argv(&["emu"]), &wrappers, None),
            ["/opt/my tools/run", "emu"]
        );
    }

    #[test]
    fn quoted_file_becomes_one_command_line() {
        let wrappers = [LaunchWrapper::new("sh").with_args("-c \"{file}\"")];

        assert_eq!(
            compose(argv(&["/games/My Game/run", "-x"]), &wrappers, None),
            ["sh", "-c", "\"/games/My Game/run\" -x"]
        );
    }

    #[test]
    fn wrapper_file_placeholders_refer_to_the_file() {
        let file = FileParts::new(Path::new("/roms/Mario Bros.smc"));
        let wrappers = [LaunchWrapper::new("log").with_args("--name {fileBase} {file}")];

        assert_eq!(
            compose(argv(&["emu", "/roms/Mario Bros.smc"]), &wrappers, Some(&file)),
            ["log", "--name", "Mario Bros", "emu", "/roms/Mario Bros.smc"]
        );
    }

    #[test]
    fn no_wrappers() {
        assert_eq!(compose(argv(&["emu", "rom"]), &[], None), ["emu", "rom"]);
    }
}
