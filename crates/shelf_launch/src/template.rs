//! Argument templates.
//!
//! Emulator, launcher and wrapper arguments are plain strings which may reference
//! the launched file through placeholders. A template is split into words first
//! and placeholders are substituted per word, so a substituted path is always one
//! argument. Unknown or unresolvable placeholders are left in place.

use std::{borrow::Cow, path::Path};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placeholder {
    /// Full path to the file.
    File,
    /// Directory containing the file.
    FileDir,
    /// File name with extension.
    FileName,
    /// File name without extension.
    FileBase,
}

impl Placeholder {
    /// Substitution order. `{file}` goes last.
    pub const ALL: [Placeholder; 4] = [
        Placeholder::FileDir,
        Placeholder::FileName,
        Placeholder::FileBase,
        Placeholder::File,
    ];

    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::File => "{file}",
            Placeholder::FileDir => "{fileDir}",
            Placeholder::FileName => "{fileName}",
            Placeholder::FileBase => "{fileBase}",
        }
    }
}

const QUOTED_FILE: &str = "\"{file}\"";

/// Path components of the launched file, as substituted into templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileParts {
    pub path: String,
    pub dir: String,
    pub name: String,
    pub base: String,
}

impl FileParts {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        let lossy = |s: Option<&std::ffi::OsStr>| {
            s.map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        Self {
            path: path.to_string_lossy().into_owned(),
            dir: path
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name: lossy(path.file_name()),
            base: lossy(path.file_stem()),
        }
    }

    fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::File => &self.path,
            Placeholder::FileDir => &self.dir,
            Placeholder::FileName => &self.name,
            Placeholder::FileBase => &self.base,
        }
    }
}

/// Renders one argument so that [`words`] reads it back unchanged.
///
/// Plain values are left as they are. Anything with whitespace, quotes or
/// backslashes is wrapped in double quotes, or in single quotes when double
/// quotes would need escaping.
#[must_use]
pub fn quote(value: &str) -> Cow<'_, str> {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if plain {
        return Cow::Borrowed(value);
    }

    match (value.contains(['"', '\\']), value.contains('\'')) {
        (false, _) => Cow::Owned(format!("\"{value}\"")),
        (true, false) => Cow::Owned(format!("'{value}'")),
        (true, true) => {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            Cow::Owned(format!("\"{escaped}\""))
        }
    }
}

/// Renders an argument vector as a single command line.
#[must_use]
pub fn render(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One argument of a template.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// Some part of the word was written in quotes.
    pub quoted: bool,
}

/// Splits a template into arguments, honoring single and double quotes.
///
/// Inside double quotes `\"` and `\\` are escapes, any other backslash is literal.
#[must_use]
pub fn words(template: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut word: Option<Word> = None;
    let mut quote = None;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some('"') if c == '\\' && matches!(chars.peek().copied(), Some('"' | '\\')) => {
                if let Some(escaped) = chars.next() {
                    current(&mut word).text.push(escaped);
                }
            }
            Some(q) if q == c => quote = None,
            Some(_) => current(&mut word).text.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current(&mut word).quoted = true;
            }
            None if c.is_whitespace() => words.extend(word.take()),
            None => current(&mut word).text.push(c),
        }
    }

    words.extend(word);
    words
}

fn current(word: &mut Option<Word>) -> &mut Word {
    word.get_or_insert_with(Word::default)
}

/// Whether `template` references the launched file in any way.
#[must_use]
pub fn references_file(template: &str) -> bool {
    Placeholder::ALL.iter().any(|p| template.contains(p.token()))
}

/// Expands `template` into arguments, substituting all placeholders from `file`.
///
/// Every word of the template stays one argument whatever the substituted values
/// contain, so `{file}` and `"{file}"` are equivalent. Without a file the
/// placeholders are kept as written.
#[must_use]
pub fn expand(template: &str, file: Option<&FileParts>) -> Vec<String> {
    words(template)
        .into_iter()
        .map(|word| match file {
            Some(file) => substitute(&word.text, Some(file), &file.path),
            None => word.text,
        })
        .collect()
}

/// Replaces `{fileDir}`, `{fileName}`, `{fileBase}` from `file` (if any), and
/// `{file}` with `file_value` verbatim.
pub(crate) fn substitute(template: &str, file: Option<&FileParts>, file_value: &str) -> String {
    let mut result = template.to_owned();

    for placeholder in Placeholder::ALL {
        let token = placeholder.token();
        if !result.contains(token) {
            continue;
        }

        let value = match (placeholder, file) {
            (Placeholder::File, _) => file_value,
            (_, Some(file)) => file.value(placeholder),
            (_, None) => continue,
        };

        result = result.replace(token, value);
    }

    result
}

/// Combines an emulator argument template with an item-level one.
///
/// When both reference `{file}`, the item template takes the place of the
/// emulator's `{file}`. Otherwise they are joined, item arguments last.
#[must_use]
pub fn combine(base: &str, item: &str) -> String {
    let (base, item) = (base.trim(), item.trim());
    let file = Placeholder::File.token();

    if base.contains(file) && item.contains(file) {
        return base.replacen(file, item, 1);
    }

    match (base.is_empty(), item.is_empty()) {
        (true, _) => item.to_owned(),
        (_, true) => base.to_owned(),
        _ => format!("{base} {item}"),
    }
}

/// Drops a leading `{file}` (or `"{file}"`) from arguments given to a native
/// title. The executable is the file itself, so an emulator-style template left
/// over from another media type must not pass it again.
#[must_use]
pub fn strip_native_file(args: &str) -> &str {
    let args = args.trim();
    [QUOTED_FILE, Placeholder::File.token()]
        .iter()
        .find_map(|token| {
            args.strip_prefix(token)
                .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
        .unwrap_or(args)
        .trim()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::{
        combine, expand, quote, references_file, render, strip_native_file, words, FileParts,
        Word,
    };

    fn file(path: &str) -> FileParts {
        FileParts::new(Path::new(path))
    }

    fn texts(command: &str) -> Vec<String> {
        words(command).into_iter().map(|w| w.text).collect()
    }

    #[test]
    fn placeholders() {
        let mario = file("/games/Mario.smc");

        assert_eq!(expand("{fileBase}.sav", Some(&mario)), ["Mario.sav"]);
        assert_eq!(expand("--dir {fileDir}", Some(&mario)), ["--dir", "/games"]);
        assert_eq!(expand("{fileName}", Some(&mario)), ["Mario.smc"]);
        assert_eq!(expand("-f {file}", Some(&mario)), ["-f", "/games/Mario.smc"]);
    }

    #[test]
    fn substituted_values_stay_one_argument() {
        let game = file("/games/Super Mario World/Kirby's Adventure.nes");

        assert_eq!(
            expand("-f {file}", Some(&game)),
            ["-f", "/games/Super Mario World/Kirby's Adventure.nes"]
        );
        assert_eq!(expand("-f \"{file}\"", Some(&game)), expand("-f {file}", Some(&game)));
        assert_eq!(
            expand("--save {fileDir}/{fileBase}.sav", Some(&game)),
            ["--save", "/games/Super Mario World/Kirby's Adventure.sav"]
        );
        assert_eq!(
            render(&expand("-f {file}", Some(&game))),
            "-f \"/games/Super Mario World/Kirby's Adventure.nes\""
        );
    }

    #[test]
    fn unresolved_placeholders_stay() {
        assert_eq!(expand("{file} {fileDir}", None), ["{file}", "{fileDir}"]);
        assert_eq!(
            expand("{unknown} {file}", Some(&file("/a/b"))),
            ["{unknown}", "/a/b"]
        );
    }

    #[test]
    fn combine_templates() {
        assert_eq!(
            combine("mame {file} -rompath x", "-video opengl"),
            "mame {file} -rompath x -video opengl"
        );
        assert_eq!(
            combine("-batch -- {file}", "-fullscreen {file}"),
            "-batch -- -fullscreen {file}"
        );
        assert_eq!(combine("", " -x "), "-x");
        assert_eq!(combine(" {file} ", ""), "{file}");
    }

    #[test]
    fn strip_native() {
        assert_eq!(strip_native_file("{file} -windowed"), "-windowed");
        assert_eq!(strip_native_file(" \"{file}\" -windowed"), "-windowed");
        assert_eq!(strip_native_file("{file}"), "");
        assert_eq!(strip_native_file("-batch {file} -x"), "-batch {file} -x");
        assert_eq!(strip_native_file("{file}.cfg -x"), "{file}.cfg -x");
        assert_eq!(strip_native_file(" -windowed "), "-windowed");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("/a/b"), "/a/b");
        assert_eq!(quote("/a b"), "\"/a b\"");
        assert_eq!(quote("Kirby's"), "\"Kirby's\"");
        assert_eq!(quote("say \"hi\""), "'say \"hi\"'");
        assert_eq!(quote(""), "\"\"");
        assert!(references_file("-x {fileBase}.cfg"));
        assert!(!references_file("-x"));
    }

    #[test]
    fn split_words() {
        assert_eq!(
            words("umu-run \"/games/My Game/game.exe\" -x '' 'a \"b\"'"),
            [
                Word {
                    text: "umu-run".into(),
                    quoted: false
                },
                Word {
                    text: "/games/My Game/game.exe".into(),
                    quoted: true
                },
                Word {
                    text: "-x".into(),
                    quoted: false
                },
                Word {
                    text: String::new(),
                    quoted: true
                },
                Word {
                    text: "a \"b\"".into(),
                    quoted: true
                },
            ]
        );
        assert_eq!(texts(r#""C:\games" "a \"b\" \\""#), [r"C:\games", r#"a "b" \"#]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn rendered_arguments_split_back() {
        let argv = [
            "/usr/bin/mame",
            "/roms/Kirby's_Adventure.nes",
            "/roms/My Games",
            "say \"hi\"",
            "it's \"quoted\" \\ here",
            r"C:\games",
            "",
            "-rompath",
        ]
        .map(String::from);

        assert_eq!(texts(&render(&argv)), argv);
    }
}
