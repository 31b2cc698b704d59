//! Command-line options shared by `run` and `repl`.

use flow_eval::DEFAULT_MAX_DEPTH;

/// Interpreter settings taken from the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Recursion limit for user-function calls.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Split `args` into options and positional arguments.
///
/// Recognizes `--max-depth=N`. Any other argument starting with `--` is an
/// error.
pub fn parse_options(args: &[String]) -> Result<(Options, Vec<String>), String> {
    let mut options = Options::default();
    let mut positional = Vec::new();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--max-depth=") {
            options.max_depth = match value.parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => return Err(format!("invalid --max-depth value '{value}'")),
            };
        } else if arg.starts_with("--") {
            return Err(format!("unknown option '{arg}'"));
        } else {
            positional.push(arg.clone());
        }
    }

    Ok((options, positional))
}
