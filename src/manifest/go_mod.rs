//! Parser for Go module files (`go.mod`).
//!
//! Only the parts of the syntax noticegen needs are modelled: the module
//! path and the `require` entries with their `// indirect` marker. Other
//! directives are validated for shape and otherwise ignored.
//!
//! ```text
//! module example.com/service
//!
//! require github.com/pkg/errors v0.9.1
//!
//! require (
//!     gopkg.in/yaml.v3 v3.0.1
//!     golang.org/x/sys v0.20.0 // indirect
//! )
//! ```

/// Directives accepted at the top level of a `go.mod` file.
const KNOWN_DIRECTIVES: [&str; 10] = [
    "module", "go", "toolchain", "godebug", "require", "exclude", "replace", "retract", "tool",
    "ignore",
];

/// Directives that may open a parenthesized block.
const BLOCK_DIRECTIVES: [&str; 7] =
    ["require", "exclude", "replace", "retract", "godebug", "tool", "ignore"];

/// One `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoRequirement {
    /// Module path
    pub path: String,
    /// Required version
    pub version: String,
    /// Whether the entry is marked `// indirect`
    pub indirect: bool,
}

/// Parsed contents of a `go.mod` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModFile {
    /// Path declared by the `module` directive
    pub module: Option<String>,
    /// All `require` entries, in file order
    pub requirements: Vec<GoRequirement>,
}

impl GoModFile {
    /// Requirements not marked `// indirect`.
    pub fn direct_requirements(&self) -> impl Iterator<Item = &GoRequirement> {
        self.requirements.iter().filter(|r| !r.indirect)
    }
}

/// Parse `go.mod` content.
///
/// # Errors
///
/// Returns a message with the offending line number for unknown
/// directives, malformed `module`/`require` lines, stray `)` and
/// unterminated blocks.
pub fn parse(content: &str) -> Result<GoModFile, String> {
    let mut file = GoModFile::default();
    let mut block: Option<(&str, usize)> = None;

    for (index, raw_line) in content.lines().enumerate() {
        let line_no = index + 1;
        let (code, comment) = split_comment(raw_line);
        let tokens: Vec<&str> = code.split_whitespace().collect();

        if tokens.is_empty() {
            continue;
        }

        if let Some((verb, _)) = block {
            if tokens == [")"] {
                block = None;
                continue;
            }
            apply_entry(&mut file, verb, &tokens, comment, line_no)?;
            continue;
        }

        let verb = tokens[0];
        if verb == ")" {
            return Err(format!("line {line_no}: unexpected ')'"));
        }
        if !KNOWN_DIRECTIVES.contains(&verb) {
            return Err(format!("line {line_no}: unknown directive: {verb}"));
        }

        if tokens.len() == 2 && tokens[1] == "(" {
            if !BLOCK_DIRECTIVES.contains(&verb) {
                return Err(format!("line {line_no}: {verb} does not accept a block"));
            }
            block = Some((verb, line_no));
            continue;
        }

        apply_entry(&mut file, verb, &tokens[1..], comment, line_no)?;
    }

    if let Some((verb, line_no)) = block {
        return Err(format!("line {line_no}: unterminated {verb} block"));
    }

    Ok(file)
}

fn apply_entry(
    file: &mut GoModFile,
    verb: &str,
    args: &[&str],
    comment: Option<&str>,
    line_no: usize,
) -> Result<(), String> {
    match verb {
        "module" => {
            if args.len() != 1 {
                return Err(format!("line {line_no}: usage: module module/path"));
            }
            file.module = Some(unquote(args[0]).to_string());
        }
        "require" => {
            if args.len() != 2 {
                return Err(format!("line {line_no}: usage: require module/path v1.2.3"));
            }
            file.requirements.push(GoRequirement {
                path: unquote(args[0]).to_string(),
                version: unquote(args[1]).to_string(),
                indirect: comment.is_some_and(is_indirect),
            });
        }
        _ => {
            if args.is_empty() {
                return Err(format!("line {line_no}: missing arguments for {verb}"));
            }
        }
    }
    Ok(())
}

fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.find("//") {
        Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
        None => (line, None),
    }
}

fn is_indirect(comment: &str) -> bool {
    comment
        .split_whitespace()
        .next()
        .is_some_and(|word| word == "indirect" || word.starts_with("indirect;"))
}

fn unquote(token: &str) -> &str {
    token.strip_prefix('"').and_then(|t| t.strip_suffix('"')).unwrap_or(token)
}
