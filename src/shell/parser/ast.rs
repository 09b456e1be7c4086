/// One command of a pipeline: the program name plus its arguments in the
/// order the user wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum RedirectMode {
    #[default]
    Truncate,
    Append,
}

/// File overrides for a whole pipeline. At most one input and one output
/// redirect are meaningful; when the same direction is given twice the last
/// occurrence wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedirectSpec {
    pub input: Option<String>,
    pub output: Option<String>,
    pub mode: RedirectMode,
}

impl RedirectSpec {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none()
    }
}

/// One parsed statement: a non-empty chain of commands whose standard
/// streams connect left to right, plus the pipeline-level redirects. The
/// first command reads from `redirects.input`, the last writes to
/// `redirects.output`; intermediate commands only see their neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandPipeline {
    pub commands: Vec<Command>,
    pub redirects: RedirectSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_spec_defaults() {
        let spec = RedirectSpec::default();
        assert!(spec.is_empty());
        assert_eq!(spec.mode, RedirectMode::Truncate);
    }

    #[test]
    fn test_redirect_spec_with_output_not_empty() {
        let spec = RedirectSpec {
            output: Some("out.txt".to_string()),
            ..RedirectSpec::default()
        };
        assert!(!spec.is_empty());
    }
}
