//! Job script templating
//!
//! The operator's job script carries placeholder tokens. Each placeholder has
//! a fixed replacement policy: the user placeholder is replaced at its first
//! occurrence only, all others everywhere.
//!
//! Rendering is a single left-to-right pass, so text that was substituted in
//! is never scanned for placeholders again.

/// A placeholder recognised in job templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Cluster user of the repository
    User,
    /// Arguments for the runner's registration command
    RunnerConfigLine,
    /// Launcher token the runner registers with
    LaunchToken,
    /// Path of the runner's log file
    LogFile,
}

/// How many occurrences of a placeholder get replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrences {
    First,
    All,
}

impl Placeholder {
    pub const ALL: [Placeholder; 4] = [
        Placeholder::User,
        Placeholder::RunnerConfigLine,
        Placeholder::LaunchToken,
        Placeholder::LogFile,
    ];

    /// Literal token as written in the template
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::User => "$USER",
            Placeholder::RunnerConfigLine => "%RUNNER_CONFIG_LINE%",
            Placeholder::LaunchToken => "%LAUNCH_TOKEN%",
            Placeholder::LogFile => "%LOG_FILE%",
        }
    }

    // TODO: confirm with the template authors whether `$USER` should be
    // replaced everywhere like the other placeholders.
    pub fn occurrences(self) -> Occurrences {
        match self {
            Placeholder::User => Occurrences::First,
            _ => Occurrences::All,
        }
    }
}

/// Replacement values for every placeholder
#[derive(Debug, Clone)]
pub struct Substitutions<'a> {
    pub user: &'a str,
    pub runner_config_line: &'a str,
    pub launch_token: &'a str,
    pub log_file: &'a str,
}

impl Substitutions<'_> {
    fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::User => self.user,
            Placeholder::RunnerConfigLine => self.runner_config_line,
            Placeholder::LaunchToken => self.launch_token,
            Placeholder::LogFile => self.log_file,
        }
    }
}

/// Renders `template` with the given substitutions
pub fn render(template: &str, subs: &Substitutions<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut exhausted = [false; Placeholder::ALL.len()];
    let mut rest = template;

    loop {
        let next = Placeholder::ALL
            .iter()
            .enumerate()
            .filter(|(i, _)| !exhausted[*i])
            .filter_map(|(i, p)| rest.find(p.token()).map(|pos| (pos, i, *p)))
            .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, index, placeholder)) = next else {
            out.push_str(rest);
            return out;
        };

        out.push_str(&rest[..pos]);
        out.push_str(subs.value(placeholder));
        rest = &rest[pos + placeholder.token().len()..];

        if placeholder.occurrences() == Occurrences::First {
            exhausted[index] = true;
        }
    }
}
