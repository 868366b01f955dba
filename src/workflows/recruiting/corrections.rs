use serde::{Deserialize, Serialize};

/// Known recruiter spelling variants, matched by fragment in roster order.
const DEFAULT_RECRUITERS: &[(&str, &str)] = &[
    ("Guerrero", "Robinson Guerrero"),
    ("Dana", "Dana Schwartz"),
    ("Julia", "Julia Peoples"),
    ("Robyn", "Robyn Halliday"),
];

/// Line manager names that arrive misspelled from the requisition.
const DEFAULT_LINE_MANAGERS: &[(&str, &str)] = &[("Zacri Byam", "Zac Byam")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterAlias {
    pub fragment: String,
    pub canonical: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFix {
    pub from: String,
    pub to: String,
}

/// Explicit lookup of name corrections applied during application normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCorrections {
    #[serde(default)]
    pub recruiters: Vec<RecruiterAlias>,
    #[serde(default)]
    pub line_managers: Vec<NameFix>,
}

impl Default for NameCorrections {
    fn default() -> Self {
        Self {
            recruiters: DEFAULT_RECRUITERS
                .iter()
                .map(|(fragment, canonical)| RecruiterAlias {
                    fragment: (*fragment).to_string(),
                    canonical: (*canonical).to_string(),
                })
                .collect(),
            line_managers: DEFAULT_LINE_MANAGERS
                .iter()
                .map(|(from, to)| NameFix {
                    from: (*from).to_string(),
                    to: (*to).to_string(),
                })
                .collect(),
        }
    }
}

impl NameCorrections {
    /// First roster entry whose fragment appears anywhere in the raw recruiter name.
    pub fn recruiter(&self, raw: &str) -> Option<&str> {
        self.recruiters
            .iter()
            .find(|alias| raw.contains(alias.fragment.as_str()))
            .map(|alias| alias.canonical.as_str())
    }

    pub fn line_manager<'a>(&'a self, name: &'a str) -> &'a str {
        self.line_managers
            .iter()
            .find(|fix| fix.from == name)
            .map(|fix| fix.to.as_str())
            .unwrap_or(name)
    }
}

/// Reorder a `"Family, Given"` name into `"Given Family"`.
///
/// Names that do not split into exactly two parts on `", "` yield an empty string.
pub fn given_first(raw: &str) -> String {
    let parts: Vec<&str> = raw.split(", ").collect();
    match parts.as_slice() {
        [family, given] => format!("{given} {family}"),
        _ => String::new(),
    }
}
