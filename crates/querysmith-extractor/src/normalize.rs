//! Dictionary normalization of extracted entity names
//!
//! Lookups are case-insensitive on the trimmed value; anything not in the
//! dictionary passes through unchanged.

const COMPANY_NAMES: &[(&str, &str)] = &[
    ("alphabet", "Alphabet Inc."),
    ("google", "Google"),
    ("microsoft", "Microsoft"),
    ("apple", "Apple Inc."),
    ("amazon", "Amazon"),
    ("meta", "Meta"),
    ("facebook", "Meta"),
];

const SKILL_NAMES: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("py", "Python"),
    ("nodejs", "Node.js"),
    ("reactjs", "React"),
];

fn lookup(table: &[(&str, &str)], value: String) -> String {
    let key = value.trim().to_lowercase();
    table
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(value)
}

/// Canonical form of a company name
pub fn normalize_company(company: String) -> String {
    lookup(COMPANY_NAMES, company)
}

/// Canonical form of a skill name
pub fn normalize_skill(skill: String) -> String {
    lookup(SKILL_NAMES, skill)
}
