//! Department inference from employee names.

/// Fallback department for names matching no keyword.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Ordered keyword table; the first entry with a matching keyword wins.
const DEPARTMENT_KEYWORDS: &[(&[&str], &str)] = &[
    (&["dev", "tech", "it"], "IT"),
    (&["hr", "human"], "HR"),
    (&["finance", "account"], "Finance"),
    (&["market", "sales"], "Marketing"),
    (&["ops", "operation"], "Operations"),
    (&["admin"], "Administration"),
    (&["manager", "lead"], "Management"),
];

/// Guess a department from a name by case-insensitive substring match.
pub fn infer_department(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    DEPARTMENT_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, department)| *department)
        .unwrap_or(DEFAULT_DEPARTMENT)
}

/// Use the provided department when present, otherwise infer one.
pub fn resolve_department(provided: &str, employee_name: &str) -> String {
    let provided = provided.trim();
    if provided.is_empty() {
        infer_department(employee_name).to_string()
    } else {
        provided.to_string()
    }
}
