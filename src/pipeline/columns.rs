//! Header classification: which column plays which role.

use std::fmt;

use serde::Serialize;

use crate::error::{AppError, Result};

/// Semantic column category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    Name,
    SignIn,
    SignOut,
    ExtraHours,
    TotalHours,
    Department,
}

impl ColumnRole {
    /// Roles in the order they claim columns.
    pub const PRIORITY: [ColumnRole; 6] = [
        ColumnRole::Name,
        ColumnRole::SignIn,
        ColumnRole::SignOut,
        ColumnRole::ExtraHours,
        ColumnRole::TotalHours,
        ColumnRole::Department,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::SignIn => "signIn",
            Self::SignOut => "signOut",
            Self::ExtraHours => "extraHours",
            Self::TotalHours => "totalHours",
            Self::Department => "department",
        }
    }

    /// Canonical header text for this role, used in error messages.
    pub fn expected_header(self) -> &'static str {
        match self {
            Self::Name => "Employee",
            Self::SignIn => "Check In",
            Self::SignOut => "Check Out",
            Self::ExtraHours => "Extra Hours",
            Self::TotalHours => "Worked Hours",
            Self::Department => "Department",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Self::Name | Self::SignIn)
    }

    fn rules(self) -> &'static [HeaderRule] {
        match self {
            Self::Name => NAME_RULES,
            Self::SignIn => SIGN_IN_RULES,
            Self::SignOut => SIGN_OUT_RULES,
            Self::ExtraHours => EXTRA_HOURS_RULES,
            Self::TotalHours => TOTAL_HOURS_RULES,
            Self::Department => DEPARTMENT_RULES,
        }
    }

    /// Whether a normalized (lowercased, trimmed) header belongs to this role.
    fn matches(self, header: &str) -> bool {
        self.rules().iter().any(|rule| rule.matches(header))
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One header synonym.
#[derive(Debug, Clone, Copy)]
enum HeaderRule {
    /// Header contains the keyword.
    Contains(&'static str),
    /// Header is exactly the keyword.
    Exact(&'static str),
    /// Header contains every keyword.
    AllOf(&'static [&'static str]),
}

impl HeaderRule {
    fn matches(self, header: &str) -> bool {
        match self {
            Self::Contains(k) => header.contains(k),
            Self::Exact(k) => header == k,
            Self::AllOf(ks) => ks.iter().all(|k| header.contains(k)),
        }
    }
}

use HeaderRule::{AllOf, Contains, Exact};

const NAME_RULES: &[HeaderRule] = &[Contains("employee"), Contains("name"), Exact("staff")];

const SIGN_IN_RULES: &[HeaderRule] = &[
    Contains("check in"),
    Contains("checkin"),
    Contains("sign in"),
    Contains("signin"),
    Contains("time in"),
    Contains("in time"),
    Exact("in"),
    Contains("clock in"),
];

const SIGN_OUT_RULES: &[HeaderRule] = &[
    Contains("check out"),
    Contains("checkout"),
    Contains("sign out"),
    Contains("signout"),
    Contains("time out"),
    Contains("out time"),
    Exact("out"),
    Contains("clock out"),
];

const EXTRA_HOURS_RULES: &[HeaderRule] = &[
    Contains("extra"),
    Contains("overtime"),
    Contains("over time"),
    Contains("ot hours"),
    Contains("additional"),
];

const TOTAL_HOURS_RULES: &[HeaderRule] = &[
    Contains("worked hours"),
    Contains("total hours"),
    AllOf(&["worked", "hour"]),
    AllOf(&["total", "hour"]),
];

const DEPARTMENT_RULES: &[HeaderRule] = &[
    Contains("department"),
    Contains("dept"),
    Contains("division"),
    Contains("team"),
];

/// Column index per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub sign_in: Option<usize>,
    pub sign_out: Option<usize>,
    pub extra_hours: Option<usize>,
    pub total_hours: Option<usize>,
    pub department: Option<usize>,
}

impl ColumnMap {
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Name => self.name,
            ColumnRole::SignIn => self.sign_in,
            ColumnRole::SignOut => self.sign_out,
            ColumnRole::ExtraHours => self.extra_hours,
            ColumnRole::TotalHours => self.total_hours,
            ColumnRole::Department => self.department,
        }
    }

    fn slot(&mut self, role: ColumnRole) -> &mut Option<usize> {
        match role {
            ColumnRole::Name => &mut self.name,
            ColumnRole::SignIn => &mut self.sign_in,
            ColumnRole::SignOut => &mut self.sign_out,
            ColumnRole::ExtraHours => &mut self.extra_hours,
            ColumnRole::TotalHours => &mut self.total_hours,
            ColumnRole::Department => &mut self.department,
        }
    }

    /// Required column indices, or the first role that is missing.
    pub fn required(&self) -> Result<(usize, usize)> {
        let name = self.name.ok_or(AppError::MissingColumn { role: ColumnRole::Name })?;
        let sign_in = self.sign_in.ok_or(AppError::MissingColumn { role: ColumnRole::SignIn })?;
        Ok((name, sign_in))
    }
}

/// Role of a single header, if any: the first role in priority order that matches.
pub fn role_for_header(header: &str) -> Option<ColumnRole> {
    let normalized = header.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    ColumnRole::PRIORITY.into_iter().find(|role| role.matches(&normalized))
}

/// Assign columns to roles from the header row.
///
/// Headers are scanned left to right; each column takes the first role whose
/// rules match it, and the leftmost column wins when several claim a role.
/// Fails if `name` or `signIn` cannot be resolved.
pub fn classify<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMap> {
    let mut map = ColumnMap::default();

    for (index, header) in headers.iter().enumerate() {
        let Some(role) = role_for_header(header.as_ref()) else {
            continue;
        };
        let slot = map.slot(role);
        if slot.is_none() {
            *slot = Some(index);
        }
    }

    map.required()?;
    Ok(map)
}
