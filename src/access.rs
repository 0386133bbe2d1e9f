use serde::{Deserialize, Serialize};

/// Administrative identity classes. Fixed at deploy time; a session either
/// carries exactly one of these or is unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "super-admin")]
    SuperAdmin,
    #[serde(rename = "content-manager")]
    ContentManager,
    #[serde(rename = "finance-manager")]
    FinanceManager,
    #[serde(rename = "teacher")]
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admin",
            Role::ContentManager => "content-manager",
            Role::FinanceManager => "finance-manager",
            Role::Teacher => "teacher",
        }
    }

    /// Fail-closed: anything that is not one of the four known constants
    /// parses to `None` and is treated as unauthenticated.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "super-admin" => Some(Role::SuperAdmin),
            "content-manager" => Some(Role::ContentManager),
            "finance-manager" => Some(Role::FinanceManager),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    /// "super-admin" -> "Super Admin", for the dashboard greeting.
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Addressable areas of the administrative interface. Static catalog; the
/// declaration order here is the canonical menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    Students,
    Results,
    Donations,
    Accounts,
    Routine,
    Gallery,
    Feedback,
}

pub const SECTION_CATALOG: [Section; 8] = [
    Section::Dashboard,
    Section::Students,
    Section::Results,
    Section::Donations,
    Section::Accounts,
    Section::Routine,
    Section::Gallery,
    Section::Feedback,
];

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Students => "students",
            Section::Results => "results",
            Section::Donations => "donations",
            Section::Accounts => "accounts",
            Section::Routine => "routine",
            Section::Gallery => "gallery",
            Section::Feedback => "feedback",
        }
    }

    pub fn parse(s: &str) -> Option<Section> {
        SECTION_CATALOG.iter().copied().find(|sec| sec.as_str() == s)
    }
}

/// The permission table. Every role includes `dashboard` so each role has a
/// landing page. Not editable at runtime.
fn role_sections(role: Role) -> &'static [Section] {
    match role {
        Role::SuperAdmin => &SECTION_CATALOG,
        Role::ContentManager => &[
            Section::Dashboard,
            Section::Routine,
            Section::Gallery,
            Section::Feedback,
        ],
        Role::FinanceManager => &[Section::Dashboard, Section::Donations, Section::Accounts],
        Role::Teacher => &[Section::Dashboard, Section::Students, Section::Results],
    }
}

/// Sections visible to the given role, in canonical catalog order. An absent
/// role yields the empty set, never a default-allow.
pub fn allowed_sections(role: Option<Role>) -> Vec<Section> {
    match role {
        Some(r) => SECTION_CATALOG
            .iter()
            .copied()
            .filter(|s| role_sections(r).contains(s))
            .collect(),
        None => Vec::new(),
    }
}

/// First allowed section in catalog order; the landing page after login and
/// the reset target when a held selection goes stale.
pub fn default_section(role: Option<Role>) -> Option<Section> {
    allowed_sections(role).first().copied()
}

/// Pure membership test. Checked when building the menu AND again when a
/// section's content is rendered: the active section is caller-held state
/// that can outlive the permission that justified it.
pub fn is_permitted(role: Option<Role>, section: Section) -> bool {
    match role {
        Some(r) => role_sections(r).contains(&section),
        None => false,
    }
}

/// Resolve a possibly stale selection against the current role. A selection
/// that is no longer permitted resets to the role's default section rather
/// than lingering until it renders as a denial.
pub fn reconcile_active(role: Option<Role>, active: Option<Section>) -> Option<Section> {
    match active {
        Some(section) if is_permitted(role, section) => Some(section),
        _ => default_section(role),
    }
}

/// Placeholder credential table. This is not a security boundary; it exists
/// so the AccessControl contract can be exercised end to end. A real identity
/// provider substitutes here without touching anything above.
pub fn authenticate(username: &str, password: &str) -> Option<Role> {
    match (username, password) {
        ("superadmin", "super123") => Some(Role::SuperAdmin),
        ("content", "content123") => Some(Role::ContentManager),
        ("finance", "finance123") => Some(Role::FinanceManager),
        ("teacher", "teacher123") => Some(Role::Teacher),
        _ => None,
    }
}
