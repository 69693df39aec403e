use serde::Serialize;
use std::collections::BTreeSet;

use super::token::SessionClaims;

/// Fallback page for denied requests when a rule does not name its own
pub const DEFAULT_FALLBACK_PATH: &str = "/dashboard";

/// True for a same-origin absolute path.
///
/// Browsers read `//host` and `/\host` as scheme-relative URLs, so a
/// redirect to either leaves the site.
pub fn is_local_path(path: &str) -> bool {
    match path.strip_prefix('/') {
        Some(rest) => !rest.starts_with('/') && !rest.starts_with('\\'),
        None => false,
    }
}

/// Maps a path prefix to the roles allowed behind it.
///
/// A role matches when any one of its three identifiers is listed: the
/// numeric id, the display name, or the enum-style code. Token issuers are not
/// consistent about which of these they put in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub path_prefix: String,
    pub allowed_role_ids: BTreeSet<i64>,
    pub allowed_role_names: BTreeSet<String>,
    pub allowed_role_enums: BTreeSet<String>,
    pub fallback_path: String,
}

impl RouteRule {
    pub fn new(path_prefix: impl Into<String>, fallback_path: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            allowed_role_ids: BTreeSet::new(),
            allowed_role_names: BTreeSet::new(),
            allowed_role_enums: BTreeSet::new(),
            fallback_path: fallback_path.into(),
        }
    }

    pub fn role_id(mut self, id: i64) -> Self {
        self.allowed_role_ids.insert(id);
        self
    }

    pub fn role_name(mut self, name: impl Into<String>) -> Self {
        self.allowed_role_names.insert(name.into());
        self
    }

    pub fn role_enum(mut self, code: impl Into<String>) -> Self {
        self.allowed_role_enums.insert(code.into());
        self
    }

    /// Plain string prefix test, no segment boundary (`/admin` governs `/administration`)
    pub fn governs(&self, path: &str) -> bool {
        path.starts_with(&self.path_prefix)
    }

    pub fn admits(&self, claims: &SessionClaims) -> bool {
        let by_id = claims
            .role_id
            .is_some_and(|id| self.allowed_role_ids.contains(&id));
        let by_name = claims
            .role_name
            .as_ref()
            .is_some_and(|name| self.allowed_role_names.contains(name));
        let by_enum = claims
            .role_enum
            .as_ref()
            .is_some_and(|code| self.allowed_role_enums.contains(code));

        by_id || by_name || by_enum
    }
}

/// Ordered, immutable set of route rules
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The clinic's dashboards, one rule per role area
    pub fn clinic_defaults(fallback: &str) -> Self {
        Self::new(vec![
            RouteRule::new("/super-admin", fallback)
                .role_id(1)
                .role_name("Super Admin")
                .role_enum("super_admin"),
            RouteRule::new("/admin", fallback)
                .role_id(2)
                .role_name("Administrador")
                .role_enum("admin"),
            RouteRule::new("/medico", fallback)
                .role_id(3)
                .role_name("Medico")
                .role_enum("doctor"),
            RouteRule::new("/secretaria", fallback)
                .role_id(4)
                .role_name("Secretaria")
                .role_enum("secretary"),
            RouteRule::new("/paciente", fallback)
                .role_id(5)
                .role_name("Paciente")
                .role_enum("patient"),
            RouteRule::new("/patient", fallback)
                .role_id(5)
                .role_name("Paciente")
                .role_enum("patient"),
        ])
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Find the rule governing `path`.
    ///
    /// Longest matching prefix wins. Among prefixes of equal length the one
    /// registered first wins, so the result never depends on anything but
    /// table contents and order.
    pub fn find(&self, path: &str) -> Option<&RouteRule> {
        let mut best: Option<&RouteRule> = None;
        for rule in self.rules.iter().filter(|r| r.governs(path)) {
            match best {
                Some(current) if current.path_prefix.len() >= rule.path_prefix.len() => {}
                _ => best = Some(rule),
            }
        }
        best
    }
}

/// Paths reachable without a session
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublicRoutes {
    paths: Vec<String>,
}

impl PublicRoutes {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn clinic_defaults() -> Self {
        Self::new([
            "/",
            "/login",
            "/register",
            "/forgot-password",
            "/reset-password",
            "/unauthorized",
        ])
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// `/` only matches exactly. Every other entry matches itself and its sub-paths.
    pub fn is_public(&self, path: &str) -> bool {
        if path == "/" {
            return self.paths.iter().any(|p| p == "/");
        }

        self.paths.iter().filter(|p| p.as_str() != "/").any(|p| {
            path == p
                || path
                    .strip_prefix(p.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_paths_exclude_scheme_relative_forms() {
        assert!(is_local_path("/"));
        assert!(is_local_path("/dashboard"));
        assert!(is_local_path("/admin/usuarios"));

        assert!(!is_local_path(""));
        assert!(!is_local_path("dashboard"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
    }

    fn claims(id: Option<i64>, name: Option<&str>, code: Option<&str>) -> SessionClaims {
        SessionClaims {
            role_id: id,
            role_name: name.map(str::to_string),
            role_enum: code.map(str::to_string),
        }
    }

    #[test]
    fn root_is_public_only_by_exact_match() {
        let public = PublicRoutes::clinic_defaults();
        assert!(public.is_public("/"));
        assert!(!public.is_public("/x"));
        assert!(!public.is_public("/medico"));
    }

    #[test]
    fn public_entries_cover_sub_paths() {
        let public = PublicRoutes::clinic_defaults();
        assert!(public.is_public("/login"));
        assert!(public.is_public("/login/callback"));
        assert!(public.is_public("/reset-password/abc123"));
        assert!(!public.is_public("/login-help"));
        assert!(!public.is_public("/loginx"));
    }

    #[test]
    fn root_not_listed_means_root_is_protected() {
        let public = PublicRoutes::new(["/login"]);
        assert!(!public.is_public("/"));
    }

    #[test]
    fn find_uses_plain_prefix_match() {
        let table = RouteTable::clinic_defaults(DEFAULT_FALLBACK_PATH);
        assert_eq!(table.find("/medico/citas").map(|r| r.path_prefix.as_str()), Some("/medico"));
        assert_eq!(table.find("/administration").map(|r| r.path_prefix.as_str()), Some("/admin"));
        assert!(table.find("/dashboard").is_none());
    }

    #[test]
    fn longest_prefix_wins_regardless_of_order() {
        let table = RouteTable::new(vec![
            RouteRule::new("/admin", "/dashboard").role_id(2),
            RouteRule::new("/admin/reports", "/admin").role_id(7),
        ]);
        let rule = table.find("/admin/reports/monthly").unwrap();
        assert_eq!(rule.path_prefix, "/admin/reports");

        let reversed = RouteTable::new(table.rules().iter().rev().cloned().collect());
        let rule = reversed.find("/admin/reports/monthly").unwrap();
        assert_eq!(rule.path_prefix, "/admin/reports");
    }

    #[test]
    fn duplicate_prefixes_resolve_to_first_registered() {
        let table = RouteTable::new(vec![
            RouteRule::new("/reports", "/first").role_id(1),
            RouteRule::new("/reports", "/second").role_id(2),
        ]);
        assert_eq!(table.find("/reports").unwrap().fallback_path, "/first");
    }

    #[test]
    fn admits_on_any_identifier() {
        let rule = RouteRule::new("/medico", "/dashboard")
            .role_id(3)
            .role_name("Medico")
            .role_enum("doctor");

        assert!(rule.admits(&claims(Some(3), None, None)));
        assert!(rule.admits(&claims(None, Some("Medico"), None)));
        assert!(rule.admits(&claims(None, None, Some("doctor"))));
        assert!(rule.admits(&claims(Some(5), Some("Paciente"), Some("doctor"))));
        assert!(!rule.admits(&claims(Some(5), Some("Paciente"), Some("patient"))));
        assert!(!rule.admits(&SessionClaims::default()));
    }
}
