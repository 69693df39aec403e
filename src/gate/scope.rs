use serde::Serialize;

const STATIC_EXTENSIONS: &[&str] = &[
    "svg", "png", "jpg", "jpeg", "gif", "webp", "ico", "woff", "woff2", "ttf", "otf",
];

/// Which paths the gate runs on, and which count as static assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatcherScope {
    /// Never evaluated: API calls, framework bundles, health probes
    pub excluded_prefixes: Vec<String>,
    /// Evaluated, but responses keep their own cache headers
    pub asset_prefixes: Vec<String>,
    pub static_extensions: Vec<String>,
}

impl Default for MatcherScope {
    fn default() -> Self {
        Self {
            excluded_prefixes: ["/api", "/_next/static", "/_next/image", "/favicon.ico", "/health"]
                .into_iter()
                .map(String::from)
                .collect(),
            asset_prefixes: ["/_next", "/static"].into_iter().map(String::from).collect(),
            static_extensions: STATIC_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl MatcherScope {
    /// True when the request skips the gate entirely
    pub fn bypasses(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| segment_prefix(path, prefix))
            || self.has_static_extension(path)
    }

    pub fn is_asset(&self, path: &str) -> bool {
        self.asset_prefixes
            .iter()
            .any(|prefix| segment_prefix(path, prefix))
            || self.has_static_extension(path)
    }

    fn has_static_extension(&self, path: &str) -> bool {
        let file = path.rsplit('/').next().unwrap_or(path);
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .static_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }
}

fn segment_prefix(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_and_framework_paths_bypass() {
        let scope = MatcherScope::default();
        assert!(scope.bypasses("/api"));
        assert!(scope.bypasses("/api/citas/12"));
        assert!(scope.bypasses("/_next/static/chunks/app.js"));
        assert!(scope.bypasses("/_next/image"));
        assert!(scope.bypasses("/favicon.ico"));
        assert!(scope.bypasses("/health"));
        assert!(!scope.bypasses("/apiary"));
        assert!(!scope.bypasses("/admin"));
    }

    #[test]
    fn image_and_font_files_bypass() {
        let scope = MatcherScope::default();
        assert!(scope.bypasses("/logo.svg"));
        assert!(scope.bypasses("/images/clinic/Front.JPG"));
        assert!(scope.bypasses("/fonts/inter.woff2"));
        assert!(!scope.bypasses("/medico/report.pdf"));
        assert!(!scope.bypasses("/.png"));
    }

    #[test]
    fn asset_paths_skip_cache_headers() {
        let scope = MatcherScope::default();
        assert!(scope.is_asset("/_next/data/build/page.json"));
        assert!(scope.is_asset("/static/app.css"));
        assert!(scope.is_asset("/logo.png"));
        assert!(!scope.is_asset("/login"));
        assert!(!scope.is_asset("/statics"));
    }
}
