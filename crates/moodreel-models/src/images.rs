pub const NO_POSTER: &str = "assets/images/no-poster.jpg";
pub const NO_PROFILE: &str = "assets/images/no-profile.jpg";

/// Builds image asset URLs against the catalog's image host.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> String {
        self.sized("w500", path, NO_POSTER)
    }

    pub fn backdrop(&self, path: Option<&str>) -> String {
        self.sized("original", path, NO_POSTER)
    }

    pub fn profile(&self, path: Option<&str>) -> String {
        self.sized("w185", path, NO_PROFILE)
    }

    fn sized(&self, size: &str, path: Option<&str>, fallback: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(p) => format!("{}/{}{}", self.base, size, p),
            None => fallback.to_string(),
        }
    }
}
