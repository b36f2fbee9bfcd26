/// UrlBuilder service for download targets
pub struct UrlBuilder;

impl UrlBuilder {
    /// Joins a base URL and a relative path with exactly one `/` between them
    pub fn join(base: &str, path: &str) -> String {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Substitutes `{version}` in a release URL template
    pub fn release_url(template: &str, version: &str) -> String {
        template.replace("{version}", version)
    }

    /// The last path segment of a URL or relative path, without query or fragment
    pub fn basename(path: &str) -> Option<&str> {
        let without_query = path.split(['?', '#']).next().unwrap_or(path);
        without_query
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
    }
}
