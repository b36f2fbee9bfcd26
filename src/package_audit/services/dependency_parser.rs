use std::collections::HashSet;

/// Markers on indented dependency-query lines that name a further dependency
const DEPENDENCY_MARKERS: [&str; 3] = ["Depends:", "PreDepends:", "Pre-Depends:"];

/// DependencyParser service for `apt-rdepends` output
///
/// Unindented lines are package names. Indented lines carrying a
/// `Depends:`/`PreDepends:` marker contribute the first whitespace-delimited
/// token after the colon. Names are returned once, in order of first
/// appearance.
pub struct DependencyParser;

impl DependencyParser {
    pub fn parse(output: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for line in output.lines() {
            let candidate = if line.starts_with(char::is_whitespace) {
                Self::dependency_from_indented(line)
            } else {
                let name = line.trim();
                // Status chatter such as "Reading package lists... Done" is not a name
                if name.is_empty() || name.contains(char::is_whitespace) {
                    None
                } else {
                    Some(name)
                }
            };

            if let Some(name) = candidate {
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }

        names
    }

    fn dependency_from_indented(line: &str) -> Option<&str> {
        let trimmed = line.trim_start();
        let marker = DEPENDENCY_MARKERS
            .iter()
            .find(|marker| trimmed.starts_with(**marker))?;
        trimmed[marker.len()..].split_whitespace().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURL_OUTPUT: &str = "\
curl
  Depends: libc6 (>= 2.34)
  Depends: libcurl4 (= 7.88.1-10+deb12u5)
  Depends: zlib1g (>= 1:1.1.4)
libc6
  Depends: libgcc-s1
libcurl4
  Depends: libc6 (>= 2.34)
  PreDepends: dpkg (>= 1.17)
libgcc-s1
  Depends: gcc-12-base (= 12.2.0-14)
zlib1g
";

    #[test]
    fn test_parse_collects_unindented_names_in_order() {
        let names = DependencyParser::parse(CURL_OUTPUT);
        assert_eq!(names[0], "curl");
        assert!(names.contains(&"libc6".to_string()));
        assert!(names.contains(&"zlib1g".to_string()));
    }

    #[test]
    fn test_parse_adds_names_from_depends_lines() {
        let names = DependencyParser::parse(CURL_OUTPUT);
        assert!(names.contains(&"gcc-12-base".to_string()));
        assert!(names.contains(&"dpkg".to_string()));
    }

    #[test]
    fn test_parse_deduplicates() {
        let names = DependencyParser::parse(CURL_OUTPUT);
        let libc_count = names.iter().filter(|n| n.as_str() == "libc6").count();
        assert_eq!(libc_count, 1);
        assert_eq!(
            names,
            vec![
                "curl",
                "libc6",
                "libcurl4",
                "zlib1g",
                "libgcc-s1",
                "dpkg",
                "gcc-12-base"
            ]
        );
    }

    #[test]
    fn test_parse_ignores_status_lines_and_other_fields() {
        let output = "Reading package lists... Done\nhello\n  Suggests: foo\n  Depends: libc6\n";
        assert_eq!(DependencyParser::parse(output), vec!["hello", "libc6"]);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(DependencyParser::parse("").is_empty());
    }
}
