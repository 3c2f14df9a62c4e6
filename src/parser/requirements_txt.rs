//! requirements.txt parser
//!
//! Extracts exact pins (`name==version`) from pip requirement files.
//!
//! Format examples:
//! - Pin: `requests==2.31.0`
//! - With extras and markers: `uvicorn[standard]==0.23.2 ; python_version >= "3.8"`
//! - Skipped: comments, `-r other.txt`, `-e git+https://...`, `--index-url ...`,
//!   and requirements without an exact pin such as `flask>=2`

use regex::Regex;
use tracing::debug;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::PackageSpec;

/// Parser for requirements.txt files
pub struct RequirementsTxtParser {
    /// Regex for an exact pin: `name[extras] == version`
    pin_re: Regex,
}

impl RequirementsTxtParser {
    pub fn new() -> Self {
        Self {
            // Match: name [extras] == version [anything else]
            pin_re: Regex::new(
                r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*===?\s*([^\s,;]+)",
            )
            .unwrap(),
        }
    }
}

impl Default for RequirementsTxtParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip an inline comment, an environment marker and a line continuation
fn requirement_part(line: &str) -> &str {
    let without_comment = match line.find(" #").or_else(|| line.find("\t#")) {
        Some(pos) => &line[..pos],
        None => line,
    };
    let without_marker = without_comment.split(';').next().unwrap_or(without_comment);

    without_marker.trim().trim_end_matches('\\').trim_end()
}

impl Parser for RequirementsTxtParser {
    fn parse(&self, content: &str) -> Result<Vec<PackageSpec>, ParseError> {
        let mut results = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // Skip empty lines, comments and pip options (-r, -e, --index-url, ...)
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
                continue;
            }

            let requirement = requirement_part(trimmed);

            if !requirement.contains("==") {
                debug!("Skipping line {}: no exact pin in '{}'", line_num, requirement);
                continue;
            }

            let Some(caps) = self.pin_re.captures(requirement) else {
                return Err(ParseError::InvalidSyntax {
                    line: line_num,
                    message: format!("expected 'name==version', found '{}'", requirement),
                });
            };

            results.push(PackageSpec::new(&caps[1], &caps[2]).at_line(line_num));
        }

        Ok(results)
    }
}
