//! Instance templates
//!
//! An instance template says how many machines run a given set of roles.
//! The option holds a comma separated list such as
//! `1 hadoop-namenode+hadoop-jobtracker,3 hadoop-datanode+hadoop-tasktracker`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+([A-Za-z0-9_.-]+(?:\+[A-Za-z0-9_.-]+)*)$")
        .expect("Invalid instance template regex")
});

/// A group of identical instances and the roles they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceTemplate {
    pub count: usize,
    pub roles: Vec<String>,
}

impl InstanceTemplate {
    pub fn new(count: usize, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            count,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated template list. Blank entries are ignored but
    /// at least one template is required.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        let templates = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Self>>>()?;

        if templates.is_empty() {
            return Err(Error::InvalidInstanceTemplate {
                template: list.to_string(),
                reason: "no instance templates given".into(),
            });
        }
        Ok(templates)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Total number of instances across a template list.
    pub fn total_count(templates: &[Self]) -> usize {
        templates.iter().map(|t| t.count).sum()
    }
}

impl FromStr for InstanceTemplate {
    type Err = Error;

    fn from_str(entry: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidInstanceTemplate {
            template: entry.to_string(),
            reason: reason.to_string(),
        };

        let captures = TEMPLATE_REGEX
            .captures(entry.trim())
            .ok_or_else(|| invalid("expected '<count> <role>[+<role>...]'"))?;

        let count: usize = captures[1]
            .parse()
            .map_err(|_| invalid("instance count is out of range"))?;
        if count == 0 {
            return Err(invalid("instance count must be at least 1"));
        }

        Ok(Self::new(count, captures[2].split('+')))
    }
}

impl fmt::Display for InstanceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.roles.join("+"))
    }
}
