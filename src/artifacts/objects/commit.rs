//! Commit object
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

/// Environment variable prefix for the author identity
pub const AUTHOR_ENV_PREFIX: &str = "GIT_AUTHOR";

/// Environment variable prefix for the committer identity
pub const COMMITTER_ENV_PREFIX: &str = "GIT_COMMITTER";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// `Name <email> <unix-seconds> <+hhmm>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Load an identity from `<prefix>_NAME`, `<prefix>_EMAIL` and the optional `<prefix>_DATE`
    ///
    /// Dates are accepted in RFC 2822 or `%Y-%m-%d %H:%M:%S %z` form; without
    /// one the current time is used.
    pub fn load_from_env(prefix: &str) -> anyhow::Result<Self> {
        let name = std::env::var(format!("{prefix}_NAME"))
            .with_context(|| format!("{prefix}_NAME not set"))?;
        let email = std::env::var(format!("{prefix}_EMAIL"))
            .with_context(|| format!("{prefix}_EMAIL not set"))?;
        let timestamp = match std::env::var(format!("{prefix}_DATE")) {
            Ok(date_str) => Some(
                DateTime::parse_from_rfc2822(&date_str)
                    .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                    .with_context(|| format!("invalid {prefix}_DATE {date_str:?}"))?,
            ),
            Err(_) => None,
        };

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // Format: "name <email> timestamp timezone"
        // Split from right to get timezone and timestamp first
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(malformed(format!("invalid identity {value:?}")));
        }

        let offset = parse_offset(parts[0])?;
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| malformed(format!("invalid timestamp {:?}", parts[1])))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| malformed("identity is missing '<'"))?;
        let email_end = name_email_part
            .rfind('>')
            .filter(|&end| end > email_start)
            .ok_or_else(|| malformed("identity is missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let timestamp = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| malformed(format!("timestamp out of range: {timestamp}")))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Parse a `+hhmm` / `-hhmm` offset
fn parse_offset(value: &str) -> Result<FixedOffset> {
    let invalid = || malformed(format!("invalid timezone {value:?}"));

    if value.len() != 5 || !value.is_ascii() {
        return Err(invalid());
    }
    let sign = match &value[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(invalid()),
    };
    let hours = value[1..3].parse::<i32>().map_err(|_| invalid())?;
    let minutes = value[3..5].parse::<i32>().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Commit object
///
/// Holds the tree snapshot reference, the lineage and the identities.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for a root commit)
    parents: Vec<ObjectId>,
    /// Tree object ID representing the directory snapshot
    tree_oid: ObjectId,
    /// Author who wrote the changes
    author: Author,
    /// Committer who recorded the commit
    committer: Author,
    /// Commit message, stored verbatim
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid));
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }

    pub fn serialize(&self) -> Bytes {
        Bytes::from(self.display())
    }

    pub fn deserialize(payload: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&payload).map_err(|e| malformed(e.to_string()))?;
        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| malformed("missing blank line before message"))?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| malformed("missing tree line"))?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        // Parse all parent lines (there can be 0, 1, or multiple parents)
        let mut parents = Vec::new();
        let mut next_line = lines.next().ok_or_else(|| malformed("missing author line"))?;
        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid)?);
            next_line = lines.next().ok_or_else(|| malformed("missing author line"))?;
        }

        let author = next_line
            .strip_prefix("author ")
            .ok_or_else(|| malformed("invalid author line"))?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| malformed("missing committer line"))?;
        let committer = Author::try_from(committer)?;

        Ok(Self::new(
            parents,
            tree_oid,
            author,
            committer,
            message.to_string(),
        ))
    }
}

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedObject {
        kind: "commit",
        reason: reason.into(),
    }
}
