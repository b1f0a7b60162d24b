//! Roster operations: load, mutate, save

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, error, info, instrument, warn};

use crate::error::{LoadError, RosterError};
use crate::roster::criteria::{count_matching_fields, MatchCriteria};
use crate::roster::field::{pair_fields, Group};
use crate::roster::{employees, employees_mut, EMPLOYEE_TAG};
use crate::xml::{parser, writer, Content, Document, Element, Parser};

/// Non-error result of a roster operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// One employee was appended
    Added,
    /// Groups were appended under matching employees (possibly none)
    Updated { groups: usize },
    /// Matching employees were removed
    Removed { employees: usize },
    /// No employee matched any criterion; nothing was removed
    NoMatch,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added 1 employee"),
            Self::Updated { groups } => write!(f, "added {groups} group(s)"),
            Self::Removed { employees } => write!(f, "removed {employees} employee(s)"),
            Self::NoMatch => write!(f, "no employee available with given details"),
        }
    }
}

/// Applies roster operations with fixed reader/writer settings.
///
/// Every mutating operation rewrites the whole file at `path` after changing
/// the tree, whether or not anything matched. Writes are not atomic and the
/// file is not locked: two processes editing the same roster can lose each
/// other's changes.
///
/// The default reader keeps the nesting limit but puts no cap on file size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Editor {
    parser: parser::Config,
    writer: writer::Config,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            parser: parser::Config {
                max_size: 0,
                ..parser::Config::default()
            },
            writer: writer::Config::default(),
        }
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_parser_config(mut self, config: parser::Config) -> Self {
        self.parser = config;
        self
    }

    pub const fn with_writer_config(mut self, config: writer::Config) -> Self {
        self.writer = config;
        self
    }

    /// Read and parse the roster at `path`.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document, RosterError> {
        let path = path.as_ref();
        let load_error = |source: LoadError| RosterError::Load {
            path: path.to_path_buf(),
            source,
        };

        let result = fs::read(path)
            .map_err(|e| load_error(e.into()))
            .and_then(|bytes| {
                Parser::with_config(&bytes, self.parser)
                    .parse()
                    .map_err(|e| load_error(e.into()))
            });

        match result {
            Ok(doc) => {
                debug!(employees = employees(&doc).count(), "loaded roster");
                Ok(doc)
            }
            Err(err) => {
                error!(%err, "could not load roster");
                Err(err)
            }
        }
    }

    /// Serialize `doc` and overwrite the file at `path`.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, doc: &Document, path: impl AsRef<Path>) -> Result<(), RosterError> {
        let path = path.as_ref();
        let output = writer::to_string_with_config(doc, self.writer);

        if let Err(source) = fs::write(path, output.as_bytes()) {
            let err = RosterError::Write {
                path: path.to_path_buf(),
                source,
            };
            error!(%err, "could not write roster");
            return Err(err);
        }

        debug!(bytes = output.len(), "wrote roster");
        Ok(())
    }

    /// Append a new employee built from `names`/`values`, then save.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn add_employee<N, V>(
        &self,
        doc: &mut Document,
        names: &[N],
        values: &[V],
        path: impl AsRef<Path>,
    ) -> Result<Outcome, RosterError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let fields =
            pair_fields(names, values).inspect_err(|err| error!(%err, "rejected employee"))?;

        let mut employee = Element::new(EMPLOYEE_TAG);
        for field in &fields {
            employee.push_element(field.to_element());
        }
        doc.root.push_element(employee);
        debug!(fields = fields.len(), "appended employee");

        self.save(doc, path)?;
        info!("added employee");
        Ok(Outcome::Added)
    }

    /// Append a `group` of `names`/`values` fields under every employee
    /// matched by `criteria`, then save.
    ///
    /// Each criterion is its own scan, and every matching field of an
    /// employee yields one group, so an employee matched twice gains two.
    /// Each inserted group gets its own copy of the fields.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), group = %group))]
    pub fn add_group_to_employee<N, V>(
        &self,
        doc: &mut Document,
        group: &str,
        names: &[N],
        values: &[V],
        path: impl AsRef<Path>,
        criteria: &MatchCriteria,
    ) -> Result<Outcome, RosterError>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let fields =
            pair_fields(names, values).inspect_err(|err| error!(%err, "rejected group"))?;
        let template = Group::new(group, fields);

        let mut groups = 0;
        for (field, expected) in criteria.iter() {
            for employee in employees_mut(doc) {
                let hits = count_matching_fields(employee, field, expected);
                for _ in 0..hits {
                    employee.push_element(template.to_element());
                }
                groups += hits;
            }
            debug!(field, expected, groups, "applied criterion");
        }

        self.save(doc, path)?;
        info!(groups, "added groups");
        Ok(Outcome::Updated { groups })
    }

    /// Remove every employee matched by `criteria`, then save.
    ///
    /// Criteria run in order; a later criterion only sees employees that
    /// earlier ones left in place.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn remove_employee(
        &self,
        doc: &mut Document,
        path: impl AsRef<Path>,
        criteria: &MatchCriteria,
    ) -> Result<Outcome, RosterError> {
        let mut removed = 0;
        for (field, expected) in criteria.iter() {
            let before = doc.root.children.len();
            doc.root.children.retain(|child| match child {
                Content::Element(element) if element.name == EMPLOYEE_TAG => {
                    count_matching_fields(element, field, expected) == 0
                }
                _ => true,
            });
            let hits = before - doc.root.children.len();
            debug!(field, expected, hits, "applied criterion");
            removed += hits;
        }

        let outcome = if removed == 0 {
            warn!("no employee available with given details");
            Outcome::NoMatch
        } else {
            Outcome::Removed { employees: removed }
        };

        self.save(doc, path)?;
        info!(removed, "removed employees");
        Ok(outcome)
    }
}

/// Employees matched by any criterion, each once, in document order.
pub fn find_employees<'a>(doc: &'a Document, criteria: &MatchCriteria) -> Vec<&'a Element> {
    employees(doc)
        .filter(|employee| criteria.matches(employee))
        .collect()
}
