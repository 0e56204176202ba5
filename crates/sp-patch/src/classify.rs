//! Statement failure classification
//!
//! A failed statement is either evidence that its change is already in
//! place, a candidate for the `ALTER IGNORE` compatibility retry, or fatal.
//! Recognized signatures live in one table keyed by code space and code;
//! supporting another engine means adding rows.

use sp_core::DbFamily;
use sp_db::DbError;
use sp_sql::is_alter_ignore;

/// An error code in one of the supported code spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Code {
    /// Engine-specific numeric code
    Native(DbFamily, i64),
    /// Portable SQLSTATE
    SqlState(&'static str),
    /// SQLSTATE that only means "already applied" on one engine
    FamilyState(DbFamily, &'static str),
}

/// The "already applied" condition a signature stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Column already exists
    DuplicateColumn,
    /// Index or key name already exists
    DuplicateKey,
    /// Key was already shortened by an earlier run
    KeyTooLong,
    /// Dropped object does not exist
    CannotDrop,
    /// Table already removed or renamed
    MissingTable,
    /// Seed row already inserted
    UniqueViolation,
    /// Column already dropped or renamed
    UndefinedColumn,
    /// Table already exists
    DuplicateTable,
    /// Constraint already exists
    InvalidTableDefinition,
}

impl Condition {
    /// Warning text shown when the failure is skipped
    pub fn describe(&self) -> &'static str {
        match self {
            Condition::DuplicateColumn => "The column already exists",
            _ => "Skipped",
        }
    }
}

struct Signature {
    code: Code,
    condition: Condition,
}

const ALREADY_APPLIED: &[Signature] = &[
    Signature {
        code: Code::Native(DbFamily::MySql, 1060),
        condition: Condition::DuplicateColumn,
    },
    Signature {
        code: Code::Native(DbFamily::MySql, 1061),
        condition: Condition::DuplicateKey,
    },
    Signature {
        code: Code::Native(DbFamily::MySql, 1071),
        condition: Condition::KeyTooLong,
    },
    Signature {
        code: Code::Native(DbFamily::MySql, 1091),
        condition: Condition::CannotDrop,
    },
    Signature {
        code: Code::Native(DbFamily::MySql, 1146),
        condition: Condition::MissingTable,
    },
    Signature {
        code: Code::SqlState("23505"),
        condition: Condition::UniqueViolation,
    },
    Signature {
        code: Code::SqlState("42701"),
        condition: Condition::DuplicateColumn,
    },
    Signature {
        code: Code::SqlState("42703"),
        condition: Condition::UndefinedColumn,
    },
    Signature {
        code: Code::SqlState("42P07"),
        condition: Condition::DuplicateTable,
    },
    Signature {
        code: Code::SqlState("42P16"),
        condition: Condition::InvalidTableDefinition,
    },
    Signature {
        code: Code::FamilyState(DbFamily::DuckDb, "42P01"),
        condition: Condition::MissingTable,
    },
    Signature {
        code: Code::FamilyState(DbFamily::DuckDb, "42704"),
        condition: Condition::CannotDrop,
    },
];

/// How the applier should treat a failed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The change is already in place; continue
    Benign(Condition),
    /// Retry once in compatibility mode
    RetryableDdl,
    /// Abort the run
    Fatal,
}

fn lookup(code: Code) -> Option<Condition> {
    ALREADY_APPLIED
        .iter()
        .find(|sig| sig.code == code)
        .map(|sig| sig.condition)
}

/// Classify a failure by its codes.
///
/// The native code is looked up in `family`'s code space. The SQLSTATE
/// matches portable rows and rows scoped to `family`. A match in either is
/// benign.
pub fn classify(
    family: DbFamily,
    sqlstate: Option<&str>,
    native_code: Option<i64>,
) -> Classification {
    let native = native_code.and_then(|code| lookup(Code::Native(family, code)));
    let state = sqlstate.and_then(|state| {
        ALREADY_APPLIED
            .iter()
            .find(|sig| match sig.code {
                Code::SqlState(s) => s == state,
                Code::FamilyState(f, s) => f == family && s == state,
                Code::Native(..) => false,
            })
            .map(|sig| sig.condition)
    });

    match native.or(state) {
        Some(condition) => Classification::Benign(condition),
        None => Classification::Fatal,
    }
}

/// Classify the failure of `statement`.
///
/// Fatal failures of `ALTER IGNORE` statements become [`Classification::RetryableDdl`].
pub fn classify_failure(family: DbFamily, err: &DbError, statement: &str) -> Classification {
    match classify(family, err.sqlstate(), err.native_code()) {
        Classification::Fatal if is_alter_ignore(statement) => Classification::RetryableDdl,
        other => other,
    }
}

/// Session setting issued before an `ALTER IGNORE` retry
pub fn compat_statement(family: DbFamily) -> Option<&'static str> {
    match family {
        DbFamily::MySql => Some("SET SESSION old_alter_table = 1"),
        DbFamily::Postgres | DbFamily::DuckDb => None,
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
