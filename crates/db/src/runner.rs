//! Batched execution of bundled SQL setup scripts.
//!
//! Scripts ship as plain text resources holding one or more `;`-separated
//! statements. A batch runs on one connection inside one transaction; a
//! failing statement is logged and skipped, losing that statement but never
//! the batch.

use std::sync::Arc;

use outpost_common::{LogLevel, LogSink, Resources, TracingLog};

use crate::Result;

/// Source of batch connections, usually a pool.
pub trait SqlSource {
    type Connection: SqlConnection;

    /// Acquire one connection ready to run a batch.
    fn connection(&self) -> Result<Self::Connection>;
}

/// A single connection able to run statements and commit the batch.
pub trait SqlConnection {
    fn execute(&mut self, statement: &str) -> Result<()>;
    fn commit(&mut self) -> Result<()>;
}

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The bundle has no script under this name; nothing to do.
    ResourceAbsent,
    /// The script could not be read, or no connection was available. No
    /// statements were attempted.
    Aborted,
    /// The batch ran to the end; per-statement failures are counted.
    Completed(BatchReport),
}

/// Tally for a completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub executed: usize,
    pub failed: usize,
    pub committed: bool,
}

/// Executes bundled SQL scripts with per-statement failure isolation.
pub struct ScriptRunner {
    log: Arc<dyn LogSink>,
}

impl ScriptRunner {
    /// A runner logging through `tracing`.
    pub fn new() -> Self {
        Self::with_log(Arc::new(TracingLog))
    }

    /// A runner with an explicit log sink.
    pub fn with_log(log: Arc<dyn LogSink>) -> Self {
        Self { log }
    }

    /// Run the script resource `name` against one connection from `source`.
    ///
    /// Statement failures are isolated: each one is logged and the batch
    /// moves on. Failing to read the script or to obtain the connection is
    /// logged once and aborts the batch with nothing attempted. The batch
    /// commits at the end; a commit failure is logged and leaves
    /// `committed` false in the report.
    pub fn execute_batch<S: SqlSource>(
        &self,
        resources: &dyn Resources,
        name: &str,
        source: &S,
    ) -> BatchOutcome {
        let script = match resources.read_to_string(name) {
            Ok(Some(script)) => script,
            Ok(None) => return BatchOutcome::ResourceAbsent,
            Err(e) => {
                self.log.log(
                    LogLevel::Error,
                    &format!("failed to read sql script '{name}': {e}"),
                );
                return BatchOutcome::Aborted;
            }
        };

        let mut conn = match source.connection() {
            Ok(conn) => conn,
            Err(e) => {
                self.log.log(
                    LogLevel::Error,
                    &format!("failed to open a database connection for '{name}': {e}"),
                );
                return BatchOutcome::Aborted;
            }
        };

        let mut report = BatchReport::default();
        for statement in statements(&script) {
            match conn.execute(statement) {
                Ok(()) => report.executed += 1,
                Err(e) => {
                    report.failed += 1;
                    self.log.log(
                        LogLevel::Error,
                        &format!("error executing statement {statement:?}: {e}"),
                    );
                }
            }
        }

        match conn.commit() {
            Ok(()) => report.committed = true,
            Err(e) => {
                self.log.log(
                    LogLevel::Error,
                    &format!("failed to commit batch '{name}': {e}"),
                );
            }
        }

        BatchOutcome::Completed(report)
    }
}

impl Default for ScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a script into trimmed, non-blank statements.
pub fn statements(script: &str) -> Vec<&str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbError;
    use outpost_common::{MemoryLog, MemoryResources};
    use std::sync::Mutex;

    fn sql_error(message: &str) -> DbError {
        DbError::Sql(mysql::Error::from(std::io::Error::other(message.to_owned())))
    }

    #[derive(Default)]
    struct FakeState {
        executed: Mutex<Vec<String>>,
        commits: Mutex<usize>,
    }

    impl FakeState {
        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }

        fn commits(&self) -> usize {
            *self.commits.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct FakeSource {
        refuse_connections: bool,
        fail_matching: Option<&'static str>,
        fail_commit: bool,
        state: Arc<FakeState>,
    }

    struct FakeConnection {
        fail_matching: Option<&'static str>,
        fail_commit: bool,
        state: Arc<FakeState>,
    }

    impl SqlSource for FakeSource {
        type Connection = FakeConnection;

        fn connection(&self) -> Result<FakeConnection> {
            if self.refuse_connections {
                return Err(sql_error("connection refused"));
            }
            Ok(FakeConnection {
                fail_matching: self.fail_matching,
                fail_commit: self.fail_commit,
                state: Arc::clone(&self.state),
            })
        }
    }

    impl SqlConnection for FakeConnection {
        fn execute(&mut self, statement: &str) -> Result<()> {
            if self.fail_matching.is_some_and(|pat| statement.contains(pat)) {
                return Err(sql_error("syntax error"));
            }
            self.state.executed.lock().unwrap().push(statement.to_owned());
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            if self.fail_commit {
                return Err(sql_error("lost connection"));
            }
            *self.state.commits.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn runner_with_log() -> (ScriptRunner, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        (ScriptRunner::with_log(log.clone()), log)
    }

    #[test]
    fn statements_split_trims_and_skips_blanks() {
        assert_eq!(statements("A;;  ;B"), vec!["A", "B"]);
        assert_eq!(
            statements("CREATE TABLE a (id INT);\nCREATE TABLE b (id INT);\n"),
            vec!["CREATE TABLE a (id INT)", "CREATE TABLE b (id INT)"]
        );
        assert!(statements("  \n ; ; ").is_empty());
    }

    #[test]
    fn batch_executes_in_order_and_commits() {
        let (runner, log) = runner_with_log();
        let source = FakeSource::default();
        let bundle = MemoryResources::new().with(
            "setup.sql",
            "CREATE TABLE players (id INT);\nCREATE TABLE stats (id INT);\n",
        );

        let outcome = runner.execute_batch(&bundle, "setup.sql", &source);
        assert_eq!(
            outcome,
            BatchOutcome::Completed(BatchReport {
                executed: 2,
                failed: 0,
                committed: true,
            })
        );
        assert_eq!(
            source.state.executed(),
            vec!["CREATE TABLE players (id INT)", "CREATE TABLE stats (id INT)"]
        );
        assert_eq!(source.state.commits(), 1);
        assert_eq!(log.count(LogLevel::Error), 0);
    }

    #[test]
    fn absent_script_is_a_named_no_op() {
        let (runner, log) = runner_with_log();
        let source = FakeSource::default();

        let outcome = runner.execute_batch(&MemoryResources::new(), "setup.sql", &source);
        assert_eq!(outcome, BatchOutcome::ResourceAbsent);
        assert!(source.state.executed().is_empty());
        assert_eq!(log.entries().len(), 0);
    }

    #[test]
    fn statement_failure_does_not_abort_batch() {
        let (runner, log) = runner_with_log();
        let source = FakeSource {
            fail_matching: Some("bad"),
            ..FakeSource::default()
        };
        let bundle =
            MemoryResources::new().with("setup.sql", "INSERT bad;CREATE TABLE ok (id INT);");

        let outcome = runner.execute_batch(&bundle, "setup.sql", &source);
        assert_eq!(
            outcome,
            BatchOutcome::Completed(BatchReport {
                executed: 1,
                failed: 1,
                committed: true,
            })
        );
        assert_eq!(source.state.executed(), vec!["CREATE TABLE ok (id INT)"]);
        assert!(log.contains(LogLevel::Error, "error executing statement"));
        assert_eq!(log.count(LogLevel::Error), 1);
    }

    #[test]
    fn connection_failure_aborts_before_any_statement() {
        let (runner, log) = runner_with_log();
        let source = FakeSource {
            refuse_connections: true,
            ..FakeSource::default()
        };
        let bundle = MemoryResources::new().with("setup.sql", "CREATE TABLE a (id INT);");

        let outcome = runner.execute_batch(&bundle, "setup.sql", &source);
        assert_eq!(outcome, BatchOutcome::Aborted);
        assert!(source.state.executed().is_empty());
        assert_eq!(source.state.commits(), 0);
        assert_eq!(log.count(LogLevel::Error), 1);
        assert!(log.contains(LogLevel::Error, "failed to open a database connection"));
    }

    #[test]
    fn unreadable_script_aborts() {
        let (runner, log) = runner_with_log();
        let source = FakeSource::default();
        let bundle = MemoryResources::new().with("setup.sql", vec![0xff, 0xfe]);

        let outcome = runner.execute_batch(&bundle, "setup.sql", &source);
        assert_eq!(outcome, BatchOutcome::Aborted);
        assert!(source.state.executed().is_empty());
        assert!(log.contains(LogLevel::Error, "failed to read sql script"));
    }

    #[test]
    fn commit_failure_is_reported_in_outcome() {
        let (runner, log) = runner_with_log();
        let source = FakeSource {
            fail_commit: true,
            ..FakeSource::default()
        };
        let bundle = MemoryResources::new().with("setup.sql", "CREATE TABLE a (id INT);");

        let outcome = runner.execute_batch(&bundle, "setup.sql", &source);
        assert_eq!(
            outcome,
            BatchOutcome::Completed(BatchReport {
                executed: 1,
                failed: 0,
                committed: false,
            })
        );
        assert!(log.contains(LogLevel::Error, "failed to commit batch"));
    }
}
