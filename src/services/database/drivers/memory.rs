//! In-memory driver used by the unit tests.
//!
//! Understands exactly the three statement shapes the wrapper issues
//! (`CREATE TABLE IF NOT EXISTS`, `INSERT INTO .. (nome, email)` and
//! `SELECT id, nome, email FROM ..`) and keeps rows in shared tables so a
//! test can inspect them after the handle is gone. Failure switches let
//! tests force each error path.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::services::database::error::DriverError;
use crate::services::database::traits::{
    BoxedHandle, ConnectionConfig, Driver, DriverHandle, Record,
};

#[derive(Debug, Default)]
struct MemoryState {
    tables: BTreeMap<String, Vec<Record>>,
    opened: usize,
    closed: usize,
    create_statements: usize,
    fail_open: bool,
    fail_close: bool,
    fail_probe: bool,
    fail_statements: bool,
    ignore_inserts: bool,
}

/// Driver whose handles all share one set of in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.state().fail_open = fail;
    }

    pub fn set_fail_close(&self, fail: bool) {
        self.state().fail_close = fail;
    }

    pub fn set_fail_probe(&self, fail: bool) {
        self.state().fail_probe = fail;
    }

    pub fn set_fail_statements(&self, fail: bool) {
        self.state().fail_statements = fail;
    }

    /// Make inserts succeed with zero affected rows.
    pub fn set_ignore_inserts(&self, ignore: bool) {
        self.state().ignore_inserts = ignore;
    }

    pub fn opened(&self) -> usize {
        self.state().opened
    }

    pub fn closed(&self) -> usize {
        self.state().closed
    }

    pub fn create_statements(&self) -> usize {
        self.state().create_statements
    }

    pub fn table_names(&self) -> Vec<String> {
        self.state().tables.keys().cloned().collect()
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.state().tables.get(table).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn open(&self, _config: &ConnectionConfig) -> Result<BoxedHandle, DriverError> {
        let mut state = self.state();
        if state.fail_open {
            return Err(DriverError::new("Communications link failure").with_code(2003, "HY000"));
        }
        state.opened += 1;

        Ok(Box::new(MemoryHandle {
            state: Arc::clone(&self.state),
            open: true,
        }))
    }
}

/// Handle onto a `MemoryDriver`'s tables.
pub struct MemoryHandle {
    state: Arc<Mutex<MemoryState>>,
    open: bool,
}

impl MemoryHandle {
    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, DriverError> {
        if !self.open {
            return Err(DriverError::new("connection is closed"));
        }
        let state = self.state.lock().unwrap();
        if state.fail_statements {
            return Err(DriverError::new("Lost connection to server during query")
                .with_code(2013, "HY000"));
        }
        Ok(state)
    }
}

fn table_after<'a>(sql: &'a str, keyword: &str) -> Option<&'a str> {
    let mut words = sql.split_whitespace();
    words.find(|w| w.eq_ignore_ascii_case(keyword))?;
    words.next()
}

fn missing_table(table: &str) -> DriverError {
    DriverError::new(format!("Table '{}' doesn't exist", table)).with_code(1146, "42S02")
}

#[async_trait]
impl DriverHandle for MemoryHandle {
    async fn execute(&mut self, sql: &str) -> Result<u64, DriverError> {
        let mut state = self.state()?;

        if sql.starts_with("CREATE TABLE IF NOT EXISTS") {
            let table = table_after(sql, "EXISTS").ok_or_else(|| DriverError::new("bad DDL"))?;
            state.create_statements += 1;
            state.tables.entry(table.to_string()).or_default();
            return Ok(0);
        }

        Err(DriverError::new(format!("unsupported statement: {}", sql)).with_code(1064, "42000"))
    }

    async fn execute_with(&mut self, sql: &str, params: &[&str]) -> Result<u64, DriverError> {
        let mut state = self.state()?;
        let ignore = state.ignore_inserts;

        let table = table_after(sql, "INTO").ok_or_else(|| DriverError::new("bad insert"))?;
        let [name, email] = params else {
            return Err(DriverError::new("expected two bound parameters"));
        };

        let rows = state
            .tables
            .get_mut(table)
            .ok_or_else(|| missing_table(table))?;

        if rows.iter().any(|r| r.email == *email) {
            return Err(DriverError::new(format!(
                "Duplicate entry '{}' for key 'email'",
                email
            ))
            .with_code(1062, "23000"));
        }
        if ignore {
            return Ok(0);
        }

        let id = rows.last().map_or(1, |r| r.id + 1);
        rows.push(Record::new(id, *name, *email));
        Ok(1)
    }

    fn stream_records<'a>(
        &'a mut self,
        sql: &'a str,
    ) -> BoxStream<'a, Result<Record, DriverError>> {
        let rows = self.state().and_then(|state| {
            let table = table_after(sql, "FROM").ok_or_else(|| DriverError::new("bad select"))?;
            state
                .tables
                .get(table)
                .cloned()
                .ok_or_else(|| missing_table(table))
        });

        match rows {
            Ok(rows) => stream::iter(rows.into_iter().map(Ok)).boxed(),
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }

    async fn is_closed(&mut self) -> Result<bool, DriverError> {
        if !self.open {
            return Ok(true);
        }
        if self.state.lock().unwrap().fail_probe {
            return Err(DriverError::new("ping failed"));
        }
        Ok(false)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_close {
            return Err(DriverError::new("error while closing connection"));
        }
        self.open = false;
        state.closed += 1;
        Ok(())
    }
}

/// A cloneable `Write` sink for capturing `select` output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
