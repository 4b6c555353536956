use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::catalog::WireColumnType;
use crate::client::{
    Connection, Connector, ExecuteOptions, FullResult, LastInsertId, SqlExecutor, TxHandle,
};
use crate::codec::WireArg;
use crate::config::ClientConfig;
use crate::error::{ClientError, SqlAdapterError};
use crate::logging::AdapterLog;
use crate::types::{IsolationLevel, RowValues};

/// Statements the in-memory engine understands, matched after collapsing whitespace.
pub const INSERT_USER: &str = "INSERT INTO users (email, name) VALUES (?, ?)";
pub const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, name FROM users WHERE email = ?";
pub const SELECT_USER_BY_NAME: &str = "SELECT id, email, name FROM users WHERE name = ?";
pub const COUNT_USERS: &str = "SELECT COUNT(*) AS cnt FROM users";
pub const DELETE_USERS: &str = "DELETE FROM users";

/// MySQL's error number for a unique key violation.
pub const ER_DUP_ENTRY: u16 = 1062;

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: u64,
    pub email: String,
    pub name: Option<String>,
}

/// A reply served verbatim for the next statement, with cells in the engine's text
/// form so the decoders sent with the statement are exercised.
#[derive(Debug, Clone, Default)]
pub struct CannedResult {
    pub types: Vec<(String, String)>,
    pub rows: Vec<Vec<Option<String>>>,
    pub rows_affected: u64,
    pub last_insert_id: Option<LastInsertId>,
}

/// One statement as the engine received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub sql: String,
    pub args: Vec<WireArg>,
    pub array_mode: bool,
    pub full_result: bool,
    pub decoder_count: usize,
    pub in_transaction: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub connections: usize,
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Default)]
struct DbState {
    users: Vec<UserRow>,
    next_id: u64,
    stats: MemoryStats,
    statements: Vec<RecordedStatement>,
    canned: Vec<CannedResult>,
    fail_next_statement: Option<ClientError>,
    fail_next_commit: Option<ClientError>,
    fail_next_rollback: Option<ClientError>,
    last_isolation: Option<IsolationLevel>,
}

/// Shared state behind every connection and transaction of one fake endpoint.
#[derive(Default)]
pub struct MemoryDatabase {
    state: Mutex<DbState>,
}

impl fmt::Debug for MemoryDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDatabase")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl MemoryDatabase {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, DbState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        self.lock().stats
    }

    /// Committed rows only.
    #[must_use]
    pub fn users(&self) -> Vec<UserRow> {
        self.lock().users.clone()
    }

    #[must_use]
    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.lock().statements.clone()
    }

    pub fn clear_statements(&self) {
        self.lock().statements.clear();
    }

    #[must_use]
    pub fn last_isolation(&self) -> Option<IsolationLevel> {
        self.lock().last_isolation
    }

    /// Serve `result` for the next statement that is not one of the built-in ones.
    pub fn push_result(&self, result: CannedResult) {
        self.lock().canned.push(result);
    }

    pub fn fail_next_statement(&self, err: ClientError) {
        self.lock().fail_next_statement = Some(err);
    }

    pub fn fail_next_commit(&self, err: ClientError) {
        self.lock().fail_next_commit = Some(err);
    }

    pub fn fail_next_rollback(&self, err: ClientError) {
        self.lock().fail_next_rollback = Some(err);
    }

    fn run(
        &self,
        sql: &str,
        args: &[WireArg],
        options: ExecuteOptions<'_>,
        pending: Option<&mut Vec<UserRow>>,
    ) -> Result<FullResult, ClientError> {
        let mut state = self.lock();
        state.statements.push(RecordedStatement {
            sql: sql.to_owned(),
            args: args.to_vec(),
            array_mode: options.array_mode,
            full_result: options.full_result,
            decoder_count: options.decoders.len(),
            in_transaction: pending.is_some(),
        });
        if let Some(err) = state.fail_next_statement.take() {
            return Err(err);
        }

        let normalized = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.as_str() {
            INSERT_USER => {
                let email = text_arg(args, 0)?.ok_or_else(|| {
                    ClientError::new("Column 'email' cannot be null").with_code(1048)
                })?;
                let name = text_arg(args, 1)?;
                if visible_users(&state.users, pending.as_deref().map(Vec::as_slice))
                    .any(|u| u.email == email)
                {
                    return Err(duplicate(&email));
                }
                state.next_id += 1;
                let row = UserRow {
                    id: state.next_id,
                    email,
                    name,
                };
                let id = row.id;
                match pending {
                    Some(pending) => pending.push(row),
                    None => state.users.push(row),
                }
                Ok(FullResult {
                    rows_affected: 1,
                    last_insert_id: Some(LastInsertId::Int(id)),
                    ..FullResult::default()
                })
            }
            SELECT_USER_BY_EMAIL | SELECT_USER_BY_NAME => {
                let needle = text_arg(args, 0)?;
                let by_email = normalized == SELECT_USER_BY_EMAIL;
                let rows = visible_users(&state.users, pending.as_deref().map(Vec::as_slice))
                    .filter(|u| {
                        if by_email {
                            Some(&u.email) == needle.as_ref()
                        } else {
                            u.name.is_some() && u.name == needle
                        }
                    })
                    .map(|u| {
                        vec![
                            RowValues::Int(i64::try_from(u.id).unwrap_or(i64::MAX)),
                            RowValues::Text(u.email.clone()),
                            u.name.clone().map_or(RowValues::Null, RowValues::Text),
                        ]
                    })
                    .collect();
                Ok(FullResult {
                    types: vec![
                        ("id".into(), "BIGINT".into()),
                        ("email".into(), "VARCHAR".into()),
                        ("name".into(), "VARCHAR".into()),
                    ],
                    rows,
                    ..FullResult::default()
                })
            }
            COUNT_USERS => {
                let count = visible_users(&state.users, pending.as_deref().map(Vec::as_slice)).count();
                Ok(FullResult {
                    types: vec![("cnt".into(), "BIGINT".into())],
                    rows: vec![vec![RowValues::Int(
                        i64::try_from(count).unwrap_or(i64::MAX),
                    )]],
                    ..FullResult::default()
                })
            }
            DELETE_USERS => {
                let mut affected = state.users.len();
                state.users.clear();
                if let Some(pending) = pending {
                    affected += pending.len();
                    pending.clear();
                }
                Ok(FullResult {
                    rows_affected: affected as u64,
                    ..FullResult::default()
                })
            }
            _ => {
                if state.canned.is_empty() {
                    return Err(ClientError::new(format!(
                        "memory engine cannot run statement: {sql}"
                    )));
                }
                let canned = state.canned.remove(0);
                drop(state);
                materialize(canned, options)
            }
        }
    }
}

fn visible_users<'a>(
    committed: &'a [UserRow],
    pending: Option<&'a [UserRow]>,
) -> impl Iterator<Item = &'a UserRow> {
    committed.iter().chain(pending.unwrap_or_default())
}

fn duplicate(email: &str) -> ClientError {
    ClientError::new(format!(
        "Duplicate entry '{email}' for key 'users.email'"
    ))
    .with_code(ER_DUP_ENTRY)
}

fn text_arg(args: &[WireArg], idx: usize) -> Result<Option<String>, ClientError> {
    match args.get(idx) {
        Some(WireArg::Text(s)) => Ok(Some(s.clone())),
        Some(WireArg::Null) | None => Ok(None),
        Some(other) => Err(ClientError::new(format!(
            "argument {idx} must be text, got {other:?}"
        ))),
    }
}

// Mirrors what the serverless client does with a text cell: run the decoder for
// the column's type, otherwise convert numbers and JSON and keep the rest as text.
fn materialize(canned: CannedResult, options: ExecuteOptions<'_>) -> Result<FullResult, ClientError> {
    let mut rows = Vec::with_capacity(canned.rows.len());
    for raw in canned.rows {
        let mut row = Vec::with_capacity(raw.len());
        for (idx, cell) in raw.into_iter().enumerate() {
            let Some(text) = cell else {
                row.push(RowValues::Null);
                continue;
            };
            let wire = canned
                .types
                .get(idx)
                .and_then(|(_, tag)| tag.parse::<WireColumnType>().ok());
            let value = match wire {
                Some(ty) => match options.decoders.decode(ty, &text) {
                    Some(decoded) => decoded.map_err(|e: SqlAdapterError| {
                        ClientError::new(format!("decoder for {ty} failed")).with_source(e)
                    })?,
                    None => plain_cell(ty, text),
                },
                None => RowValues::Text(text),
            };
            row.push(value);
        }
        rows.push(row);
    }
    Ok(FullResult {
        types: canned.types,
        rows,
        rows_affected: canned.rows_affected,
        last_insert_id: canned.last_insert_id,
    })
}

fn plain_cell(ty: WireColumnType, text: String) -> RowValues {
    match ty {
        WireColumnType::TinyInt
        | WireColumnType::UnsignedTinyInt
        | WireColumnType::SmallInt
        | WireColumnType::UnsignedSmallInt
        | WireColumnType::MediumInt
        | WireColumnType::UnsignedMediumInt
        | WireColumnType::Int
        | WireColumnType::UnsignedInt
        | WireColumnType::Year => text.parse().map_or(RowValues::Text(text), RowValues::Int),
        WireColumnType::Float | WireColumnType::Double => {
            text.parse().map_or(RowValues::Text(text), RowValues::Float)
        }
        WireColumnType::Json => serde_json::from_str::<JsonValue>(&text)
            .map_or(RowValues::Text(text), RowValues::JSON),
        _ => RowValues::Text(text),
    }
}

/// Connection to a [`MemoryDatabase`].
#[derive(Debug)]
pub struct MemoryConnection {
    db: Arc<MemoryDatabase>,
    config: ClientConfig,
}

impl MemoryConnection {
    #[must_use]
    pub fn new(db: Arc<MemoryDatabase>, config: ClientConfig) -> Self {
        db.lock().stats.connections += 1;
        Self { db, config }
    }
}

#[async_trait]
impl SqlExecutor for MemoryConnection {
    async fn execute(
        &self,
        sql: &str,
        args: &[WireArg],
        options: ExecuteOptions<'_>,
    ) -> Result<FullResult, ClientError> {
        // Outside a transaction every statement autocommits.
        self.db.run(sql, args, options, None)
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn begin(
        &self,
        isolation: Option<IsolationLevel>,
    ) -> Result<Arc<dyn TxHandle>, ClientError> {
        {
            let mut state = self.db.lock();
            state.stats.begins += 1;
            state.last_isolation = isolation;
        }
        Ok(Arc::new(MemoryTx {
            db: Arc::clone(&self.db),
            pending: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Transaction session: writes stay private until commit.
struct MemoryTx {
    db: Arc<MemoryDatabase>,
    pending: Mutex<Vec<UserRow>>,
    closed: AtomicBool,
}

impl MemoryTx {
    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(ClientError::new("transaction is already closed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SqlExecutor for MemoryTx {
    async fn execute(
        &self,
        sql: &str,
        args: &[WireArg],
        options: ExecuteOptions<'_>,
    ) -> Result<FullResult, ClientError> {
        self.ensure_open()?;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        self.db.run(sql, args, options, Some(&mut *pending))
    }
}

#[async_trait]
impl TxHandle for MemoryTx {
    async fn commit(&self) -> Result<(), ClientError> {
        self.ensure_open()?;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.db.lock();
        state.stats.commits += 1;
        if let Some(err) = state.fail_next_commit.take() {
            return Err(err);
        }
        // All or nothing: a conflict with rows another session committed since
        // these were written leaves the committed set untouched.
        if let Some(row) = pending
            .iter()
            .find(|row| state.users.iter().any(|u| u.email == row.email))
        {
            return Err(duplicate(&row.email));
        }
        self.closed.store(true, Ordering::SeqCst);
        state.users.append(&mut *pending);
        Ok(())
    }

    async fn rollback(&self) -> Result<(), ClientError> {
        self.ensure_open()?;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = self.db.lock();
        state.stats.rollbacks += 1;
        if let Some(err) = state.fail_next_rollback.take() {
            return Err(err);
        }
        self.closed.store(true, Ordering::SeqCst);
        pending.clear();
        Ok(())
    }
}

/// Connector that opens connections to one shared [`MemoryDatabase`].
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    db: Arc<MemoryDatabase>,
}

impl MemoryConnector {
    #[must_use]
    pub fn new(db: Arc<MemoryDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, config: &ClientConfig) -> Result<Arc<dyn Connection>, SqlAdapterError> {
        Ok(Arc::new(MemoryConnection::new(
            Arc::clone(&self.db),
            config.clone(),
        )))
    }
}

/// Log sink that keeps every line for assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    debug: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingLog {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn debug_lines(&self) -> Vec<String> {
        self.debug.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn warn_lines(&self) -> Vec<String> {
        self.warnings.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn error_lines(&self) -> Vec<String> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl AdapterLog for RecordingLog {
    fn debug(&self, tag: &str, detail: &dyn fmt::Debug) {
        self.debug
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{tag} {detail:?}"));
    }

    fn warn(&self, tag: &str, message: &str) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{tag} {message}"));
    }

    fn error(&self, tag: &str, error: &dyn std::error::Error) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(format!("{tag} {error}"));
    }
}
