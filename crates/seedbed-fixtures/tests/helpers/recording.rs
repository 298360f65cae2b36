//! Recording database double.
//!
//! Logs every call made through the transaction and answers scalar queries
//! and last-insert-id reads from scripted queues.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use seedbed_backends::{
	DatabaseBackend, DatabaseError, DatabaseType, FixtureValue, QueryResult, Result,
	TransactionExecutor,
};

/// A call observed by the double.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	Execute(String, Vec<FixtureValue>),
	QueryScalar(String, Vec<FixtureValue>),
	Commit,
	Rollback,
}

impl Call {
	pub fn execute(sql: &str, params: Vec<FixtureValue>) -> Self {
		Self::Execute(sql.to_string(), params)
	}

	pub fn scalar(sql: &str, params: Vec<FixtureValue>) -> Self {
		Self::QueryScalar(sql.to_string(), params)
	}
}

#[derive(Default)]
struct Script {
	calls: Vec<Call>,
	scalars: VecDeque<FixtureValue>,
	insert_ids: VecDeque<i64>,
	fail_on: Option<String>,
	fail_begin: bool,
	fail_rollback: bool,
}

/// Backend whose transactions record every call.
#[derive(Clone)]
pub struct RecordingBackend {
	database_type: DatabaseType,
	script: Arc<Mutex<Script>>,
}

impl RecordingBackend {
	pub fn new(database_type: DatabaseType) -> Self {
		Self {
			database_type,
			script: Arc::new(Mutex::new(Script::default())),
		}
	}

	/// Values returned by successive `query_scalar` calls.
	pub fn with_scalars(self, scalars: Vec<FixtureValue>) -> Self {
		self.script.lock().unwrap().scalars.extend(scalars);
		self
	}

	/// Last-insert-ids reported by successive `execute` calls.
	pub fn with_insert_ids(self, ids: Vec<i64>) -> Self {
		self.script.lock().unwrap().insert_ids.extend(ids);
		self
	}

	/// Fails any statement containing `fragment`.
	pub fn failing_on(self, fragment: &str) -> Self {
		self.script.lock().unwrap().fail_on = Some(fragment.to_string());
		self
	}

	pub fn failing_begin(self) -> Self {
		self.script.lock().unwrap().fail_begin = true;
		self
	}

	pub fn failing_rollback(self) -> Self {
		self.script.lock().unwrap().fail_rollback = true;
		self
	}

	pub fn calls(&self) -> Vec<Call> {
		self.script.lock().unwrap().calls.clone()
	}

	/// SQL text of every statement, in order.
	pub fn statements(&self) -> Vec<String> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				Call::Execute(sql, _) | Call::QueryScalar(sql, _) => Some(sql),
				_ => None,
			})
			.collect()
	}
}

#[async_trait]
impl DatabaseBackend for RecordingBackend {
	fn database_type(&self) -> DatabaseType {
		self.database_type
	}

	async fn begin(&self) -> Result<Box<dyn TransactionExecutor>> {
		if self.script.lock().unwrap().fail_begin {
			return Err(DatabaseError::TransactionError(
				"connection refused".to_string(),
			));
		}
		Ok(Box::new(RecordingTransaction {
			script: Arc::clone(&self.script),
		}))
	}
}

struct RecordingTransaction {
	script: Arc<Mutex<Script>>,
}

impl RecordingTransaction {
	fn record(&self, call: Call, sql: &str) -> Result<()> {
		let mut script = self.script.lock().unwrap();
		script.calls.push(call);
		match &script.fail_on {
			Some(fragment) if sql.contains(fragment.as_str()) => Err(
				DatabaseError::TransactionError(format!("simulated failure: {}", sql)),
			),
			_ => Ok(()),
		}
	}
}

#[async_trait]
impl TransactionExecutor for RecordingTransaction {
	async fn execute(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<QueryResult> {
		self.record(Call::execute(sql, params), sql)?;
		let last_insert_id = self.script.lock().unwrap().insert_ids.pop_front();
		Ok(QueryResult {
			rows_affected: 1,
			last_insert_id,
		})
	}

	async fn query_scalar(&mut self, sql: &str, params: Vec<FixtureValue>) -> Result<FixtureValue> {
		self.record(Call::scalar(sql, params), sql)?;
		self.script
			.lock()
			.unwrap()
			.scalars
			.pop_front()
			.ok_or_else(|| DatabaseError::NoRows(sql.to_string()))
	}

	async fn commit(self: Box<Self>) -> Result<()> {
		self.script.lock().unwrap().calls.push(Call::Commit);
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> Result<()> {
		let mut script = self.script.lock().unwrap();
		script.calls.push(Call::Rollback);
		if script.fail_rollback {
			return Err(DatabaseError::TransactionError(
				"connection lost".to_string(),
			));
		}
		Ok(())
	}
}
