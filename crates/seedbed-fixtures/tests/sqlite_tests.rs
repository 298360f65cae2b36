//! End-to-end loading against an in-memory SQLite database.

use std::io::Write;

use rstest::{fixture, rstest};
use seedbed_backends::SqliteBackend;
use seedbed_fixtures::fixtures::{FixtureFormat, FixtureLoader, LoadOptions};
use seedbed_fixtures::{FixtureError, RowError};
use tempfile::TempDir;

const SCHEMA: &[&str] = &[
	"CREATE TABLE users (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		name TEXT NOT NULL,
		created_at TEXT,
		updated_at TEXT
	)",
	"CREATE TABLE posts (
		id INTEGER PRIMARY KEY,
		author_id INTEGER NOT NULL REFERENCES users(id),
		title TEXT NOT NULL
	)",
];

const BLOG: &str = r#"
- table: users
  pk:
    id: PK_GENERATE(alice)
  fields:
    name: Alice
    created_at: ON_INSERT_NOW()
    updated_at: ON_UPDATE_NOW()
- table: posts
  pk:
    id: 1
  fields:
    author_id: PK_REFERENCE(alice)
    title: Hello
"#;

#[fixture]
async fn sqlite() -> SqliteBackend {
	let backend = SqliteBackend::connect("sqlite::memory:").await.unwrap();
	for statement in SCHEMA {
		sqlx::query(statement)
			.execute(backend.pool())
			.await
			.unwrap();
	}
	backend
}

fn loader() -> FixtureLoader {
	FixtureLoader::with_options(LoadOptions::new().with_dump_sql(false))
}

async fn count(backend: &SqliteBackend, table: &str) -> i64 {
	sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
		.fetch_one(backend.pool())
		.await
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_generated_key_is_referenced(#[future] sqlite: SqliteBackend) {
	// Arrange
	let backend = sqlite.await;

	// Act
	let result = loader()
		.load_str(&backend, BLOG, FixtureFormat::Yaml)
		.await
		.unwrap();

	// Assert
	let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE name = 'Alice'")
		.fetch_one(backend.pool())
		.await
		.unwrap();
	let author_id: i64 = sqlx::query_scalar("SELECT author_id FROM posts WHERE id = 1")
		.fetch_one(backend.pool())
		.await
		.unwrap();
	assert_eq!(author_id, user_id);
	assert_eq!(
		result.generated_keys["alice"],
		seedbed_backends::FixtureValue::Int(user_id)
	);
	assert_eq!(result.inserted, 2);
}

#[rstest]
#[tokio::test]
async fn test_second_load_updates_instead_of_inserting(#[future] sqlite: SqliteBackend) {
	// Arrange
	let backend = sqlite.await;
	let content = r#"
- table: users
  pk:
    id: 1
  fields:
    name: Alice
    created_at: ON_INSERT_NOW()
- table: users
  pk:
    id: 2
  fields:
    name: Bob
    created_at: ON_INSERT_NOW()
"#;
	let loader = loader();

	// Act
	let first = loader
		.load_str(&backend, content, FixtureFormat::Yaml)
		.await
		.unwrap();
	let created_before: String = sqlx::query_scalar("SELECT created_at FROM users WHERE id = 1")
		.fetch_one(backend.pool())
		.await
		.unwrap();
	let second = loader
		.load_str(
			&backend,
			&content.replace("Alice", "Alicia"),
			FixtureFormat::Yaml,
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(first.inserted, 2);
	assert_eq!(second.inserted, 0);
	assert_eq!(second.updated, 2);
	assert_eq!(count(&backend, "users").await, 2);
	let (name, created_after): (String, String) =
		sqlx::query_as("SELECT name, created_at FROM users WHERE id = 1")
			.fetch_one(backend.pool())
			.await
			.unwrap();
	assert_eq!(name, "Alicia");
	assert_eq!(created_after, created_before);
}

#[rstest]
#[tokio::test]
async fn test_failing_row_leaves_database_unchanged(#[future] sqlite: SqliteBackend) {
	// Arrange
	let backend = sqlite.await;
	let content = r#"
- table: users
  pk:
    id: 1
  fields:
    name: Alice
- table: users
  pk:
    id: 2
  fields:
    name: Bob
- table: missing_table
  pk:
    id: 1
"#;

	// Act
	let result = loader()
		.load_str(&backend, content, FixtureFormat::Yaml)
		.await;

	// Assert
	match result {
		Err(FixtureError::RowProcessing {
			row: 3,
			source: RowError::Database(_),
		}) => {}
		other => panic!("Expected database failure on row 3, got {:?}", other),
	}
	assert_eq!(count(&backend, "users").await, 0);
}

#[rstest]
#[tokio::test]
async fn test_load_files_shares_keys_across_files(#[future] sqlite: SqliteBackend) {
	// Arrange
	let backend = sqlite.await;
	let dir = TempDir::new().unwrap();
	let users = dir.path().join("01_users.yaml");
	let posts = dir.path().join("02_posts.json");
	std::fs::write(
		&users,
		"- table: users\n  pk:\n    id: PK_GENERATE(bob)\n  fields:\n    name: Bob\n",
	)
	.unwrap();
	let mut file = std::fs::File::create(&posts).unwrap();
	writeln!(
		file,
		r#"[{{"table": "posts", "pk": {{"id": 7}}, "fields": {{"author_id": "PK_REFERENCE(bob)", "title": "Hi"}}}}]"#
	)
	.unwrap();

	// Act
	let result = loader()
		.load_files(&backend, &[&users, &posts])
		.await
		.unwrap();

	// Assert
	assert_eq!(result.records_loaded, 2);
	let author: String = sqlx::query_scalar(
		"SELECT users.name FROM posts JOIN users ON users.id = posts.author_id WHERE posts.id = 7",
	)
	.fetch_one(backend.pool())
	.await
	.unwrap();
	assert_eq!(author, "Bob");
}

#[rstest]
#[tokio::test]
async fn test_load_files_with_missing_file_writes_nothing(#[future] sqlite: SqliteBackend) {
	let backend = sqlite.await;
	let dir = TempDir::new().unwrap();
	let users = dir.path().join("users.yaml");
	std::fs::write(
		&users,
		"- table: users\n  pk:\n    id: 1\n  fields:\n    name: Alice\n",
	)
	.unwrap();
	let missing = dir.path().join("missing.yaml");

	let result = loader().load_files(&backend, &[&users, &missing]).await;

	assert!(matches!(result, Err(FixtureError::File { .. })));
	assert_eq!(count(&backend, "users").await, 0);
}

#[rstest]
#[tokio::test]
async fn test_load_file(#[future] sqlite: SqliteBackend) {
	let backend = sqlite.await;
	let dir = TempDir::new().unwrap();
	let path = dir.path().join("blog.yml");
	std::fs::write(&path, BLOG).unwrap();

	let result = loader().load_file(&backend, &path).await.unwrap();

	assert_eq!(result.records_loaded, 2);
	assert_eq!(count(&backend, "posts").await, 1);
}
