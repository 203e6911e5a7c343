use rusqlite::{params, Connection};
use tempfile::TempDir;
use vector_codec::Vector;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute(
        "CREATE TABLE documents (
            id INTEGER PRIMARY KEY,
            content TEXT NOT NULL,
            embedding BLOB
        )",
        [],
    )
    .unwrap();
    conn
}

#[test]
fn test_vector_stored_as_binary_blob() {
    let conn = setup();
    let vector = Vector::new(vec![1.5, -2.25, 0.0]);

    conn.execute(
        "INSERT INTO documents (content, embedding) VALUES (?, ?)",
        params!["The dog is barking", vector],
    )
    .unwrap();

    let blob: Vec<u8> = conn
        .query_row("SELECT embedding FROM documents WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(
        blob,
        [0x00, 0x03, 0x00, 0x00, 0x3F, 0xC0, 0x00, 0x00, 0xC0, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );

    let retrieved: Vector = conn
        .query_row("SELECT embedding FROM documents WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(retrieved, vector);
}

#[test]
fn test_vector_read_from_text_column() {
    let conn = setup();
    conn.execute(
        "INSERT INTO documents (content, embedding) VALUES ('The cat is purring', '[1,2.5]')",
        [],
    )
    .unwrap();

    let retrieved: Vector = conn
        .query_row("SELECT embedding FROM documents", [], |row| row.get(0))
        .unwrap();
    assert_eq!(retrieved.as_slice(), &[1.0, 2.5]);
}

#[test]
fn test_null_is_distinct_from_empty() {
    let conn = setup();
    conn.execute(
        "INSERT INTO documents (id, content, embedding) VALUES (1, 'null', NULL), (2, 'empty', ?)",
        params![Vector::default()],
    )
    .unwrap();

    let null: Option<Vector> = conn
        .query_row("SELECT embedding FROM documents WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert!(null.is_none());

    let empty: Option<Vector> = conn
        .query_row("SELECT embedding FROM documents WHERE id = 2", [], |row| row.get(0))
        .unwrap();
    assert_eq!(empty, Some(Vector::default()));

    // A non-optional target rejects NULL instead of inventing a vector
    let result: rusqlite::Result<Vector> =
        conn.query_row("SELECT embedding FROM documents WHERE id = 1", [], |row| row.get(0));
    assert!(matches!(result, Err(rusqlite::Error::InvalidColumnType(..))));
}

#[test]
fn test_malformed_column_is_an_error() {
    let conn = setup();
    conn.execute(
        "INSERT INTO documents (id, content, embedding) VALUES (1, 'short', X'00020000'), (2, 'text', '1,2'), (3, 'int', 42)",
        [],
    )
    .unwrap();

    for id in [1, 2] {
        let result: rusqlite::Result<Vector> = conn.query_row(
            "SELECT embedding FROM documents WHERE id = ?",
            params![id],
            |row| row.get(0),
        );
        assert!(matches!(result, Err(rusqlite::Error::FromSqlConversionFailure(..))));
    }

    let result: rusqlite::Result<Vector> =
        conn.query_row("SELECT embedding FROM documents WHERE id = 3", [], |row| row.get(0));
    assert!(matches!(result, Err(rusqlite::Error::InvalidColumnType(..))));
}

#[test]
fn test_oversized_vector_rejected_on_insert() {
    let conn = setup();
    let vector = Vector::new(vec![0.0; vector_codec::MAX_DIM + 1]);

    let result = conn.execute(
        "INSERT INTO documents (content, embedding) VALUES ('too big', ?)",
        params![vector],
    );
    assert!(matches!(result, Err(rusqlite::Error::ToSqlConversionFailure(_))));
}

#[test]
fn test_vectors_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("vectors.sqlite3");

    let vectors: Vec<Vector> = (0..10)
        .map(|i| Vector::new((0..16).map(|j| (i * 16 + j) as f32 / 7.0).collect()))
        .collect();

    {
        let conn = Connection::open(&db_path).unwrap();
        conn.execute("CREATE TABLE items (id INTEGER PRIMARY KEY, embedding BLOB NOT NULL)", [])
            .unwrap();
        for (i, vector) in vectors.iter().enumerate() {
            conn.execute(
                "INSERT INTO items (id, embedding) VALUES (?, ?)",
                params![i as i64, vector],
            )
            .unwrap();
        }
    }

    let conn = Connection::open(&db_path).unwrap();
    let mut stmt = conn.prepare("SELECT embedding FROM items ORDER BY id").unwrap();
    let loaded: Vec<Vector> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();

    assert_eq!(loaded, vectors);
}
