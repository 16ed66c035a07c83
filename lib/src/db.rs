use crate::error::{Result, SecondBrainError};
use crate::models::collection::DEFAULT_COLOR;
use crate::models::{Bookmark, BookmarkId, Collection, CollectionId};
use crate::store::{BatchOp, BookmarkStore, StoreChange};
use crate::tags::{decode_tags, encode_tags};
use crate::utils;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const BOOKMARK_COLUMNS: &str = "id, is_local_id, collection_id, title, url, description, tags, \
     favicon_url, image_url, is_favorite, is_archived, server_is_favorite, server_is_archived, \
     is_synced, is_deleted, created_at, updated_at, last_opened, open_count";

const ORDER: &str = "ORDER BY created_at DESC, id DESC";

/// SQLite-backed local store
///
/// The connection sits behind a mutex, so one `BookmarkDb` can be shared
/// between threads (sync passes, background refreshes, the CLI).
pub struct BookmarkDb {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    subscribers: Mutex<Vec<Sender<StoreChange>>>,
}

impl BookmarkDb {
    pub fn init_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, PathBuf::from(":memory:"))
    }

    pub fn init(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn, db_path.to_path_buf())
    }

    fn with_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        setup_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// Get the database file path
    pub fn get_path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SecondBrainError::LockPoisoned)
    }

    fn notify(&self, ids: Vec<BookmarkId>) {
        if ids.is_empty() {
            return;
        }
        if let Ok(mut subscribers) = self.subscribers.lock() {
            let change = StoreChange { ids };
            subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        }
    }

    fn query_bookmarks(&self, filter: &str, params: &[&dyn ToSql]) -> Result<Vec<Bookmark>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE {} {}",
            BOOKMARK_COLUMNS, filter, ORDER
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_bookmark)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// `UPDATE bookmarks SET <assignments> WHERE is_deleted = 0 AND id IN (...)`
    fn update_where_ids(
        &self,
        assignments: &str,
        values: &[&dyn ToSql],
        ids: &[BookmarkId],
    ) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let changed = {
            let conn = self.conn()?;
            let sql = format!(
                "UPDATE bookmarks SET {} WHERE is_deleted = 0 AND id IN ({})",
                assignments,
                placeholders(ids.len())
            );
            let mut params: Vec<&dyn ToSql> = values.to_vec();
            params.extend(ids.iter().map(|id| id as &dyn ToSql));
            conn.execute(&sql, params.as_slice())?
        };

        if changed > 0 {
            self.notify(ids.to_vec());
        }
        Ok(changed)
    }

    // Collections

    pub fn create_collection(&self, name: &str, description: Option<&str>, color: Option<&str>) -> Result<CollectionId> {
        let now = utils::now_millis();
        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO collections (name, description, color, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name.trim(), description, color.unwrap_or(DEFAULT_COLOR), now, now],
            )?;
            conn.last_insert_rowid()
        };
        debug!("Created collection {} ({})", id, name);
        Ok(id)
    }

    pub fn get_collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE c.id = ?1", COLLECTION_SELECT);
        let collection = conn.query_row(&sql, [id], row_to_collection).optional()?;
        Ok(collection)
    }

    pub fn list_collections(&self) -> Result<Vec<Collection>> {
        let conn = self.conn()?;
        let sql = format!("{} ORDER BY c.created_at DESC, c.id DESC", COLLECTION_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let collections = stmt
            .query_map([], row_to_collection)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(collections)
    }

    /// Delete a collection. Its bookmarks stay, with `collection_id` set to NULL.
    pub fn delete_collection(&self, id: CollectionId) -> Result<()> {
        let orphaned = {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;

            let orphaned: Vec<BookmarkId> = {
                let mut stmt = tx.prepare("SELECT id FROM bookmarks WHERE collection_id = ?1")?;
                let ids = stmt
                    .query_map([id], |row| row.get(0))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                ids
            };

            tx.execute(
                "UPDATE bookmarks SET collection_id = NULL WHERE collection_id = ?1",
                [id],
            )?;
            let deleted = tx.execute("DELETE FROM collections WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(SecondBrainError::CollectionNotFound(id));
            }

            tx.commit()?;
            orphaned
        };

        self.notify(orphaned);
        Ok(())
    }
}

impl BookmarkStore for BookmarkDb {
    fn get_by_id(&self, id: BookmarkId) -> Result<Option<Bookmark>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM bookmarks WHERE id = ?1", BOOKMARK_COLUMNS);
        let bookmark = conn.query_row(&sql, [id], row_to_bookmark).optional()?;
        Ok(bookmark)
    }

    fn insert(&self, bookmark: &Bookmark) -> Result<BookmarkId> {
        let id = {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;

            let mut record = bookmark.clone();
            if record.is_local_id {
                record.id = next_local_id(&tx)?;
            }
            write_bookmark(&tx, &record)?;

            tx.commit()?;
            record.id
        };

        debug!("Inserted bookmark {} ({})", id, bookmark.url);
        self.notify(vec![id]);
        Ok(id)
    }

    fn insert_batch(&self, bookmarks: &[Bookmark]) -> Result<()> {
        if bookmarks.is_empty() {
            return Ok(());
        }
        {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;
            for bookmark in bookmarks {
                write_bookmark(&tx, bookmark)?;
            }
            tx.commit()?;
        }
        self.notify(bookmarks.iter().map(|b| b.id).collect());
        Ok(())
    }

    fn update(&self, bookmark: &Bookmark) -> Result<()> {
        let changed = {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE bookmarks SET is_local_id = ?2, collection_id = ?3, title = ?4, url = ?5,
                    description = ?6, tags = ?7, favicon_url = ?8, image_url = ?9,
                    is_favorite = ?10, is_archived = ?11, server_is_favorite = ?12,
                    server_is_archived = ?13, is_synced = ?14, is_deleted = ?15,
                    created_at = ?16, updated_at = ?17, last_opened = ?18, open_count = ?19
                 WHERE id = ?1",
                params![
                    bookmark.id,
                    bookmark.is_local_id,
                    bookmark.collection_id,
                    bookmark.title,
                    bookmark.url,
                    bookmark.description,
                    encode_tags(&bookmark.tags),
                    bookmark.favicon_url,
                    bookmark.image_url,
                    bookmark.is_favorite,
                    bookmark.is_archived,
                    bookmark.server_is_favorite,
                    bookmark.server_is_archived,
                    bookmark.is_synced,
                    bookmark.is_deleted,
                    bookmark.created_at,
                    bookmark.updated_at,
                    bookmark.last_opened,
                    bookmark.open_count,
                ],
            )?
        };

        if changed == 0 {
            return Err(SecondBrainError::BookmarkNotFound(bookmark.id));
        }
        self.notify(vec![bookmark.id]);
        Ok(())
    }

    fn delete_by_id(&self, id: BookmarkId) -> Result<bool> {
        let deleted = {
            let conn = self.conn()?;
            conn.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?
        };
        if deleted > 0 {
            self.notify(vec![id]);
        }
        Ok(deleted > 0)
    }

    fn delete_batch(&self, ids: &[BookmarkId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;
            let mut deleted = 0;
            for &id in ids {
                deleted += tx.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
            }
            tx.commit()?;
            deleted
        };

        if deleted > 0 {
            self.notify(ids.to_vec());
        }
        Ok(deleted)
    }

    fn list_by_collection(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("collection_id = ?1 AND is_deleted = 0", &[&collection_id])
    }

    fn list_all(&self) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("is_deleted = 0", &[])
    }

    fn list_favorites(&self) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("is_favorite = 1 AND is_deleted = 0", &[])
    }

    fn list_archived(&self) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("is_archived = 1 AND is_deleted = 0", &[])
    }

    fn search(&self, text: &str) -> Result<Vec<Bookmark>> {
        let text = text.trim();
        if text.is_empty() {
            return self.list_all();
        }

        let pattern = format!("%{}%", escape_like(text));
        self.query_bookmarks(
            "is_deleted = 0 AND (title LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\' \
             OR url LIKE ?1 ESCAPE '\\' OR tags LIKE ?1 ESCAPE '\\')",
            &[&pattern],
        )
    }

    fn list_by_tag(&self, tag: &str) -> Result<Vec<Bookmark>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%,{},%", escape_like(tag));
        self.query_bookmarks("is_deleted = 0 AND tags LIKE ?1 ESCAPE '\\'", &[&pattern])
    }

    fn list_unsynced(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.query_bookmarks(
            "collection_id = ?1 AND is_synced = 0 AND is_deleted = 0",
            &[&collection_id],
        )
    }

    fn list_deleted(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("collection_id = ?1 AND is_deleted = 1", &[&collection_id])
    }

    fn list_modified(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.query_bookmarks(
            "collection_id = ?1 AND is_deleted = 0 AND \
             (is_favorite != server_is_favorite OR is_archived != server_is_archived)",
            &[&collection_id],
        )
    }

    fn list_collection_state(&self, collection_id: CollectionId) -> Result<Vec<Bookmark>> {
        self.query_bookmarks("collection_id = ?1", &[&collection_id])
    }

    fn update_local_id(&self, old_id: BookmarkId, new_id: BookmarkId) -> Result<()> {
        {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;

            let taken: bool = tx
                .query_row("SELECT 1 FROM bookmarks WHERE id = ?1", [new_id], |_| Ok(true))
                .optional()?
                .unwrap_or(false);
            if taken {
                return Err(SecondBrainError::InvalidInput(format!(
                    "cannot renumber bookmark {}: id {} is already in use",
                    old_id, new_id
                )));
            }

            let changed = tx.execute(
                "UPDATE bookmarks SET id = ?1, is_local_id = 0 WHERE id = ?2",
                [new_id, old_id],
            )?;
            if changed == 0 {
                return Err(SecondBrainError::BookmarkNotFound(old_id));
            }

            tx.commit()?;
        }

        debug!("Renumbered bookmark {} -> {}", old_id, new_id);
        self.notify(vec![old_id, new_id]);
        Ok(())
    }

    fn set_favorite(&self, ids: &[BookmarkId], value: bool, now: i64) -> Result<usize> {
        self.update_where_ids("is_favorite = ?, updated_at = ?", &[&value, &now], ids)
    }

    fn set_archived(&self, ids: &[BookmarkId], value: bool, now: i64) -> Result<usize> {
        self.update_where_ids("is_archived = ?, updated_at = ?", &[&value, &now], ids)
    }

    fn mark_deleted(&self, ids: &[BookmarkId], now: i64) -> Result<usize> {
        self.update_where_ids("is_deleted = 1, updated_at = ?", &[&now], ids)
    }

    fn record_open(&self, id: BookmarkId, now: i64) -> Result<()> {
        let changed = self.update_where_ids(
            "last_opened = ?, updated_at = ?, open_count = open_count + 1, is_synced = 0",
            &[&now, &now],
            &[id],
        )?;
        if changed == 0 {
            return Err(SecondBrainError::BookmarkNotFound(id));
        }
        Ok(())
    }

    fn apply_batch(&self, ops: &[BatchOp]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        {
            let conn = self.conn()?;
            let tx = conn.unchecked_transaction()?;
            for op in ops {
                match op {
                    BatchOp::Upsert(bookmark) => write_bookmark(&tx, bookmark)?,
                    BatchOp::Delete(id) => {
                        tx.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
                    }
                }
            }
            tx.commit()?;
        }

        let ids = ops
            .iter()
            .map(|op| match op {
                BatchOp::Upsert(bookmark) => bookmark.id,
                BatchOp::Delete(id) => *id,
            })
            .collect();
        self.notify(ids);
        Ok(())
    }

    fn subscribe(&self) -> Receiver<StoreChange> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        rx
    }
}

fn setup_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookmarks (
            id integer PRIMARY KEY,
            is_local_id integer NOT NULL default 0,
            collection_id integer default NULL,
            title text NOT NULL,
            url text NOT NULL,
            description text default NULL,
            tags text NOT NULL default ',',
            favicon_url text default NULL,
            is_favorite integer NOT NULL default 0,
            is_archived integer NOT NULL default 0,
            server_is_favorite integer NOT NULL default 0,
            server_is_archived integer NOT NULL default 0,
            is_synced integer NOT NULL default 0,
            is_deleted integer NOT NULL default 0,
            created_at integer NOT NULL,
            updated_at integer NOT NULL,
            last_opened integer default NULL,
            open_count integer NOT NULL default 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS collections (
            id integer PRIMARY KEY AUTOINCREMENT,
            name text NOT NULL UNIQUE,
            description text default NULL,
            color text NOT NULL default '#6366F1',
            created_at integer NOT NULL,
            updated_at integer NOT NULL
        )",
        [],
    )?;

    // Single-row sequence for local ids, which count down from -1
    conn.execute(
        "CREATE TABLE IF NOT EXISTS local_id_seq (
            id integer PRIMARY KEY CHECK (id = 1),
            last integer NOT NULL
        )",
        [],
    )?;

    // Migration: image_url arrived after the first schema
    if !has_column(conn, "bookmarks", "image_url")? {
        conn.execute(
            "ALTER TABLE bookmarks ADD COLUMN image_url TEXT DEFAULT NULL",
            [],
        )?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_collection ON bookmarks(collection_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_created ON bookmarks(created_at)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_flags ON bookmarks(is_favorite, is_archived)",
        [],
    )?;

    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        Ok(name)
    })?;

    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn next_local_id(conn: &Connection) -> Result<BookmarkId> {
    conn.execute(
        "INSERT INTO local_id_seq (id, last) VALUES (1, -1)
         ON CONFLICT(id) DO UPDATE SET last = last - 1",
        [],
    )?;
    let id: BookmarkId = conn.query_row("SELECT last FROM local_id_seq WHERE id = 1", [], |row| {
        row.get(0)
    })?;
    Ok(id)
}

fn write_bookmark(conn: &Connection, bookmark: &Bookmark) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO bookmarks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
             ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            BOOKMARK_COLUMNS
        ),
        params![
            bookmark.id,
            bookmark.is_local_id,
            bookmark.collection_id,
            bookmark.title,
            bookmark.url,
            bookmark.description,
            encode_tags(&bookmark.tags),
            bookmark.favicon_url,
            bookmark.image_url,
            bookmark.is_favorite,
            bookmark.is_archived,
            bookmark.server_is_favorite,
            bookmark.server_is_archived,
            bookmark.is_synced,
            bookmark.is_deleted,
            bookmark.created_at,
            bookmark.updated_at,
            bookmark.last_opened,
            bookmark.open_count,
        ],
    )?;
    Ok(())
}

fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
    let tags: String = row.get(6)?;
    Ok(Bookmark {
        id: row.get(0)?,
        is_local_id: row.get(1)?,
        collection_id: row.get(2)?,
        title: row.get(3)?,
        url: row.get(4)?,
        description: row.get(5)?,
        tags: decode_tags(&tags),
        favicon_url: row.get(7)?,
        image_url: row.get(8)?,
        is_favorite: row.get(9)?,
        is_archived: row.get(10)?,
        server_is_favorite: row.get(11)?,
        server_is_archived: row.get(12)?,
        is_synced: row.get(13)?,
        is_deleted: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
        last_opened: row.get(17)?,
        open_count: row.get(18)?,
    })
}

const COLLECTION_SELECT: &str = "SELECT c.id, c.name, c.description, c.color, \
     (SELECT COUNT(*) FROM bookmarks b WHERE b.collection_id = c.id AND b.is_deleted = 0), \
     c.created_at, c.updated_at FROM collections c";

fn row_to_collection(row: &Row) -> rusqlite::Result<Collection> {
    Ok(Collection {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color: row.get(3)?,
        bookmark_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(collection: i64, title: &str, url: &str) -> Bookmark {
        Bookmark::draft(Some(collection), title, url, utils::now_millis())
    }

    fn synced(id: i64, collection: i64, title: &str) -> Bookmark {
        let mut b = draft(collection, title, &format!("https://example.com/{}", id));
        b.id = id;
        b.is_local_id = false;
        b.is_synced = true;
        b
    }

    #[test]
    fn test_insert_allocates_descending_local_ids() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let a = db.insert(&draft(1, "A", "https://a.io")).unwrap();
        let b = db.insert(&draft(1, "B", "https://b.io")).unwrap();
        assert_eq!(a, -1);
        assert_eq!(b, -2);

        // Purging does not free the id for reuse
        db.delete_by_id(b).unwrap();
        let c = db.insert(&draft(1, "C", "https://c.io")).unwrap();
        assert_eq!(c, -3);
    }

    #[test]
    fn test_insert_server_record_keeps_id() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let id = db.insert(&synced(42, 1, "Server")).unwrap();
        assert_eq!(id, 42);

        let stored = db.get_by_id(42).unwrap().unwrap();
        assert!(!stored.is_local_id);
        assert!(stored.is_synced);
    }

    #[test]
    fn test_get_by_id_roundtrips_all_fields() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let mut bookmark = draft(3, "Rust", "https://rust-lang.org")
            .with_description(Some("Language"))
            .with_tags(["rust", "lang"]);
        bookmark.favicon_url = Some("https://rust-lang.org/favicon.ico".to_string());
        bookmark.image_url = Some("https://rust-lang.org/logo.png".to_string());
        bookmark.is_favorite = true;
        bookmark.last_opened = Some(99);
        bookmark.open_count = 4;

        let id = db.insert(&bookmark).unwrap();
        let stored = db.get_by_id(id).unwrap().unwrap();

        bookmark.id = id;
        assert_eq!(stored, bookmark);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let db = BookmarkDb::init_in_memory().unwrap();
        assert!(db.get_by_id(7).unwrap().is_none());
    }

    #[test]
    fn test_update_missing_row() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let result = db.update(&synced(5, 1, "Ghost"));
        assert!(matches!(result, Err(SecondBrainError::BookmarkNotFound(5))));
    }

    #[test]
    fn test_update_rec() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let id = db.insert(&draft(1, "Old", "https://a.io")).unwrap();
        let mut bookmark = db.get_by_id(id).unwrap().unwrap();
        bookmark.title = "New".to_string();
        bookmark.tags = vec!["x".to_string()];
        db.update(&bookmark).unwrap();

        let stored = db.get_by_id(id).unwrap().unwrap();
        assert_eq!(stored.title, "New");
        assert_eq!(stored.tags, vec!["x"]);
    }

    #[test]
    fn test_lists_exclude_tombstones() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let keep = db.insert(&draft(1, "Keep", "https://keep.io")).unwrap();
        let gone = db.insert(&draft(1, "Gone", "https://gone.io")).unwrap();
        db.set_favorite(&[keep, gone], true, 1).unwrap();
        db.set_archived(&[keep, gone], true, 1).unwrap();
        db.mark_deleted(&[gone], 2).unwrap();

        let ids = |list: Vec<Bookmark>| list.into_iter().map(|b| b.id).collect::<Vec<_>>();
        assert_eq!(ids(db.list_by_collection(1).unwrap()), vec![keep]);
        assert_eq!(ids(db.list_all().unwrap()), vec![keep]);
        assert_eq!(ids(db.list_favorites().unwrap()), vec![keep]);
        assert_eq!(ids(db.list_archived().unwrap()), vec![keep]);
        assert_eq!(ids(db.search("io").unwrap()), vec![keep]);
        assert_eq!(ids(db.list_deleted(1).unwrap()), vec![gone]);
        assert_eq!(db.list_collection_state(1).unwrap().len(), 2);
    }

    #[test]
    fn test_bulk_updates_skip_tombstones() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let a = db.insert(&draft(1, "A", "https://a.io")).unwrap();
        let b = db.insert(&draft(1, "B", "https://b.io")).unwrap();
        db.mark_deleted(&[b], 1).unwrap();

        assert_eq!(db.set_favorite(&[a, b], true, 5).unwrap(), 1);
        assert_eq!(db.set_favorite(&[], true, 5).unwrap(), 0);
        let stored = db.get_by_id(a).unwrap().unwrap();
        assert!(stored.is_favorite);
        assert!(!stored.server_is_favorite);
        assert_eq!(stored.updated_at, 5);
    }

    #[rstest]
    #[case("rust", 1)]
    #[case("RUST", 1)]
    #[case("programming", 2)]
    #[case("100%", 1)]
    #[case("under_score", 1)]
    #[case("nonexistent", 0)]
    fn test_search_variations(#[case] query: &str, #[case] expected: usize) {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert(
            &draft(1, "Rust", "https://rust-lang.org")
                .with_description(Some("A programming language, 100% safe"))
                .with_tags(["programming"]),
        )
        .unwrap();
        db.insert(
            &draft(1, "Python", "https://python.org/under_score").with_tags(["programming"]),
        )
        .unwrap();
        db.insert(&draft(1, "Underscore lookalike", "https://underXscore.io")).unwrap();

        assert_eq!(db.search(query).unwrap().len(), expected);
    }

    #[rstest]
    #[case("rust", 1)]
    #[case("ru", 0)]
    #[case("web", 2)]
    #[case("", 0)]
    fn test_list_by_tag_is_exact(#[case] tag: &str, #[case] expected: usize) {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert(&draft(1, "A", "https://a.io").with_tags(["rust", "web"])).unwrap();
        db.insert(&draft(1, "B", "https://b.io").with_tags(["web"])).unwrap();

        assert_eq!(db.list_by_tag(tag).unwrap().len(), expected);
    }

    #[test]
    fn test_dirty_queries() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let local = db.insert(&draft(1, "Local", "https://l.io")).unwrap();
        let mut clean = synced(10, 1, "Clean");
        db.insert(&clean).unwrap();
        let mut flagged = synced(11, 1, "Flagged");
        flagged.is_archived = true;
        db.insert(&flagged).unwrap();
        db.insert(&synced(12, 2, "Other collection")).unwrap();

        let unsynced: Vec<_> = db.list_unsynced(1).unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(unsynced, vec![local]);
        let modified: Vec<_> = db.list_modified(1).unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(modified, vec![11]);

        clean.is_deleted = true;
        db.update(&clean).unwrap();
        let deleted: Vec<_> = db.list_deleted(1).unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(deleted, vec![10]);
        assert!(db.list_unsynced(2).unwrap().is_empty());
    }

    #[test]
    fn test_update_local_id_preserves_row() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let local = db
            .insert(&draft(4, "Draft", "https://d.io").with_tags(["keep"]))
            .unwrap();
        db.record_open(local, 50).unwrap();

        db.update_local_id(local, 42).unwrap();

        assert!(db.get_by_id(local).unwrap().is_none());
        let moved = db.get_by_id(42).unwrap().unwrap();
        assert!(!moved.is_local_id);
        assert_eq!(moved.collection_id, Some(4));
        assert_eq!(moved.tags, vec!["keep"]);
        assert_eq!(moved.open_count, 1);
        assert_eq!(db.list_by_collection(4).unwrap()[0].id, 42);
    }

    #[test]
    fn test_update_local_id_conflict_and_missing() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let local = db.insert(&draft(1, "Draft", "https://d.io")).unwrap();
        db.insert(&synced(42, 1, "Taken")).unwrap();

        assert!(matches!(
            db.update_local_id(local, 42),
            Err(SecondBrainError::InvalidInput(_))
        ));
        assert!(db.get_by_id(local).unwrap().is_some());
        assert!(matches!(
            db.update_local_id(-99, 43),
            Err(SecondBrainError::BookmarkNotFound(-99))
        ));
    }

    #[test]
    fn test_record_open() {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert(&synced(3, 1, "Opened")).unwrap();
        db.record_open(3, 77).unwrap();
        db.record_open(3, 78).unwrap();

        let stored = db.get_by_id(3).unwrap().unwrap();
        assert_eq!(stored.last_opened, Some(78));
        assert_eq!(stored.open_count, 2);
        assert!(!stored.is_synced);
        assert!(matches!(
            db.record_open(4, 1),
            Err(SecondBrainError::BookmarkNotFound(4))
        ));
    }

    #[test]
    fn test_apply_batch_is_atomic() {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert(&synced(1, 1, "One")).unwrap();

        let rejected = synced(2, 1, "Two");
        db.conn()
            .unwrap()
            .execute(
                "CREATE TRIGGER fail_two BEFORE INSERT ON bookmarks WHEN new.id = 2
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
                [],
            )
            .unwrap();

        let result = db.apply_batch(&[BatchOp::Delete(1), BatchOp::Upsert(rejected)]);
        assert!(result.is_err());
        assert!(db.get_by_id(1).unwrap().is_some());
    }

    #[test]
    fn test_apply_batch_upserts_then_deletes() {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert(&synced(1, 1, "One")).unwrap();
        db.insert(&synced(2, 1, "Two")).unwrap();

        let mut renamed = synced(1, 1, "Uno");
        renamed.open_count = 3;
        db.apply_batch(&[
            BatchOp::Upsert(renamed),
            BatchOp::Upsert(synced(3, 1, "Three")),
            BatchOp::Delete(2),
        ])
        .unwrap();

        let titles: Vec<_> = db
            .list_by_collection(1)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Uno".to_string()));
        assert!(titles.contains(&"Three".to_string()));
    }

    #[test]
    fn test_delete_batch() {
        let db = BookmarkDb::init_in_memory().unwrap();
        db.insert_batch(&[synced(1, 1, "a"), synced(2, 1, "b"), synced(3, 1, "c")])
            .unwrap();
        assert_eq!(db.delete_batch(&[1, 3, 9]).unwrap(), 2);
        assert_eq!(db.delete_batch(&[]).unwrap(), 0);
        assert!(db.delete_by_id(2).unwrap());
        assert!(!db.delete_by_id(2).unwrap());
        assert!(db.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_subscribe_sees_committed_writes() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let rx = db.subscribe();

        let id = db.insert(&draft(1, "A", "https://a.io")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreChange { ids: vec![id] });

        // No-op writes stay silent
        db.set_favorite(&[999], true, 1).unwrap();
        assert!(rx.try_recv().is_err());

        db.mark_deleted(&[id], 2).unwrap();
        assert_eq!(rx.try_recv().unwrap().ids, vec![id]);
    }

    #[test]
    fn test_collections_crud() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let work = db.create_collection(" Work ", Some("Job stuff"), None).unwrap();
        let home = db.create_collection("Home", None, Some("#ff0000")).unwrap();
        db.insert(&draft(work, "A", "https://a.io")).unwrap();
        let gone = db.insert(&draft(work, "B", "https://b.io")).unwrap();
        db.mark_deleted(&[gone], 1).unwrap();

        let stored = db.get_collection(work).unwrap().unwrap();
        assert_eq!(stored.name, "Work");
        assert_eq!(stored.color, DEFAULT_COLOR);
        assert_eq!(stored.bookmark_count, 1);
        assert_eq!(db.get_collection(home).unwrap().unwrap().color, "#ff0000");
        assert_eq!(db.list_collections().unwrap().len(), 2);
        assert!(db.create_collection("Home", None, None).is_err());
    }

    #[test]
    fn test_delete_collection_orphans_bookmarks() {
        let db = BookmarkDb::init_in_memory().unwrap();
        let work = db.create_collection("Work", None, None).unwrap();
        let id = db.insert(&draft(work, "A", "https://a.io")).unwrap();

        db.delete_collection(work).unwrap();

        assert!(db.get_collection(work).unwrap().is_none());
        let orphan = db.get_by_id(id).unwrap().unwrap();
        assert_eq!(orphan.collection_id, None);
        assert!(matches!(
            db.delete_collection(work),
            Err(SecondBrainError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_init_file_database_is_reopenable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.db");
        {
            let db = BookmarkDb::init(&path).unwrap();
            db.insert(&synced(8, 1, "Persisted")).unwrap();
            assert_eq!(db.get_path(), path.as_path());
        }
        let db = BookmarkDb::init(&path).unwrap();
        assert_eq!(db.get_by_id(8).unwrap().unwrap().title, "Persisted");
    }
}
