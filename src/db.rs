use crate::error::{ImportError, Result};
use crate::store::{GroupRole, ReferenceStore};
use eval_import_common::{AssessorRole, InsertCandidate, NaturalKey};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;

/// 既存キー照会1回あたりのキー数（3パラメータ/キー）
const KEY_CHUNK: usize = 300;

const INSERT_EVALUATION_SQL: &str = "INSERT INTO api_assessorevaluation
        (grade, comment, stage, assessor_id, myun_id, soldier_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT (stage, assessor_id, soldier_id) DO NOTHING";

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 既存のDBファイルを開く
///
/// ファイルが無ければ作らずに `DatabaseNotFound` を返す。
pub fn open_existing_db(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(ImportError::DatabaseNotFound(path.display().to_string()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    init_schema(&conn)?;

    let participants: i64 =
        conn.query_row("SELECT COUNT(*) FROM api_participant", [], |row| row.get(0))?;
    if participants == 0 {
        log::warn!("参加者が1件も登録されていません: {}", path.display());
    }
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS api_participant(
            id INTEGER PRIMARY KEY,
            chest_number INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_participant_chest ON api_participant(chest_number);

        CREATE TABLE IF NOT EXISTS api_assessoringroup(
            id INTEGER PRIMARY KEY,
            group_id INTEGER NOT NULL,
            stage INTEGER NOT NULL,
            role TEXT NOT NULL,
            myun_id INTEGER NOT NULL,
            assessor_id INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_assessoringroup_lookup
            ON api_assessoringroup(group_id, stage, role);

        CREATE TABLE IF NOT EXISTS api_assessorevaluation(
            id INTEGER PRIMARY KEY,
            grade INTEGER NOT NULL,
            comment TEXT NOT NULL,
            stage INTEGER NOT NULL,
            assessor_id INTEGER NOT NULL,
            myun_id INTEGER NOT NULL,
            soldier_id INTEGER NOT NULL,
            UNIQUE(stage, assessor_id, soldier_id)
        );",
    )?;
    Ok(())
}

/// SQLite上の参照ストア
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_existing(path: &Path) -> Result<Self> {
        Ok(Self::new(open_existing_db(path)?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// 登録済み評価の件数
    pub fn evaluation_count(&self) -> Result<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM api_assessorevaluation", [], |row| row.get(0))?;
        Ok(n)
    }
}

impl ReferenceStore for SqliteStore {
    fn lookup_participant(&self, chest_number: i64) -> Result<Option<i64>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id FROM api_participant WHERE chest_number = ?1 LIMIT 2")?;
        let ids = stmt
            .query_map([chest_number], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(single(ids))
    }

    fn lookup_group_role(
        &self,
        group_id: i64,
        stage: i64,
        role: AssessorRole,
    ) -> Result<Option<GroupRole>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT myun_id, assessor_id FROM api_assessoringroup
             WHERE group_id = ?1 AND stage = ?2 AND role = ?3
             LIMIT 2",
        )?;
        let found = stmt
            .query_map(params![group_id, stage, role.stored_value()], |row| {
                Ok(GroupRole {
                    myun_id: row.get(0)?,
                    assessor_id: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(single(found))
    }

    fn existing_keys(&self, keys: &[NaturalKey]) -> Result<HashSet<NaturalKey>> {
        let mut existing = HashSet::new();

        for chunk in keys.chunks(KEY_CHUNK) {
            let placeholders = vec!["(?, ?, ?)"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT stage, assessor_id, soldier_id FROM api_assessorevaluation
                 WHERE (stage, assessor_id, soldier_id) IN (VALUES {})",
                placeholders
            );
            let values: Vec<i64> = chunk
                .iter()
                .flat_map(|k| [k.stage, k.assessor_id, k.soldier_id])
                .collect();

            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                Ok(NaturalKey {
                    stage: row.get(0)?,
                    assessor_id: row.get(1)?,
                    soldier_id: row.get(2)?,
                })
            })?;
            for key in rows {
                existing.insert(key?);
            }
        }

        Ok(existing)
    }

    fn insert_or_ignore(&mut self, c: &InsertCandidate) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(INSERT_EVALUATION_SQL)?;
        let affected = stmt.execute(params![
            c.grade,
            c.comment,
            c.stage,
            c.assessor_id,
            c.myun_id,
            c.soldier_id
        ])?;
        Ok(affected)
    }

    fn begin(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }
}

/// ちょうど1件のときだけ値を返す
fn single<T>(mut rows: Vec<T>) -> Option<T> {
    if rows.len() == 1 {
        rows.pop()
    } else {
        None
    }
}

/// 自然キーで登録済み評価の (grade, comment) を取得
pub fn find_evaluation(conn: &Connection, key: &NaturalKey) -> Result<Option<(i64, String)>> {
    let found = conn
        .query_row(
            "SELECT grade, comment FROM api_assessorevaluation
             WHERE stage = ?1 AND assessor_id = ?2 AND soldier_id = ?3",
            params![key.stage, key.assessor_id, key.soldier_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(found)
}
