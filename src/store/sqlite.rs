// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::types::Type;

use crate::store::Backend;
use crate::store::StoreError;
use crate::store::StoreResult;
use crate::types::date::Date;
use crate::types::problem::CompletedDates;
use crate::types::problem::Problem;
use crate::types::problem::ProblemId;
use crate::types::timestamp::Timestamp;

const COLUMNS: &str = "id, name, link, difficulty, category, platform, date_added, completed_dates, created_at, updated_at";

/// The relational datastore: one row per problem.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(database_path: &Path) -> StoreResult<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {}", database_path.display());
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for SqliteStore {
    fn list(&self) -> StoreResult<Vec<Problem>> {
        let conn = self.acquire();
        let sql = format!("select {COLUMNS} from problems order by created_at desc, id desc;");
        let mut stmt = conn.prepare(&sql)?;
        let problems = stmt
            .query_map([], read_problem)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(problems)
    }

    fn add(&self, problem: &Problem) -> StoreResult<Problem> {
        log::debug!("Adding problem {}", problem.id);
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        insert_problem(&tx, problem)?;
        tx.commit()?;
        Ok(problem.clone())
    }

    fn mark_completed(&self, id: &ProblemId, date: Date, now: Timestamp) -> StoreResult<Problem> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let mut problem = select_problem(&tx, id)?.ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if problem.complete(date, now) {
            let sql = "update problems set completed_dates = ?, updated_at = ? where id = ?;";
            tx.execute(
                sql,
                (
                    encode_dates(&problem.completed_dates)?,
                    problem.updated_at,
                    &problem.id,
                ),
            )?;
            tx.commit()?;
        }
        Ok(problem)
    }

    fn remove(&self, id: &ProblemId) -> StoreResult<bool> {
        let conn = self.acquire();
        let count = conn.execute("delete from problems where id = ?;", [id])?;
        Ok(count > 0)
    }

    fn clear_all(&self) -> StoreResult<usize> {
        let conn = self.acquire();
        let count = conn.execute("delete from problems;", [])?;
        Ok(count)
    }

    fn replace_all(&self, problems: &[Problem]) -> StoreResult<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        tx.execute("delete from problems;", [])?;
        for problem in problems {
            insert_problem(&tx, problem)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn data_version(&self) -> StoreResult<Option<i64>> {
        let conn = self.acquire();
        let version: i64 = conn.query_row("pragma data_version;", [], |row| row.get(0))?;
        Ok(Some(version))
    }
}

fn insert_problem(tx: &Transaction, problem: &Problem) -> StoreResult<()> {
    let sql = format!("insert into problems ({COLUMNS}) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?);");
    let result = tx.execute(
        &sql,
        (
            &problem.id,
            &problem.name,
            &problem.link,
            problem.difficulty,
            &problem.category,
            &problem.platform,
            problem.date_added,
            encode_dates(&problem.completed_dates)?,
            problem.created_at,
            problem.updated_at,
        ),
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Duplicate(problem.id.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

fn select_problem(tx: &Transaction, id: &ProblemId) -> StoreResult<Option<Problem>> {
    let sql = format!("select {COLUMNS} from problems where id = ?;");
    let problem = tx.query_row(&sql, [id], read_problem).optional()?;
    Ok(problem)
}

fn read_problem(row: &Row) -> rusqlite::Result<Problem> {
    let completed: String = row.get(7)?;
    let completed_dates: CompletedDates = serde_json::from_str(&completed)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(Problem {
        id: row.get(0)?,
        name: row.get(1)?,
        link: row.get(2)?,
        difficulty: row.get(3)?,
        category: row.get(4)?,
        platform: row.get(5)?,
        date_added: row.get(6)?,
        completed_dates,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn encode_dates(dates: &CompletedDates) -> StoreResult<String> {
    Ok(serde_json::to_string(dates)?)
}

fn probe_schema_exists(tx: &Transaction) -> StoreResult<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["problems"], |row| row.get(0))?;
    Ok(count > 0)
}
